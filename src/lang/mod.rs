/*!
# Rust Language Module

This Rust module provides lexical analysis and parsing of MSIPL:
script lines, the function-call line syntax, and the embedded
arithmetic/boolean expressions.

*/

/// Character range of a token or argument within its source text.
pub type Column = std::ops::Range<usize>;

/// Index of an executable line in a compiled script.
/// `None` for errors not tied to a line.
pub type LineNumber = Option<usize>;

#[macro_use]
mod error;
mod call;
mod lex;
mod line;
mod name;
mod parse;

pub use call::Call;
pub use error::Error;
pub use error::ErrorCode;
pub use lex::lex;
pub use line::Line;
pub use name::{check_name, is_keyword, Name, KEYWORDS};
pub use parse::parse;

pub mod ast;
pub mod token;

#[cfg(test)]
mod tests;
