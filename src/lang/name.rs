use super::Error;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Instruction keywords. None of these may name a variable or label.
pub const KEYWORDS: [&str; 9] = [
    "var", "set", "jump", "label", "stop", "time", "console", "memory", "comp",
];

pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

/// A validated declaration name.
#[derive(Debug, PartialEq, Clone)]
pub struct Name {
    pub name: Rc<str>,
    pub readonly: bool,
}

/// Validate a name as written in a declaration.
/// A name wrapped in `{}` declares a readonly variable.
pub fn check_name(s: &str) -> Result<Name> {
    let (inner, readonly) = if s.len() > 1 && s.starts_with('{') && s.ends_with('}') {
        (&s[1..s.len() - 1], true)
    } else {
        (s, false)
    };
    if inner.is_empty() {
        return Err(error!(IllegalName; "EMPTY NAME"));
    }
    if is_literal(inner) {
        return Err(error!(IllegalName; format!("{} IS A LITERAL", inner)));
    }
    if is_keyword(inner) {
        return Err(error!(IllegalName; format!("{} IS AN INSTRUCTION", inner)));
    }
    if inner == "this" {
        return Err(error!(IllegalName; "THIS IS RESERVED"));
    }
    if !inner.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(error!(IllegalName; format!("ILLEGAL CHARACTER IN {}", inner)));
    }
    Ok(Name {
        name: inner.into(),
        readonly,
    })
}

fn is_literal(s: &str) -> bool {
    s.parse::<f64>().is_ok() || s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false")
}
