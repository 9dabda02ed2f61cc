use super::{DataKind, Expr, Lookup, Val, VarId, VariableStorage};
use crate::error;
use crate::lang::Error;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Instruction operand
///
/// Every operand an instruction reads flows through here so that null
/// checks and parameter binding behave the same everywhere.
///
/// * `"text"` is a string literal.
/// * `'name'` reads an integer variable as a single character.
/// * The name of an entity variable refers to that variable.
/// * Anything else is an expression. Expressions made of a single
///   literal are kept as that literal.

#[derive(Debug, Clone)]
pub enum Argument {
    Literal(Val),
    Variable(VarId),
    Char(VarId),
    Expression(Expr),
    String(Rc<str>),
}

impl Argument {
    pub fn from_text(text: &str, vars: &VariableStorage) -> Result<Argument> {
        if text.contains('"') {
            return match strip_edges(text, '"') {
                Some(s) if !s.contains('"') => Ok(Argument::String(s.into())),
                _ => Err(error!(SyntaxError; format!("INVALID STRING {}", text))),
            };
        }
        if text.contains('\'') {
            return match strip_edges(text, '\'') {
                Some(name) => Argument::char(name, vars),
                None => Err(error!(SyntaxError; format!("INVALID CHARACTER {}", text))),
            };
        }
        if let Ok(var) = vars.handle(text) {
            if !var.kind().is_value() {
                return Ok(Argument::Variable(vars.id(text)?));
            }
        }
        Argument::expression(text, vars)
    }

    /// An operand that must be an expression.
    pub fn expression(text: &str, vars: &VariableStorage) -> Result<Argument> {
        let expr = Expr::compile(text, vars)?;
        match expr.constant() {
            Some(val) => Ok(Argument::Literal(val.clone())),
            None => Ok(Argument::Expression(expr)),
        }
    }

    /// Character alias of an integer variable.
    pub fn char(name: &str, vars: &VariableStorage) -> Result<Argument> {
        let id = vars.id(name)?;
        let kind = vars.get(id).kind();
        if kind != DataKind::Int {
            return Err(error!(TypeMismatch; format!("{} IS {}, NOT INT", name, kind)));
        }
        Ok(Argument::Char(id))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Argument::Literal(Val::Int(_)))
            || matches!(self, Argument::Literal(Val::Float(_)))
            || matches!(self, Argument::Expression(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Argument::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn value(&self, vars: &VariableStorage, lookup: &dyn Lookup) -> Result<Val> {
        match self {
            Argument::Literal(val) => Ok(val.clone()),
            Argument::String(s) => Ok(Val::Str(s.clone())),
            Argument::Expression(expr) => expr.evaluate(vars, lookup),
            Argument::Variable(id) => {
                let var = vars.get(*id);
                match var.get() {
                    Some(val) if !var.is_null(lookup) => Ok(val.clone()),
                    _ => Err(error!(NullParameter; var.name().to_string())),
                }
            }
            Argument::Char(id) => {
                let var = vars.get(*id);
                match var.get() {
                    Some(Val::Int(n)) => match to_char(*n) {
                        Some(ch) => Ok(Val::Str(ch.to_string().into())),
                        None => Err(error!(ConversionError; format!("{} IS NOT A CHARACTER", n))),
                    },
                    _ => Err(error!(NullParameter; var.name().to_string())),
                }
            }
        }
    }
}

pub fn to_char(n: i64) -> Option<char> {
    if n < 0 || n > u32::MAX as i64 {
        return None;
    }
    std::char::from_u32(n as u32)
}

fn strip_edges(text: &str, quote: char) -> Option<&str> {
    if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

impl std::fmt::Display for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Argument::Literal(val) => write!(f, "{}", val),
            Argument::Variable(id) => write!(f, "VAR({:?})", id),
            Argument::Char(id) => write!(f, "CHAR({:?})", id),
            Argument::Expression(expr) => write!(f, "{}", expr),
            Argument::String(s) => write!(f, "\"{}\"", s),
        }
    }
}
