use super::{Address, Handle};
use std::rc::Rc;

/// ## Runtime values
///
/// Every value a variable, memory slot or expression can hold.
/// `Entity` is a weak reference into the world's arena and must be
/// checked for liveness before use. `Line` is the value of a label.

#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Rc<str>),
    Entity(Handle),
    Line(Address),
}

impl Val {
    pub fn as_entity(&self) -> Option<Handle> {
        match self {
            Val::Entity(handle) => Some(*handle),
            _ => None,
        }
    }

    /// Scalar stand-in used when a value is bound into an expression.
    /// Entities bind by their integer id, labels by their line.
    pub fn scalar(&self) -> Val {
        match self {
            Val::Entity(handle) => Val::Int(handle.id() as i64),
            Val::Line(addr) => Val::Int(*addr as i64),
            v => v.clone(),
        }
    }

    /// Text appended to the output buffer by `console push`.
    /// Booleans print as `1` or `0` and whole floats print without a fraction.
    pub fn render(&self) -> String {
        match self {
            Val::Bool(true) => "1".into(),
            Val::Bool(false) => "0".into(),
            v => v.to_string(),
        }
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Val::*;
        match self {
            Int(n) => write!(f, "{}", n),
            Float(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Bool(b) => write!(f, "{}", b),
            Str(s) => write!(f, "{}", s),
            Entity(handle) => write!(f, "{}", handle.id()),
            Line(addr) => write!(f, "{}", addr),
        }
    }
}

impl From<i64> for Val {
    fn from(n: i64) -> Self {
        Val::Int(n)
    }
}

impl From<f64> for Val {
    fn from(n: f64) -> Self {
        Val::Float(n)
    }
}

impl From<bool> for Val {
    fn from(b: bool) -> Self {
        Val::Bool(b)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Self {
        Val::Str(s.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_float_renders_without_fraction() {
        assert_eq!(Val::Float(2.0).render(), "2");
        assert_eq!(Val::Float(-3.0).render(), "-3");
        assert_eq!(Val::Float(2.5).render(), "2.5");
        assert_eq!(Val::Float(f64::INFINITY).render(), "inf");
    }

    #[test]
    fn test_bool_renders_as_digit() {
        assert_eq!(Val::Bool(true).render(), "1");
        assert_eq!(Val::Bool(false).render(), "0");
        assert_eq!(Val::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_scalar() {
        assert_eq!(Val::Line(7).scalar(), Val::Int(7));
        assert_eq!(Val::Int(3).scalar(), Val::Int(3));
    }
}
