use super::{EntityKind, Handle, Val};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Data kinds
///
/// The closed set of shapes a variable or memory slot can hold.
/// `Int`, `Float` and `Bool` are value kinds. `Str` only appears
/// in console I/O and as a method argument.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    None,
    Int,
    Float,
    Bool,
    Str,
    PartRef,
    ComponentRef,
    Label,
}

/// Entity lookup supplied by the host world.
pub trait Lookup {
    /// Live handle of the entity with this id, if any.
    fn resolve(&self, id: usize) -> Option<Handle>;
    fn is_alive(&self, handle: Handle) -> bool;
}

impl DataKind {
    /// Kind named by a type word in a `var` declaration.
    pub fn from_word(s: &str) -> DataKind {
        match s {
            "int" => DataKind::Int,
            "float" => DataKind::Float,
            "bool" => DataKind::Bool,
            "part" => DataKind::PartRef,
            _ => DataKind::None,
        }
    }

    pub fn of(val: &Val) -> DataKind {
        match val {
            Val::Int(_) => DataKind::Int,
            Val::Float(_) => DataKind::Float,
            Val::Bool(_) => DataKind::Bool,
            Val::Str(_) => DataKind::Str,
            Val::Entity(h) => match h.kind() {
                EntityKind::Part => DataKind::PartRef,
                EntityKind::Component => DataKind::ComponentRef,
            },
            Val::Line(_) => DataKind::Label,
        }
    }

    pub fn is_value(self) -> bool {
        matches!(self, DataKind::Int | DataKind::Float | DataKind::Bool)
    }

    pub fn is_entity(self) -> bool {
        matches!(self, DataKind::PartRef | DataKind::ComponentRef)
    }

    /// Numeric code reported by `get_type`.
    pub fn code(self) -> i64 {
        match self {
            DataKind::None => 0,
            DataKind::Int => 1,
            DataKind::Float => 2,
            DataKind::Bool => 3,
            DataKind::Str => 4,
            DataKind::PartRef => 5,
            DataKind::ComponentRef => 6,
            DataKind::Label => 7,
        }
    }

    /// Coerce `val` into this kind.
    pub fn convert(self, val: &Val, lookup: &dyn Lookup) -> Result<Val> {
        use DataKind::{Bool, ComponentRef, Float, Int, Label, PartRef, Str};
        let converted = match (self, val) {
            (Int, Val::Int(n)) => Some(Val::Int(*n)),
            (Int, Val::Float(n)) => float_to_int(*n).map(Val::Int),
            (Int, Val::Bool(b)) => Some(Val::Int(if *b { 1 } else { 0 })),
            (Int, Val::Str(s)) => match s.trim().parse::<i64>() {
                Ok(n) => Some(Val::Int(n)),
                Err(_) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(float_to_int)
                    .map(Val::Int),
            },
            (Int, Val::Entity(h)) => Some(Val::Int(h.id() as i64)),
            (Int, Val::Line(addr)) => Some(Val::Int(*addr as i64)),

            (Float, Val::Int(n)) => Some(Val::Float(*n as f64)),
            (Float, Val::Float(n)) => Some(Val::Float(*n)),
            (Float, Val::Bool(b)) => Some(Val::Float(if *b { 1.0 } else { 0.0 })),
            (Float, Val::Str(s)) => s.trim().parse::<f64>().ok().map(Val::Float),
            (Float, Val::Entity(h)) => Some(Val::Float(h.id() as f64)),

            (Bool, Val::Int(n)) => Some(Val::Bool(*n != 0)),
            (Bool, Val::Float(n)) => Some(Val::Bool(*n != 0.0)),
            (Bool, Val::Bool(b)) => Some(Val::Bool(*b)),
            (Bool, Val::Str(s)) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    Some(Val::Bool(true))
                } else if s.eq_ignore_ascii_case("false") {
                    Some(Val::Bool(false))
                } else {
                    None
                }
            }

            (Str, v) => Some(Val::Str(v.to_string().into())),

            (PartRef, Val::Entity(h)) | (ComponentRef, Val::Entity(h)) => {
                if DataKind::of(val) == self {
                    Some(Val::Entity(*h))
                } else {
                    None
                }
            }
            (PartRef, Val::Int(id)) | (ComponentRef, Val::Int(id)) => {
                if *id < 0 {
                    None
                } else {
                    lookup
                        .resolve(*id as usize)
                        .filter(|h| DataKind::of(&Val::Entity(*h)) == self)
                        .map(Val::Entity)
                }
            }

            (Label, Val::Line(addr)) => Some(Val::Line(*addr)),
            (Label, Val::Int(n)) if *n >= 0 => Some(Val::Line(*n as usize)),

            _ => None,
        };
        match converted {
            Some(v) => Ok(v),
            None => Err(error!(ConversionError; format!("{} TO {}", val, self))),
        }
    }
}

/// Truncate toward zero. Fails for NaN, infinities and out of range values.
fn float_to_int(n: f64) -> Option<i64> {
    if !n.is_finite() {
        return None;
    }
    let t = n.trunc();
    if t < i64::MIN as f64 || t >= i64::MAX as f64 {
        return None;
    }
    Some(t as i64)
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use DataKind::*;
        match self {
            None => write!(f, "NONE"),
            Int => write!(f, "INT"),
            Float => write!(f, "FLOAT"),
            Bool => write!(f, "BOOL"),
            Str => write!(f, "STR"),
            PartRef => write!(f, "PART"),
            ComponentRef => write!(f, "COMPONENT"),
            Label => write!(f, "LABEL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;
    use crate::mach::Arena;

    fn fails(kind: DataKind, val: Val, arena: &Arena) {
        match kind.convert(&val, arena) {
            Err(e) => assert!(e.is(ErrorCode::ConversionError), "{} TO {}", val, kind),
            Ok(v) => panic!("{} TO {} gave {}", val, kind, v),
        }
    }

    #[test]
    fn test_convert() {
        let arena = Arena::new();
        assert_eq!(
            DataKind::Int.convert(&Val::Float(2.9), &arena).unwrap(),
            Val::Int(2)
        );
        assert_eq!(
            DataKind::Bool.convert(&Val::Str(" TRUE ".into()), &arena).unwrap(),
            Val::Bool(true)
        );
        assert_eq!(
            DataKind::Label.convert(&Val::Int(4), &arena).unwrap(),
            Val::Line(4)
        );
    }

    #[test]
    fn test_convert_failures() {
        let mut arena = Arena::new();
        let part = arena.spawn_part(0);
        fails(DataKind::Int, Val::Float(f64::NAN), &arena);
        fails(DataKind::Int, Val::Str("ten".into()), &arena);
        fails(DataKind::Bool, Val::Str("yes".into()), &arena);
        fails(DataKind::Label, Val::Int(-1), &arena);
        fails(DataKind::Label, Val::Bool(true), &arena);
        fails(DataKind::PartRef, Val::Int(-3), &arena);
        fails(DataKind::PartRef, Val::Int(part.id() as i64 + 1), &arena);
        fails(DataKind::ComponentRef, Val::Entity(part), &arena);
        fails(DataKind::None, Val::Int(1), &arena);
        assert_eq!(
            DataKind::PartRef
                .convert(&Val::Int(part.id() as i64), &arena)
                .unwrap(),
            Val::Entity(part)
        );
    }
}
