use super::Val;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Expression operators
///
/// Integer arithmetic is checked. Mixing an integer with a float promotes
/// to float. Division always produces a float.

pub struct Operation {}

fn mismatch(op: &str, lhs: &Val, rhs: &Val) -> Error {
    error!(InvalidOperand; format!("{} {} {}", lhs, op, rhs))
}

impl Operation {
    pub fn negate(val: Val) -> Result<Val> {
        use Val::*;
        match val {
            Int(n) => match n.checked_neg() {
                Some(n) => Ok(Int(n)),
                None => Err(error!(Overflow)),
            },
            Float(n) => Ok(Float(-n)),
            v => Err(error!(InvalidOperand; format!("-{}", v))),
        }
    }

    pub fn not(val: Val) -> Result<Val> {
        match val {
            Val::Bool(b) => Ok(Val::Bool(!b)),
            v => Err(error!(InvalidOperand; format!("!{}", v))),
        }
    }

    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (&lhs, &rhs) {
            (Int(l), Int(r)) => match l.checked_mul(*r) {
                Some(i) => Ok(Int(i)),
                None => Err(error!(Overflow)),
            },
            (Int(l), Float(r)) => Ok(Float(*l as f64 * r)),
            (Float(l), Int(r)) => Ok(Float(l * *r as f64)),
            (Float(l), Float(r)) => Ok(Float(l * r)),
            _ => Err(mismatch("*", &lhs, &rhs)),
        }
    }

    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (&lhs, &rhs) {
            (Int(l), Int(r)) => Ok(Float(*l as f64 / *r as f64)),
            (Int(l), Float(r)) => Ok(Float(*l as f64 / r)),
            (Float(l), Int(r)) => Ok(Float(l / *r as f64)),
            (Float(l), Float(r)) => Ok(Float(l / r)),
            _ => Err(mismatch("/", &lhs, &rhs)),
        }
    }

    pub fn modulus(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (&lhs, &rhs) {
            (Int(_), Int(0)) => Err(error!(DivisionByZero)),
            (Int(l), Int(r)) => match l.checked_rem(*r) {
                Some(i) => Ok(Int(i)),
                None => Err(error!(Overflow)),
            },
            (Int(l), Float(r)) => Ok(Float(*l as f64 % r)),
            (Float(l), Int(r)) => Ok(Float(l % *r as f64)),
            (Float(l), Float(r)) => Ok(Float(l % r)),
            _ => Err(mismatch("%", &lhs, &rhs)),
        }
    }

    pub fn sum(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (&lhs, &rhs) {
            (Int(l), Int(r)) => match l.checked_add(*r) {
                Some(i) => Ok(Int(i)),
                None => Err(error!(Overflow)),
            },
            (Int(l), Float(r)) => Ok(Float(*l as f64 + r)),
            (Float(l), Int(r)) => Ok(Float(l + *r as f64)),
            (Float(l), Float(r)) => Ok(Float(l + r)),
            _ => Err(mismatch("+", &lhs, &rhs)),
        }
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (&lhs, &rhs) {
            (Int(l), Int(r)) => match l.checked_sub(*r) {
                Some(i) => Ok(Int(i)),
                None => Err(error!(Overflow)),
            },
            (Int(l), Float(r)) => Ok(Float(*l as f64 - r)),
            (Float(l), Int(r)) => Ok(Float(l - *r as f64)),
            (Float(l), Float(r)) => Ok(Float(l - r)),
            _ => Err(mismatch("-", &lhs, &rhs)),
        }
    }

    pub fn equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Bool(Operation::equal_bool(&lhs, &rhs)?))
    }

    pub fn not_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Bool(!Operation::equal_bool(&lhs, &rhs)?))
    }

    fn equal_bool(lhs: &Val, rhs: &Val) -> Result<bool> {
        use Val::*;
        match (lhs, rhs) {
            (Int(l), Int(r)) => Ok(l == r),
            (Int(l), Float(r)) => Ok(*l as f64 == *r),
            (Float(l), Int(r)) => Ok(*l == *r as f64),
            (Float(l), Float(r)) => Ok(l == r),
            (Bool(l), Bool(r)) => Ok(l == r),
            _ => Err(mismatch("==", lhs, rhs)),
        }
    }

    pub fn less(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Bool(Operation::compare(&lhs, &rhs, "<")?.is_lt()))
    }

    pub fn less_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Bool(Operation::compare(&lhs, &rhs, "<=")?.is_le()))
    }

    pub fn greater(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Bool(Operation::compare(&lhs, &rhs, ">")?.is_gt()))
    }

    pub fn greater_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Bool(Operation::compare(&lhs, &rhs, ">=")?.is_ge()))
    }

    /// Numeric ordering. Comparisons involving NaN are false.
    fn compare(lhs: &Val, rhs: &Val, op: &str) -> Result<Ordering> {
        use Val::*;
        let (l, r) = match (lhs, rhs) {
            (Int(l), Int(r)) => return Ok(Ordering::from(l.cmp(r))),
            (Int(l), Float(r)) => (*l as f64, *r),
            (Float(l), Int(r)) => (*l, *r as f64),
            (Float(l), Float(r)) => (*l, *r),
            _ => return Err(mismatch(op, lhs, rhs)),
        };
        Ok(match l.partial_cmp(&r) {
            Some(o) => Ordering::from(o),
            None => Ordering::Unordered,
        })
    }

    pub fn and(lhs: Val, rhs: Val) -> Result<Val> {
        match (&lhs, &rhs) {
            (Val::Bool(l), Val::Bool(r)) => Ok(Val::Bool(*l && *r)),
            _ => Err(mismatch("&&", &lhs, &rhs)),
        }
    }

    pub fn or(lhs: Val, rhs: Val) -> Result<Val> {
        match (&lhs, &rhs) {
            (Val::Bool(l), Val::Bool(r)) => Ok(Val::Bool(*l || *r)),
            _ => Err(mismatch("||", &lhs, &rhs)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Ordering {
    Less,
    Equal,
    Greater,
    Unordered,
}

impl Ordering {
    fn is_lt(self) -> bool {
        self == Ordering::Less
    }
    fn is_le(self) -> bool {
        self == Ordering::Less || self == Ordering::Equal
    }
    fn is_gt(self) -> bool {
        self == Ordering::Greater
    }
    fn is_ge(self) -> bool {
        self == Ordering::Greater || self == Ordering::Equal
    }
}

impl From<std::cmp::Ordering> for Ordering {
    fn from(o: std::cmp::Ordering) -> Self {
        match o {
            std::cmp::Ordering::Less => Ordering::Less,
            std::cmp::Ordering::Equal => Ordering::Equal,
            std::cmp::Ordering::Greater => Ordering::Greater,
        }
    }
}
