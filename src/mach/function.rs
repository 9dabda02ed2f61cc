use super::{Opcode, Val};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Built-in expression functions
///
/// Names are matched without regard to case. `if` is not listed here;
/// it compiles to branches so that only the chosen side is evaluated.

pub struct Function {}

impl Function {
    pub fn opcode_and_arity(func_name: &str) -> Option<(Opcode, std::ops::RangeInclusive<usize>)> {
        match func_name.to_ascii_lowercase().as_str() {
            "abs" => Some((Opcode::Abs, 1..=1)),
            "acos" => Some((Opcode::Acos, 1..=1)),
            "asin" => Some((Opcode::Asin, 1..=1)),
            "atan" => Some((Opcode::Atan, 1..=1)),
            "ceiling" => Some((Opcode::Ceiling, 1..=1)),
            "cos" => Some((Opcode::Cos, 1..=1)),
            "exp" => Some((Opcode::Exp, 1..=1)),
            "floor" => Some((Opcode::Floor, 1..=1)),
            "log" => Some((Opcode::Log, 1..=2)),
            "log10" => Some((Opcode::Log10, 1..=1)),
            "max" => Some((Opcode::Max, 2..=2)),
            "min" => Some((Opcode::Min, 2..=2)),
            "pow" => Some((Opcode::Pow, 2..=2)),
            "random" => Some((Opcode::Random, 0..=0)),
            "round" => Some((Opcode::Round, 1..=1)),
            "sign" => Some((Opcode::Sign, 1..=1)),
            "sin" => Some((Opcode::Sin, 1..=1)),
            "sqrt" => Some((Opcode::Sqrt, 1..=1)),
            "tan" => Some((Opcode::Tan, 1..=1)),
            "truncate" => Some((Opcode::Truncate, 1..=1)),
            _ => None,
        }
    }

    pub fn is_if(func_name: &str) -> bool {
        func_name.eq_ignore_ascii_case("if")
    }

    fn float(name: &str, val: &Val) -> Result<f64> {
        match val {
            Val::Int(n) => Ok(*n as f64),
            Val::Float(n) => Ok(*n),
            v => Err(error!(InvalidOperand; format!("{}({})", name, v))),
        }
    }

    /// Apply a one-argument math function that always yields a float.
    pub fn unary(opcode: &Opcode, val: Val) -> Result<Val> {
        let name = opcode.to_string();
        let n = Function::float(&name, &val)?;
        let r = match opcode {
            Opcode::Acos => n.acos(),
            Opcode::Asin => n.asin(),
            Opcode::Atan => n.atan(),
            Opcode::Ceiling => n.ceil(),
            Opcode::Cos => n.cos(),
            Opcode::Exp => n.exp(),
            Opcode::Floor => n.floor(),
            Opcode::Log10 => n.log10(),
            Opcode::Round => round_half_even(n),
            Opcode::Sin => n.sin(),
            Opcode::Sqrt => n.sqrt(),
            Opcode::Tan => n.tan(),
            Opcode::Truncate => n.trunc(),
            _ => return Err(error!(InternalError; format!("{} IS NOT UNARY", name))),
        };
        Ok(Val::Float(r))
    }

    pub fn abs(val: Val) -> Result<Val> {
        match val {
            Val::Int(n) => match n.checked_abs() {
                Some(n) => Ok(Val::Int(n)),
                None => Err(error!(Overflow)),
            },
            Val::Float(n) => Ok(Val::Float(n.abs())),
            v => Err(error!(InvalidOperand; format!("ABS({})", v))),
        }
    }

    pub fn sign(val: Val) -> Result<Val> {
        match val {
            Val::Int(n) => Ok(Val::Int(n.signum())),
            Val::Float(n) if n.is_nan() => Err(error!(InvalidOperand; "SIGN(NAN)")),
            Val::Float(n) if n == 0.0 => Ok(Val::Int(0)),
            Val::Float(n) => Ok(Val::Int(if n < 0.0 { -1 } else { 1 })),
            v => Err(error!(InvalidOperand; format!("SIGN({})", v))),
        }
    }

    /// `log(x)` is the natural logarithm, `log(x, base)` any base.
    pub fn log(mut args: Vec<Val>) -> Result<Val> {
        let base = if args.len() == 2 {
            match args.pop() {
                Some(b) => Some(Function::float("LOG", &b)?),
                None => None,
            }
        } else {
            None
        };
        let n = match args.pop() {
            Some(v) => Function::float("LOG", &v)?,
            None => return Err(error!(InternalError; "LOG WITHOUT ARGUMENT")),
        };
        Ok(Val::Float(match base {
            Some(b) => n.ln() / b.ln(),
            None => n.ln(),
        }))
    }

    pub fn pow(lhs: Val, rhs: Val) -> Result<Val> {
        let l = Function::float("POW", &lhs)?;
        let r = Function::float("POW", &rhs)?;
        Ok(Val::Float(l.powf(r)))
    }

    pub fn max(lhs: Val, rhs: Val) -> Result<Val> {
        match (&lhs, &rhs) {
            (Val::Int(l), Val::Int(r)) => Ok(Val::Int(*l.max(r))),
            _ => {
                let l = Function::float("MAX", &lhs)?;
                let r = Function::float("MAX", &rhs)?;
                Ok(Val::Float(l.max(r)))
            }
        }
    }

    pub fn min(lhs: Val, rhs: Val) -> Result<Val> {
        match (&lhs, &rhs) {
            (Val::Int(l), Val::Int(r)) => Ok(Val::Int(*l.min(r))),
            _ => {
                let l = Function::float("MIN", &lhs)?;
                let r = Function::float("MIN", &rhs)?;
                Ok(Val::Float(l.min(r)))
            }
        }
    }

    /// Uniform in `[0, 1)`.
    pub fn random() -> Val {
        Val::Float(rand::random::<f64>())
    }
}

/// Ties round to the even neighbour.
fn round_half_even(n: f64) -> f64 {
    let r = n.round();
    if (n - n.trunc()).abs() == 0.5 {
        2.0 * (n / 2.0).round()
    } else {
        r
    }
}
