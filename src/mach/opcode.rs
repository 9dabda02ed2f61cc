use super::{Address, Val};

/// ## Expression instruction set
///
/// An embedded expression compiles to a short program for a stack machine
/// with no registers. Every operation works on the stack.
///
/// For example: `n+1 < 3` compiles to `[Push(0), Literal(1), Add, Literal(3), Lt]`
/// where parameter 0 is bound to `n` before evaluation.
///
/// See <https://en.wikipedia.org/wiki/Reverse_Polish_notation>

#[derive(Clone, PartialEq)]
pub enum Opcode {
    // *** Stack manipulation
    /// Push literal value on to the stack.
    Literal(Val),
    /// Push the value bound to a parameter slot.
    Push(usize),

    // *** Branch control
    /// Pop stack and branch to Address if false.
    IfNot(Address),
    /// Unconditional branch to Address.
    Jump(Address),

    // *** Operators
    Neg,
    Not,
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,

    // *** Built-in functions
    Abs,
    Acos,
    Asin,
    Atan,
    Ceiling,
    Cos,
    Exp,
    Floor,
    Log,
    Log10,
    Max,
    Min,
    Pow,
    Random,
    Round,
    Sign,
    Sin,
    Sqrt,
    Tan,
    Truncate,
}

impl std::fmt::Debug for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string())
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Opcode::*;
        match self {
            Literal(v) => write!(f, "{}", format!("{:?}", v).to_ascii_uppercase()),
            Push(n) => write!(f, "PUSH({})", n),

            IfNot(a) => write!(f, "IFNOT({})", a),
            Jump(a) => write!(f, "JUMP({})", a),

            Neg => write!(f, "NEG"),
            Not => write!(f, "NOT"),
            Mul => write!(f, "MUL"),
            Div => write!(f, "DIV"),
            Mod => write!(f, "MOD"),
            Add => write!(f, "ADD"),
            Sub => write!(f, "SUB"),
            Eq => write!(f, "EQ"),
            NotEq => write!(f, "NOTEQ"),
            Lt => write!(f, "LT"),
            LtEq => write!(f, "LTEQ"),
            Gt => write!(f, "GT"),
            GtEq => write!(f, "GTEQ"),
            And => write!(f, "AND"),
            Or => write!(f, "OR"),

            Abs => write!(f, "ABS"),
            Acos => write!(f, "ACOS"),
            Asin => write!(f, "ASIN"),
            Atan => write!(f, "ATAN"),
            Ceiling => write!(f, "CEILING"),
            Cos => write!(f, "COS"),
            Exp => write!(f, "EXP"),
            Floor => write!(f, "FLOOR"),
            Log => write!(f, "LOG"),
            Log10 => write!(f, "LOG10"),
            Max => write!(f, "MAX"),
            Min => write!(f, "MIN"),
            Pow => write!(f, "POW"),
            Random => write!(f, "RANDOM"),
            Round => write!(f, "ROUND"),
            Sign => write!(f, "SIGN"),
            Sin => write!(f, "SIN"),
            Sqrt => write!(f, "SQRT"),
            Tan => write!(f, "TAN"),
            Truncate => write!(f, "TRUNCATE"),
        }
    }
}
