/// ## Expression tokens

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Unknown(String),
    Literal(Literal),
    Operator(Operator),
    Ident(String),
    LParen,
    RParen,
    Comma,
}

impl Token {
    pub fn from_string(s: &str) -> Option<Token> {
        use Operator::*;
        let t = match s {
            "(" => Token::LParen,
            ")" => Token::RParen,
            "," => Token::Comma,
            "+" => Token::Operator(Plus),
            "-" => Token::Operator(Minus),
            "*" => Token::Operator(Multiply),
            "/" => Token::Operator(Divide),
            "%" => Token::Operator(Modulus),
            "=" | "==" => Token::Operator(Equal),
            "!=" | "<>" => Token::Operator(NotEqual),
            "<" => Token::Operator(Less),
            "<=" => Token::Operator(LessEqual),
            ">" => Token::Operator(Greater),
            ">=" => Token::Operator(GreaterEqual),
            "!" => Token::Operator(Not),
            "&&" => Token::Operator(And),
            "||" => Token::Operator(Or),
            _ => return None,
        };
        Some(t)
    }

    /// Words that lex as something other than an identifier.
    pub fn from_word(s: &str) -> Option<Token> {
        match s.to_ascii_lowercase().as_str() {
            "true" => Some(Token::Literal(Literal::True)),
            "false" => Some(Token::Literal(Literal::False)),
            "and" => Some(Token::Operator(Operator::And)),
            "or" => Some(Token::Operator(Operator::Or)),
            "not" => Some(Token::Operator(Operator::Not)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Unknown(s) => write!(f, "{}", s),
            Literal(s) => write!(f, "{}", s),
            Operator(s) => write!(f, "{}", s),
            Ident(s) => write!(f, "{}", s),
            LParen => write!(f, "("),
            RParen => write!(f, ")"),
            Comma => write!(f, ","),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Integer(String),
    Float(String),
    True,
    False,
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Literal::*;
        match self {
            Integer(s) => write!(f, "{}", s),
            Float(s) => write!(f, "{}", s),
            True => write!(f, "true"),
            False => write!(f, "false"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulus,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Not,
    And,
    Or,
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        match self {
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Multiply => write!(f, "*"),
            Divide => write!(f, "/"),
            Modulus => write!(f, "%"),
            Equal => write!(f, "=="),
            NotEqual => write!(f, "!="),
            Less => write!(f, "<"),
            LessEqual => write!(f, "<="),
            Greater => write!(f, ">"),
            GreaterEqual => write!(f, ">="),
            Not => write!(f, "!"),
            And => write!(f, "&&"),
            Or => write!(f, "||"),
        }
    }
}
