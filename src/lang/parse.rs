use super::{ast::*, lex, token::*, Column, Error};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Parse the text of one embedded expression.
pub fn parse(s: &str) -> Result<Expression> {
    let tokens = lex(s);
    Parser::parse(&tokens)
}

struct Parser<'a> {
    token_stream: std::slice::Iter<'a, (Column, Token)>,
    peeked: Option<&'a (Column, Token)>,
    col: Column,
}

impl<'a> Parser<'a> {
    fn parse(tokens: &'a [(Column, Token)]) -> Result<Expression> {
        let mut parse = Parser {
            token_stream: tokens.iter(),
            peeked: None,
            col: 0..0,
        };
        let expr = match parse.expression() {
            Ok(expr) => expr,
            Err(e) => return Err(e.in_column(&parse.col)),
        };
        match parse.next() {
            None => Ok(expr),
            Some(t) => Err(error!(SyntaxError, ..&parse.col; format!("UNEXPECTED {}", t))),
        }
    }

    fn column(&self) -> Column {
        self.col.clone()
    }

    fn next(&mut self) -> Option<&'a Token> {
        let (col, token) = match self.peeked.take() {
            Some(pair) => pair,
            None => self.token_stream.next()?,
        };
        self.col = col.clone();
        Some(token)
    }

    fn peek(&mut self) -> Option<&'a Token> {
        if self.peeked.is_none() {
            self.peeked = self.token_stream.next();
        }
        self.peeked.map(|(_, token)| token)
    }

    fn expression(&mut self) -> Result<Expression> {
        fn parse(this: &mut Parser, precedence: usize) -> Result<Expression> {
            let mut lhs = match this.next() {
                Some(Token::LParen) => {
                    let expr = this.expression()?;
                    this.expect(Token::RParen)?;
                    expr
                }
                Some(Token::Operator(Operator::Minus)) => {
                    let column = this.column();
                    let expr = parse(this, Expression::unary_precedence())?;
                    Expression::Negation(column, Box::new(expr))
                }
                Some(Token::Operator(Operator::Plus)) => parse(this, Expression::unary_precedence())?,
                Some(Token::Operator(Operator::Not)) => {
                    let column = this.column();
                    let expr = parse(this, Expression::unary_precedence())?;
                    Expression::Not(column, Box::new(expr))
                }
                Some(Token::Ident(i)) => {
                    let column = this.column();
                    let name: Rc<str> = i.as_str().into();
                    match this.peek() {
                        Some(Token::LParen) => {
                            Expression::Function(column, name, this.expression_list()?)
                        }
                        _ => Expression::Var(column, name),
                    }
                }
                Some(Token::Literal(l)) => Expression::for_literal(this.column(), l)?,
                _ => return Err(error!(SyntaxError; "EXPECTED EXPRESSION")),
            };
            loop {
                match this.peek() {
                    Some(Token::Operator(op)) => {
                        let op_precedence = match Expression::op_precedence(op) {
                            Some(p) => p,
                            None => break,
                        };
                        if op_precedence <= precedence {
                            break;
                        }
                        this.next();
                        let column = this.column();
                        let rhs = parse(this, op_precedence)?;
                        lhs = Expression::for_binary_op(column, op, lhs, rhs);
                    }
                    _ => break,
                }
            }
            Ok(lhs)
        }
        parse(self, 0)
    }

    fn expression_list(&mut self) -> Result<Vec<Expression>> {
        self.expect(Token::LParen)?;
        let mut v: Vec<Expression> = vec![];
        if let Some(Token::RParen) = self.peek() {
            self.next();
            return Ok(v);
        }
        loop {
            v.push(self.expression()?);
            match self.next() {
                Some(Token::RParen) => return Ok(v),
                Some(Token::Comma) => continue,
                _ => return Err(error!(SyntaxError; "EXPECTED END OR SEPARATOR")),
            }
        }
    }

    fn expect(&mut self, token: Token) -> Result<()> {
        if let Some(t) = self.next() {
            if *t == token {
                return Ok(());
            }
        }
        use Token::*;
        Err(error!(SyntaxError;
            match token {
                Unknown(_) => "UNEXPECTED TOKEN",
                Literal(_) => "EXPECTED LITERAL",
                Operator(_) => "EXPECTED OPERATOR",
                Ident(_) => "EXPECTED IDENTIFIER",
                LParen => "EXPECTED LEFT PARENTHESIS",
                RParen => "EXPECTED RIGHT PARENTHESIS",
                Comma => "EXPECTED COMMA",
            }
        ))
    }
}

impl Expression {
    fn for_binary_op(col: Column, op: &Operator, lhs: Expression, rhs: Expression) -> Expression {
        use Operator::*;
        let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
        match op {
            Plus => Expression::Add(col, lhs, rhs),
            Minus => Expression::Subtract(col, lhs, rhs),
            Multiply => Expression::Multiply(col, lhs, rhs),
            Divide => Expression::Divide(col, lhs, rhs),
            Modulus => Expression::Modulus(col, lhs, rhs),
            Equal => Expression::Equal(col, lhs, rhs),
            NotEqual => Expression::NotEqual(col, lhs, rhs),
            Less => Expression::Less(col, lhs, rhs),
            LessEqual => Expression::LessEqual(col, lhs, rhs),
            Greater => Expression::Greater(col, lhs, rhs),
            GreaterEqual => Expression::GreaterEqual(col, lhs, rhs),
            And => Expression::And(col, lhs, rhs),
            Or => Expression::Or(col, lhs, rhs),
            Not => unreachable!("NOT IS UNARY"),
        }
    }

    fn op_precedence(op: &Operator) -> Option<usize> {
        use Operator::*;
        match op {
            Or => Some(1),
            And => Some(2),
            Equal | NotEqual => Some(3),
            Less | LessEqual | Greater | GreaterEqual => Some(4),
            Plus | Minus => Some(5),
            Multiply | Divide | Modulus => Some(6),
            Not => None,
        }
    }

    fn unary_precedence() -> usize {
        7
    }

    fn for_literal(col: Column, lit: &Literal) -> Result<Expression> {
        match lit {
            Literal::Integer(s) => match s.parse() {
                Ok(n) => Ok(Expression::Integer(col, n)),
                Err(_) => Err(error!(Overflow, ..&col; "INTEGER LITERAL TOO LARGE")),
            },
            Literal::Float(s) => match s.parse() {
                Ok(n) => Ok(Expression::Float(col, n)),
                Err(_) => Err(error!(SyntaxError, ..&col; "MALFORMED NUMBER")),
            },
            Literal::True => Ok(Expression::Bool(col, true)),
            Literal::False => Ok(Expression::Bool(col, false)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(col: Column, s: &str) -> Box<Expression> {
        Box::new(Expression::Var(col, s.into()))
    }

    #[test]
    fn test_left_assoc() {
        let answer = Expression::Subtract(
            3..4,
            Box::new(Expression::Subtract(
                1..2,
                var(0..1, "a"),
                Box::new(Expression::Integer(2..3, 2)),
            )),
            var(4..5, "b"),
        );
        assert_eq!(parse("a-2-b").unwrap(), answer);
    }

    #[test]
    fn test_precedence_and_paren() {
        let answer = Expression::Multiply(
            5..6,
            Box::new(Expression::Add(
                2..3,
                Box::new(Expression::Integer(1..2, 1)),
                Box::new(Expression::Integer(3..4, 2)),
            )),
            Box::new(Expression::Integer(6..7, 3)),
        );
        assert_eq!(parse("(1+2)*3").unwrap(), answer);
    }

    #[test]
    fn test_comparison_binds_looser_than_sum() {
        match parse("n+1 < 3 && ok").unwrap() {
            Expression::And(_, lhs, rhs) => {
                assert!(matches!(*lhs, Expression::Less(..)));
                assert_eq!(*rhs, Expression::Var(11..13, "ok".into()));
            }
            e => panic!("{:?}", e),
        }
    }

    #[test]
    fn test_unary() {
        let answer = Expression::Negation(0..1, Box::new(Expression::Float(1..4, 2.5)));
        assert_eq!(parse("-2.5").unwrap(), answer);
        assert!(matches!(parse("not true").unwrap(), Expression::Not(..)));
    }

    #[test]
    fn test_functions() {
        let answer = Expression::Function(
            0..3,
            "max".into(),
            vec![Expression::Integer(4..5, 1), *var(7..8, "x")],
        );
        assert_eq!(parse("max(1, x)").unwrap(), answer);
        assert_eq!(
            parse("random()").unwrap(),
            Expression::Function(0..6, "random".into(), vec![])
        );
    }

    #[test]
    fn test_errors() {
        assert!(parse("").is_err());
        assert!(parse("1 +").is_err());
        assert!(parse("(1").is_err());
        assert!(parse("1 2").is_err());
        assert!(parse("a $ b").is_err());
        assert!(parse("99999999999999999999").is_err());
    }

    #[test]
    fn test_parameters() {
        let expr = parse("a + b * a - max(c, b)").unwrap();
        let names: Vec<String> = expr.parameters().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
