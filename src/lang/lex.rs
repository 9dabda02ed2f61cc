use super::{token::*, Column};

/// Split expression text into tokens, each paired with its character column.
/// Whitespace separates tokens and is otherwise dropped.
pub fn lex(s: &str) -> Vec<(Column, Token)> {
    ExpressionLexer::lex(s)
}

fn is_expr_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_expr_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

trait Tokenizers<'a> {
    fn chars(&mut self) -> &mut std::iter::Peekable<std::str::Chars<'a>>;
    fn bump(&mut self) -> Option<char>;

    fn whitespace(&mut self) {
        while let Some(pk) = self.chars().peek() {
            if !is_expr_whitespace(*pk) {
                break;
            }
            self.bump();
        }
    }

    fn number(&mut self) -> Option<Token> {
        let mut s = String::new();
        let mut decimal = false;
        let mut exp = false;
        while let Some(&pk) = self.chars().peek() {
            if is_expr_digit(pk) {
                s.push(pk);
                self.bump();
                continue;
            }
            if pk == '.' && !decimal && !exp {
                decimal = true;
                s.push(pk);
                self.bump();
                continue;
            }
            if (pk == 'e' || pk == 'E') && !exp && self.exponent_follows() {
                exp = true;
                s.push('E');
                self.bump();
                if let Some(&sign) = self.chars().peek() {
                    if sign == '+' || sign == '-' {
                        s.push(sign);
                        self.bump();
                    }
                }
                continue;
            }
            break;
        }
        if decimal || exp {
            Some(Token::Literal(Literal::Float(s)))
        } else {
            Some(Token::Literal(Literal::Integer(s)))
        }
    }

    /// True if the `e` under the cursor starts an exponent rather than an identifier.
    fn exponent_follows(&mut self) -> bool {
        let mut ahead = self.chars().clone();
        ahead.next();
        match ahead.next() {
            Some(c) if is_expr_digit(c) => true,
            Some('+') | Some('-') => matches!(ahead.next(), Some(c) if is_expr_digit(c)),
            _ => false,
        }
    }

    fn alphabetic(&mut self) -> Option<Token> {
        let mut s = String::new();
        while let Some(&pk) = self.chars().peek() {
            if !is_ident_char(pk) {
                break;
            }
            s.push(pk);
            self.bump();
        }
        match Token::from_word(&s) {
            Some(token) => Some(token),
            None => Some(Token::Ident(s)),
        }
    }

    fn minutia(&mut self) -> Option<Token> {
        let mut s = String::new();
        s.push(self.bump()?);
        if let Some(&pk) = self.chars().peek() {
            let mut two = s.clone();
            two.push(pk);
            if let Some(t) = Token::from_string(&two) {
                self.bump();
                return Some(t);
            }
        }
        match Token::from_string(&s) {
            Some(t) => Some(t),
            None => Some(Token::Unknown(s)),
        }
    }
}

struct ExpressionLexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    pos: usize,
}

impl<'a> Tokenizers<'a> for ExpressionLexer<'a> {
    fn chars(&mut self) -> &mut std::iter::Peekable<std::str::Chars<'a>> {
        &mut self.chars
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.pos += 1;
        Some(ch)
    }
}

impl<'a> Iterator for ExpressionLexer<'a> {
    type Item = (Column, Token);

    fn next(&mut self) -> Option<Self::Item> {
        self.whitespace();
        let pk = *self.chars.peek()?;
        let start = self.pos;
        let token = if is_expr_digit(pk) || pk == '.' {
            self.number()?
        } else if is_ident_start(pk) {
            self.alphabetic()?
        } else {
            self.minutia()?
        };
        Some((start..self.pos, token))
    }
}

impl<'a> ExpressionLexer<'a> {
    fn lex(s: &str) -> Vec<(Column, Token)> {
        ExpressionLexer {
            chars: s.chars().peekable(),
            pos: 0,
        }
        .collect()
    }
}
