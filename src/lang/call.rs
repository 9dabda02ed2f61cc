use super::{Column, Error};

type Result<T> = std::result::Result<T, Error>;

/// ## Function-call line
///
/// `<instruction> <name>(<arg>, <arg>) <ret>`
///
/// Arguments split on `, ` only at the outermost bracket level and outside
/// double quotes. Inside nested brackets or quotes, commas and spaces are
/// kept as part of the argument. Everywhere else a space is only legal
/// after the instruction keyword, after an argument comma, and between the
/// closing bracket and the return variable.

#[derive(Debug, PartialEq, Clone)]
pub struct Call {
    pub instruction: String,
    pub name: String,
    pub args: Vec<String>,
    pub ret: Option<String>,
}

impl Call {
    pub fn parse(s: &str) -> Result<Call> {
        CallParser::new(s).parse()
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }

    pub fn ret(&self) -> Option<&str> {
        self.ret.as_deref()
    }
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}({})", self.instruction, self.name, self.args.join(", "))?;
        if let Some(ret) = &self.ret {
            write!(f, " {}", ret)?;
        }
        Ok(())
    }
}

struct CallParser {
    chars: Vec<char>,
    pos: usize,
}

impl CallParser {
    fn new(s: &str) -> CallParser {
        CallParser {
            chars: s.chars().collect(),
            pos: 0,
        }
    }

    fn col(&self) -> Column {
        self.pos..self.pos + 1
    }

    fn unexpected(&self, what: &str) -> Error {
        error!(SyntaxError, ..&self.col(); format!("UNEXPECTED {}", what))
    }

    fn expected_space(&self) -> Error {
        error!(SyntaxError, ..&self.col(); "SPACE EXPECTED")
    }

    fn parse(mut self) -> Result<Call> {
        match self.chars.first() {
            None | Some('#') => return Err(error!(SyntaxError; "NOT A FUNCTION CALL")),
            Some(' ') | Some('(') | Some(')') | Some('"') => {
                return Err(self.unexpected(&self.chars[0].to_string()))
            }
            _ => {}
        }

        let mut instruction = String::new();
        while let Some(&ch) = self.chars.get(self.pos) {
            match ch {
                ' ' => break,
                '(' | ')' => return Err(self.unexpected("BRACKET")),
                _ => instruction.push(ch),
            }
            self.pos += 1;
        }
        self.pos += 1;

        let mut name = String::new();
        while let Some(&ch) = self.chars.get(self.pos) {
            match ch {
                '(' => break,
                ' ' => return Err(self.unexpected("SPACE")),
                _ => name.push(ch),
            }
            self.pos += 1;
        }
        self.pos += 1;

        let args = self.arguments()?;
        let ret = self.return_variable()?;

        if instruction.is_empty() {
            return Err(error!(SyntaxError; "MISSING INSTRUCTION"));
        }
        if name.is_empty() {
            return Err(error!(SyntaxError; "MISSING FUNCTION NAME"));
        }
        if args.iter().any(|a| a.is_empty()) {
            return Err(error!(SyntaxError; "EMPTY ARGUMENT"));
        }
        Ok(Call {
            instruction,
            name,
            args,
            ret,
        })
    }

    fn arguments(&mut self) -> Result<Vec<String>> {
        let mut brackets = 1;
        let mut space = false;
        let mut quote = false;
        let mut args = vec![String::new()];
        while let Some(&ch) = self.chars.get(self.pos) {
            if brackets == 0 {
                break;
            }
            let last = args.len() - 1;
            match ch {
                ' ' if brackets > 1 || quote => args[last].push(' '),
                ' ' => {
                    if !space {
                        return Err(self.unexpected("SPACE"));
                    }
                    space = false;
                    args.push(String::new());
                }
                _ if space => return Err(self.expected_space()),
                '"' => {
                    args[last].push('"');
                    quote = !quote;
                }
                ',' if brackets > 1 || quote => args[last].push(','),
                ',' => space = true,
                '(' if quote => args[last].push('('),
                ')' if quote => args[last].push(')'),
                '(' => {
                    brackets += 1;
                    args[last].push('(');
                }
                ')' => {
                    brackets -= 1;
                    if brackets > 0 {
                        args[last].push(')');
                    }
                }
                _ => args[last].push(ch),
            }
            self.pos += 1;
        }
        if args.len() == 1 && args[0].is_empty() {
            args.clear();
        }
        if quote {
            return Err(error!(SyntaxError; "UNTERMINATED STRING"));
        }
        if brackets > 0 {
            return Err(error!(SyntaxError; "UNBALANCED BRACKETS"));
        }
        Ok(args)
    }

    fn return_variable(&mut self) -> Result<Option<String>> {
        if self.pos >= self.chars.len() {
            return Ok(None);
        }
        if self.chars[self.pos] != ' ' {
            return Err(self.expected_space());
        }
        self.pos += 1;
        let mut ret = String::new();
        while let Some(&ch) = self.chars.get(self.pos) {
            match ch {
                ' ' | '(' | ')' | '"' => return Err(self.unexpected(&ch.to_string())),
                _ => ret.push(ch),
            }
            self.pos += 1;
        }
        if ret.is_empty() {
            return Ok(None);
        }
        Ok(Some(ret))
    }
}
