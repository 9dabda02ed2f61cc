use super::{Column, LineNumber};

#[derive(Clone, PartialEq)]
pub struct Error {
    code: u16,
    line_number: LineNumber,
    column: Column,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_column($col)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, ..$col:expr;  $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_column($col)
            .message($msg)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            line_number: None,
            column: 0..0,
            message: String::new(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    pub fn column(&self) -> Column {
        self.column.clone()
    }

    pub fn text(&self) -> &str {
        &self.message
    }

    /// Compile-time codes are numbered below 50.
    pub fn is_runtime(&self) -> bool {
        self.code >= 50
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code as u16
    }

    /// Attach the script line. An error that already knows its line keeps it.
    pub fn in_line_number(&self, line: LineNumber) -> Error {
        Error {
            code: self.code,
            line_number: self.line_number.or(line),
            column: self.column.clone(),
            message: self.message.clone(),
        }
    }

    pub fn in_column(&self, column: &Column) -> Error {
        Error {
            code: self.code,
            line_number: self.line_number,
            column: if self.column == (0..0) {
                column.clone()
            } else {
                self.column.clone()
            },
            message: self.message.clone(),
        }
    }

    pub fn message<S: AsRef<str>>(&self, message: S) -> Error {
        Error {
            code: self.code,
            line_number: self.line_number,
            column: self.column.clone(),
            message: message.as_ref().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorCode {
    SyntaxError = 2,
    UnknownInstruction = 3,
    UnknownFunction = 4,
    IllegalName = 5,
    Redeclared = 6,
    UndefinedVariable = 7,
    ReadonlyVariable = 8,
    TypeMismatch = 9,
    ArgumentCount = 10,
    ReturnVariable = 11,
    InvalidExpression = 12,
    TooManyVariables = 13,
    NullParameter = 50,
    InvalidCondition = 51,
    InvalidWait = 52,
    AddressOutOfBounds = 53,
    InputEmpty = 54,
    NumberNotFound = 55,
    NoReturnValue = 56,
    PermissionDenied = 57,
    InvalidJump = 58,
    NotSupported = 59,
    ConversionError = 60,
    Overflow = 61,
    DivisionByZero = 62,
    MissingInstruction = 63,
    InvalidOperand = 64,
    InternalError = 99,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = match self.code {
            2 => "SYNTAX ERROR",
            3 => "UNKNOWN INSTRUCTION",
            4 => "UNKNOWN FUNCTION",
            5 => "ILLEGAL NAME",
            6 => "REDECLARED",
            7 => "UNDEFINED VARIABLE",
            8 => "READONLY VARIABLE",
            9 => "TYPE MISMATCH",
            10 => "WRONG ARGUMENT COUNT",
            11 => "RETURN VARIABLE",
            12 => "INVALID EXPRESSION",
            13 => "TOO MANY VARIABLES",
            50 => "NULL PARAMETER",
            51 => "INVALID CONDITION",
            52 => "INVALID WAIT",
            53 => "ADDRESS OUT OF BOUNDS",
            54 => "INPUT EMPTY",
            55 => "NUMBER NOT FOUND",
            56 => "NO RETURN VALUE",
            57 => "PERMISSION DENIED",
            58 => "INVALID JUMP",
            59 => "NOT SUPPORTED",
            60 => "CONVERSION ERROR",
            61 => "OVERFLOW",
            62 => "DIVISION BY ZERO",
            63 => "MISSING INSTRUCTION",
            64 => "INVALID OPERAND",
            99 => "INTERNAL ERROR",
            _ => "",
        };
        let mut suffix = String::new();
        if let Some(line_number) = self.line_number {
            suffix.push_str(&format!(" {}", line_number));
        }
        if (0..0) != self.column {
            suffix.push_str(&format!(" ({}..{})", self.column.start, self.column.end));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if code_str.is_empty() {
            if suffix.is_empty() {
                write!(f, "PROGRAM ERROR {}", self.code)
            } else {
                write!(f, "PROGRAM ERROR {} IN{}", self.code, suffix)
            }
        } else if suffix.is_empty() {
            write!(f, "{}", code_str)
        } else {
            write!(f, "{} IN{}", code_str, suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_line_and_message() {
        let e = error!(ReadonlyVariable, Some(4); "x");
        assert_eq!(e.to_string(), "READONLY VARIABLE IN 4; x");
        assert!(!e.is_runtime());
    }

    #[test]
    fn test_line_is_kept_once_known() {
        let e = error!(InputEmpty, Some(1)).in_line_number(Some(9));
        assert_eq!(e.line_number(), Some(1));
        assert!(e.is_runtime());
    }

    #[test]
    fn test_column() {
        let e = error!(SyntaxError, ..&(3..5));
        assert_eq!(e.to_string(), "SYNTAX ERROR IN (3..5)");
    }
}
