/// ## One line of script source
///
/// Lines are trimmed of spaces, tabs and carriage returns on both ends.
/// Interior spacing is significant and is never collapsed.

#[derive(Debug, PartialEq, Clone)]
pub struct Line {
    text: String,
}

impl Line {
    pub fn new(s: &str) -> Line {
        Line {
            text: s
                .trim_matches(|c: char| c == ' ' || c == '\t' || c == '\r' || c == '\n')
                .to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Empty lines and lines starting with `#`.
    pub fn is_comment(&self) -> bool {
        self.text.is_empty() || self.text.starts_with('#')
    }

    pub fn is_label(&self) -> bool {
        !self.is_comment() && self.keyword() == "label"
    }

    /// Text before the first space.
    pub fn keyword(&self) -> &str {
        match self.text.find(' ') {
            Some(pos) => &self.text[..pos],
            None => &self.text,
        }
    }

    /// Split on single spaces into at most `n` pieces; the last piece keeps
    /// the remainder verbatim. Adjacent spaces produce empty pieces.
    pub fn split(&self, n: usize) -> Vec<&str> {
        self.text.splitn(n, ' ').collect()
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
