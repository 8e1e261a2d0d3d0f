use std::fmt::Display;

use colored::{ColoredString, Colorize};

use crate::lexer::LexerError;
use crate::parser::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    SyntaxError,
    SemanticError,
    Note,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::SyntaxError => write!(f, "syntax error"),
            Severity::SemanticError => write!(f, "semantic error"),
            Severity::Note => write!(f, "note"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, line: Option<usize>, message: String) -> Self {
        Self {
            severity,
            line,
            message,
        }
    }

    pub fn syntax(line: usize, message: String) -> Self {
        Self::new(Severity::SyntaxError, Some(line), message)
    }

    pub fn semantic(line: usize, message: String) -> Self {
        Self::new(Severity::SemanticError, Some(line), message)
    }

    pub fn note(line: usize, message: String) -> Self {
        Self::new(Severity::Note, Some(line), message)
    }

    /// The rendered line, red for errors and cyan for notes.
    pub fn colored(&self) -> ColoredString {
        match self.severity {
            Severity::SyntaxError | Severity::SemanticError => self.to_string().red(),
            Severity::Note => self.to_string().cyan(),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] ", self.severity)?;
        if let Some(line) = self.line {
            write!(f, "line {}: ", line)?;
        }
        write!(f, "{}", self.message)
    }
}

impl From<&LexerError> for Diagnostic {
    fn from(err: &LexerError) -> Self {
        Diagnostic::syntax(err.token.line, err.error.to_string())
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        Diagnostic::syntax(err.token.line, err.error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_prefixes() {
        let syntax = Diagnostic::syntax(2, "expected `;`".to_string());
        let semantic = Diagnostic::semantic(7, "global variable 'x' already declared".to_string());
        let bare = Diagnostic::new(Severity::SemanticError, None, "oops".to_string());

        assert_eq!(syntax.to_string(), "[syntax error] line 2: expected `;`");
        assert_eq!(
            semantic.to_string(),
            "[semantic error] line 7: global variable 'x' already declared"
        );
        assert_eq!(bare.to_string(), "[semantic error] oops");
    }
}
