use crate::lexer::token::TokenType;

#[derive(Debug, Clone, PartialEq)]
pub struct TokenRecord {
    pub kind: TokenType,
    pub lexeme: String,
    pub line: usize,
}

/// Append-only log of the tokens seen during traversal, in document order.
#[derive(Debug, Default)]
pub struct TokenRecorder {
    tokens: Vec<TokenRecord>,
}

impl TokenRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whitespace and comments are dropped.
    pub fn record(&mut self, kind: &TokenType, lexeme: &str, line: usize) {
        if kind.is_trivia() {
            return;
        }
        self.tokens.push(TokenRecord {
            kind: kind.clone(),
            lexeme: lexeme.to_string(),
            line,
        });
    }

    pub fn all_tokens(&self) -> &[TokenRecord] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<TokenRecord> {
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivia_is_suppressed() {
        let mut recorder = TokenRecorder::new();
        recorder.record(&TokenType::Whitespace, "  ", 1);
        recorder.record(&TokenType::LineComment, "// hi", 1);
        recorder.record(&TokenType::BlockComment, "/* x */", 2);
        assert!(recorder.all_tokens().is_empty());
    }

    #[test]
    fn test_records_in_append_order() {
        let mut recorder = TokenRecorder::new();
        recorder.record(&TokenType::KInt, "int", 1);
        recorder.record(&TokenType::Whitespace, " ", 1);
        recorder.record(&TokenType::Identifier("x".to_string()), "x", 1);
        recorder.record(&TokenType::Semicolon, ";", 2);

        let lexemes = recorder
            .all_tokens()
            .iter()
            .map(|t| (t.lexeme.as_str(), t.line))
            .collect::<Vec<_>>();
        assert_eq!(lexemes, vec![("int", 1), ("x", 1), (";", 2)]);
    }
}
