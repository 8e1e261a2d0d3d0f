pub mod token;

#[cfg(test)]
mod test;

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::str::Chars;
use thiserror::Error;
use token::{Literal, Span, Token, TokenType};

macro_rules! hash_map {
    ( $( $key: expr => $value: expr ),* $(,)? ) => {{
        let mut m = HashMap::new();
        $(
            m.insert($key, $value);
        )*
        m
    }}
}

macro_rules! multi_char_tok {
    ( $self: ident, $orig: expr; $( $c: literal => $tt: expr ),+ $(,)? ) => {
        match $self.peek() {
            $(
                Some($c) => {
                    $self.advance();
                    Ok($self.make_token($tt))
                }
            )+
            _ => Ok($self.make_token($orig))
        }
    };
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = hash_map! {
        "bool"     => TokenType::KBool,
        "break"    => TokenType::KBreak,
        "char"     => TokenType::KChar,
        "continue" => TokenType::KContinue,
        "double"   => TokenType::KDouble,
        "else"     => TokenType::KElse,
        "false"    => TokenType::KFalse,
        "float"    => TokenType::KFloat,
        "for"      => TokenType::KFor,
        "if"       => TokenType::KIf,
        "int"      => TokenType::KInt,
        "return"   => TokenType::KReturn,
        "string"   => TokenType::KString,
        "struct"   => TokenType::KStruct,
        "true"     => TokenType::KTrue,
        "void"     => TokenType::KVoid,
        "while"    => TokenType::KWhile,
    };
}

const PUNCTUATORS: [char; 17] = [
    ',', '.', '{', '(', '}', ')', ';', '!', '&', '|', '=', '>', '<', '+', '-', '*', '/',
];

#[derive(Error, Debug, PartialEq)]
pub enum LexerErrorType {
    #[error("unexpected EOF")]
    UnexpectedEOF,

    #[error("unterminated {0}")]
    Unterminated(&'static str),

    #[error("invalid digit in {lit_type} literal: {digit:?}")]
    InvalidDigit { lit_type: &'static str, digit: char },

    #[error("integer literal does not fit in 64 bits")]
    IntegerOverflow,

    #[error("invalid octal escape: {0}")]
    InvalidOctalEscape(String),

    #[error("invalid escape {0:?}")]
    InvalidEscape(char),

    #[error("expected end of char `'`, found {0:?}")]
    MultiCharLiteral(char),

    #[error("expected start of token, found {0:?}")]
    UnexpectedChar(char),
}

pub type LexerResult = Result<Token, LexerError>;

#[derive(Error, Debug)]
#[error("{error}")]
pub struct LexerError {
    pub token: Token,
    #[source]
    pub error: LexerErrorType,
}

pub struct Lexer<'a> {
    input_str: &'a str,
    input: Chars<'a>,
    line: usize,
    start_line: usize,
    start: usize,
    current: usize,
    eof: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input_str: &'a str) -> Self {
        Self {
            input_str,
            input: input_str.chars(),
            line: 1,
            start_line: 1,
            start: 0,
            current: 0,
            eof: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.clone().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.input.next()?;
        self.current += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn advance_if_digit(&mut self, lit_type: &'static str, c: char) -> Result<(), LexerError> {
        if let '0'..='9' = c {
            self.advance();
            Ok(())
        } else {
            Err(self.make_error(LexerErrorType::InvalidDigit { lit_type, digit: c }))
        }
    }

    fn make_token(&self, tok_type: TokenType) -> Token {
        Token {
            tok_type,
            span: Span(self.start, self.current),
            line: self.start_line,
            lexeme: self.get_lexeme().to_string(),
        }
    }

    fn make_error(&self, error: LexerErrorType) -> LexerError {
        LexerError {
            token: self.make_token(TokenType::Error),
            error,
        }
    }

    fn get_lexeme(&self) -> &'a str {
        &self.input_str[self.start..self.current]
    }

    fn whitespace(&mut self) -> LexerResult {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.advance();
        }
        Ok(self.make_token(TokenType::Whitespace))
    }

    fn line_comment(&mut self) -> LexerResult {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        Ok(self.make_token(TokenType::LineComment))
    }

    fn block_comment(&mut self) -> LexerResult {
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return Ok(self.make_token(TokenType::BlockComment));
                }
                Some(_) => {}
                None => return Err(self.make_error(LexerErrorType::Unterminated("block comment"))),
            }
        }
    }

    fn number(&mut self) -> LexerResult {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '.' || PUNCTUATORS.contains(&c) {
                break;
            }
            self.advance_if_digit("decimal", c)?;
        }

        if let Some('.') = self.peek() {
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_whitespace() || PUNCTUATORS.contains(&c) {
                    break;
                }
                self.advance_if_digit("float", c)?;
            }
            let float = self
                .get_lexeme()
                .parse::<f64>()
                .unwrap_or_else(|_| unreachable!());
            Ok(self.make_token(TokenType::Literal(Literal::Float(float))))
        } else {
            let int = self
                .get_lexeme()
                .parse::<i64>()
                .map_err(|_| self.make_error(LexerErrorType::IntegerOverflow))?;
            Ok(self.make_token(TokenType::Literal(Literal::Integer(int))))
        }
    }

    fn read_octal(&mut self, first: char) -> Result<char, LexerError> {
        let mut digits = String::from(first);
        while digits.len() < 3 {
            match self.peek() {
                Some(c @ '0'..='7') => {
                    self.advance();
                    digits.push(c);
                }
                _ => break,
            };
        }

        u8::from_str_radix(&digits, 8)
            .map(|n| n as char)
            .map_err(|e| self.make_error(LexerErrorType::InvalidOctalEscape(e.to_string())))
    }

    fn read_escape(&mut self) -> Result<char, LexerError> {
        match self.advance() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some('\\') => Ok('\\'),
            Some('"') => Ok('"'),
            Some('\'') => Ok('\''),
            Some(c @ '0'..='7') => self.read_octal(c),
            Some(c) => Err(self.make_error(LexerErrorType::InvalidEscape(c))),
            None => Err(self.make_error(LexerErrorType::UnexpectedEOF)),
        }
    }

    fn parse_char(&mut self) -> Result<char, LexerError> {
        match self.advance() {
            Some('\\') => self.read_escape(),
            Some(c) => Ok(c),
            None => Err(self.make_error(LexerErrorType::UnexpectedEOF)),
        }
    }

    fn string(&mut self) -> LexerResult {
        let mut string = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(self.make_error(LexerErrorType::Unterminated("string literal")))
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some(_) => string.push(self.parse_char()?),
            };
        }
        Ok(self.make_token(TokenType::Literal(Literal::String(string))))
    }

    fn char_literal(&mut self) -> LexerResult {
        let c = self.parse_char()?;
        match self.advance() {
            Some('\'') => Ok(self.make_token(TokenType::Literal(Literal::Char(c)))),
            Some(c) => Err(self.make_error(LexerErrorType::MultiCharLiteral(c))),
            None => Err(self.make_error(LexerErrorType::UnexpectedEOF)),
        }
    }

    fn identifier(&mut self) -> LexerResult {
        while let Some(c) = self.peek() {
            if c != '_' && !c.is_ascii_alphanumeric() {
                break;
            }
            self.advance();
        }
        let lexeme = self.get_lexeme();

        if let Some(ttype) = KEYWORDS.get(lexeme) {
            Ok(self.make_token(ttype.clone()))
        } else {
            Ok(self.make_token(TokenType::Identifier(lexeme.to_string())))
        }
    }
}

impl<'a> Lexer<'a> {
    /// Lexes the whole input, trivia included. The trailing EOF token is not returned.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexerError> {
        self.collect()
    }

    pub fn next_token(&mut self) -> LexerResult {
        self.start = self.current;
        self.start_line = self.line;

        let Some(c) = self.advance() else {
            self.eof = true;
            return Ok(self.make_token(TokenType::EOF));
        };

        match c {
            ',' => Ok(self.make_token(TokenType::Comma)),
            '.' => Ok(self.make_token(TokenType::Dot)),
            '{' => Ok(self.make_token(TokenType::LBrace)),
            '(' => Ok(self.make_token(TokenType::LParen)),
            '}' => Ok(self.make_token(TokenType::RBrace)),
            ')' => Ok(self.make_token(TokenType::RParen)),
            ';' => Ok(self.make_token(TokenType::Semicolon)),

            '/' if self.peek() == Some('/') => self.line_comment(),
            '/' if self.peek() == Some('*') => {
                self.advance();
                self.block_comment()
            }

            '!' => multi_char_tok!(self, TokenType::Bang; '=' => TokenType::BangEq),
            '&' if self.peek() == Some('&') => {
                self.advance();
                Ok(self.make_token(TokenType::And))
            }
            '|' if self.peek() == Some('|') => {
                self.advance();
                Ok(self.make_token(TokenType::Or))
            }
            '-' => multi_char_tok!(self, TokenType::Minus;
                                         '-' => TokenType::Decrement,
                                         '=' => TokenType::MinusEq),
            '=' => multi_char_tok!(self, TokenType::Equal; '=' => TokenType::EqEqual),
            '>' => multi_char_tok!(self, TokenType::Greater; '=' => TokenType::GreaterEq),
            '<' => multi_char_tok!(self, TokenType::Lesser; '=' => TokenType::LesserEq),
            '+' => multi_char_tok!(self, TokenType::Plus;
                                         '+' => TokenType::Increment,
                                         '=' => TokenType::PlusEq),
            '%' => multi_char_tok!(self, TokenType::Perc; '=' => TokenType::PercEq),
            '*' => multi_char_tok!(self, TokenType::Star; '=' => TokenType::StarEq),
            '/' => multi_char_tok!(self, TokenType::Slash; '=' => TokenType::SlashEq),

            '\'' => self.char_literal(),
            '"' => self.string(),

            c if c.is_whitespace() => self.whitespace(),
            c if c.is_ascii_digit() => self.number(),
            c if c == '_' || c.is_ascii_alphabetic() => self.identifier(),
            _ => Err(self.make_error(LexerErrorType::UnexpectedChar(c))),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexerResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof {
            return None;
        }
        match self.next_token() {
            Ok(Token {
                tok_type: TokenType::EOF,
                ..
            }) => None,
            Err(e) => {
                self.eof = true;
                Some(Err(e))
            }
            ok => Some(ok),
        }
    }
}

/// Token standing for the end of `input`, placed after its last character.
pub(crate) fn eof_token(input: &str) -> Token {
    let line = input.chars().filter(|c| *c == '\n').count() + 1;
    Token {
        span: Span(input.len(), input.len()),
        line,
        lexeme: String::from("<EOF>"),
        tok_type: TokenType::EOF,
    }
}
