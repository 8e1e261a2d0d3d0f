use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Char(char),
    Float(f64),
    Integer(i64),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    Comma,
    Dot,
    LBrace,
    LParen,
    RBrace,
    RParen,
    Semicolon,

    And,
    Bang,
    BangEq,
    Decrement,
    EqEqual,
    Equal,
    Greater,
    GreaterEq,
    Increment,
    Lesser,
    LesserEq,
    Minus,
    MinusEq,
    Or,
    Perc,
    PercEq,
    Plus,
    PlusEq,
    Slash,
    SlashEq,
    Star,
    StarEq,

    KBool,
    KBreak,
    KChar,
    KContinue,
    KDouble,
    KElse,
    KFalse,
    KFloat,
    KFor,
    KIf,
    KInt,
    KReturn,
    KString,
    KStruct,
    KTrue,
    KVoid,
    KWhile,

    Literal(Literal),
    Identifier(String),

    Whitespace,
    LineComment,
    BlockComment,

    Error,
    EOF,
}

impl TokenType {
    /// Whitespace and comments: produced by the lexer but never part of the tree.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenType::Whitespace | TokenType::LineComment | TokenType::BlockComment
        )
    }

    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenType::KBool
                | TokenType::KChar
                | TokenType::KDouble
                | TokenType::KFloat
                | TokenType::KInt
                | TokenType::KString
                | TokenType::KVoid
        )
    }

    /// Symbolic name used in the token report.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TokenType::Comma => "COMMA",
            TokenType::Dot => "DOT",
            TokenType::LBrace => "LBRACE",
            TokenType::LParen => "LPAREN",
            TokenType::RBrace => "RBRACE",
            TokenType::RParen => "RPAREN",
            TokenType::Semicolon => "SEMI",

            TokenType::And => "AND",
            TokenType::Bang => "NOT",
            TokenType::BangEq => "NEQ",
            TokenType::Decrement => "DEC",
            TokenType::EqEqual => "EQ",
            TokenType::Equal => "ASSIGN",
            TokenType::Greater => "GT",
            TokenType::GreaterEq => "GE",
            TokenType::Increment => "INC",
            TokenType::Lesser => "LT",
            TokenType::LesserEq => "LE",
            TokenType::Minus => "MINUS",
            TokenType::MinusEq => "MINUS_ASSIGN",
            TokenType::Or => "OR",
            TokenType::Perc => "MOD",
            TokenType::PercEq => "MOD_ASSIGN",
            TokenType::Plus => "PLUS",
            TokenType::PlusEq => "PLUS_ASSIGN",
            TokenType::Slash => "DIV",
            TokenType::SlashEq => "DIV_ASSIGN",
            TokenType::Star => "MUL",
            TokenType::StarEq => "MUL_ASSIGN",

            TokenType::KBool => "BOOL",
            TokenType::KBreak => "BREAK",
            TokenType::KChar => "CHAR",
            TokenType::KContinue => "CONTINUE",
            TokenType::KDouble => "DOUBLE",
            TokenType::KElse => "ELSE",
            TokenType::KFalse => "FALSE",
            TokenType::KFloat => "FLOAT",
            TokenType::KFor => "FOR",
            TokenType::KIf => "IF",
            TokenType::KInt => "INT",
            TokenType::KReturn => "RETURN",
            TokenType::KString => "STRING",
            TokenType::KStruct => "STRUCT",
            TokenType::KTrue => "TRUE",
            TokenType::KVoid => "VOID",
            TokenType::KWhile => "WHILE",

            TokenType::Literal(Literal::Char(_)) => "CHAR_LITERAL",
            TokenType::Literal(Literal::Float(_)) => "FLOAT_LITERAL",
            TokenType::Literal(Literal::Integer(_)) => "INT_LITERAL",
            TokenType::Literal(Literal::String(_)) => "STRING_LITERAL",
            TokenType::Identifier(_) => "ID",

            TokenType::Whitespace => "WS",
            TokenType::LineComment => "LINE_COMMENT",
            TokenType::BlockComment => "BLOCK_COMMENT",

            TokenType::Error => "ERROR",
            TokenType::EOF => "EOF",
        }
    }
}

impl Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span(pub usize, pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub span: Span,
    pub line: usize,
    pub lexeme: String,
    pub tok_type: TokenType,
}

impl Token {
    /// The identifier name, if this token is one.
    pub fn ident(&self) -> Option<&str> {
        match &self.tok_type {
            TokenType::Identifier(name) => Some(name),
            _ => None,
        }
    }
}
