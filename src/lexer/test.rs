use super::*;

fn significant(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    lexer
        .tokenize()
        .unwrap()
        .into_iter()
        .filter(|t| !t.tok_type.is_trivia())
        .collect()
}

fn match_expected(input: &str, expected: Vec<TokenType>) {
    let tokens = significant(input);
    assert_eq!(tokens.len(), expected.len());

    tokens
        .iter()
        .zip(expected.iter())
        .for_each(|(t, e)| assert_eq!(t.tok_type, *e));
}

#[test]
fn test_simple_syntax() {
    let input = "+ - = < > !\n// hello\nint name;";
    let tokens = significant(input);
    let expected = vec![
        (TokenType::Plus, Span(0, 1), 1, "+"),
        (TokenType::Minus, Span(2, 3), 1, "-"),
        (TokenType::Equal, Span(4, 5), 1, "="),
        (TokenType::Lesser, Span(6, 7), 1, "<"),
        (TokenType::Greater, Span(8, 9), 1, ">"),
        (TokenType::Bang, Span(10, 11), 1, "!"),
        (TokenType::KInt, Span(21, 24), 3, "int"),
        (
            TokenType::Identifier("name".to_string()),
            Span(25, 29),
            3,
            "name",
        ),
        (TokenType::Semicolon, Span(29, 30), 3, ";"),
    ];

    assert_eq!(tokens.len(), expected.len());

    tokens
        .iter()
        .zip(expected.into_iter())
        .for_each(|(t, (tok_type, span, line, lexeme))| {
            assert_eq!(
                *t,
                Token {
                    tok_type,
                    span,
                    line,
                    lexeme: lexeme.to_string(),
                }
            )
        });
}

#[test]
fn test_trivia_is_kept_and_tagged() {
    let input = "  // note\n/* a\n b */x";
    let tokens = Lexer::new(input).tokenize().unwrap();
    let kinds = tokens.iter().map(|t| t.tok_type.clone()).collect::<Vec<_>>();

    assert_eq!(
        kinds,
        vec![
            TokenType::Whitespace,
            TokenType::LineComment,
            TokenType::Whitespace,
            TokenType::BlockComment,
            TokenType::Identifier("x".to_string()),
        ]
    );
    assert_eq!(tokens[1].lexeme, "// note");
    assert_eq!(tokens[3].line, 2);
    assert_eq!(tokens[4].line, 3);
}

#[test]
fn test_multi_char_toks() {
    let input = "++ -- == != <= >= && || += -= *= /= %=";
    let expected = vec![
        TokenType::Increment,
        TokenType::Decrement,
        TokenType::EqEqual,
        TokenType::BangEq,
        TokenType::LesserEq,
        TokenType::GreaterEq,
        TokenType::And,
        TokenType::Or,
        TokenType::PlusEq,
        TokenType::MinusEq,
        TokenType::StarEq,
        TokenType::SlashEq,
        TokenType::PercEq,
    ];

    match_expected(input, expected);
}

#[test]
fn test_strings() {
    let input = r#"
            "hello" "world"
            "hello\nworld" "hello\tworld"
            "hello\rworld" "hello\12world" "#;
    let expected = vec![
        TokenType::Literal(Literal::String("hello".to_string())),
        TokenType::Literal(Literal::String("world".to_string())),
        TokenType::Literal(Literal::String("hello\nworld".to_string())),
        TokenType::Literal(Literal::String("hello\tworld".to_string())),
        TokenType::Literal(Literal::String("hello\rworld".to_string())),
        TokenType::Literal(Literal::String("hello\nworld".to_string())),
    ];

    match_expected(input, expected);
}

#[test]
fn test_string_lexeme_keeps_quotes() {
    let tokens = significant(r#"x = "hi";"#);
    assert_eq!(tokens[2].lexeme, "\"hi\"");
}

#[test]
fn test_number_literals() {
    let input = "123 123.456 7.";
    let expected = vec![
        TokenType::Literal(Literal::Integer(123)),
        TokenType::Literal(Literal::Float(123.456)),
        TokenType::Literal(Literal::Float(7.0)),
    ];

    match_expected(input, expected);
}

#[test]
fn test_char_literals() {
    let input = "'a' 'b' '\\n' '\\t' '\\r' '\\0' '\\12'";
    let expected = vec![
        TokenType::Literal(Literal::Char('a')),
        TokenType::Literal(Literal::Char('b')),
        TokenType::Literal(Literal::Char('\n')),
        TokenType::Literal(Literal::Char('\t')),
        TokenType::Literal(Literal::Char('\r')),
        TokenType::Literal(Literal::Char('\0')),
        TokenType::Literal(Literal::Char('\n')),
    ];

    match_expected(input, expected);
}

#[test]
fn test_keywords() {
    let input = "bool break char continue double else false float for if int return string struct true void while";
    let expected = vec![
        TokenType::KBool,
        TokenType::KBreak,
        TokenType::KChar,
        TokenType::KContinue,
        TokenType::KDouble,
        TokenType::KElse,
        TokenType::KFalse,
        TokenType::KFloat,
        TokenType::KFor,
        TokenType::KIf,
        TokenType::KInt,
        TokenType::KReturn,
        TokenType::KString,
        TokenType::KStruct,
        TokenType::KTrue,
        TokenType::KVoid,
        TokenType::KWhile,
    ];

    match_expected(input, expected);
}

#[test]
fn test_punctuators() {
    let input = ", . { ( } ) ; ! = > < + - * / %";
    let expected = vec![
        TokenType::Comma,
        TokenType::Dot,
        TokenType::LBrace,
        TokenType::LParen,
        TokenType::RBrace,
        TokenType::RParen,
        TokenType::Semicolon,
        TokenType::Bang,
        TokenType::Equal,
        TokenType::Greater,
        TokenType::Lesser,
        TokenType::Plus,
        TokenType::Minus,
        TokenType::Star,
        TokenType::Slash,
        TokenType::Perc,
    ];

    match_expected(input, expected);
}

#[test]
fn test_errors() {
    let cases = [
        ("int x = 12ab;", LexerErrorType::InvalidDigit { lit_type: "decimal", digit: 'a' }),
        ("\"open", LexerErrorType::Unterminated("string literal")),
        ("/* never closed", LexerErrorType::Unterminated("block comment")),
        ("'\\q'", LexerErrorType::InvalidEscape('q')),
        ("'ab'", LexerErrorType::MultiCharLiteral('b')),
        ("a & b", LexerErrorType::UnexpectedChar('&')),
        ("@", LexerErrorType::UnexpectedChar('@')),
    ];

    for (input, expected) in cases {
        let err = Lexer::new(input).tokenize().unwrap_err();
        assert_eq!(err.error, expected, "input: {input:?}");
    }
}

#[test]
fn test_error_reports_line() {
    let err = Lexer::new("int a;\nint b;\n  $").tokenize().unwrap_err();
    assert_eq!(err.token.line, 3);
}
