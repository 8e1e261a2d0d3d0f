pub mod ast;
mod expr;
pub mod pretty_print_ast;
mod stmt;


use crate::lexer::eof_token;
use crate::lexer::token::{self, Token, TokenType};
use crate::semantic::r#type::Type;
use ast::*;
use multipeek::{multipeek, MultiPeek};
use thiserror::Error;

// <program>        ::= <item>* EOF
// <item>           ::= <struct-decl> | <function-decl> | <global-var>
// <struct-decl>    ::= "struct" <identifier> "{" ( <function-decl> | <field> )* "}" ";"?
// <function-decl>  ::= <type> <identifier> "(" ( <param> ( "," <param> )* )? ")" <block>
// <param>          ::= <type> <identifier>
// <global-var>     ::= <type> <identifier> ( "=" <expr> )? ";"
// <type>           ::= "int" | "float" | "double" | "char" | "string" | "bool" | "void"
//                    | <identifier>
// <block>          ::= "{" ( <declaration> | <statement> )* "}"
// <statement>      ::= <block> | "if" "(" <expr> ")" <statement> ( "else" <statement> )?
//                    | "while" "(" <expr> ")" <statement>
//                    | "for" "(" ( <declaration> | <expr>? ";" ) <expr>? ";" <expr>? ")" <statement>
//                    | "return" <expr>? ";" | "break" ";" | "continue" ";" | <expr> ";" | ";"
// <expr>           ::= <assign>
// <assign>         ::= <or> ( ( "=" | "+=" | "-=" | "*=" | "/=" | "%=" ) <assign> )?
// <or>             ::= <and> ( "||" <and> )*
// <and>            ::= <equality> ( "&&" <equality> )*
// <equality>       ::= <comparison> ( ( "==" | "!=" ) <comparison> )*
// <comparison>     ::= <term> ( ( "<" | "<=" | ">" | ">=" ) <term> )*
// <term>           ::= <factor> ( ( "+" | "-" ) <factor> )*
// <factor>         ::= <unary> ( ( "*" | "/" | "%" ) <unary> )*
// <unary>          ::= ( "-" | "!" | "++" | "--" ) <unary> | <postfix>
// <postfix>        ::= <primary> ( "++" | "--" | "(" <args>? ")" | "." <identifier> )*
// <primary>        ::= <constant> | "true" | "false" | <identifier> | "(" <expr> ")"

macro_rules! parse_binary_expr {
    ( $self: ident, $ops: pat, $nextp: ident ) => {{
        let mut lhs = $self.$nextp()?;
        let mut levels = 0;
        while let Some($ops) = $self.peek_token_type() {
            $self.descend()?;
            levels += 1;
            let op_token = $self.advance();
            let op = binary_tt_to_op(&op_token.tok_type);
            let rhs = Box::new($self.$nextp()?);
            lhs = Expr::Binary(Binary {
                op: WithToken(op, op_token),
                lhs: Box::new(lhs),
                rhs,
            })
        }
        $self.ascend(levels);
        Ok(lhs)
    }};
}

/// Deepest syntax tree the parser builds. Every recursive walk over the tree
/// stays within this many levels.
pub const MAX_NESTING: usize = 512;

#[derive(Error, Debug)]
#[error("{error}")]
pub struct ParseError {
    pub token: Token,
    #[source]
    pub error: ParseErrorType,
}

#[derive(Error, Debug, PartialEq)]
pub enum ParseErrorType {
    #[error("expected `{exp}`, got {got:?}")]
    Expected { exp: &'static str, got: String },

    #[error("invalid target for assignment")]
    InvalidLValue,

    #[error("nesting deeper than {} levels", MAX_NESTING)]
    TooDeep,
}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser {
    tokens: MultiPeek<<Vec<Token> as IntoIterator>::IntoIter>,
    eof: Token,
    depth: usize,
}

impl Parser {
    /// `tokens` is the lexer's full output; trivia is dropped here.
    pub fn new(input: &str, tokens: Vec<Token>) -> Self {
        let eof = eof_token(input);
        let mut tokens = tokens
            .into_iter()
            .filter(|t| !t.tok_type.is_trivia())
            .collect::<Vec<_>>();
        tokens.push(eof.clone());

        Self {
            tokens: multipeek(tokens.into_iter()),
            eof,
            depth: 0,
        }
    }

    fn peek(&mut self) -> &Token {
        match self.tokens.peek() {
            Some(token) => token,
            None => &self.eof,
        }
    }

    fn peek_token_type(&mut self) -> Option<&TokenType> {
        match self.peek() {
            Token {
                tok_type: TokenType::EOF,
                ..
            } => None,
            Token { tok_type, .. } => Some(tok_type),
        }
    }

    fn peek_nth_token_type(&mut self, n: usize) -> Option<&TokenType> {
        self.tokens.peek_nth(n).map(|t| &t.tok_type)
    }

    fn advance(&mut self) -> Token {
        match self.tokens.next() {
            Some(token) => token,
            None => self.eof.clone(),
        }
    }

    fn match_(&mut self, tok_type: TokenType) -> Option<Token> {
        if self.peek().tok_type == tok_type {
            Some(self.advance())
        } else {
            None
        }
    }

    fn consume(&mut self, tok_type: TokenType, exp: &'static str) -> ParseResult<Token> {
        if self.peek().tok_type == tok_type {
            Ok(self.advance())
        } else {
            Err(self.expected(exp))
        }
    }

    fn consume_identifier(&mut self) -> ParseResult<Token> {
        match self.peek_token_type() {
            Some(TokenType::Identifier(_)) => Ok(self.advance()),
            _ => Err(self.expected("<identifier>")),
        }
    }

    fn expected(&mut self, exp: &'static str) -> ParseError {
        let token = self.peek().clone();
        let got = match token.tok_type {
            TokenType::EOF => String::from("<eof>"),
            _ => token.lexeme.clone(),
        };
        ParseError {
            token,
            error: ParseErrorType::Expected { exp, got },
        }
    }

    fn descend(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_NESTING {
            let token = self.peek().clone();
            return Err(ParseError {
                token,
                error: ParseErrorType::TooDeep,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn ascend(&mut self, levels: usize) {
        self.depth -= levels;
    }

    /// A declaration starts with a type keyword, or with a struct name
    /// followed by the variable name.
    fn check_type(&mut self) -> bool {
        match self.peek_token_type() {
            Some(TokenType::Identifier(_)) => {}
            Some(tt) => return tt.is_type_keyword(),
            None => return false,
        }
        matches!(self.peek_nth_token_type(1), Some(TokenType::Identifier(_)))
    }
}

impl Parser {
    pub fn program(&mut self) -> ParseResult<Program> {
        let mut items = Vec::new();
        while self.peek_token_type().is_some() {
            items.push(self.item()?);
        }
        Ok(Program(items))
    }

    fn item(&mut self) -> ParseResult<Item> {
        if let Some(TokenType::KStruct) = self.peek_token_type() {
            return self.struct_decl().map(Item::Struct);
        }

        let ty = self.type_spec()?;
        let name = self.consume_identifier()?;
        if let Some(TokenType::LParen) = self.peek_token_type() {
            self.function_decl(ty, name).map(Item::Function)
        } else {
            self.var_decl_rest(ty, name).map(Item::GlobalVar)
        }
    }

    fn type_spec(&mut self) -> ParseResult<WithToken<Type>> {
        let ty = match self.peek_token_type() {
            Some(TokenType::KBool) => Type::Bool,
            Some(TokenType::KChar) => Type::Char,
            Some(TokenType::KDouble) => Type::Double,
            Some(TokenType::KFloat) => Type::Float,
            Some(TokenType::KInt) => Type::Int,
            Some(TokenType::KString) => Type::String,
            Some(TokenType::KVoid) => Type::Void,
            Some(TokenType::Identifier(name)) => Type::Struct(name.clone()),
            _ => return Err(self.expected("<type>")),
        };
        Ok(WithToken(ty, self.advance()))
    }

    fn struct_decl(&mut self) -> ParseResult<StructDecl> {
        let keyword = self.consume(TokenType::KStruct, "struct")?;
        let name = self.consume_identifier()?;
        let lbrace = self.consume(TokenType::LBrace, "{")?;

        let mut members = Vec::new();
        while !matches!(self.peek_token_type(), Some(TokenType::RBrace) | None) {
            let ty = self.type_spec()?;
            let member_name = self.consume_identifier()?;
            let member = if let Some(TokenType::LParen) = self.peek_token_type() {
                Member::Method(self.function_decl(ty, member_name)?)
            } else {
                Member::Field(self.var_decl_rest(ty, member_name)?)
            };
            members.push(member);
        }

        let rbrace = self.consume(TokenType::RBrace, "}")?;
        let semi = self.match_(TokenType::Semicolon);

        Ok(StructDecl {
            keyword,
            name,
            lbrace,
            members,
            rbrace,
            semi,
        })
    }

    fn function_decl(&mut self, ret_ty: WithToken<Type>, name: Token) -> ParseResult<FunctionDecl> {
        let lparen = self.consume(TokenType::LParen, "(")?;

        let mut params = Vec::new();
        if !matches!(self.peek_token_type(), Some(TokenType::RParen)) {
            loop {
                let ty = self.type_spec()?;
                let name = self.consume_identifier()?;
                let comma = self.match_(TokenType::Comma);
                let done = comma.is_none();
                params.push(Param { ty, name, comma });
                if done {
                    break;
                }
            }
        }

        let rparen = self.consume(TokenType::RParen, ")")?;
        let body = self.block()?;

        Ok(FunctionDecl {
            ret_ty,
            name,
            lparen,
            params,
            rparen,
            body,
        })
    }

    fn var_decl_rest(&mut self, ty: WithToken<Type>, name: Token) -> ParseResult<VarDecl> {
        let init = match self.match_(TokenType::Equal) {
            Some(eq_sign) => Some(Initializer {
                eq_sign,
                expr: self.expression()?,
            }),
            None => None,
        };
        let semi = self.consume(TokenType::Semicolon, ";")?;

        Ok(VarDecl {
            ty,
            name,
            init,
            semi,
        })
    }

    fn declaration(&mut self) -> ParseResult<VarDecl> {
        let ty = self.type_spec()?;
        let name = self.consume_identifier()?;
        self.var_decl_rest(ty, name)
    }

    fn block(&mut self) -> ParseResult<Block> {
        let lbrace = self.consume(TokenType::LBrace, "{")?;

        let mut items = Vec::new();
        while !matches!(self.peek_token_type(), Some(TokenType::RBrace) | None) {
            items.push(self.block_item()?);
        }

        let rbrace = self.consume(TokenType::RBrace, "}")?;
        Ok(Block {
            lbrace,
            items,
            rbrace,
        })
    }

    fn block_item(&mut self) -> ParseResult<BlockItem> {
        if self.check_type() {
            self.declaration().map(BlockItem::VarDecl)
        } else {
            self.statement().map(BlockItem::Stmt)
        }
    }
}

impl Parser {
    // Methods for parsing statements

    fn statement(&mut self) -> ParseResult<Stmt> {
        self.descend()?;
        let stmt = self.statement_kind();
        self.ascend(1);
        stmt
    }

    fn statement_kind(&mut self) -> ParseResult<Stmt> {
        match self.peek_token_type() {
            Some(TokenType::LBrace) => self.block().map(Stmt::Compound),
            Some(TokenType::KBreak) => {
                let keyword = self.advance();
                let semi = self.consume(TokenType::Semicolon, ";")?;
                Ok(Stmt::Break { keyword, semi })
            }
            Some(TokenType::KContinue) => {
                let keyword = self.advance();
                let semi = self.consume(TokenType::Semicolon, ";")?;
                Ok(Stmt::Continue { keyword, semi })
            }
            Some(TokenType::KFor) => self.for_stmt(),
            Some(TokenType::KIf) => self.if_stmt(),
            Some(TokenType::KReturn) => self.return_statement(),
            Some(TokenType::KWhile) => self.while_statement(),
            Some(TokenType::Semicolon) => Ok(Stmt::Null(self.advance())),
            _ => self.expression_statement(),
        }
    }

    fn for_stmt(&mut self) -> ParseResult<Stmt> {
        let keyword = self.consume(TokenType::KFor, "for")?;
        let lparen = self.consume(TokenType::LParen, "(")?;

        let initializer = if self.check_type() {
            ForStmtInitializer::VarDecl(self.declaration()?)
        } else {
            let (expr, semi) = self.optional_expression(TokenType::Semicolon, ";")?;
            ForStmtInitializer::Expr { expr, semi }
        };

        let (condition, cond_semi) = self.optional_expression(TokenType::Semicolon, ";")?;
        let (step, rparen) = self.optional_expression(TokenType::RParen, ")")?;

        let body = Box::new(self.statement()?);

        Ok(Stmt::For(ForStmt {
            keyword,
            lparen,
            initializer,
            condition,
            cond_semi,
            step,
            rparen,
            body,
        }))
    }

    fn if_stmt(&mut self) -> ParseResult<Stmt> {
        let keyword = self.consume(TokenType::KIf, "if")?;
        let lparen = self.consume(TokenType::LParen, "(")?;
        let cond = self.expression()?;
        let rparen = self.consume(TokenType::RParen, ")")?;

        let then = Box::new(self.statement()?);
        let else_clause = match self.match_(TokenType::KElse) {
            Some(else_kw) => Some((else_kw, Box::new(self.statement()?))),
            None => None,
        };

        Ok(Stmt::If(IfStmt {
            keyword,
            lparen,
            cond,
            rparen,
            then,
            else_clause,
        }))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.consume(TokenType::KReturn, "return")?;
        let (value, semi) = self.optional_expression(TokenType::Semicolon, ";")?;
        Ok(Stmt::Return {
            keyword,
            value,
            semi,
        })
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.consume(TokenType::KWhile, "while")?;
        let lparen = self.consume(TokenType::LParen, "(")?;
        let cond = self.expression()?;
        let rparen = self.consume(TokenType::RParen, ")")?;

        let body = Box::new(self.statement()?);

        Ok(Stmt::While(WhileStmt {
            keyword,
            lparen,
            cond,
            rparen,
            body,
        }))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        let semi = self.consume(TokenType::Semicolon, ";")?;
        Ok(Stmt::Expression { expr, semi })
    }
}

impl Parser {
    // Methods for parsing expressions

    fn optional_expression(
        &mut self,
        followed_by: TokenType,
        followed_by_str: &'static str,
    ) -> ParseResult<(Option<Expr>, Token)> {
        match self.match_(followed_by.clone()) {
            Some(token) => Ok((None, token)),
            None => {
                let expr = self.expression()?;
                let token = self.consume(followed_by, followed_by_str)?;
                Ok((Some(expr), token))
            }
        }
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.descend()?;
        let expr = self.assignment();
        self.ascend(1);
        expr
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let lhs = self.or()?;
        let op = match self.peek_token_type() {
            Some(TokenType::Equal) => AssignOp::Assign,
            Some(TokenType::PlusEq) => AssignOp::Add,
            Some(TokenType::MinusEq) => AssignOp::Sub,
            Some(TokenType::StarEq) => AssignOp::Mul,
            Some(TokenType::SlashEq) => AssignOp::Div,
            Some(TokenType::PercEq) => AssignOp::Mod,
            _ => return Ok(lhs),
        };
        let op_token = self.advance();

        if !matches!(lhs, Expr::Var(_) | Expr::Member(_)) {
            return Err(ParseError {
                token: op_token,
                error: ParseErrorType::InvalidLValue,
            });
        }

        self.descend()?;
        let rhs = self.assignment()?;
        self.ascend(1);
        Ok(Expr::Assign(Assign {
            op: WithToken(op, op_token),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }))
    }

    fn or(&mut self) -> ParseResult<Expr> {
        parse_binary_expr!(self, TokenType::Or, and)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        parse_binary_expr!(self, TokenType::And, equality)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        parse_binary_expr!(self, TokenType::EqEqual | TokenType::BangEq, comparison)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        parse_binary_expr!(
            self,
            TokenType::Greater | TokenType::GreaterEq | TokenType::Lesser | TokenType::LesserEq,
            term
        )
    }

    fn term(&mut self) -> ParseResult<Expr> {
        parse_binary_expr!(self, TokenType::Plus | TokenType::Minus, factor)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        parse_binary_expr!(
            self,
            TokenType::Star | TokenType::Slash | TokenType::Perc,
            unary
        )
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        match self.peek_token_type() {
            Some(
                TokenType::Minus | TokenType::Bang | TokenType::Increment | TokenType::Decrement,
            ) => {
                let op_token = self.advance();
                let op = unary_tt_to_op(&op_token.tok_type);
                self.descend()?;
                let expr = self.unary()?;
                self.ascend(1);
                Ok(Expr::Unary(Unary {
                    op: WithToken(op, op_token),
                    expr: Box::new(expr),
                    postfix: false,
                }))
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.primary()?;
        let mut levels = 0;
        loop {
            if matches!(
                self.peek_token_type(),
                Some(
                    TokenType::Increment
                        | TokenType::Decrement
                        | TokenType::LParen
                        | TokenType::Dot
                )
            ) {
                self.descend()?;
                levels += 1;
            }
            lhs = match self.peek_token_type() {
                Some(TokenType::Increment | TokenType::Decrement) => {
                    let op_token = self.advance();
                    let op = unary_tt_to_op(&op_token.tok_type);
                    Expr::Unary(Unary {
                        op: WithToken(op, op_token),
                        expr: Box::new(lhs),
                        postfix: true,
                    })
                }
                Some(TokenType::LParen) => self.call(lhs)?,
                Some(TokenType::Dot) => {
                    let dot = self.advance();
                    let field = self.consume_identifier()?;
                    let name = field.lexeme.clone();
                    Expr::Member(MemberAccess {
                        object: Box::new(lhs),
                        dot,
                        field: WithToken(name, field),
                    })
                }
                _ => break,
            };
        }
        self.ascend(levels);
        Ok(lhs)
    }

    fn call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let lparen = self.consume(TokenType::LParen, "(")?;

        let mut args = Vec::new();
        if !matches!(self.peek_token_type(), Some(TokenType::RParen)) {
            loop {
                let expr = self.expression()?;
                let comma = self.match_(TokenType::Comma);
                let done = comma.is_none();
                args.push(Arg { expr, comma });
                if done {
                    break;
                }
            }
        }

        let rparen = self.consume(TokenType::RParen, ")")?;
        Ok(Expr::Call(Call {
            callee: Box::new(callee),
            lparen,
            args,
            rparen,
        }))
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        let value = match self.peek_token_type() {
            Some(TokenType::Literal(lit)) => match lit {
                token::Literal::Char(c) => Literal::Char(*c),
                token::Literal::Float(f) => Literal::Float(*f),
                token::Literal::Integer(i) => Literal::Integer(*i),
                token::Literal::String(s) => Literal::String(s.clone()),
            },
            Some(TokenType::KTrue) => Literal::Bool(true),
            Some(TokenType::KFalse) => Literal::Bool(false),
            Some(TokenType::LParen) => {
                let lparen = self.advance();
                let expr = Box::new(self.expression()?);
                let rparen = self.consume(TokenType::RParen, ")")?;
                return Ok(Expr::Grouping(Grouping {
                    lparen,
                    expr,
                    rparen,
                }));
            }
            Some(TokenType::Identifier(name)) => {
                let name = name.clone();
                return Ok(Expr::Var(WithToken(name, self.advance())));
            }
            _ => return Err(self.expected("<expression>")),
        };
        Ok(Expr::Literal(WithToken(value, self.advance())))
    }
}

fn unary_tt_to_op(tt: &TokenType) -> UnaryOp {
    match tt {
        TokenType::Minus => UnaryOp::Minus,
        TokenType::Bang => UnaryOp::Not,
        TokenType::Increment => UnaryOp::Increment,
        TokenType::Decrement => UnaryOp::Decrement,
        _ => unreachable!(),
    }
}

fn binary_tt_to_op(tt: &TokenType) -> BinaryOp {
    match tt {
        TokenType::Minus => BinaryOp::Minus,
        TokenType::Plus => BinaryOp::Plus,
        TokenType::Star => BinaryOp::Mul,
        TokenType::Slash => BinaryOp::Div,
        TokenType::Perc => BinaryOp::Mod,
        TokenType::EqEqual => BinaryOp::Eq,
        TokenType::BangEq => BinaryOp::NotEq,
        TokenType::And => BinaryOp::And,
        TokenType::Or => BinaryOp::Or,
        TokenType::Greater => BinaryOp::Greater,
        TokenType::GreaterEq => BinaryOp::GreaterEq,
        TokenType::Lesser => BinaryOp::Lesser,
        TokenType::LesserEq => BinaryOp::LesserEq,
        _ => unreachable!(),
    }
}
