use std::fmt::Display;

use crate::lexer::token::Token;

use super::ast::{ASTRefVisitor, WithToken};

#[derive(Debug, Clone)]
pub enum Expr {
    Assign(Assign),
    Binary(Binary),
    Call(Call),
    Grouping(Grouping),
    Literal(WithToken<Literal>),
    Member(MemberAccess),
    Unary(Unary),
    Var(WithToken<String>),
}

#[derive(Debug, Clone)]
pub struct Assign {
    pub op: WithToken<AssignOp>,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct Binary {
    pub op: WithToken<BinaryOp>,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct Unary {
    pub op: WithToken<UnaryOp>,
    pub expr: Box<Expr>,
    pub postfix: bool,
}

#[derive(Debug, Clone)]
pub struct Arg {
    pub expr: Expr,
    pub comma: Option<Token>,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub callee: Box<Expr>,
    pub lparen: Token,
    pub args: Vec<Arg>,
    pub rparen: Token,
}

#[derive(Debug, Clone)]
pub struct Grouping {
    pub lparen: Token,
    pub expr: Box<Expr>,
    pub rparen: Token,
}

#[derive(Debug, Clone)]
pub struct MemberAccess {
    pub object: Box<Expr>,
    pub dot: Token,
    pub field: WithToken<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Minus,
    Not,
    Increment,
    Decrement,
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::Increment => "++",
            UnaryOp::Decrement => "--",
        };
        write!(f, "{}", op)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Mul,
    Div,
    Mod,

    Eq,
    NotEq,
    Greater,
    GreaterEq,
    Lesser,
    LesserEq,

    And,
    Or,
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",

            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::Lesser => "<",
            BinaryOp::LesserEq => "<=",

            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        };
        write!(f, "{}", op)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl Display for AssignOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
        };
        write!(f, "{}", op)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Char(char),
    Float(f64),
    Integer(i64),
    String(String),
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Char(c) => write!(f, "{:?}", c),
            Literal::Float(fl) => write!(f, "{}", fl),
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl Expr {
    /// The expression's source text with whitespace and comments dropped,
    /// i.e. the lexemes of its terminals concatenated in order.
    pub fn text(&self) -> String {
        let mut text = SourceText(String::new());
        match text.visit_expr(self) {
            Ok(()) => text.0,
            Err(never) => match never {},
        }
    }
}

struct SourceText(String);

impl ASTRefVisitor for SourceText {
    type Error = std::convert::Infallible;

    fn visit_terminal(&mut self, token: &Token) -> Result<(), Self::Error> {
        self.0.push_str(&token.lexeme);
        Ok(())
    }
}

pub fn walk_expr<V: ASTRefVisitor + ?Sized>(visitor: &mut V, expr: &Expr) -> Result<(), V::Error> {
    match expr {
        Expr::Assign(assign) => {
            visitor.visit_expr(&assign.lhs)?;
            visitor.visit_terminal(&assign.op.1)?;
            visitor.visit_expr(&assign.rhs)
        }
        Expr::Binary(binary) => {
            visitor.visit_expr(&binary.lhs)?;
            visitor.visit_terminal(&binary.op.1)?;
            visitor.visit_expr(&binary.rhs)
        }
        Expr::Call(call) => {
            visitor.visit_expr(&call.callee)?;
            visitor.visit_terminal(&call.lparen)?;
            for arg in &call.args {
                visitor.visit_expr(&arg.expr)?;
                if let Some(ref comma) = arg.comma {
                    visitor.visit_terminal(comma)?;
                }
            }
            visitor.visit_terminal(&call.rparen)
        }
        Expr::Grouping(group) => {
            visitor.visit_terminal(&group.lparen)?;
            visitor.visit_expr(&group.expr)?;
            visitor.visit_terminal(&group.rparen)
        }
        Expr::Literal(literal) => visitor.visit_terminal(&literal.1),
        Expr::Member(member) => {
            visitor.visit_expr(&member.object)?;
            visitor.visit_terminal(&member.dot)?;
            visitor.visit_terminal(&member.field.1)
        }
        Expr::Unary(unary) if unary.postfix => {
            visitor.visit_expr(&unary.expr)?;
            visitor.visit_terminal(&unary.op.1)
        }
        Expr::Unary(unary) => {
            visitor.visit_terminal(&unary.op.1)?;
            visitor.visit_expr(&unary.expr)
        }
        Expr::Var(name) => visitor.visit_terminal(&name.1),
    }
}
