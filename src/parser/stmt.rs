use crate::lexer::token::Token;

use super::ast::{ASTRefVisitor, Block, BlockItem, VarDecl};
use super::expr::Expr;

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub keyword: Token,
    pub lparen: Token,
    pub cond: Expr,
    pub rparen: Token,
    pub then: Box<Stmt>,
    pub else_clause: Option<(Token, Box<Stmt>)>,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub keyword: Token,
    pub lparen: Token,
    pub cond: Expr,
    pub rparen: Token,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone)]
pub enum ForStmtInitializer {
    VarDecl(VarDecl),
    Expr { expr: Option<Expr>, semi: Token },
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub keyword: Token,
    pub lparen: Token,
    pub initializer: ForStmtInitializer,
    pub condition: Option<Expr>,
    pub cond_semi: Token,
    pub step: Option<Expr>,
    pub rparen: Token,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Break { keyword: Token, semi: Token },
    Compound(Block),
    Continue { keyword: Token, semi: Token },
    Expression { expr: Expr, semi: Token },
    For(ForStmt),
    If(IfStmt),
    Null(Token),
    Return { keyword: Token, value: Option<Expr>, semi: Token },
    While(WhileStmt),
}

pub fn walk_block<V: ASTRefVisitor + ?Sized>(visitor: &mut V, block: &Block) -> Result<(), V::Error> {
    visitor.visit_terminal(&block.lbrace)?;
    for item in &block.items {
        match item {
            BlockItem::Stmt(stmt) => visitor.visit_stmt(stmt)?,
            BlockItem::VarDecl(decl) => visitor.visit_local_var_decl(decl)?,
        }
    }
    visitor.visit_terminal(&block.rbrace)
}

pub fn walk_stmt<V: ASTRefVisitor + ?Sized>(visitor: &mut V, stmt: &Stmt) -> Result<(), V::Error> {
    match stmt {
        Stmt::Break { keyword, semi } | Stmt::Continue { keyword, semi } => {
            visitor.visit_terminal(keyword)?;
            visitor.visit_terminal(semi)
        }
        Stmt::Compound(block) => visitor.visit_block(block),
        Stmt::Expression { expr, semi } => {
            visitor.visit_expr(expr)?;
            visitor.visit_terminal(semi)
        }
        Stmt::For(for_stmt) => {
            visitor.visit_terminal(&for_stmt.keyword)?;
            visitor.visit_terminal(&for_stmt.lparen)?;
            match &for_stmt.initializer {
                ForStmtInitializer::VarDecl(decl) => visitor.visit_local_var_decl(decl)?,
                ForStmtInitializer::Expr { expr, semi } => {
                    if let Some(expr) = expr {
                        visitor.visit_expr(expr)?;
                    }
                    visitor.visit_terminal(semi)?;
                }
            }
            if let Some(ref cond) = for_stmt.condition {
                visitor.visit_expr(cond)?;
            }
            visitor.visit_terminal(&for_stmt.cond_semi)?;
            if let Some(ref step) = for_stmt.step {
                visitor.visit_expr(step)?;
            }
            visitor.visit_terminal(&for_stmt.rparen)?;
            visitor.visit_stmt(&for_stmt.body)
        }
        Stmt::If(if_stmt) => {
            visitor.visit_terminal(&if_stmt.keyword)?;
            visitor.visit_terminal(&if_stmt.lparen)?;
            visitor.visit_expr(&if_stmt.cond)?;
            visitor.visit_terminal(&if_stmt.rparen)?;
            visitor.visit_stmt(&if_stmt.then)?;
            if let Some((ref else_kw, ref else_stmt)) = if_stmt.else_clause {
                visitor.visit_terminal(else_kw)?;
                visitor.visit_stmt(else_stmt)?;
            }
            Ok(())
        }
        Stmt::Null(semi) => visitor.visit_terminal(semi),
        Stmt::Return {
            keyword,
            value,
            semi,
        } => {
            visitor.visit_terminal(keyword)?;
            if let Some(value) = value {
                visitor.visit_expr(value)?;
            }
            visitor.visit_terminal(semi)
        }
        Stmt::While(while_stmt) => {
            visitor.visit_terminal(&while_stmt.keyword)?;
            visitor.visit_terminal(&while_stmt.lparen)?;
            visitor.visit_expr(&while_stmt.cond)?;
            visitor.visit_terminal(&while_stmt.rparen)?;
            visitor.visit_stmt(&while_stmt.body)
        }
    }
}
