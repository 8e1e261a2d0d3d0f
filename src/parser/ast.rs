use std::ops::Deref;

use crate::lexer::token::Token;
use crate::semantic::r#type::Type;

pub use super::expr::*;
pub use super::stmt::*;

/// A value together with the token it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct WithToken<T>(pub T, pub Token);

impl<T> Deref for WithToken<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct Program(pub Vec<Item>);

#[derive(Debug, Clone)]
pub enum Item {
    Function(FunctionDecl),
    GlobalVar(VarDecl),
    Struct(StructDecl),
}

#[derive(Debug, Clone)]
pub struct Initializer {
    pub eq_sign: Token,
    pub expr: Expr,
}

/// `type name (= expr)? ;`, used for globals, locals and struct fields alike.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub ty: WithToken<Type>,
    pub name: Token,
    pub init: Option<Initializer>,
    pub semi: Token,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub ty: WithToken<Type>,
    pub name: Token,
    pub comma: Option<Token>,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub ret_ty: WithToken<Type>,
    pub name: Token,
    pub lparen: Token,
    pub params: Vec<Param>,
    pub rparen: Token,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub enum Member {
    Field(VarDecl),
    Method(FunctionDecl),
}

#[derive(Debug, Clone)]
pub struct StructDecl {
    pub keyword: Token,
    pub name: Token,
    pub lbrace: Token,
    pub members: Vec<Member>,
    pub rbrace: Token,
    pub semi: Option<Token>,
}

#[derive(Debug, Clone)]
pub enum BlockItem {
    Stmt(Stmt),
    VarDecl(VarDecl),
}

#[derive(Debug, Clone)]
pub struct Block {
    pub lbrace: Token,
    pub items: Vec<BlockItem>,
    pub rbrace: Token,
}

/// Depth-first, source-ordered walk over the tree. Every method defaults to
/// visiting the node's children, so an implementor only overrides the node
/// kinds it cares about and `visit_terminal`, which sees every token of the
/// tree exactly once, in document order.
pub trait ASTRefVisitor {
    type Error;

    fn visit_terminal(&mut self, token: &Token) -> Result<(), Self::Error>;

    fn visit_program(&mut self, program: &Program) -> Result<(), Self::Error> {
        walk_program(self, program)
    }

    fn visit_global_var_decl(&mut self, decl: &VarDecl) -> Result<(), Self::Error> {
        walk_var_decl(self, decl)
    }

    fn visit_function_decl(&mut self, func: &FunctionDecl) -> Result<(), Self::Error> {
        walk_function_decl(self, func)
    }

    fn visit_struct_decl(&mut self, decl: &StructDecl) -> Result<(), Self::Error> {
        walk_struct_decl(self, decl)
    }

    fn visit_field_decl(&mut self, decl: &VarDecl) -> Result<(), Self::Error> {
        walk_var_decl(self, decl)
    }

    fn visit_local_var_decl(&mut self, decl: &VarDecl) -> Result<(), Self::Error> {
        walk_var_decl(self, decl)
    }

    fn visit_block(&mut self, block: &Block) -> Result<(), Self::Error> {
        walk_block(self, block)
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> Result<(), Self::Error> {
        walk_stmt(self, stmt)
    }

    fn visit_expr(&mut self, expr: &Expr) -> Result<(), Self::Error> {
        walk_expr(self, expr)
    }
}

pub fn walk_program<V: ASTRefVisitor + ?Sized>(
    visitor: &mut V,
    program: &Program,
) -> Result<(), V::Error> {
    for item in &program.0 {
        match item {
            Item::Function(func) => visitor.visit_function_decl(func)?,
            Item::GlobalVar(decl) => visitor.visit_global_var_decl(decl)?,
            Item::Struct(decl) => visitor.visit_struct_decl(decl)?,
        }
    }
    Ok(())
}

pub fn walk_var_decl<V: ASTRefVisitor + ?Sized>(
    visitor: &mut V,
    decl: &VarDecl,
) -> Result<(), V::Error> {
    visitor.visit_terminal(&decl.ty.1)?;
    visitor.visit_terminal(&decl.name)?;
    if let Some(ref init) = decl.init {
        visitor.visit_terminal(&init.eq_sign)?;
        visitor.visit_expr(&init.expr)?;
    }
    visitor.visit_terminal(&decl.semi)
}

/// Walks the signature only; the body is left to the caller.
pub fn walk_function_header<V: ASTRefVisitor + ?Sized>(
    visitor: &mut V,
    func: &FunctionDecl,
) -> Result<(), V::Error> {
    visitor.visit_terminal(&func.ret_ty.1)?;
    visitor.visit_terminal(&func.name)?;
    visitor.visit_terminal(&func.lparen)?;
    for param in &func.params {
        visitor.visit_terminal(&param.ty.1)?;
        visitor.visit_terminal(&param.name)?;
        if let Some(ref comma) = param.comma {
            visitor.visit_terminal(comma)?;
        }
    }
    visitor.visit_terminal(&func.rparen)
}

pub fn walk_function_decl<V: ASTRefVisitor + ?Sized>(
    visitor: &mut V,
    func: &FunctionDecl,
) -> Result<(), V::Error> {
    walk_function_header(visitor, func)?;
    visitor.visit_block(&func.body)
}

pub fn walk_struct_decl<V: ASTRefVisitor + ?Sized>(
    visitor: &mut V,
    decl: &StructDecl,
) -> Result<(), V::Error> {
    visitor.visit_terminal(&decl.keyword)?;
    visitor.visit_terminal(&decl.name)?;
    visitor.visit_terminal(&decl.lbrace)?;
    for member in &decl.members {
        match member {
            Member::Field(field) => visitor.visit_field_decl(field)?,
            Member::Method(method) => visitor.visit_function_decl(method)?,
        }
    }
    visitor.visit_terminal(&decl.rbrace)?;
    if let Some(ref semi) = decl.semi {
        visitor.visit_terminal(semi)?;
    }
    Ok(())
}
