use std::fmt::Write;

use super::ast::*;
use crate::lexer::token::Token;
use colored::Colorize;

/// Renders the tree one node per line, indented by depth. Terminals that
/// carry no information of their own (punctuation, keywords) are skipped.
pub struct PrettyPrint {
    indent: usize,
    out: String,
}

impl PrettyPrint {
    const INDENT: &'static str = "    ";

    pub fn new() -> Self {
        Self {
            indent: 0,
            out: String::new(),
        }
    }

    pub fn print(mut self, program: &Program) -> String {
        match self.visit_program(program) {
            Ok(()) => self.out,
            Err(_) => unreachable!("writing to a String cannot fail"),
        }
    }

    fn line(&mut self, text: impl std::fmt::Display) -> std::fmt::Result {
        writeln!(self.out, "{}{}", Self::INDENT.repeat(self.indent), text)
    }

    fn nested<F>(&mut self, f: F) -> std::fmt::Result
    where
        F: FnOnce(&mut Self) -> std::fmt::Result,
    {
        self.indent += 1;
        let result = f(self);
        self.indent -= 1;
        result
    }

    fn var_decl(&mut self, label: &str, decl: &VarDecl) -> std::fmt::Result {
        self.line(format!(
            "{} {} {}",
            label.magenta().bold(),
            decl.ty.to_string().yellow(),
            decl.name.lexeme.blue()
        ))?;
        match decl.init {
            Some(ref init) => self.nested(|p| p.visit_expr(&init.expr)),
            None => Ok(()),
        }
    }
}

impl Default for PrettyPrint {
    fn default() -> Self {
        Self::new()
    }
}

impl ASTRefVisitor for PrettyPrint {
    type Error = std::fmt::Error;

    fn visit_terminal(&mut self, _: &Token) -> std::fmt::Result {
        Ok(())
    }

    fn visit_program(&mut self, program: &Program) -> std::fmt::Result {
        self.line("PROGRAM".green().bold())?;
        self.nested(|p| walk_program(p, program))
    }

    fn visit_global_var_decl(&mut self, decl: &VarDecl) -> std::fmt::Result {
        self.var_decl("GLOBAL", decl)
    }

    fn visit_field_decl(&mut self, decl: &VarDecl) -> std::fmt::Result {
        self.var_decl("FIELD", decl)
    }

    fn visit_local_var_decl(&mut self, decl: &VarDecl) -> std::fmt::Result {
        self.var_decl("LOCAL", decl)
    }

    fn visit_function_decl(&mut self, func: &FunctionDecl) -> std::fmt::Result {
        let params = func
            .params
            .iter()
            .map(|p| format!("{} {}", *p.ty, p.name.lexeme))
            .collect::<Vec<_>>()
            .join(", ");
        self.line(format!(
            "{} {}({}) -> {}",
            "FUNCTION".magenta().bold(),
            func.name.lexeme.blue(),
            params,
            func.ret_ty.to_string().yellow()
        ))?;
        self.nested(|p| p.visit_block(&func.body))
    }

    fn visit_struct_decl(&mut self, decl: &StructDecl) -> std::fmt::Result {
        self.line(format!(
            "{} {}",
            "STRUCT".magenta().bold(),
            decl.name.lexeme.blue()
        ))?;
        self.nested(|p| walk_struct_decl(p, decl))
    }

    fn visit_block(&mut self, block: &Block) -> std::fmt::Result {
        self.line("BLOCK".red())?;
        self.nested(|p| walk_block(p, block))
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> std::fmt::Result {
        let label = match stmt {
            Stmt::Break { .. } => "BREAK",
            Stmt::Compound(block) => return self.visit_block(block),
            Stmt::Continue { .. } => "CONTINUE",
            Stmt::Expression { .. } => "EXPR",
            Stmt::For(_) => "FOR",
            Stmt::If(_) => "IF",
            Stmt::Null(_) => "NULL",
            Stmt::Return { .. } => "RETURN",
            Stmt::While(_) => "WHILE",
        };
        self.line(label.red())?;
        self.nested(|p| walk_stmt(p, stmt))
    }

    fn visit_expr(&mut self, expr: &Expr) -> std::fmt::Result {
        match expr {
            Expr::Assign(assign) => {
                self.line(format!("{}(\"{}\")", "ASSIGN".cyan().bold(), *assign.op))?
            }
            Expr::Binary(binary) => {
                self.line(format!("{}(\"{}\")", "BINARY".cyan().bold(), *binary.op))?
            }
            Expr::Call(_) => self.line("CALL".cyan().bold())?,
            Expr::Grouping(_) => self.line("GROUP".cyan().bold())?,
            Expr::Literal(literal) => return self.line(literal.to_string().green()),
            Expr::Member(member) => self.line(format!(
                "{}(.{})",
                "MEMBER".cyan().bold(),
                *member.field
            ))?,
            Expr::Unary(unary) => self.line(format!(
                "{}(\"{}\"{})",
                "UNARY".cyan().bold(),
                *unary.op,
                if unary.postfix { ", postfix" } else { "" }
            ))?,
            Expr::Var(name) => return self.line(name.blue()),
        };
        self.nested(|p| walk_expr(p, expr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    #[test]
    fn test_dump_structure() {
        colored::control::set_override(false);

        let input = "int g = 1 + 2; struct S { int f; }; void main() { return; }";
        let tokens = Lexer::new(input).tokenize().unwrap();
        let program = Parser::new(input, tokens).program().unwrap();
        let dump = PrettyPrint::new().print(&program);

        let expected = [
            "PROGRAM",
            "    GLOBAL int g",
            "        BINARY(\"+\")",
            "            1",
            "            2",
            "    STRUCT S",
            "        FIELD int f",
            "    FUNCTION main() -> void",
            "        BLOCK",
            "            RETURN",
        ];
        assert_eq!(dump.lines().collect::<Vec<_>>(), expected);
    }
}
