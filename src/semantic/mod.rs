use thiserror::Error;

use crate::diagnostic::{Diagnostic, Severity};
use crate::lexer::token::Token;
use crate::parser::ast::*;

pub mod functions;
pub mod symbol_table;
pub mod tokens;
pub mod r#type;

use functions::{FunctionEntry, FunctionTable, Parameter};
use symbol_table::GlobalTable;
use tokens::{TokenRecord, TokenRecorder};

#[derive(Debug, Error, PartialEq)]
pub enum CollectError {
    #[error("semantic collection already ran on this collector")]
    AlreadyCollected,

    #[error("malformed tree at line {line}: expected {expected}, found {found}")]
    MalformedTree {
        line: usize,
        expected: &'static str,
        found: &'static str,
    },
}

pub type CollectResult<T> = Result<T, CollectError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CollectorState {
    Idle,
    Done,
}

/// Everything collected from one compilation unit.
#[derive(Debug)]
pub struct Analysis {
    pub program: Program,
    pub tokens: Vec<TokenRecord>,
    pub globals: GlobalTable,
    pub functions: FunctionTable,
    /// Errors and notes in the order the walk produced them.
    pub messages: Vec<Diagnostic>,
}

impl Analysis {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages.iter().filter(|d| d.severity != Severity::Note)
    }

    pub fn notes(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages.iter().filter(|d| d.severity == Severity::Note)
    }
}

/// Single pass over a program that records its tokens, its global variables
/// and its functions. Semantic problems and notes end up in `messages`; only
/// a malformed tree stops the walk.
#[derive(Debug)]
pub struct SemanticCollector {
    state: CollectorState,
    tokens: TokenRecorder,
    globals: GlobalTable,
    functions: FunctionTable,
    messages: Vec<Diagnostic>,
}

impl SemanticCollector {
    pub fn new() -> Self {
        Self {
            state: CollectorState::Idle,
            tokens: TokenRecorder::new(),
            globals: GlobalTable::new(),
            functions: FunctionTable::new(),
            messages: Vec::new(),
        }
    }

    /// Walks `program`. A collector can only be used once.
    pub fn collect(&mut self, program: &Program) -> CollectResult<()> {
        if self.state == CollectorState::Done {
            return Err(CollectError::AlreadyCollected);
        }
        self.state = CollectorState::Done;
        self.visit_program(program)
    }

    pub fn tokens(&self) -> &[TokenRecord] {
        self.tokens.all_tokens()
    }

    pub fn globals(&self) -> &GlobalTable {
        &self.globals
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn messages(&self) -> &[Diagnostic] {
        &self.messages
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages.iter().filter(|d| d.severity != Severity::Note)
    }

    pub fn notes(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages.iter().filter(|d| d.severity == Severity::Note)
    }

    pub fn into_analysis(self, program: Program) -> Analysis {
        Analysis {
            program,
            tokens: self.tokens.into_tokens(),
            globals: self.globals,
            functions: self.functions,
            messages: self.messages,
        }
    }
}

impl Default for SemanticCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a fresh collector over `program`.
pub fn collect(program: Program) -> CollectResult<Analysis> {
    let mut collector = SemanticCollector::new();
    collector.collect(&program)?;
    Ok(collector.into_analysis(program))
}

fn ident(token: &Token) -> CollectResult<String> {
    match token.ident() {
        Some(name) => Ok(name.to_string()),
        None => Err(CollectError::MalformedTree {
            line: token.line,
            expected: "identifier",
            found: token.tok_type.kind_name(),
        }),
    }
}

impl ASTRefVisitor for SemanticCollector {
    type Error = CollectError;

    fn visit_terminal(&mut self, token: &Token) -> CollectResult<()> {
        self.tokens.record(&token.tok_type, &token.lexeme, token.line);
        Ok(())
    }

    fn visit_global_var_decl(&mut self, decl: &VarDecl) -> CollectResult<()> {
        walk_var_decl(self, decl)?;

        let name = ident(&decl.name)?;
        let initializer = decl.init.as_ref().map(|init| init.expr.text());
        if let Some(diag) =
            self.globals
                .declare(&name, decl.ty.0.clone(), initializer, decl.name.line)
        {
            self.messages.push(diag);
        }
        Ok(())
    }

    fn visit_function_decl(&mut self, func: &FunctionDecl) -> CollectResult<()> {
        walk_function_header(self, func)?;

        let name = ident(&func.name)?;
        let params = func
            .params
            .iter()
            .map(|param| {
                Ok(Parameter {
                    name: ident(&param.name)?,
                    ty: param.ty.0.clone(),
                })
            })
            .collect::<CollectResult<Vec<_>>>()?;

        // The entry only becomes visible once the body has been walked.
        self.visit_block(&func.body)?;

        let diagnostics = self.functions.declare(FunctionEntry {
            name,
            ret_ty: func.ret_ty.0.clone(),
            params,
            line: func.name.line,
        });
        self.messages.extend(diagnostics);
        Ok(())
    }

    fn visit_struct_decl(&mut self, decl: &StructDecl) -> CollectResult<()> {
        let name = ident(&decl.name)?;
        self.messages.push(Diagnostic::note(
            decl.name.line,
            format!("found struct '{}'", name),
        ));
        walk_struct_decl(self, decl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::token::{Span, TokenType};
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use super::r#type::Type;

    fn parse(input: &str) -> Program {
        let tokens = Lexer::new(input).tokenize().unwrap();
        Parser::new(input, tokens).program().unwrap()
    }

    fn run(input: &str) -> SemanticCollector {
        let mut collector = SemanticCollector::new();
        collector.collect(&parse(input)).unwrap();
        collector
    }

    fn errors(collector: &SemanticCollector) -> Vec<&Diagnostic> {
        collector.errors().collect()
    }

    fn messages(collector: &SemanticCollector) -> Vec<&str> {
        collector.errors().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_no_declarations() {
        let collector = run("// only a comment\n   \n");
        assert!(collector.tokens().is_empty());
        assert!(collector.globals().is_empty());
        assert!(collector.functions().is_empty());
        assert!(errors(&collector).is_empty());
    }

    #[test]
    fn test_tokens_in_document_order() {
        let collector = run("int x = 1 + 2; // trailing\nvoid f(int a) { a++; }");
        let lexemes = collector
            .tokens()
            .iter()
            .map(|t| t.lexeme.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            lexemes,
            vec![
                "int", "x", "=", "1", "+", "2", ";", "void", "f", "(", "int", "a", ")", "{",
                "a", "++", ";", "}"
            ]
        );
        assert_eq!(collector.tokens()[7].line, 2);
        assert_eq!(collector.tokens()[1].kind, TokenType::Identifier("x".to_string()));
    }

    #[test]
    fn test_duplicate_global_keeps_first() {
        let collector = run("int x = 5;\nint x = 6;");
        assert_eq!(messages(&collector), vec!["global variable 'x' already declared"]);
        assert_eq!(errors(&collector)[0].severity, Severity::SemanticError);
        assert_eq!(errors(&collector)[0].line, Some(2));

        let x = collector.globals().get("x").unwrap();
        assert_eq!(x.ty, Type::Int);
        assert_eq!(x.initializer.as_deref(), Some("5"));
    }

    #[test]
    fn test_string_into_int() {
        let collector = run("int x = \"hello\";");
        assert_eq!(
            messages(&collector),
            vec!["variable 'x' (int) cannot receive a string"]
        );
        assert_eq!(
            collector.globals().get("x").unwrap().initializer.as_deref(),
            Some("\"hello\"")
        );
    }

    #[test]
    fn test_duplicate_signature_is_still_recorded() {
        let collector = run("int f(int a) { return a; }\nint f(int b) { return b; }");
        assert_eq!(
            messages(&collector),
            vec!["function 'f' with this parameter list already exists"]
        );
        let names = collector
            .functions()
            .all_functions()
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["f", "f"]);
    }

    #[test]
    fn test_overload_by_parameter_type() {
        let collector = run("int f(int a) { return a; }\nint f(float a) { return 0; }");
        assert!(errors(&collector).is_empty());
        assert_eq!(collector.functions().len(), 2);
    }

    #[test]
    fn test_locals_and_fields_are_not_globals() {
        let collector = run(
            "struct P { int x; int get() { int tmp = x; return tmp; } };
             void main() { int y = \"s\"; }",
        );
        assert!(collector.globals().is_empty());
        assert!(errors(&collector).is_empty());
        let notes = collector.notes().collect::<Vec<_>>();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, "found struct 'P'");
        assert_eq!(notes[0].severity, Severity::Note);

        let names = collector
            .functions()
            .all_functions()
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["get", "main"]);
    }

    #[test]
    fn test_function_entry_contents() {
        let collector = run("\n\nbool check(string s, Point p, double d) { return true; }");
        let f = &collector.functions().all_functions()[0];
        assert_eq!(f.ret_ty, Type::Bool);
        assert_eq!(f.line, 3);
        assert_eq!(
            f.params,
            vec![
                Parameter {
                    name: "s".to_string(),
                    ty: Type::String
                },
                Parameter {
                    name: "p".to_string(),
                    ty: Type::Struct("Point".to_string())
                },
                Parameter {
                    name: "d".to_string(),
                    ty: Type::Double
                },
            ]
        );
    }

    #[test]
    fn test_traversal_continues_after_diagnostics() {
        let collector = run("int a = 1; int a = 2; int b = \"no\"; int a = 3; int main() { return 0; }");
        assert_eq!(errors(&collector).len(), 3);
        assert_eq!(collector.globals().len(), 2);
        assert_eq!(collector.functions().len(), 1);
    }

    #[test]
    fn test_messages_in_document_order() {
        let collector = run(
            "int x; int x;
             struct S { int f() { return 0; } int f() { return 1; } };
             int y = \"no\";",
        );
        let messages = collector
            .messages()
            .iter()
            .map(|d| (d.severity, d.line, d.message.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            messages,
            vec![
                (
                    Severity::SemanticError,
                    Some(1),
                    "global variable 'x' already declared"
                ),
                (Severity::Note, Some(2), "found struct 'S'"),
                (
                    Severity::SemanticError,
                    Some(2),
                    "function 'f' with this parameter list already exists"
                ),
                (
                    Severity::SemanticError,
                    Some(3),
                    "variable 'y' (int) cannot receive a string"
                ),
            ]
        );
    }

    #[test]
    fn test_collector_is_single_use() {
        let program = parse("int x;");
        let mut collector = SemanticCollector::new();
        collector.collect(&program).unwrap();
        assert_eq!(
            collector.collect(&program),
            Err(CollectError::AlreadyCollected)
        );
        assert_eq!(collector.globals().len(), 1);
    }

    #[test]
    fn test_malformed_tree_aborts() {
        let mut program = parse("int x;");
        if let Item::GlobalVar(ref mut decl) = program.0[0] {
            decl.name = Token {
                span: Span(4, 5),
                line: 1,
                lexeme: "5".to_string(),
                tok_type: TokenType::Literal(crate::lexer::token::Literal::Integer(5)),
            };
        }

        let mut collector = SemanticCollector::new();
        assert_eq!(
            collector.collect(&program),
            Err(CollectError::MalformedTree {
                line: 1,
                expected: "identifier",
                found: "INT_LITERAL",
            })
        );
    }

    #[test]
    fn test_collect_hands_back_the_program() {
        let analysis = collect(parse("int x = 1;")).unwrap();
        assert_eq!(analysis.program.0.len(), 1);
        assert_eq!(analysis.tokens.len(), 5);
        assert_eq!(analysis.globals.len(), 1);
    }
}
