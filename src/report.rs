use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::semantic::functions::FunctionTable;
use crate::semantic::symbol_table::GlobalTable;
use crate::semantic::tokens::TokenRecord;
use crate::semantic::Analysis;

pub const TOKENS_FILE: &str = "tokens.txt";
pub const GLOBALS_FILE: &str = "global_vars.txt";
pub const FUNCTIONS_FILE: &str = "functions.txt";

const FUNCTION_SEPARATOR: &str = "--------------";

/// Where the three reports of one compilation unit are written.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub tokens: PathBuf,
    pub globals: PathBuf,
    pub functions: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            tokens: dir.join(TOKENS_FILE),
            globals: dir.join(GLOBALS_FILE),
            functions: dir.join(FUNCTIONS_FILE),
        }
    }
}

/// `<KIND, lexeme, line>` per token.
pub fn render_tokens(tokens: &[TokenRecord]) -> String {
    let mut out = String::new();
    for token in tokens {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "<{}, {}, {}>", token.kind, token.lexeme, token.line);
    }
    out
}

/// `type name` or `type name = init` per variable.
pub fn render_globals(globals: &GlobalTable) -> String {
    let mut out = String::new();
    for (name, var) in globals.all_entries() {
        let _ = match var.initializer {
            Some(ref init) => writeln!(out, "{} {} = {}", var.ty, name, init),
            None => writeln!(out, "{} {}", var.ty, name),
        };
    }
    out
}

pub fn render_functions(functions: &FunctionTable) -> String {
    let mut out = String::new();
    for func in functions.all_functions() {
        let _ = writeln!(out, "Function: {} (return {})", func.name, func.ret_ty);
        let _ = writeln!(out, " - Parameters: {}", func.params.len());
        let _ = writeln!(out, "{}", FUNCTION_SEPARATOR);
    }
    out
}

/// Creates (or truncates) `path` and writes `contents` to it. The file is
/// closed when this returns, whether or not the write succeeded.
pub fn write_report(path: &Path, contents: &str) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents.as_bytes())
        .and_then(|_| writer.flush())
        .with_context(|| format!("writing {}", path.display()))
}

impl Analysis {
    pub fn write_reports(&self, paths: &OutputPaths) -> anyhow::Result<()> {
        write_report(&paths.tokens, &render_tokens(&self.tokens))?;
        write_report(&paths.globals, &render_globals(&self.globals))?;
        write_report(&paths.functions, &render_functions(&self.functions))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::token::TokenType;
    use crate::semantic::functions::{FunctionEntry, Parameter};
    use crate::semantic::r#type::Type;

    #[test]
    fn test_token_lines() {
        let tokens = vec![
            TokenRecord {
                kind: TokenType::KInt,
                lexeme: "int".to_string(),
                line: 1,
            },
            TokenRecord {
                kind: TokenType::Identifier("x".to_string()),
                lexeme: "x".to_string(),
                line: 1,
            },
            TokenRecord {
                kind: TokenType::Semicolon,
                lexeme: ";".to_string(),
                line: 2,
            },
        ];
        assert_eq!(render_tokens(&tokens), "<INT, int, 1>\n<ID, x, 1>\n<SEMI, ;, 2>\n");
    }

    #[test]
    fn test_global_lines() {
        let mut globals = GlobalTable::new();
        globals.declare("count", Type::Int, Some("1+2".to_string()), 1);
        globals.declare("name", Type::String, None, 2);
        assert_eq!(render_globals(&globals), "int count = 1+2\nstring name\n");
    }

    #[test]
    fn test_function_lines() {
        let mut functions = FunctionTable::new();
        functions.declare(FunctionEntry {
            name: "add".to_string(),
            ret_ty: Type::Float,
            params: vec![
                Parameter {
                    name: "a".to_string(),
                    ty: Type::Float,
                },
                Parameter {
                    name: "b".to_string(),
                    ty: Type::Float,
                },
            ],
            line: 1,
        });
        assert_eq!(
            render_functions(&functions),
            "Function: add (return float)\n - Parameters: 2\n--------------\n"
        );
    }

    #[test]
    fn test_rendering_is_stable() {
        let mut globals = GlobalTable::new();
        for (i, name) in ["b", "a", "c"].iter().enumerate() {
            globals.declare(name, Type::Double, Some(format!("{i}.5")), i + 1);
        }
        assert_eq!(render_globals(&globals), render_globals(&globals));
    }

    #[test]
    fn test_empty_tables_render_empty() {
        assert_eq!(render_tokens(&[]), "");
        assert_eq!(render_globals(&GlobalTable::new()), "");
        assert_eq!(render_functions(&FunctionTable::new()), "");
    }
}
