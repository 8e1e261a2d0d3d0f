use std::path::{Path, PathBuf};
use std::{fs, thread};

use anyhow::Context;

pub mod diagnostic;
pub mod lexer;
pub mod parser;
pub mod report;
pub mod semantic;

use diagnostic::Diagnostic;
use lexer::{Lexer, LexerError};
use parser::{ast::Program, ParseError, Parser};
use semantic::Analysis;

/// Lexes and parses `input`. Failures are `LexerError` or `ParseError`.
pub fn parse(input: &str) -> anyhow::Result<Program> {
    let tokens = Lexer::new(input).tokenize()?;
    let program = Parser::new(input, tokens).program()?;
    Ok(program)
}

/// Runs the whole pipeline on one compilation unit. Semantic problems are
/// part of the returned analysis; syntax errors and malformed trees are not.
pub fn analyze(input: &str) -> anyhow::Result<Analysis> {
    let program = parse(input)?;
    Ok(semantic::collect(program)?)
}

/// The syntax diagnostic carried by `err`, if it came from the lexer or the parser.
pub fn syntax_diagnostic(err: &anyhow::Error) -> Option<Diagnostic> {
    err.downcast_ref::<LexerError>()
        .map(Diagnostic::from)
        .or_else(|| err.downcast_ref::<ParseError>().map(Diagnostic::from))
}

pub fn analyze_file(path: &Path) -> anyhow::Result<Analysis> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    analyze(&text)
}

/// Stack given to each analysis thread. Parsing and the tree walks recurse
/// once per nesting level, up to `parser::MAX_NESTING`.
pub const ANALYSIS_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Analyzes every file on its own thread. Results come back in input order.
pub fn analyze_files(paths: &[PathBuf]) -> Vec<anyhow::Result<Analysis>> {
    thread::scope(|scope| {
        let handles = paths
            .iter()
            .map(|path| {
                thread::Builder::new()
                    .name(path.display().to_string())
                    .stack_size(ANALYSIS_STACK_SIZE)
                    .spawn_scoped(scope, move || analyze_file(path))
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .map(|handle| match handle {
                Ok(handle) => match handle.join() {
                    Ok(result) => result,
                    Err(_) => Err(anyhow::anyhow!("analysis thread panicked")),
                },
                Err(err) => Err(anyhow::Error::new(err).context("spawning analysis thread")),
            })
            .collect()
    })
}
