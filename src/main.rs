use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use minilang::parser::pretty_print_ast::PrettyPrint;
use minilang::report::OutputPaths;
use minilang::{analyze_files, syntax_diagnostic};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// MiniLang source files to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Directory the token, global variable and function reports are written to
    #[arg(long, short, default_value = ".")]
    out_dir: PathBuf,

    /// Print the parse tree of every file that parses
    #[arg(long)]
    dump_ast: bool,

    /// Print progress information
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    /// A single input writes straight into the output directory; several
    /// inputs each get a subdirectory named after the file stem. Stems seen
    /// before get a `-2`, `-3`, ... suffix so no two inputs share a directory.
    fn report_dirs(&self) -> Vec<PathBuf> {
        if self.files.len() == 1 {
            return vec![self.out_dir.clone()];
        }

        let mut taken = HashSet::new();
        self.files
            .iter()
            .map(|file| {
                let stem = match file.file_stem() {
                    Some(stem) => stem.to_string_lossy().into_owned(),
                    None => String::from("input"),
                };
                let mut name = stem.clone();
                let mut n = 1;
                while !taken.insert(name.clone()) {
                    n += 1;
                    name = format!("{}-{}", stem, n);
                }
                self.out_dir.join(name)
            })
            .collect()
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        println!("{}", format!("Analyzing {} file(s)", cli.files.len()).dimmed());
    }

    let results = analyze_files(&cli.files);
    let dirs = cli.report_dirs();
    let mut failed = false;

    for ((file, dir), result) in cli.files.iter().zip(dirs).zip(results) {
        let analysis = match result {
            Ok(analysis) => analysis,
            Err(err) => {
                failed = true;
                match syntax_diagnostic(&err) {
                    Some(diag) => eprintln!("{}: {}", file.display(), diag.colored()),
                    None => eprintln!("{}", format!("{}: error: {:#}", file.display(), err).red()),
                }
                continue;
            }
        };

        if cli.dump_ast {
            print!("{}", PrettyPrint::new().print(&analysis.program));
        }

        for message in &analysis.messages {
            eprintln!("{}: {}", file.display(), message.colored());
        }

        let written = fs::create_dir_all(&dir)
            .with_context(|| format!("creating {}", dir.display()))
            .and_then(|_| analysis.write_reports(&OutputPaths::in_dir(&dir)));
        if let Err(err) = written {
            failed = true;
            eprintln!("{}", format!("{}: error: {:#}", file.display(), err).red());
            continue;
        }

        if cli.verbose {
            println!(
                "{}",
                format!(
                    "{}: {} tokens, {} globals, {} functions, {} errors, {} notes -> {}",
                    file.display(),
                    analysis.tokens.len(),
                    analysis.globals.len(),
                    analysis.functions.len(),
                    analysis.errors().count(),
                    analysis.notes().count(),
                    dir.display()
                )
                .dimmed()
            );
        }
    }

    if failed {
        std::process::exit(1);
    }

    println!("{}", "Analysis completed successfully".green());
    Ok(())
}
