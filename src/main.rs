use clap::Parser;
use mini_lisp::ast;
use mini_lisp::env::Environment;
use mini_lisp::error::MiniLispError;
use mini_lisp::eval;
use mini_lisp::lexer;
use mini_lisp::reader;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Interpreter for Mini-LISP, a small statically-scoped first-class-function dialect
#[derive(Parser, Debug)]
#[command(name = "mini-lisp")]
#[command(version)]
#[command(about = "An interpreter for the Mini-LISP language")]
struct Cli {
    /// Path to the Mini-LISP source file to run
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Zero arguments: nonzero status, no output at all. `file` is optional
    // in the struct precisely so clap never emits its own usage error here.
    let Some(path) = cli.file else {
        return ExitCode::FAILURE;
    };

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Cannot read {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Every detected syntax or runtime error is printed on stdout and the
    // process still exits 0 — a grading-harness convention preserved
    // deliberately rather than mapped onto a normal nonzero exit code.
    if let Err(e) = run(&source, &mut out) {
        let _ = writeln!(out, "{}", e);
    }

    ExitCode::SUCCESS
}

/// Wires the full pipeline: lex, read, build the AST, evaluate.
fn run<W: Write>(source: &str, out: &mut W) -> Result<(), MiniLispError> {
    let tokens = lexer::tokenize(source)?;
    let sexprs = reader::read_all(&tokens)?;
    let stmts = ast::build(&sexprs)?;
    let env = Environment::new();
    eval::eval_program(&stmts, &env, out)?;
    Ok(())
}
