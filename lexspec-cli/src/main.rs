mod limit_args;

use clap::Parser;
use lexspec::CompileError;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::{fs, io};
use thiserror::Error;

/// Compiles a `lexspec` grammar file into a Graphviz DOT dump of its NFA.
#[derive(Debug, Parser)]
#[command(name = "lexspec-cli", version, about)]
struct Cli {
    /// Grammar file to read; omit to read from stdin.
    #[arg(long = "input", short = 'i')]
    input: Option<PathBuf>,

    /// Where to write the DOT output; omit to write to stdout.
    #[arg(long = "output", short = 'o')]
    output: Option<PathBuf>,

    /// Which non-terminal's NFA to render. Defaults to the master NFA
    /// accepting the union of every definition.
    #[arg(long = "emit")]
    emit: Option<String>,

    /// Overrides one capacity limit, e.g. `--limit max_nfa_states=4096`.
    /// May be given more than once.
    #[arg(long = "limit", value_name = "KEY=VALUE")]
    limit: Vec<String>,
}

#[derive(Debug, Error)]
enum Error {
    #[error("Error reading {0}: {1}")]
    InputFile(PathBuf, io::Error),
    #[error("Error reading stdin: {0}")]
    Stdin(io::Error),
    #[error("Error writing {0}: {1}")]
    OutputFile(PathBuf, io::Error),
    #[error(transparent)]
    Limit(#[from] limit_args::Error),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("unknown non-terminal {0:?}")]
    UnknownEmit(String),
}

fn read_source(path: Option<&PathBuf>) -> Result<String, Error> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|e| Error::InputFile(path.clone(), e)),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(Error::Stdin)?;
            Ok(buf)
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    macro_rules! warn {
        ($($t:tt)*) => (eprintln!($($t)*))
    }

    let limits = limit_args::apply(&cli.limit)?;
    let source = read_source(cli.input.as_ref())?;

    let mut compiled = lexspec::compile(&source, limits)?;
    for w in &compiled.registry.warnings {
        warn!("{}", lexspec::diagnostics::format_warning(w));
    }

    let dot = compiled
        .dot_for(cli.emit.as_deref())
        .ok_or_else(|| Error::UnknownEmit(cli.emit.clone().unwrap_or_default()))?;

    match &cli.output {
        Some(path) => fs::write(path, dot).map_err(|e| Error::OutputFile(path.clone(), e))?,
        None => println!("{dot}"),
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
