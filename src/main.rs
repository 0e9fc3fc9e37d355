use clap::Parser as ClapParser;
use color_eyre::eyre::{Context, Result};
use lin::{
    interpreter::{context::StdioContext, TreeWalkInterpreter},
    parser::{
        formatter::{ParserFormatter, PrettyParserFormatter},
        Parser,
    },
    value::formatter::{PrettyFormatter, ValueFormatter},
};
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const PARSE_FAILURE: u8 = 65;
const RUNTIME_FAILURE: u8 = 70;

#[derive(Debug, ClapParser)]
#[clap(name = "lin", version, about = "Runs a lin source file")]
pub struct CLArgs {
    /// Path to the source file to run.
    pub path: PathBuf,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();
    let args = CLArgs::parse();
    lin_main(&args.path)
}

/// Logs go to stderr so program output on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn lin_main(path: &Path) -> Result<ExitCode> {
    let source = read_to_string(path)
        .wrap_err_with(|| format!("Failed to read source file {}", path.display()))?;

    let mut parser = Parser::new(&source);
    let program = match parser.parse() {
        Ok(program) => program,
        Err(error) => {
            let formatter = PrettyParserFormatter::new(&source, path);
            eprint!("{}", formatter.format_error(&error));
            return Ok(ExitCode::from(PARSE_FAILURE));
        }
    };
    tracing::debug!(
        statements = program.iter().count(),
        functions = program.function_count(),
        "parsed program"
    );

    let mut interpreter = TreeWalkInterpreter::new(StdioContext::new());
    match interpreter.run(&program) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(error) => {
            let formatter = PrettyFormatter::new(&source, path);
            eprint!("{}", formatter.format_error(&error));
            Ok(ExitCode::from(RUNTIME_FAILURE))
        }
    }
}
