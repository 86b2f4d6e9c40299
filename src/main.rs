//! semantc - semantic analysis driver
//!
//! Reads a JSON-serialized AST from the parser, analyzes it and either
//! writes the annotated AST for the next stage or reports every error.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use semant::feedback::AnalysisFeedback;
use semant::{Analysis, AnalyzerOptions, Diagnostics, Program, SemanticAnalyzer, HALT_BANNER};

/// Semantic analyzer
#[derive(Parser, Debug)]
#[command(name = "semantc")]
#[command(version = "0.1.0")]
#[command(about = "Semantic analysis of a parsed program (JSON AST)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input AST file (JSON), or '-' for stdin
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Write the type-annotated AST here on success
    #[arg(long, value_name = "FILE")]
    emit_typed: Option<PathBuf>,

    /// Diagnostics format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Name of the entry function
    #[arg(long, default_value = "main")]
    entry: String,

    /// Name of the built-in print call
    #[arg(long, default_value = "printf")]
    print_name: String,

    /// Maximum number of parameters per function
    #[arg(long, default_value_t = 6)]
    max_params: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a file for errors without writing anything
    Check {
        /// Input AST file (JSON)
        input: PathBuf,
    },
    /// Print version information
    Version,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Exit status for an analysis that hit an internal error
const FATAL_STATUS: i32 = 2;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let status = match &cli.command {
        Some(Commands::Check { input }) => run(&cli, input, None),
        Some(Commands::Version) => {
            println!("semantc 0.1.0");
            return;
        }
        None => match cli.input {
            Some(ref input) => run(&cli, input, cli.emit_typed.as_deref()),
            None => {
                eprintln!("Error: No input file specified");
                eprintln!("Usage: semantc <FILE> or semantc check <FILE>");
                process::exit(1);
            }
        },
    };

    match status {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Analyze one file and return the process exit status
fn run(cli: &Cli, input: &Path, emit_typed: Option<&Path>) -> Result<i32> {
    let mut program = read_program(input)?;
    info!("analyzing {} ({} declarations)", input.display(), program.decls.len());

    let mut analyzer = SemanticAnalyzer::with_options(AnalyzerOptions {
        entry_name: cli.entry.clone(),
        print_name: cli.print_name.clone(),
        max_params: cli.max_params,
    });

    let started = Instant::now();
    let outcome = analyzer.analyze(&mut program);
    let elapsed = started.elapsed().as_millis() as u64;

    if cli.format == Format::Json {
        let feedback = AnalysisFeedback::new(
            input.display().to_string(),
            outcome.as_ref().ok(),
            analyzer.diagnostics(),
        )
        .with_elapsed_ms(elapsed);
        println!("{}", feedback.to_json());
    }

    let status = report_outcome(&outcome, analyzer.diagnostics(), cli.format, &mut io::stderr().lock())
        .context("writing diagnostics")?;
    if status != 0 {
        return Ok(status);
    }

    if let Some(out) = emit_typed {
        let json = serde_json::to_string_pretty(&program).context("serializing annotated AST")?;
        fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
        info!("wrote annotated AST to {}", out.display());
    }
    Ok(0)
}

/// Exit status for the outcome of one analysis
fn exit_status(outcome: &semant::Result<Analysis>) -> i32 {
    match outcome {
        Err(_) => FATAL_STATUS,
        Ok(analysis) if !analysis.is_success() => 1,
        Ok(_) => 0,
    }
}

/// Write the end-of-run report to `out` and return the exit status.
///
/// Text output lists every diagnostic; JSON output already carries them on
/// stdout. The halt banner follows user errors in both formats.
fn report_outcome<W: Write>(
    outcome: &semant::Result<Analysis>,
    diagnostics: &Diagnostics,
    format: Format,
    out: &mut W,
) -> io::Result<i32> {
    if format == Format::Text {
        diagnostics.emit(out)?;
    }
    let status = exit_status(outcome);
    if status == 1 {
        writeln!(out, "{}", HALT_BANNER)?;
    }
    Ok(status)
}

fn read_program(input: &Path) -> Result<Program> {
    let source = if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading AST from stdin")?;
        buf
    } else {
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?
    };
    serde_json::from_str(&source).with_context(|| format!("parsing AST in {}", input.display()))
}
