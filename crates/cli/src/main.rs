use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use obfmeter::commands::{analyze_command, AnalyzeOptions};

/// Obfuscation quality analyzer.
///
/// Disassembles a baseline binary and its obfuscated build, compares the
/// functions of interest, and prints a scored report. This CLI is a thin
/// wrapper around `obfmeter-core`.
#[derive(Parser, Debug)]
#[command(
    name = "obfmeter",
    version,
    about = "Measure how much obfuscation changed a compiled binary",
    long_about = None
)]
struct Cli {
    /// Baseline (non-obfuscated) binary.
    normal: PathBuf,

    /// Obfuscated build of the same program.
    obfuscated: PathBuf,

    /// Config file (.json, .yaml or .yml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated function names to compare (overrides the config).
    #[arg(long, value_delimiter = ',')]
    functions: Option<Vec<String>>,

    /// Disassembler backend: objdump, listing or capstone.
    #[arg(long)]
    backend: Option<String>,

    /// Emit JSON instead of the text report.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log debug details to stderr.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        // Usage errors exit with 1, not clap's default of 2.
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(1);
        }
    };

    obfmeter_core::logging::init_tracing(if cli.verbose { "debug" } else { "warn" });

    let options = AnalyzeOptions {
        config: cli.config,
        functions: cli.functions,
        backend: cli.backend,
        json: cli.json,
    };

    match analyze_command(&cli.normal, &cli.obfuscated, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}
