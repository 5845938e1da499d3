use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use ir_dataflow::driver::{self, AnalysisKind};

/// Run an intraprocedural dataflow analysis over a small register-based IR.
#[derive(Debug, Parser)]
#[command(name = "ir-dataflow", version, about)]
struct Cli {
    /// Path to a textual IR file (see `ir_text` for the accepted syntax).
    ir_file: PathBuf,

    /// Which analysis to run.
    #[arg(short, long, value_enum, default_value_t = Analysis::Init)]
    analysis: Analysis,

    /// Print trace-level log output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Analysis {
    Init,
    Taint,
    Interval,
    IntervalNarrow,
}

impl From<Analysis> for AnalysisKind {
    fn from(a: Analysis) -> Self {
        match a {
            Analysis::Init => AnalysisKind::InitializedVars,
            Analysis::Taint => AnalysisKind::Taint,
            Analysis::Interval => AnalysisKind::Interval { narrow: false },
            Analysis::IntervalNarrow => AnalysisKind::Interval { narrow: true },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match driver::run(&cli.ir_file, cli.analysis.into()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
