//! CLI for tracelens
//!
//! Analyzes one GPU trace capture (a CUPTI SQLite export) and reports:
//! - per-kernel duration, launch overhead, slack and their ratio
//! - transfer-size frequency and bandwidth for one copy direction

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "tracelens")]
#[command(about = "tracelens - GPU kernel and memcpy trace analyzer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    analyze: commands::analyze::AnalyzeArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.analyze.verbose);
    commands::analyze::run(cli.analyze)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_trace_path_is_required() {
        assert!(Cli::try_parse_from(["tracelens"]).is_err());
        assert!(Cli::try_parse_from(["tracelens", "a.sqlite", "b.sqlite"]).is_err());
        assert!(Cli::try_parse_from(["tracelens", "a.sqlite"]).is_ok());
    }
}
