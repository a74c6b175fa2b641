//! Analyze command implementation

use crate::output;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracelens_aggregator::output::{render_report, JsonRenderer, TextRenderer};
use tracelens_aggregator::{analyze, AnalysisConfig, AnalysisReport, Scope, SqliteTraceStore};
use tracelens_shared::MemcpyKind;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Both,
}

impl OutputFormat {
    fn text(self) -> bool {
        matches!(self, OutputFormat::Text | OutputFormat::Both)
    }

    fn json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Trace database (CUPTI SQLite export)
    pub trace: PathBuf,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of dominant kernel signatures to report
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Copy direction to analyze (e.g. dtoh, htod, or a CUPTI code)
    #[arg(long)]
    pub copy_kind: Option<MemcpyKind>,

    /// Also report every kernel signature, not only the dominant ones
    #[arg(long)]
    pub all: bool,

    /// Sections to compute: kernels, transfers or all
    #[arg(long, default_value = "all")]
    pub only: Scope,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Directory for JSON artifacts
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl AnalyzeArgs {
    /// Loaded configuration with command-line overrides applied last
    fn resolve_config(&self) -> Result<AnalysisConfig> {
        let mut cfg = AnalysisConfig::load(self.config.as_deref())
            .context("Failed to load configuration")?;

        if let Some(top_k) = self.top_k {
            cfg.dominance_limit = top_k;
        }
        if let Some(kind) = self.copy_kind {
            cfg.copy_kind = kind;
        }
        if self.all {
            cfg.include_unranked = true;
        }

        cfg.validate()?;
        debug!("Resolved configuration: {:?}", cfg);
        Ok(cfg)
    }
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let cfg = args.resolve_config()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Analyzing {}", args.trace.display()));

    let report = load_report(&args, &cfg);
    spinner.finish_and_clear();
    let report = report?;
    info!("Analysis of {} complete", args.trace.display());

    if args.format.text() {
        let mut renderer = TextRenderer::stdout();
        render_report(&mut renderer, &report)?;
    }

    if args.format.json() {
        std::fs::create_dir_all(&args.out_dir).with_context(|| {
            format!("Failed to create output directory: {}", args.out_dir.display())
        })?;
        info!("Writing JSON artifacts to {}", args.out_dir.display());
        let mut renderer = JsonRenderer::new(&args.out_dir);
        render_report(&mut renderer, &report)?;
        output::success(&format!(
            "Wrote {} artifacts to {}",
            renderer.written().len(),
            args.out_dir.display()
        ));
    }

    output::report_summary(&report);
    Ok(())
}

/// Open the store, run the pipeline, and release the store
fn load_report(args: &AnalyzeArgs, cfg: &AnalysisConfig) -> Result<AnalysisReport> {
    let store = SqliteTraceStore::open(&args.trace)?;
    let report = analyze(&store, cfg, args.only)
        .with_context(|| format!("Failed to analyze {}", args.trace.display()))?;
    Ok(report)
}
