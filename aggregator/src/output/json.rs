//! JSON output
//!
//! Writes each chart or table as `<name>.json` in an output directory, for
//! plotting with external tools.

use super::{BarChart, DistributionChart, KernelTable, Renderer};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Serialize)]
struct Artifact<'a, T: Serialize> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    body: &'a T,
}

/// Writes one JSON file per artifact into `out_dir`
#[derive(Debug, Clone)]
pub struct JsonRenderer {
    out_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl JsonRenderer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            written: Vec::new(),
        }
    }

    /// Paths written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write<T: Serialize>(&mut self, name: &str, body: &T) -> Result<()> {
        let path = self.out_dir.join(format!("{name}.json"));
        write_json(&path, body)?;
        self.written.push(path);
        Ok(())
    }
}

fn write_json<T: Serialize>(path: &Path, body: &T) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    let artifact = Artifact {
        generated_at: Utc::now(),
        body,
    };
    serde_json::to_writer_pretty(writer, &artifact)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;

    info!("JSON output written to {}", path.display());
    Ok(())
}

impl Renderer for JsonRenderer {
    fn render_bar(&mut self, chart: &BarChart) -> Result<()> {
        self.write(&chart.name, chart)
    }

    fn render_distribution(&mut self, chart: &DistributionChart) -> Result<()> {
        self.write(&chart.name, chart)
    }

    fn render_kernel_table(&mut self, table: &KernelTable) -> Result<()> {
        self.write(&table.name, table)
    }
}
