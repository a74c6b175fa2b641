//! Text output
//!
//! Aligned terminal tables with a proportional `#` bar per row.

use super::{BarChart, DistributionChart, KernelTable, Renderer};
use anyhow::Result;
use colored::Colorize;
use std::io::{self, Stdout, Write};

const BAR_WIDTH: usize = 40;
const LABEL_WIDTH: usize = 24;

pub struct TextRenderer<W: Write> {
    writer: W,
}

impl TextRenderer<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn title(&mut self, name: &str, x_label: &str, y_label: &str) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", name.bold())?;
        writeln!(self.writer, "{} vs {}", y_label, x_label)?;
        Ok(())
    }
}

/// `#` run proportional to `|value| / max_abs`
fn scaled_bar(value: f64, max_abs: f64) -> String {
    if max_abs <= 0.0 || !value.is_finite() {
        return String::new();
    }
    let len = ((value.abs() / max_abs) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len.min(BAR_WIDTH))
}

fn max_abs(values: &[f64]) -> f64 {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render_bar(&mut self, chart: &BarChart) -> Result<()> {
        self.title(&chart.name, &chart.x_label, &chart.y_label)?;
        writeln!(self.writer, "{:-<80}", "")?;

        let max = max_abs(&chart.values);
        for (label, &value) in chart.labels.iter().zip(&chart.values) {
            writeln!(
                self.writer,
                "{:<LABEL_WIDTH$} {:>12.3} {}",
                label,
                value,
                scaled_bar(value, max)
            )?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn render_distribution(&mut self, chart: &DistributionChart) -> Result<()> {
        self.title(&chart.name, &chart.x_label, &chart.y_label)?;
        writeln!(
            self.writer,
            "{:<LABEL_WIDTH$} {:>8} {:>14} {:>14} {:>14} {:>14}",
            "Range", "Samples", "Min", "Median", "Mean", "Max"
        )?;
        writeln!(self.writer, "{:-<94}", "")?;

        for ((label, series), summary) in chart
            .labels
            .iter()
            .zip(&chart.series)
            .zip(&chart.summaries)
        {
            writeln!(
                self.writer,
                "{:<LABEL_WIDTH$} {:>8} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
                label,
                series.len(),
                summary.min,
                summary.median,
                summary.mean,
                summary.max
            )?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn render_kernel_table(&mut self, table: &KernelTable) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", table.name.bold())?;
        writeln!(
            self.writer,
            "{:<40} {:>9} {:>12} {:>12} {:>12} {:>14}",
            "Kernel", "Launches", "Dur(us)", "Ovh(us)", "Slack(us)", "Dominance"
        )?;
        writeln!(self.writer, "{:-<104}", "")?;

        for m in &table.metrics {
            writeln!(
                self.writer,
                "{:<40} {:>9} {:>12.3} {:>12.3} {:>12.3} {:>14.1}",
                m.signature.to_string(),
                m.launches,
                m.median_duration_us,
                m.median_overhead_us,
                m.median_slack_us,
                m.dominance_score
            )?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
