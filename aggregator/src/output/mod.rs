//! Renderer seam
//!
//! Reports are turned into plain labelled series ([`BarChart`],
//! [`DistributionChart`], [`KernelTable`]) and handed to a [`Renderer`].
//! Renderers only see finished numbers and axis titles.

pub mod json;
pub mod text;

use crate::aggregate::KernelMetric;
use crate::report::{AnalysisReport, KernelReport, TransferReport};
use crate::stats::Summary;
use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use json::JsonRenderer;
pub use text::TextRenderer;

const KERNEL_AXIS: &str = "Kernel Name";

/// One value per label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    /// Artifact name, e.g. `metric_ket_bar`
    pub name: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// One sample set per label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionChart {
    pub name: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub series: Vec<Vec<f64>>,

    /// Min/max/mean/median per series
    pub summaries: Vec<Summary>,
}

/// Full per-signature metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelTable {
    pub name: String,
    pub metrics: Vec<KernelMetric>,
}

pub trait Renderer {
    fn render_bar(&mut self, chart: &BarChart) -> Result<()>;

    fn render_distribution(&mut self, chart: &DistributionChart) -> Result<()>;

    fn render_kernel_table(&mut self, _table: &KernelTable) -> Result<()> {
        Ok(())
    }
}

fn bar(name: &str, x_label: &str, y_label: &str, labels: &[String], values: &[f64]) -> BarChart {
    BarChart {
        name: name.to_string(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        labels: labels.to_vec(),
        values: values.to_vec(),
    }
}

/// Duration, overhead, slack and ratio bar charts
pub fn kernel_charts(report: &KernelReport) -> Vec<BarChart> {
    vec![
        bar(
            "metric_ket_bar",
            KERNEL_AXIS,
            "Kernel Duration (us) - Log Base 10",
            &report.labels,
            &report.durations,
        ),
        bar(
            "metric_klo_bar",
            KERNEL_AXIS,
            "Kernel Launch Overhead (us) - Log Base 10",
            &report.labels,
            &report.overheads,
        ),
        bar(
            "metric_slack_bar",
            KERNEL_AXIS,
            "Slack (us) - Log Base 10",
            &report.labels,
            &report.slacks,
        ),
        bar(
            "metric_ratio",
            KERNEL_AXIS,
            "Ratio of Duration to Launch - Log Base 10",
            &report.labels,
            &report.ratios,
        ),
    ]
}

/// Kernel tables: retained signatures, plus every signature when present
pub fn kernel_tables(report: &KernelReport) -> Vec<KernelTable> {
    let mut tables = vec![KernelTable {
        name: "kernel_metrics".to_string(),
        metrics: report.retained.clone(),
    }];
    if let Some(all) = &report.all {
        tables.push(KernelTable {
            name: "kernel_metrics_all".to_string(),
            metrics: all.clone(),
        });
    }
    tables
}

/// Frequency bar chart and bandwidth distributions for one copy direction
pub fn transfer_charts(report: &TransferReport) -> (BarChart, DistributionChart) {
    let tag = report.kind.short_name();
    let frequency = BarChart {
        name: format!("hist_{tag}"),
        x_label: "Transfer Size Range".to_string(),
        y_label: "Frequency".to_string(),
        labels: report.labels.clone(),
        values: report.frequency.iter().map(|&c| c as f64).collect(),
    };

    let bandwidth = DistributionChart {
        name: format!("hist_{tag}_bw"),
        x_label: "Transfer Size Range (B)".to_string(),
        y_label: "Bandwidth (MB/s)".to_string(),
        labels: report.labels.clone(),
        summaries: report
            .bandwidths
            .iter()
            .map(|series| Summary::of(series).unwrap_or_default())
            .collect(),
        series: report.bandwidths.clone(),
    };

    (frequency, bandwidth)
}

/// Render every section present in `report`
pub fn render_report<R>(renderer: &mut R, report: &AnalysisReport) -> Result<()>
where
    R: Renderer + ?Sized,
{
    if let Some(kernels) = &report.kernels {
        for chart in kernel_charts(kernels) {
            renderer.render_bar(&chart)?;
        }
        for table in kernel_tables(kernels) {
            renderer.render_kernel_table(&table)?;
        }
    }

    if let Some(transfers) = &report.transfers {
        let (frequency, bandwidth) = transfer_charts(transfers);
        renderer.render_bar(&frequency)?;
        renderer.render_distribution(&bandwidth)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::DegenerateCounts;
    use tracelens_shared::MemcpyKind;

    #[derive(Default)]
    struct Recorder {
        bars: Vec<String>,
        distributions: Vec<String>,
        tables: Vec<String>,
    }

    impl Renderer for Recorder {
        fn render_bar(&mut self, chart: &BarChart) -> Result<()> {
            self.bars.push(chart.name.clone());
            Ok(())
        }

        fn render_distribution(&mut self, chart: &DistributionChart) -> Result<()> {
            self.distributions.push(chart.name.clone());
            Ok(())
        }

        fn render_kernel_table(&mut self, table: &KernelTable) -> Result<()> {
            self.tables.push(table.name.clone());
            Ok(())
        }
    }

    fn kernel_report() -> KernelReport {
        KernelReport {
            labels: vec!["a".into(), "b".into()],
            durations: vec![1.0, 2.0],
            overheads: vec![0.5, 0.0],
            slacks: vec![0.1, 0.2],
            ratios: vec![0.5, 0.0],
            retained: Vec::new(),
            all: None,
            total_signatures: 2,
            total_launches: 2,
            degenerate: DegenerateCounts::default(),
        }
    }

    fn transfer_report() -> TransferReport {
        TransferReport {
            kind: MemcpyKind::DeviceToHost,
            labels: vec!["4KB".into(), "4KB+".into()],
            frequency: vec![3, 0],
            bandwidths: vec![vec![1.0, 2.0, 6.0], vec![0.0]],
            total_transfers: 3,
            degenerate: DegenerateCounts::default(),
        }
    }

    #[test]
    fn test_kernel_charts_names_and_alignment() {
        let charts = kernel_charts(&kernel_report());
        let names: Vec<_> = charts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["metric_ket_bar", "metric_klo_bar", "metric_slack_bar", "metric_ratio"]
        );
        assert!(charts.iter().all(|c| c.labels.len() == c.values.len()));
        assert_eq!(charts[1].values, vec![0.5, 0.0]);
    }

    #[test]
    fn test_transfer_charts() {
        let (frequency, bandwidth) = transfer_charts(&transfer_report());
        assert_eq!(frequency.name, "hist_DtoH");
        assert_eq!(frequency.values, vec![3.0, 0.0]);
        assert_eq!(bandwidth.name, "hist_DtoH_bw");
        assert_eq!(bandwidth.summaries[0].max, 6.0);
        assert_eq!(bandwidth.summaries[0].median, 2.0);
        assert_eq!(bandwidth.summaries[1].mean, 0.0);
    }

    #[test]
    fn test_render_report_visits_every_section() {
        let mut report_kernels = kernel_report();
        report_kernels.all = Some(Vec::new());
        let report = AnalysisReport {
            kernels: Some(report_kernels),
            transfers: Some(transfer_report()),
        };

        let mut recorder = Recorder::default();
        render_report(&mut recorder, &report).unwrap();
        assert_eq!(recorder.bars.len(), 5);
        assert_eq!(recorder.distributions, vec!["hist_DtoH_bw"]);
        assert_eq!(recorder.tables, vec!["kernel_metrics", "kernel_metrics_all"]);
    }

    #[test]
    fn test_render_report_kernels_only() {
        let report = AnalysisReport {
            kernels: Some(kernel_report()),
            transfers: None,
        };
        let mut recorder = Recorder::default();
        render_report(&mut recorder, &report).unwrap();
        assert_eq!(recorder.bars.len(), 4);
        assert!(recorder.distributions.is_empty());
    }
}
