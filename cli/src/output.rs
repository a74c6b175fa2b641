//! Status lines printed after a run

use colored::Colorize;
use tracelens_aggregator::{AnalysisReport, DegenerateCounts};

/// Print success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print warning message
pub fn warning(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Totals and absorbed degenerate values for a finished report
pub fn report_summary(report: &AnalysisReport) {
    if let Some(kernels) = &report.kernels {
        info(&format!(
            "{} launches across {} kernel signatures, {} reported",
            kernels.total_launches,
            kernels.total_signatures,
            kernels.labels.len()
        ));
    }
    if let Some(transfers) = &report.transfers {
        info(&format!(
            "{} {} transfers in {} size buckets",
            transfers.total_transfers,
            transfers.kind,
            transfers.labels.len()
        ));
    }

    for line in degenerate_lines(&report.degenerate()) {
        warning(&line);
    }
}

fn degenerate_lines(counts: &DegenerateCounts) -> Vec<String> {
    [
        (counts.zero_duration_medians, "kernels with no positive duration"),
        (counts.zero_overhead_medians, "kernels with no positive launch overhead"),
        (counts.zero_slack_medians, "kernels with no positive slack"),
        (counts.undefined_ratios, "ratios undefined, reported as 0"),
        (counts.zero_length_transfers, "zero-length transfers without bandwidth"),
    ]
    .into_iter()
    .filter(|(n, _)| *n > 0)
    .map(|(n, what)| format!("{n} {what}"))
    .collect()
}
