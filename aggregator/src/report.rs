//! Report types handed to renderers

use crate::aggregate::KernelMetric;
use crate::transfer::BucketStat;
use serde::{Deserialize, Serialize};
use tracelens_shared::MemcpyKind;

/// Degenerate inputs absorbed as zero values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegenerateCounts {
    pub zero_duration_medians: usize,
    pub zero_overhead_medians: usize,
    pub zero_slack_medians: usize,
    pub undefined_ratios: usize,
    pub zero_length_transfers: usize,
}

impl DegenerateCounts {
    pub fn total(&self) -> usize {
        self.zero_duration_medians
            + self.zero_overhead_medians
            + self.zero_slack_medians
            + self.undefined_ratios
            + self.zero_length_transfers
    }

    pub fn merge(&mut self, other: &DegenerateCounts) {
        self.zero_duration_medians += other.zero_duration_medians;
        self.zero_overhead_medians += other.zero_overhead_medians;
        self.zero_slack_medians += other.zero_slack_medians;
        self.undefined_ratios += other.undefined_ratios;
        self.zero_length_transfers += other.zero_length_transfers;
    }
}

/// Per-kernel series for the retained (dominant) signatures.
///
/// `labels`, `durations`, `overheads`, `slacks` and `ratios` are parallel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelReport {
    pub labels: Vec<String>,

    /// Median execution duration, log10(us)
    pub durations: Vec<f64>,

    /// Median launch overhead, log10(us)
    pub overheads: Vec<f64>,

    /// Median launch slack, log10(us)
    pub slacks: Vec<f64>,

    /// Duration-to-overhead ratio, log10
    pub ratios: Vec<f64>,

    /// Retained metrics, same order as the series
    pub retained: Vec<KernelMetric>,

    /// Every signature, when requested
    pub all: Option<Vec<KernelMetric>>,

    pub total_signatures: usize,
    pub total_launches: usize,
    pub degenerate: DegenerateCounts,
}

/// Per-bucket series for one copy direction.
///
/// `labels`, `frequency` and `bandwidths` are index-aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferReport {
    pub kind: MemcpyKind,
    pub labels: Vec<String>,
    pub frequency: Vec<u64>,

    /// MB/s per copy, per bucket; never empty
    pub bandwidths: Vec<Vec<f64>>,

    pub total_transfers: usize,
    pub degenerate: DegenerateCounts,
}

impl TransferReport {
    /// Rebuild the per-bucket stats
    pub fn buckets(&self) -> Vec<BucketStat> {
        self.labels
            .iter()
            .zip(&self.frequency)
            .zip(&self.bandwidths)
            .map(|((label, &count), bandwidths)| BucketStat {
                label: label.clone(),
                count,
                bandwidths: bandwidths.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub kernels: Option<KernelReport>,
    pub transfers: Option<TransferReport>,
}

impl AnalysisReport {
    /// Degenerate counts across both sections
    pub fn degenerate(&self) -> DegenerateCounts {
        let mut total = DegenerateCounts::default();
        if let Some(k) = &self.kernels {
            total.merge(&k.degenerate);
        }
        if let Some(t) = &self.transfers {
            total.merge(&t.degenerate);
        }
        total
    }
}
