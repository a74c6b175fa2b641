//! Per-kernel metric aggregation
//!
//! Reduces every launch of a signature to one representative value per
//! metric:
//!
//! - **ket** (execution duration): positive samples, median, log10
//! - **klo** (launch overhead): positive samples, Tukey outlier rejection,
//!   median, log10
//! - **slack** (launch end to execution start): same as klo
//!
//! All values are microseconds before scaling. A median that is not strictly
//! positive (the synthetic zero of an empty sample set) is reported as `0.0`
//! in log space for every metric, and flagged in [`ZeroMedians`].

use crate::config::AnalysisConfig;
use crate::identity::SignatureGroup;
use crate::stats::{log10_positive, median, positive_samples, remove_outliers};
use serde::{Deserialize, Serialize};
use tracelens_shared::{KernelEvent, KernelSignature};

/// Metrics whose median was not strictly positive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZeroMedians {
    pub duration: bool,
    pub overhead: bool,
    pub slack: bool,
}

/// Aggregated metrics for one kernel signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelMetric {
    pub signature: KernelSignature,

    /// Display label (not unique)
    pub label: String,

    /// Launches observed for this signature
    pub launches: usize,

    /// Valid execution-duration samples (1 when only the synthetic zero remains)
    pub duration_samples: usize,

    pub median_duration_us: f64,
    pub median_overhead_us: f64,
    pub median_slack_us: f64,

    pub median_log_duration: f64,
    pub median_log_overhead: f64,
    pub median_log_slack: f64,

    /// `duration_samples * median_duration_us`; ranking only
    pub dominance_score: f64,

    pub zero_medians: ZeroMedians,
}

/// Median of the positive samples, with optional outlier rejection.
fn reduce<I>(raw: I, cfg: &AnalysisConfig, reject_outliers: bool) -> (f64, usize)
where
    I: IntoIterator<Item = i64>,
{
    let (samples, _) = positive_samples(raw, cfg.time_divisor);
    let count = samples.len();
    let kept = if reject_outliers {
        remove_outliers(&samples, cfg.iqr_multiplier)
    } else {
        samples
    };
    (median(&kept).unwrap_or(0.0), count)
}

fn log_or_zero(value: f64, zero: &mut bool) -> f64 {
    match log10_positive(value) {
        Some(log) => log,
        None => {
            *zero = true;
            0.0
        }
    }
}

/// Aggregate the launches of one signature
pub fn aggregate_kernel(
    signature: &KernelSignature,
    label: &str,
    events: &[KernelEvent],
    cfg: &AnalysisConfig,
) -> KernelMetric {
    let (median_duration_us, duration_samples) = reduce(
        events.iter().map(KernelEvent::execution_duration),
        cfg,
        false,
    );
    let (median_overhead_us, _) = reduce(events.iter().map(KernelEvent::launch_overhead), cfg, true);
    let (median_slack_us, _) = reduce(events.iter().map(KernelEvent::launch_slack), cfg, true);

    let mut zero_medians = ZeroMedians::default();
    let median_log_duration = log_or_zero(median_duration_us, &mut zero_medians.duration);
    let median_log_overhead = log_or_zero(median_overhead_us, &mut zero_medians.overhead);
    let median_log_slack = log_or_zero(median_slack_us, &mut zero_medians.slack);

    KernelMetric {
        signature: signature.clone(),
        label: label.to_string(),
        launches: events.len(),
        duration_samples,
        median_duration_us,
        median_overhead_us,
        median_slack_us,
        median_log_duration,
        median_log_overhead,
        median_log_slack,
        dominance_score: duration_samples as f64 * median_duration_us,
        zero_medians,
    }
}

/// Aggregate every signature group, preserving group order
pub fn aggregate_kernels(groups: &[SignatureGroup], cfg: &AnalysisConfig) -> Vec<KernelMetric> {
    groups
        .iter()
        .map(|g| aggregate_kernel(&g.signature, &g.label, &g.events, cfg))
        .collect()
}
