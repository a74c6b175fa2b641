//! Duration-to-overhead ratio

use crate::aggregate::KernelMetric;

/// Orders of magnitude by which execution exceeds launch overhead:
/// `log10(duration / overhead)`.
///
/// `None` unless both underlying medians are strictly positive. A zero
/// duration median is the synthetic sentinel, not a measurement, so a ratio
/// against it would be meaningless.
pub fn duration_overhead_ratio(metric: &KernelMetric) -> Option<f64> {
    if metric.median_duration_us > 0.0 && metric.median_overhead_us > 0.0 {
        Some(metric.median_log_duration - metric.median_log_overhead)
    } else {
        None
    }
}
