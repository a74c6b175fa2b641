//! Dominance ranking
//!
//! Chooses which kernel signatures are reported. Ranking decides membership
//! only; the retained signatures keep their input order.

use crate::aggregate::KernelMetric;

/// Indices of the `limit` highest dominance scores, in ascending index order.
///
/// Ties go to the earlier index. With `limit >= metrics.len()` every index
/// is returned.
pub fn dominant_indices(metrics: &[KernelMetric], limit: usize) -> Vec<usize> {
    if metrics.len() <= limit {
        return (0..metrics.len()).collect();
    }

    let mut order: Vec<usize> = (0..metrics.len()).collect();
    // Stable sort keeps index order among equal scores
    order.sort_by(|&a, &b| {
        metrics[b]
            .dominance_score
            .total_cmp(&metrics[a].dominance_score)
    });
    order.truncate(limit);
    order.sort_unstable();
    order
}

/// Keep the `limit` most dominant metrics, in input order
pub fn retain_dominant(metrics: &[KernelMetric], limit: usize) -> Vec<KernelMetric> {
    dominant_indices(metrics, limit)
        .into_iter()
        .map(|i| metrics[i].clone())
        .collect()
}
