//! Transfer size binning
//!
//! Assigns every copy to one right-closed size bucket and collects per-copy
//! bandwidth in MB/s for each bucket.

use crate::config::SizeBucketConfig;
use serde::{Deserialize, Serialize};
use tracelens_shared::utils::bandwidth_mb_per_s;
use tracelens_shared::TransferRecord;

/// Frequency and bandwidth distribution for one size bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStat {
    pub label: String,

    /// Copies whose size falls in this bucket
    pub count: u64,

    /// One MB/s value per copy with a positive duration, in record order.
    /// `[0.0]` when there is none.
    pub bandwidths: Vec<f64>,
}

/// Result of binning a set of transfers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinnedTransfers {
    /// One entry per bucket, index-aligned with the bucket labels
    pub buckets: Vec<BucketStat>,

    /// Copies counted for frequency but skipped for bandwidth (`end <= start`)
    pub zero_length: usize,
}

/// Bin `records` by size. `factor` converts bytes per native time unit to
/// MB/s. `buckets` must pass [`SizeBucketConfig::validate`].
pub fn bin_transfers(
    records: &[TransferRecord],
    buckets: &SizeBucketConfig,
    factor: f64,
) -> BinnedTransfers {
    let mut stats: Vec<BucketStat> = buckets
        .labels
        .iter()
        .map(|label| BucketStat {
            label: label.clone(),
            count: 0,
            bandwidths: Vec::new(),
        })
        .collect();
    let mut zero_length = 0;

    for record in records {
        let bucket = &mut stats[buckets.bucket_index(record.bytes)];
        bucket.count += 1;
        match bandwidth_mb_per_s(record.bytes, record.duration(), factor) {
            Some(bw) => bucket.bandwidths.push(bw),
            None => zero_length += 1,
        }
    }

    for bucket in &mut stats {
        if bucket.bandwidths.is_empty() {
            bucket.bandwidths.push(0.0);
        }
    }

    BinnedTransfers {
        buckets: stats,
        zero_length,
    }
}
