//! Analysis configuration
//!
//! Defaults match the stock report layout: top 50 kernels, 9-character
//! labels, ten transfer-size buckets from 4KB to 1MB+, device-to-host copies.
//! Values can be layered from a config file and `TRACELENS_*` environment
//! variables.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracelens_shared::utils::{BYTES_PER_NS_TO_MB_PER_S, NANOS_PER_MICRO};
use tracelens_shared::MemcpyKind;

/// Prefix for environment overrides, e.g. `TRACELENS_DOMINANCE_LIMIT=20`
pub const ENV_PREFIX: &str = "TRACELENS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Max kernel signatures kept after dominance ranking
    pub dominance_limit: usize,

    /// Display label length in characters
    pub label_width: usize,

    /// Divisor from the trace's native time unit to microseconds
    pub time_divisor: f64,

    /// Tukey fence multiplier for outlier rejection
    pub iqr_multiplier: f64,

    /// Bytes-per-native-unit to MB/s factor
    pub bandwidth_factor: f64,

    /// Copy direction selected from the memcpy table
    pub copy_kind: MemcpyKind,

    /// Transfer size buckets
    pub buckets: SizeBucketConfig,

    /// Also report every signature, not just the ranked subset
    pub include_unranked: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dominance_limit: 50,
            label_width: 9,
            time_divisor: NANOS_PER_MICRO,
            iqr_multiplier: 1.5,
            bandwidth_factor: BYTES_PER_NS_TO_MB_PER_S,
            copy_kind: MemcpyKind::DeviceToHost,
            buckets: SizeBucketConfig::default(),
            include_unranked: false,
        }
    }
}

impl AnalysisConfig {
    /// Load defaults, then an optional config file, then environment
    /// overrides, and validate the result.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`AnalysisConfig::load`], reading `TRACELENS_*` overrides from
    /// `env` instead of the process environment when given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let cfg: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.dominance_limit == 0 {
            return Err(invalid("dominance_limit must be greater than 0"));
        }

        if self.label_width == 0 {
            return Err(invalid("label_width must be greater than 0"));
        }

        if !(self.time_divisor.is_finite() && self.time_divisor > 0.0) {
            return Err(invalid("time_divisor must be a positive number"));
        }

        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier >= 0.0) {
            return Err(invalid("iqr_multiplier must be a non-negative number"));
        }

        if !(self.bandwidth_factor.is_finite() && self.bandwidth_factor > 0.0) {
            return Err(invalid("bandwidth_factor must be a positive number"));
        }

        self.buckets.validate()
    }
}

/// Right-closed byte-size buckets.
///
/// Bucket `i` holds sizes in `(upper_bounds[i-1], upper_bounds[i]]`; the
/// first bucket starts at zero and the last is open-ended, so there is
/// always one more label than bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeBucketConfig {
    pub upper_bounds: Vec<u64>,
    pub labels: Vec<String>,
}

impl Default for SizeBucketConfig {
    fn default() -> Self {
        Self {
            upper_bounds: (12..=20).map(|shift| 1u64 << shift).collect(),
            labels: [
                "4KB", "8KB", "16KB", "32KB", "64KB", "128KB", "256KB", "512KB", "1MB", "1MB+",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl SizeBucketConfig {
    /// Number of buckets
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Index of the bucket that claims `bytes`
    pub fn bucket_index(&self, bytes: u64) -> usize {
        self.upper_bounds.partition_point(|&bound| bound < bytes)
    }

    pub fn validate(&self) -> Result<()> {
        if self.labels.len() != self.upper_bounds.len() + 1 {
            return Err(invalid(format!(
                "expected {} bucket labels for {} bounds, got {}",
                self.upper_bounds.len() + 1,
                self.upper_bounds.len(),
                self.labels.len()
            )));
        }

        if self.upper_bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid("bucket bounds must be strictly increasing"));
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> AnalysisError {
    AnalysisError::InvalidConfig(msg.into())
}
