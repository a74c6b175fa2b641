//! Pipeline driver
//!
//! Kernels: fetch launches, group by signature, aggregate, rank, derive
//! ratios. Transfers: fetch copies of the configured direction and bin them.
//! Both are single synchronous passes over one bulk fetch each.

use crate::aggregate::aggregate_kernels;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::identity::group_launches;
use crate::rank::retain_dominant;
use crate::ratio::duration_overhead_ratio;
use crate::report::{AnalysisReport, DegenerateCounts, KernelReport, TransferReport};
use crate::storage::TraceStore;
use crate::transfer::bin_transfers;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Which sections of the report to compute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Kernels,
    Transfers,
    #[default]
    All,
}

impl Scope {
    pub fn kernels(self) -> bool {
        matches!(self, Scope::Kernels | Scope::All)
    }

    pub fn transfers(self) -> bool {
        matches!(self, Scope::Transfers | Scope::All)
    }
}

impl std::str::FromStr for Scope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kernels" => Ok(Scope::Kernels),
            "transfers" => Ok(Scope::Transfers),
            "all" => Ok(Scope::All),
            _ => anyhow::bail!("Invalid scope: {}", s),
        }
    }
}

/// Per-kernel metrics for the dominant signatures. Fails with
/// [`crate::AnalysisError::InvalidConfig`] before touching the store when `cfg`
/// does not validate.
pub fn analyze_kernels<S>(store: &S, cfg: &AnalysisConfig) -> Result<KernelReport>
where
    S: TraceStore + ?Sized,
{
    cfg.validate()?;
    let rows = store.kernel_launches()?;
    let total_launches = rows.len();

    let groups = group_launches(rows, cfg.label_width);
    info!(
        "Resolved {} kernel signatures from {} launches",
        groups.len(),
        total_launches
    );

    let all = aggregate_kernels(&groups, cfg);
    let retained = retain_dominant(&all, cfg.dominance_limit);
    if retained.len() < all.len() {
        info!(
            "Keeping the {} most dominant of {} signatures",
            retained.len(),
            all.len()
        );
    }

    let mut degenerate = DegenerateCounts::default();
    let mut labels = Vec::with_capacity(retained.len());
    let mut durations = Vec::with_capacity(retained.len());
    let mut overheads = Vec::with_capacity(retained.len());
    let mut slacks = Vec::with_capacity(retained.len());
    let mut ratios = Vec::with_capacity(retained.len());

    for metric in &retained {
        labels.push(metric.label.clone());
        durations.push(metric.median_log_duration);
        overheads.push(metric.median_log_overhead);
        slacks.push(metric.median_log_slack);
        ratios.push(duration_overhead_ratio(metric).unwrap_or_else(|| {
            degenerate.undefined_ratios += 1;
            0.0
        }));

        degenerate.zero_duration_medians += usize::from(metric.zero_medians.duration);
        degenerate.zero_overhead_medians += usize::from(metric.zero_medians.overhead);
        degenerate.zero_slack_medians += usize::from(metric.zero_medians.slack);
    }

    if degenerate.total() > 0 {
        debug!("Absorbed degenerate kernel values: {:?}", degenerate);
    }

    Ok(KernelReport {
        labels,
        durations,
        overheads,
        slacks,
        ratios,
        retained,
        total_signatures: all.len(),
        all: cfg.include_unranked.then_some(all),
        total_launches,
        degenerate,
    })
}

/// Size-bucket frequency and bandwidth for the configured copy direction
pub fn analyze_transfers<S>(store: &S, cfg: &AnalysisConfig) -> Result<TransferReport>
where
    S: TraceStore + ?Sized,
{
    cfg.validate()?;
    let records = store.memcpy_transfers(cfg.copy_kind)?;
    info!("Binning {} {} transfers", records.len(), cfg.copy_kind);

    let binned = bin_transfers(&records, &cfg.buckets, cfg.bandwidth_factor);
    let degenerate = DegenerateCounts {
        zero_length_transfers: binned.zero_length,
        ..Default::default()
    };
    if binned.zero_length > 0 {
        debug!("Skipped bandwidth for {} zero-length transfers", binned.zero_length);
    }

    let (mut labels, mut frequency, mut bandwidths) = (Vec::new(), Vec::new(), Vec::new());
    for bucket in binned.buckets {
        labels.push(bucket.label);
        frequency.push(bucket.count);
        bandwidths.push(bucket.bandwidths);
    }

    Ok(TransferReport {
        kind: cfg.copy_kind,
        labels,
        frequency,
        bandwidths,
        total_transfers: records.len(),
        degenerate,
    })
}

/// Run the sections selected by `scope`
pub fn analyze<S>(store: &S, cfg: &AnalysisConfig, scope: Scope) -> Result<AnalysisReport>
where
    S: TraceStore + ?Sized,
{
    let kernels = scope
        .kernels()
        .then(|| analyze_kernels(store, cfg))
        .transpose()?;
    let transfers = scope
        .transfers()
        .then(|| analyze_transfers(store, cfg))
        .transpose()?;

    Ok(AnalysisReport { kernels, transfers })
}
