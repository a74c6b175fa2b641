//! Trace store adapters
//!
//! The pipeline reads a capture through [`TraceStore`]: one bulk fetch of
//! every correlated kernel launch and one fetch of the selected memory copies.
//! Grouping by signature happens in memory, not with a query per kernel.

pub mod memory;
pub mod sqlite;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracelens_shared::{KernelEvent, KernelSignature, MemcpyKind, TransferRecord};

pub use memory::InMemoryStore;
pub use sqlite::SqliteTraceStore;

/// One kernel execution joined with the runtime launch call that issued it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelLaunchRow {
    pub signature: KernelSignature,
    pub event: KernelEvent,
}

/// Read-only view of a trace capture
pub trait TraceStore {
    /// Every kernel execution with a correlated runtime launch, in a
    /// deterministic order (kernel start, then correlation id).
    fn kernel_launches(&self) -> Result<Vec<KernelLaunchRow>>;

    /// Memory copies of direction `kind`, ordered by start time
    fn memcpy_transfers(&self, kind: MemcpyKind) -> Result<Vec<TransferRecord>>;
}
