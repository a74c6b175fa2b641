//! In-memory trace store

use super::{KernelLaunchRow, TraceStore};
use crate::error::Result;
use tracelens_shared::{KernelEvent, KernelSignature, MemcpyKind, TransferRecord};

/// Trace store backed by vectors. Launch order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    launches: Vec<KernelLaunchRow>,
    transfers: Vec<(MemcpyKind, TransferRecord)>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a correlated kernel launch
    pub fn push_launch(&mut self, signature: KernelSignature, event: KernelEvent) {
        self.launches.push(KernelLaunchRow { signature, event });
    }

    /// Append a memory copy
    pub fn push_transfer(&mut self, kind: MemcpyKind, record: TransferRecord) {
        self.transfers.push((kind, record));
    }
}

impl TraceStore for InMemoryStore {
    fn kernel_launches(&self) -> Result<Vec<KernelLaunchRow>> {
        Ok(self.launches.clone())
    }

    fn memcpy_transfers(&self, kind: MemcpyKind) -> Result<Vec<TransferRecord>> {
        Ok(self
            .transfers
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, record)| *record)
            .collect())
    }
}
