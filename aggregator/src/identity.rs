//! Kernel identity resolution
//!
//! Groups correlated launches by their full signature (name, grid, block).

use crate::storage::KernelLaunchRow;
use std::collections::HashMap;
use tracelens_shared::{KernelEvent, KernelSignature};

/// All launches of one signature, in fetch order
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureGroup {
    pub signature: KernelSignature,

    /// Truncated display label
    pub label: String,

    pub events: Vec<KernelEvent>,
}

/// Group launches by signature.
///
/// Groups come out in order of each signature's first launch, so the result
/// is deterministic for a deterministic fetch order.
pub fn group_launches<I>(rows: I, label_width: usize) -> Vec<SignatureGroup>
where
    I: IntoIterator<Item = KernelLaunchRow>,
{
    let mut index: HashMap<KernelSignature, usize> = HashMap::new();
    let mut groups: Vec<SignatureGroup> = Vec::new();

    for KernelLaunchRow { signature, event } in rows {
        match index.get(&signature) {
            Some(&i) => groups[i].events.push(event),
            None => {
                index.insert(signature.clone(), groups.len());
                groups.push(SignatureGroup {
                    label: signature.label(label_width),
                    signature,
                    events: vec![event],
                });
            }
        }
    }

    groups
}

/// Distinct signatures present in `rows`, in first-launch order
pub fn distinct_signatures(rows: &[KernelLaunchRow]) -> Vec<KernelSignature> {
    let mut seen = std::collections::HashSet::new();
    rows.iter()
        .filter(|row| seen.insert(&row.signature))
        .map(|row| row.signature.clone())
        .collect()
}
