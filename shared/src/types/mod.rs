//! Trace record types

pub mod events;
pub mod signature;
