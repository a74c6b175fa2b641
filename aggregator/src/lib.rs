//! Trace analysis library
//!
//! Reads kernel launches and memory copies from a trace store and reduces
//! them to report series:
//!
//! - per kernel signature: median execution duration, launch overhead and
//!   launch slack (log10 microseconds), plus the duration-to-overhead ratio,
//!   for the most dominant signatures
//! - per transfer size bucket: copy frequency and per-copy bandwidth
//!
//! Reports are rendered through [`output::Renderer`].

pub mod aggregate;
pub mod config;
pub mod error;
pub mod identity;
pub mod output;
pub mod pipeline;
pub mod rank;
pub mod ratio;
pub mod report;
pub mod stats;
pub mod storage;
pub mod transfer;

pub use config::{AnalysisConfig, SizeBucketConfig};
pub use error::{AnalysisError, Result};
pub use pipeline::{analyze, analyze_kernels, analyze_transfers, Scope};
pub use report::{AnalysisReport, DegenerateCounts, KernelReport, TransferReport};
pub use storage::{InMemoryStore, SqliteTraceStore, TraceStore};
