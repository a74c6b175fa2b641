//! Event type definitions for trace records
//!
//! These types represent the raw rows read out of a trace capture: one
//! kernel launch correlated with its host-side runtime call, and one memory
//! copy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Timestamp in the trace's native unit (nanoseconds)
pub type Timestamp = i64;

/// One observed launch of a kernel signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelEvent {
    /// Host-side runtime launch call start
    pub runtime_start: Timestamp,

    /// Host-side runtime launch call end
    pub runtime_end: Timestamp,

    /// On-device execution start
    pub kernel_start: Timestamp,

    /// On-device execution end
    pub kernel_end: Timestamp,
}

impl KernelEvent {
    /// Kernel execution time (ket), in native units
    pub fn execution_duration(&self) -> i64 {
        self.kernel_end.saturating_sub(self.kernel_start)
    }

    /// Kernel launch overhead (klo), in native units
    pub fn launch_overhead(&self) -> i64 {
        self.runtime_end.saturating_sub(self.runtime_start)
    }

    /// Gap between the end of the launch call and the start of execution.
    /// Negative when the kernel started before the launch call returned.
    pub fn launch_slack(&self) -> i64 {
        self.kernel_start.saturating_sub(self.runtime_end)
    }
}

/// One memory copy of the direction selected by the store query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Bytes moved
    pub bytes: u64,

    pub start: Timestamp,

    pub end: Timestamp,
}

impl TransferRecord {
    pub fn duration(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemcpyKindError {
    #[error("unknown memcpy kind: {0}")]
    Unknown(String),

    #[error("unknown memcpy kind code: {0}")]
    UnknownCode(i64),
}

/// Copy direction, as encoded in the `copyKind` column of a CUPTI capture.
///
/// Deserializes from a name (`"dtoh"`, `"device_to_host"`) or a numeric
/// code, the same inputs [`FromStr`] accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "MemcpyKindRepr")]
pub enum MemcpyKind {
    HostToDevice,
    #[default]
    DeviceToHost,
    DeviceToDevice,
    HostToHost,
    PeerToPeer,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MemcpyKindRepr {
    Code(i64),
    Name(String),
}

impl TryFrom<MemcpyKindRepr> for MemcpyKind {
    type Error = MemcpyKindError;

    fn try_from(repr: MemcpyKindRepr) -> Result<Self, Self::Error> {
        match repr {
            MemcpyKindRepr::Code(code) => Self::try_from(code),
            MemcpyKindRepr::Name(name) => name.parse(),
        }
    }
}

impl MemcpyKind {
    /// CUPTI `copyKind` code
    pub fn code(self) -> i64 {
        match self {
            Self::HostToDevice => 1,
            Self::DeviceToHost => 2,
            Self::DeviceToDevice => 8,
            Self::HostToHost => 9,
            Self::PeerToPeer => 10,
        }
    }

    /// Short tag used in artifact names, e.g. `DtoH`
    pub fn short_name(self) -> &'static str {
        match self {
            Self::HostToDevice => "HtoD",
            Self::DeviceToHost => "DtoH",
            Self::DeviceToDevice => "DtoD",
            Self::HostToHost => "HtoH",
            Self::PeerToPeer => "PtoP",
        }
    }
}

impl TryFrom<i64> for MemcpyKind {
    type Error = MemcpyKindError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::HostToDevice),
            2 => Ok(Self::DeviceToHost),
            8 => Ok(Self::DeviceToDevice),
            9 => Ok(Self::HostToHost),
            10 => Ok(Self::PeerToPeer),
            other => Err(MemcpyKindError::UnknownCode(other)),
        }
    }
}

impl FromStr for MemcpyKind {
    type Err = MemcpyKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "htod" | "host_to_device" => Ok(Self::HostToDevice),
            "dtoh" | "device_to_host" => Ok(Self::DeviceToHost),
            "dtod" | "device_to_device" => Ok(Self::DeviceToDevice),
            "htoh" | "host_to_host" => Ok(Self::HostToHost),
            "ptop" | "peer_to_peer" => Ok(Self::PeerToPeer),
            other => match other.parse::<i64>() {
                Ok(code) => Self::try_from(code),
                Err(_) => Err(MemcpyKindError::Unknown(s.to_string())),
            },
        }
    }
}

impl fmt::Display for MemcpyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> KernelEvent {
        KernelEvent {
            runtime_start: 1_000,
            runtime_end: 6_000,
            kernel_start: 9_000,
            kernel_end: 29_000,
        }
    }

    #[test]
    fn test_derived_quantities() {
        let ev = event();
        assert_eq!(ev.execution_duration(), 20_000);
        assert_eq!(ev.launch_overhead(), 5_000);
        assert_eq!(ev.launch_slack(), 3_000);
    }

    #[test]
    fn test_negative_slack() {
        let ev = KernelEvent {
            kernel_start: 5_000,
            ..event()
        };
        assert_eq!(ev.launch_slack(), -1_000);
    }

    #[test]
    fn test_transfer_duration() {
        let rec = TransferRecord { bytes: 4096, start: 100, end: 350 };
        assert_eq!(rec.duration(), 250);
    }

    #[test]
    fn test_memcpy_kind_codes() {
        assert_eq!(MemcpyKind::DeviceToHost.code(), 2);
        assert_eq!(MemcpyKind::try_from(1), Ok(MemcpyKind::HostToDevice));
        assert_eq!(
            MemcpyKind::try_from(42),
            Err(MemcpyKindError::UnknownCode(42))
        );
    }

    #[test]
    fn test_memcpy_kind_from_str() {
        assert_eq!("DtoH".parse::<MemcpyKind>(), Ok(MemcpyKind::DeviceToHost));
        assert_eq!("host_to_device".parse::<MemcpyKind>(), Ok(MemcpyKind::HostToDevice));
        assert_eq!("8".parse::<MemcpyKind>(), Ok(MemcpyKind::DeviceToDevice));
        assert!("sideways".parse::<MemcpyKind>().is_err());
    }

    #[test]
    fn test_memcpy_kind_serde_alias() {
        let kind: MemcpyKind = serde_json::from_str("\"dtoh\"").unwrap();
        assert_eq!(kind, MemcpyKind::DeviceToHost);
        let json = serde_json::to_string(&MemcpyKind::HostToDevice).unwrap();
        assert_eq!(json, "\"host_to_device\"");
    }

    #[test]
    fn test_memcpy_kind_deserializes_codes() {
        let kind: MemcpyKind = serde_json::from_str("1").unwrap();
        assert_eq!(kind, MemcpyKind::HostToDevice);
        let kind: MemcpyKind = serde_json::from_str("\"10\"").unwrap();
        assert_eq!(kind, MemcpyKind::PeerToPeer);
        assert!(serde_json::from_str::<MemcpyKind>("3").is_err());
        assert!(serde_json::from_str::<MemcpyKind>("\"sideways\"").is_err());
    }

    #[test]
    fn test_memcpy_kind_default() {
        assert_eq!(MemcpyKind::default(), MemcpyKind::DeviceToHost);
    }
}
