//! Unit conversion helpers

/// Native trace time unit (ns) per microsecond
pub const NANOS_PER_MICRO: f64 = 1000.0;

/// Converts bytes per nanosecond into MB/s (MiB/s): `1e9 / 2^20`.
///
/// The trace stores copy start/end in nanoseconds, so
/// `bytes * 953.674 / (end - start)` is the bandwidth in MB/s.
pub const BYTES_PER_NS_TO_MB_PER_S: f64 = 953.674;

/// Convert a native-unit interval to microseconds
pub fn ns_to_us(ns: i64) -> f64 {
    ns as f64 / NANOS_PER_MICRO
}

/// Bandwidth in MB/s for `bytes` moved over `duration_ns`, scaled by
/// `factor` (normally [`BYTES_PER_NS_TO_MB_PER_S`]).
///
/// Returns `None` for a non-positive duration.
pub fn bandwidth_mb_per_s(bytes: u64, duration_ns: i64, factor: f64) -> Option<f64> {
    if duration_ns <= 0 {
        return None;
    }
    Some(bytes as f64 * factor / duration_ns as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ns_to_us() {
        assert_eq!(ns_to_us(2_500), 2.5);
        assert_eq!(ns_to_us(-1_000), -1.0);
    }

    #[test]
    fn test_bandwidth_one_mib_per_ms() {
        // 1 MiB in 1 ms is 1000 MiB/s
        let bw = bandwidth_mb_per_s(1 << 20, 1_000_000, BYTES_PER_NS_TO_MB_PER_S).unwrap();
        assert!((bw - 1000.0).abs() < 0.01);
    }

    #[test]
    fn test_bandwidth_zero_duration() {
        assert_eq!(bandwidth_mb_per_s(4096, 0, BYTES_PER_NS_TO_MB_PER_S), None);
        assert_eq!(bandwidth_mb_per_s(4096, -5, BYTES_PER_NS_TO_MB_PER_S), None);
    }
}
