use humansize::{format_size as humanize, DECIMAL};

use crate::core::monitor::UNREACHABLE_SECS;

/// Format a byte count in human-readable form (B, kB, MB, GB)
pub fn format_size(size: u64) -> String {
    humanize(size, DECIMAL)
}

/// Format a duration in seconds as a short uptime-style string
pub fn format_duration(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a probe latency; the unreachable sentinel renders as TIMEOUT.
pub fn format_latency(seconds: f64) -> String {
    if seconds >= UNREACHABLE_SECS {
        "TIMEOUT".to_string()
    } else {
        format!("{:.0}ms", seconds * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(90), "1m");
        assert_eq!(format_duration(3700), "1h 1m");
        assert_eq!(format_duration(90000), "1d 1h");
    }

    #[test]
    fn test_format_latency() {
        assert_eq!(format_latency(0.123), "123ms");
        assert_eq!(format_latency(UNREACHABLE_SECS), "TIMEOUT");
    }
}
