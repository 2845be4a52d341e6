//! Runtime duration formatting
//!
//! Jellyfin reports item runtimes as 100-nanosecond ticks. This module turns
//! those into the short human-readable form used throughout the newsletter.

/// Number of 100-nanosecond ticks in one second.
const TICKS_PER_SECOND: u64 = 10_000_000;

/// Formats a tick-based runtime as a short duration string
///
/// Durations of an hour or more render as `"1h23"`, anything shorter as
/// `"45 min"`. Seconds are truncated, never rounded up.
pub fn format_runtime_ticks(ticks: u64) -> String {
    let total_minutes = ticks / TICKS_PER_SECOND / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{hours}h{minutes:02}")
    } else {
        format!("{minutes:02} min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICKS_PER_MINUTE: u64 = 10_000_000 * 60;

    #[test]
    fn test_zero_ticks() {
        assert_eq!(format_runtime_ticks(0), "00 min");
    }

    #[test]
    fn test_sub_hour_durations() {
        assert_eq!(format_runtime_ticks(TICKS_PER_MINUTE * 45), "45 min");
        assert_eq!(format_runtime_ticks(TICKS_PER_MINUTE * 7), "07 min");
        assert_eq!(format_runtime_ticks(TICKS_PER_MINUTE * 59), "59 min");
    }

    #[test]
    fn test_hour_and_above() {
        assert_eq!(format_runtime_ticks(TICKS_PER_MINUTE * 90), "1h30");
        assert_eq!(format_runtime_ticks(TICKS_PER_MINUTE * 60), "1h00");
        assert_eq!(format_runtime_ticks(TICKS_PER_MINUTE * 125), "2h05");
    }

    #[test]
    fn test_seconds_are_truncated() {
        // 44 minutes and 59 seconds still reads as 44 minutes
        let ticks = TICKS_PER_MINUTE * 44 + 10_000_000 * 59;
        assert_eq!(format_runtime_ticks(ticks), "44 min");
    }
}
