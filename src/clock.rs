//! Elapsed-time formatting for status lines.

use std::time::Duration;

use tokio::time::Instant;

/// Formats the time between `start` and `end`.
///
/// Under one second the result is whole milliseconds (`"250ms"`), otherwise seconds
/// with two decimals (`"1.50s"`). An `end` before `start` renders as `"0ms"`.
pub fn format_duration(start: Instant, end: Instant) -> String {
    format_elapsed(end.saturating_duration_since(start))
}

/// Formats an elapsed duration the same way as [`format_duration`].
///
/// # Example
/// ```
/// use std::time::Duration;
/// use consolevisor::clock::format_elapsed;
///
/// assert_eq!(format_elapsed(Duration::from_millis(250)), "250ms");
/// assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.50s");
/// ```
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else {
        format!("{secs:.2}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_second_renders_millis() {
        assert_eq!(format_elapsed(Duration::ZERO), "0ms");
        assert_eq!(format_elapsed(Duration::from_millis(7)), "7ms");
        assert_eq!(format_elapsed(Duration::from_millis(999)), "999ms");
    }

    #[test]
    fn test_seconds_render_two_decimals() {
        assert_eq!(format_elapsed(Duration::from_secs(1)), "1.00s");
        assert_eq!(format_elapsed(Duration::from_millis(2_500)), "2.50s");
    }

    #[test]
    fn test_reversed_interval_is_zero() {
        let now = Instant::now();
        let later = now + Duration::from_secs(3);
        assert_eq!(format_duration(later, now), "0ms");
        assert_eq!(format_duration(now, later), "3.00s");
    }
}
