//! Duration formatting for logs and CLI output.

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const YEAR: u64 = 365 * DAY;

/// Format a duration in seconds using its two most significant units.
///
/// Accrual periods are usually minutes or days while anniversary periods
/// are years, so the scale runs from seconds up to 365-day years.
pub fn format_duration(secs: u64) -> String {
    match secs {
        s if s < MINUTE => format!("{s}s"),
        s if s < HOUR => format!("{}m {}s", s / MINUTE, s % MINUTE),
        s if s < DAY => format!("{}h {}m", s / HOUR, (s % HOUR) / MINUTE),
        s if s < YEAR => format!("{}d {}h", s / DAY, (s % DAY) / HOUR),
        s => format!("{}y {}d", s / YEAR, (s % YEAR) / DAY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_scales() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(61), "1m 1s");
        assert_eq!(format_duration(3 * HOUR + 5 * MINUTE), "3h 5m");
    }

    #[test]
    fn days_and_years() {
        assert_eq!(format_duration(2 * DAY + 4 * HOUR), "2d 4h");
        assert_eq!(format_duration(YEAR), "1y 0d");
        assert_eq!(format_duration(3 * YEAR + 10 * DAY), "3y 10d");
    }
}
