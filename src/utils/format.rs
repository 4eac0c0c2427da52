//! Display formatting for elapsed times and task durations

/// Format a second count as zero-padded `HH:MM:SS`.
///
/// Hours widen past two digits rather than wrapping.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format a duration in its largest whole unit: `Ns`, `Nm` or `Nh`,
/// truncating (not rounding) to the unit.
pub fn format_compact(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m", seconds / 60)
    } else {
        format!("{}h", seconds / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hms_zero_pads_every_field() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(7), "00:00:07");
        assert_eq!(format_hms(65), "00:01:05");
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(86_399), "23:59:59");
        assert_eq!(format_hms(360_000), "100:00:00");
    }

    #[test]
    fn test_compact_truncates_at_unit_boundaries() {
        assert_eq!(format_compact(0), "0s");
        assert_eq!(format_compact(59), "59s");
        assert_eq!(format_compact(60), "1m");
        assert_eq!(format_compact(119), "1m");
        assert_eq!(format_compact(3599), "59m");
        assert_eq!(format_compact(3600), "1h");
        assert_eq!(format_compact(7322), "2h");
    }
}
