/// Formats seconds as `MM:SS.mmm`.
///
/// Minutes are zero-padded to two digits and grow past that for long files.
/// Milliseconds are truncated, not rounded. Negative and NaN inputs format
/// as zero.
pub fn format_timecode(seconds: f64) -> String {
    // Nudge before flooring so values like 15.234 don't land on 15.233.
    let total_ms = (seconds.max(0.0) * 1000.0 + 1e-6).floor() as u64;
    let minutes = total_ms / 60_000;
    let secs = (total_ms / 1000) % 60;
    let millis = total_ms % 1000;
    format!("{minutes:02}:{secs:02}.{millis:03}")
}

/// Converts the captured fields of a `[MM:SS.mmm]` tag to seconds.
///
/// `millis` may be two or three digits; two-digit values are right-padded,
/// so `"5"` in the tens position means 500 ms, not 5 ms.
pub fn tag_fields_to_seconds(minutes: u32, seconds: u32, millis: &str) -> f64 {
    let padded: String = millis.chars().chain(std::iter::repeat('0')).take(3).collect();
    let ms: u32 = padded.parse().unwrap_or(0);
    minutes as f64 * 60.0 + seconds as f64 + ms as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::zero(0.0, "00:00.000")]
    #[case::sub_second(0.5, "00:00.500")]
    #[case::minutes(75.25, "01:15.250")]
    #[case::float_noise(15.234, "00:15.234")]
    #[case::truncates(1.9999, "00:01.999")]
    #[case::long_file(6000.0, "100:00.000")]
    #[case::negative(-3.0, "00:00.000")]
    fn test_format_timecode(#[case] seconds: f64, #[case] expected: &str) {
        assert_eq!(format_timecode(seconds), expected);
    }

    #[test]
    fn test_format_nan_is_zero() {
        assert_eq!(format_timecode(f64::NAN), "00:00.000");
    }

    #[test]
    fn test_tag_fields_three_digit_millis() {
        assert_relative_eq!(tag_fields_to_seconds(1, 2, "345"), 62.345, epsilon = 1e-9);
    }

    #[test]
    fn test_tag_fields_two_digit_millis_right_padded() {
        assert_relative_eq!(tag_fields_to_seconds(0, 5, "50"), 5.5, epsilon = 1e-9);
    }

    #[test]
    fn test_tag_fields_non_ascii_millis_count_as_zero() {
        assert_relative_eq!(tag_fields_to_seconds(0, 1, "١٢"), 1.0, epsilon = 1e-9);
    }
}
