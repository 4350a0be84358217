use std::sync::LazyLock;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use regex::Regex;

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+40|0040|07)[0-9]{8,9}$").expect("phone pattern is a valid regex")
});

/// Strips the separators visitors commonly type into phone fields.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}

/// Romanian mobile formats: `+40`, `0040` or `07` followed by 8-9 ASCII digits.
pub fn is_valid_phone(raw: &str) -> bool {
    PHONE_RE.is_match(&normalize_phone(raw))
}

pub fn format_time(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%H:%M").to_string()
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_time_range(start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> String {
    format!("{}-{}", format_time(start), format_time(end))
}

pub fn tomorrow(today: NaiveDate) -> NaiveDate {
    today + Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dt(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_accepts_local_mobile_format() {
        assert!(is_valid_phone("0722334455"));
        assert!(is_valid_phone("07223344556"));
    }

    #[test]
    fn test_accepts_international_prefixes() {
        assert!(is_valid_phone("+40722334455"));
        assert!(is_valid_phone("0040722334455"));
        assert!(is_valid_phone("+4072233445"));
    }

    #[test]
    fn test_strips_separators() {
        assert!(is_valid_phone("0722 334 455"));
        assert!(is_valid_phone("(0722)-334-455"));
        assert!(is_valid_phone("+40 722-334-455"));
        assert_eq!(normalize_phone("+40 (722) 334-455"), "+40722334455");
    }

    #[test]
    fn test_rejects_other_formats() {
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("0622334455"));
        assert!(!is_valid_phone("072233445"));
        assert!(!is_valid_phone("0722334455667"));
        assert!(!is_valid_phone("+41722334455"));
        assert!(!is_valid_phone("0722.334.455"));
        assert!(!is_valid_phone("07223344ab"));
    }

    #[test]
    fn test_rejects_non_ascii_digits() {
        assert!(!is_valid_phone("07\u{0662}\u{0662}\u{0663}\u{0663}\u{0664}\u{0664}\u{0665}\u{0665}"));
        assert!(!is_valid_phone("+40\u{0967}\u{0968}\u{0969}\u{096A}\u{096B}\u{096C}\u{096D}\u{096E}"));
        assert!(!is_valid_phone("0722\u{FF13}\u{FF14}\u{FF14}\u{FF15}\u{FF15}"));
    }

    #[test]
    fn test_format_time_uses_slot_offset() {
        let start = dt("2026-10-15T10:00:00+03:00");
        let end = dt("2026-10-15T10:30:00+03:00");
        assert_eq!(format_time(&start), "10:00");
        assert_eq!(format_time_range(&start, &end), "10:00-10:30");
    }

    #[test]
    fn test_tomorrow_crosses_month() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 31).unwrap();
        assert_eq!(format_date(&tomorrow(today)), "2026-11-01");
    }

    proptest! {
        #[test]
        fn test_prefixed_digit_runs_validate(
            prefix in prop::sample::select(vec!["+40", "0040", "07"]),
            digits in "[0-9]{8,9}",
        ) {
            let phone = format!("{prefix}{digits}");
            prop_assert!(is_valid_phone(&phone));
        }

        #[test]
        fn test_short_or_long_runs_fail(
            prefix in prop::sample::select(vec!["+40", "0040", "07"]),
            digits in prop_oneof![
                "[0-9]{0,7}",
                "[0-9]{10,14}",
                "[\u{0660}-\u{0669}\u{0966}-\u{096F}\u{FF10}-\u{FF19}]{8,9}",
            ],
        ) {
            let phone = format!("{prefix}{digits}");
            prop_assert!(!is_valid_phone(&phone));
        }
    }
}
