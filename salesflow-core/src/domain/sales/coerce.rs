// salesflow-core/src/domain/sales/coerce.rs
//
// Cell-level coercions applied to raw sales records.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Non-numeric, empty and non-finite values become 0; negatives clip to 0.
pub fn coerce_sales(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v.max(0.0),
        _ => 0.0,
    }
}

/// Trims and lower-cases a model label. `None` for a blank label.
pub fn normalize_model(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Parses a timestamp cell. Offsets are converted to UTC and dropped, a bare
/// date means midnight. `None` when no accepted form matches.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_coercion() {
        assert_eq!(coerce_sales("12"), 12.0);
        assert_eq!(coerce_sales(" 2.5 "), 2.5);
        assert_eq!(coerce_sales("-5"), 0.0);
        assert_eq!(coerce_sales(""), 0.0);
        assert_eq!(coerce_sales("n/a"), 0.0);
        assert_eq!(coerce_sales("NaN"), 0.0);
        assert_eq!(coerce_sales("inf"), 0.0);
    }

    #[test]
    fn test_model_normalization() {
        assert_eq!(normalize_model("GPU-A"), Some("gpu-a".to_string()));
        assert_eq!(normalize_model(" gpu-a "), Some("gpu-a".to_string()));
        assert_eq!(normalize_model("   "), None);
    }

    #[test]
    fn test_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(10, 30, 0))
            .unwrap_or_default();

        assert_eq!(parse_timestamp("2024-03-01 10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01 10:30"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T10:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T12:30:00+02:00"), Some(expected));
    }

    #[test]
    fn test_timestamp_date_only_and_garbage() {
        let midnight = NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
        assert_eq!(parse_timestamp("2024-03-01"), midnight);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024-13-45 10:00:00"), None);
    }
}
