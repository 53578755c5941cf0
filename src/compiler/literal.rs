//! Literal interpretation for leaf values
//!
//! Booleans, numbers, timestamps and range windows arrive as raw text from
//! the parser. Each helper here either yields a typed [`FieldValue`] or a
//! literal error naming the offending text and field.

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::{CompileError, Result};
use crate::query::types::FieldValue;

/// `YYYY-MM-DD` or `YYYY/MM/DD`
static CALENDAR_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})[-/](\d{2})[-/](\d{2})$").expect("calendar date pattern is valid")
});

/// Parse a boolean literal
pub fn parse_boolean(field: &str, text: &str) -> Result<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        _ => Err(CompileError::MalformedBoolean {
            field: field.to_string(),
            value: text.to_string(),
        }),
    }
}

/// Auto-detect a timestamp or numeric literal
///
/// Timestamps win over numbers: RFC3339 first, then calendar dates, then
/// integers, then finite floats.
pub fn parse_scalar(text: &str) -> Option<FieldValue> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(FieldValue::Date(ts));
    }
    if let Some(day) = parse_calendar_date(text) {
        return Some(FieldValue::Date(day));
    }
    if let Ok(n) = text.parse::<i64>() {
        return Some(FieldValue::Long(n));
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(FieldValue::Double(f)),
        _ => None,
    }
}

/// Like [`parse_scalar`], failing with the field and text on no match
pub fn parse_number_or_date(field: &str, text: &str) -> Result<FieldValue> {
    parse_scalar(text).ok_or_else(|| CompileError::MalformedNumber {
        field: field.to_string(),
        value: text.to_string(),
    })
}

/// Parse a `start~end` window into its two bounds
///
/// The window is half-open; callers bind `start` inclusively and `end`
/// exclusively. Each bound is detected on its own, so a timestamp may sit
/// next to a number.
pub fn parse_window(field: &str, text: &str) -> Result<(FieldValue, FieldValue)> {
    let malformed = |reason: String| CompileError::MalformedWindow {
        field: field.to_string(),
        value: text.to_string(),
        reason,
    };

    let (start, end) = text
        .split_once('~')
        .ok_or_else(|| malformed("expected `start~end`".to_string()))?;

    let parse_bound = |name: &str, bound: &str| {
        if bound.trim().is_empty() {
            return Err(malformed(format!("missing {} bound", name)));
        }
        parse_scalar(bound).ok_or_else(|| {
            malformed(format!(
                "{} bound {:?} is neither a timestamp nor a number",
                name,
                bound.trim()
            ))
        })
    };

    Ok((parse_bound("start", start)?, parse_bound("end", end)?))
}

fn parse_calendar_date(text: &str) -> Option<DateTime<chrono::FixedOffset>> {
    let caps = CALENDAR_DATE.captures(text)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    let midnight = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_boolean() {
        assert!(parse_boolean("flag", "true").unwrap());
        assert!(parse_boolean("flag", "TRUE").unwrap());
        assert!(parse_boolean("flag", "1").unwrap());
        assert!(!parse_boolean("flag", "False").unwrap());
        assert!(!parse_boolean("flag", "f").unwrap());
    }

    #[test]
    fn test_parse_boolean_malformed() {
        let err = parse_boolean("flag", "maybe").unwrap_err();
        assert_eq!(
            err,
            CompileError::MalformedBoolean {
                field: "flag".to_string(),
                value: "maybe".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_scalar_numbers() {
        assert_eq!(parse_scalar("18"), Some(FieldValue::Long(18)));
        assert_eq!(parse_scalar("-93"), Some(FieldValue::Long(-93)));
        assert_eq!(parse_scalar("2.5"), Some(FieldValue::Double(2.5)));
        assert_eq!(parse_scalar("1e3"), Some(FieldValue::Double(1000.0)));
    }

    #[test]
    fn test_parse_scalar_rejects_non_finite() {
        assert_eq!(parse_scalar("inf"), None);
        assert_eq!(parse_scalar("NaN"), None);
        assert_eq!(parse_scalar(""), None);
        assert_eq!(parse_scalar("twelve"), None);
    }

    #[test]
    fn test_parse_scalar_timestamps() {
        let expected = DateTime::parse_from_rfc3339("2024-03-01T12:30:00+02:00").unwrap();
        assert_eq!(
            parse_scalar("2024-03-01T12:30:00+02:00"),
            Some(FieldValue::Date(expected))
        );

        let midnight = DateTime::parse_from_rfc3339("2024-03-01T00:00:00Z").unwrap();
        assert_eq!(parse_scalar("2024/03/01"), Some(FieldValue::Date(midnight)));
        assert_eq!(parse_scalar("2024-03-01"), Some(FieldValue::Date(midnight)));
    }

    #[test]
    fn test_parse_scalar_invalid_calendar_date() {
        assert_eq!(parse_scalar("2024-13-40"), None);
    }

    #[test]
    fn test_parse_number_or_date_error_names_field() {
        let err = parse_number_or_date("age", "old").unwrap_err();
        assert_eq!(err.field(), Some("age"));
        assert!(err.to_string().contains("\"old\""));
    }

    #[test]
    fn test_parse_window_numeric() {
        let (start, end) = parse_window("year", "2020~2024").unwrap();
        assert_eq!(start, FieldValue::Long(2020));
        assert_eq!(end, FieldValue::Long(2024));

        let (start, end) = parse_window("score", "0.5 ~ 10").unwrap();
        assert_eq!(start, FieldValue::Double(0.5));
        assert_eq!(end, FieldValue::Long(10));
    }

    #[test]
    fn test_parse_window_timestamps() {
        let (start, end) =
            parse_window("created", "2024-01-01T00:00:00Z~2024-02-01T00:00:00Z").unwrap();
        assert_eq!(start.kind_name(), "date");
        assert_eq!(end.kind_name(), "date");
    }

    #[test]
    fn test_parse_window_bounds_are_independent() {
        let (start, end) = parse_window("at", "0~2024-01-01T00:00:00Z").unwrap();
        assert_eq!(start, FieldValue::Long(0));
        assert_eq!(end.kind_name(), "date");
    }

    #[test]
    fn test_parse_window_malformed() {
        for bad in ["2020", "~2024", "2020~", "abc~2024"] {
            let err = parse_window("year", bad).unwrap_err();
            assert!(
                matches!(err, CompileError::MalformedWindow { ref field, .. } if field == "year"),
                "expected window error for {:?}, got {:?}",
                bad,
                err
            );
        }
    }
}
