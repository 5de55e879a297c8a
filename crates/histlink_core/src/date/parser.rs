//! Free-text date parsing and formatting.
//!
//! # Responsibility
//! - Turn scanned/typed date strings into precision-tagged `ParsedDate`s.
//! - Render a parsed date back into a human string.
//!
//! # Invariants
//! - `parse_date` is total: it never panics and never errors.
//! - Patterns are tried most specific first; the first hit wins.
//! - An approximate marker only changes precision, never field extraction.

use crate::model::date::{sort_key, DatePrecision, ParsedDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static APPROXIMATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:c\.|ca\.|circa\b|about\b|around\b|approx(?:imately\b|\.|\b)|~)\s*")
        .expect("valid approximate marker regex")
});
static ISO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("valid iso date regex"));
static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{4})\s*[-–]\s*(\d{4}|\d{2})\b").expect("valid year range regex")
});
static MONTH_DAY_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z]{3,9})\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b")
        .expect("valid month-day-year regex")
});
static DAY_MONTH_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)?\s+([A-Za-z]{3,9})\.?,?\s+(\d{4})\b")
        .expect("valid day-month-year regex")
});
static NUMERIC_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("valid m/d/y regex"));
static MONTH_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z]{3,9})\.?,?\s+(\d{4})\b").expect("valid month-year regex")
});
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})s?\b").expect("valid year regex"));

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];
const MONTH_DISPLAY_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
const UNKNOWN_MARKERS: &[&str] = &["tbd", "unknown"];
const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 2999;
const UNKNOWN_LABEL: &str = "Unknown";

/// Numeric fields extracted by one pattern, before approximate handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DateFields {
    year_start: i32,
    year_end: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    precision: DatePrecision,
    sort_key: i64,
}

/// Parses a free-text date string.
///
/// Unparseable input yields `precision = Unknown` with every numeric field
/// unset and `original_text` holding the trimmed input.
pub fn parse_date(text: &str) -> ParsedDate {
    let trimmed = text.trim();
    if is_unknown_marker(trimmed) {
        return ParsedDate::unknown(trimmed);
    }

    let (approximate, body) = strip_approximate(trimmed);
    let Some(fields) = extract_fields(body) else {
        return ParsedDate::unknown(trimmed);
    };

    ParsedDate {
        original_text: trimmed.to_string(),
        year_start: Some(fields.year_start),
        year_end: fields.year_end,
        month: fields.month,
        day: fields.day,
        precision: if approximate {
            DatePrecision::Approximate
        } else {
            fields.precision
        },
        sort_key: Some(fields.sort_key),
    }
}

/// Renders a parsed date as a human string.
///
/// Approximate dates get a `c. ` prefix in front of the shape implied by
/// their fields. Unknown dates fall back to the original text, or `Unknown`
/// when that is blank.
pub fn format_date(parsed: &ParsedDate) -> String {
    let Some(year) = parsed.year_start else {
        return unknown_label(parsed);
    };

    let month_name = parsed.month.and_then(display_month);
    let shape = match (parsed.year_end, month_name, parsed.day) {
        (Some(end), _, _) => format!("{year}-{end}"),
        (None, Some(month), Some(day)) => format!("{month} {day}, {year}"),
        (None, Some(month), None) => format!("{month} {year}"),
        _ => year.to_string(),
    };

    if parsed.precision == DatePrecision::Approximate {
        format!("c. {shape}")
    } else {
        shape
    }
}

/// Resolves a month name or 3-letter abbreviation (case-insensitive).
pub fn month_from_name(token: &str) -> Option<u32> {
    let lower = token.trim().trim_end_matches('.').to_ascii_lowercase();
    if lower == "sept" {
        return Some(9);
    }
    let index = MONTH_NAMES
        .iter()
        .position(|name| *name == lower || (lower.len() == 3 && name.starts_with(&lower)))?;
    u32::try_from(index + 1).ok()
}

fn display_month(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month.checked_sub(1)?).ok()?;
    MONTH_DISPLAY_NAMES.get(index).copied()
}

fn unknown_label(parsed: &ParsedDate) -> String {
    let original = parsed.original_text.trim();
    if original.is_empty() {
        UNKNOWN_LABEL.to_string()
    } else {
        original.to_string()
    }
}

fn is_unknown_marker(value: &str) -> bool {
    value.is_empty()
        || UNKNOWN_MARKERS
            .iter()
            .any(|marker| value.eq_ignore_ascii_case(marker))
}

fn strip_approximate(value: &str) -> (bool, &str) {
    match APPROXIMATE_RE.find(value) {
        Some(found) => (true, value[found.end()..].trim()),
        None => (false, value),
    }
}

fn extract_fields(body: &str) -> Option<DateFields> {
    parse_iso(body)
        .or_else(|| parse_range(body))
        .or_else(|| parse_full_date(body))
        .or_else(|| parse_month_year(body))
        .or_else(|| parse_bare_year(body))
}

fn parse_iso(body: &str) -> Option<DateFields> {
    ISO_RE.captures_iter(body).find_map(|caps| {
        let year = capture_year(&caps, 1)?;
        let month = capture_number(&caps, 2).filter(is_valid_month)?;
        let day = capture_number(&caps, 3).filter(is_valid_day)?;
        Some(exact(year, month, day))
    })
}

fn parse_range(body: &str) -> Option<DateFields> {
    RANGE_RE.captures_iter(body).find_map(|caps| {
        let start = capture_year(&caps, 1)?;
        let end_text = caps.get(2)?.as_str();
        let end_value: i32 = end_text.parse().ok()?;
        let end = if end_text.len() == 2 {
            start - start.rem_euclid(100) + end_value
        } else {
            end_value
        };
        if end < start || !is_valid_year(end) {
            return None;
        }

        Some(DateFields {
            year_start: start,
            year_end: Some(end),
            month: None,
            day: None,
            precision: DatePrecision::Range,
            sort_key: sort_key(start, Some(1), Some(1)),
        })
    })
}

fn parse_full_date(body: &str) -> Option<DateFields> {
    let month_first = MONTH_DAY_YEAR_RE.captures_iter(body).find_map(|caps| {
        let month = month_from_name(caps.get(1)?.as_str())?;
        let day = capture_number(&caps, 2).filter(is_valid_day)?;
        let year = capture_year(&caps, 3)?;
        Some(exact(year, month, day))
    });
    if month_first.is_some() {
        return month_first;
    }

    let day_first = DAY_MONTH_YEAR_RE.captures_iter(body).find_map(|caps| {
        let day = capture_number(&caps, 1).filter(is_valid_day)?;
        let month = month_from_name(caps.get(2)?.as_str())?;
        let year = capture_year(&caps, 3)?;
        Some(exact(year, month, day))
    });
    if day_first.is_some() {
        return day_first;
    }

    NUMERIC_DATE_RE.captures_iter(body).find_map(|caps| {
        let month = capture_number(&caps, 1).filter(is_valid_month)?;
        let day = capture_number(&caps, 2).filter(is_valid_day)?;
        let year = capture_year(&caps, 3)?;
        Some(exact(year, month, day))
    })
}

fn parse_month_year(body: &str) -> Option<DateFields> {
    MONTH_YEAR_RE.captures_iter(body).find_map(|caps| {
        let month = month_from_name(caps.get(1)?.as_str())?;
        let year = capture_year(&caps, 2)?;
        Some(DateFields {
            year_start: year,
            year_end: None,
            month: Some(month),
            day: None,
            precision: DatePrecision::YearMonth,
            sort_key: sort_key(year, Some(month), None),
        })
    })
}

fn parse_bare_year(body: &str) -> Option<DateFields> {
    YEAR_RE.captures_iter(body).find_map(|caps| {
        let year = capture_year(&caps, 1)?;
        Some(DateFields {
            year_start: year,
            year_end: None,
            month: None,
            day: None,
            precision: DatePrecision::YearOnly,
            sort_key: sort_key(year, None, None),
        })
    })
}

fn exact(year: i32, month: u32, day: u32) -> DateFields {
    DateFields {
        year_start: year,
        year_end: None,
        month: Some(month),
        day: Some(day),
        precision: DatePrecision::Exact,
        sort_key: sort_key(year, Some(month), Some(day)),
    }
}

fn capture_number(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

fn capture_year(caps: &Captures<'_>, index: usize) -> Option<i32> {
    let year: i32 = caps.get(index)?.as_str().parse().ok()?;
    is_valid_year(year).then_some(year)
}

fn is_valid_year(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

fn is_valid_month(month: &u32) -> bool {
    (1..=12).contains(month)
}

fn is_valid_day(day: &u32) -> bool {
    (1..=31).contains(day)
}

#[cfg(test)]
mod tests {
    use super::{format_date, month_from_name, parse_date, strip_approximate};
    use crate::model::date::DatePrecision;

    #[test]
    fn month_lookup_accepts_full_and_abbreviated_names() {
        assert_eq!(month_from_name("June"), Some(6));
        assert_eq!(month_from_name("DEC."), Some(12));
        assert_eq!(month_from_name("sept"), Some(9));
        assert_eq!(month_from_name("Jun"), Some(6));
        assert_eq!(month_from_name("Ju"), None);
        assert_eq!(month_from_name("Summer"), None);
    }

    #[test]
    fn approximate_marker_is_stripped_and_reported() {
        assert_eq!(strip_approximate("c. 1940"), (true, "1940"));
        assert_eq!(strip_approximate("Circa 1940"), (true, "1940"));
        assert_eq!(strip_approximate("~1940"), (true, "1940"));
        assert_eq!(strip_approximate("approx. 1940"), (true, "1940"));
        assert_eq!(strip_approximate("Carol 1940"), (false, "Carol 1940"));
    }

    #[test]
    fn two_digit_end_before_start_is_not_a_range() {
        let parsed = parse_date("1948-12");
        assert_eq!(parsed.precision, DatePrecision::YearOnly);
        assert_eq!(parsed.year_start, Some(1948));
        assert_eq!(parsed.year_end, None);
    }

    #[test]
    fn reversed_four_digit_range_falls_back_to_year() {
        let parsed = parse_date("1949-1948");
        assert_eq!(parsed.precision, DatePrecision::YearOnly);
        assert_eq!(parsed.year_start, Some(1949));
    }

    #[test]
    fn invalid_day_fails_over_to_month_year() {
        let parsed = parse_date("June 45, 1940");
        assert_eq!(parsed.precision, DatePrecision::YearOnly);
        assert_eq!(parsed.month, None);
    }

    #[test]
    fn format_uses_unknown_label_for_blank_text() {
        let parsed = parse_date("   ");
        assert_eq!(format_date(&parsed), "Unknown");
    }
}
