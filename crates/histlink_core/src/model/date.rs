//! Precision-tagged historical date model.
//!
//! # Invariants
//! - `precision == Unknown` implies every numeric field is `None`.
//! - `sort_key` is `year * 10000 + month * 100 + day`, filling absent
//!   components with the defaults below so mixed precisions sort close to
//!   their true position.

use serde::{Deserialize, Serialize};

/// Month used for sorting when only the year is known.
pub const DEFAULT_SORT_MONTH: u32 = 7;
/// Day used for sorting when the day is not known.
pub const DEFAULT_SORT_DAY: u32 = 15;

/// Granularity at which a historical date is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePrecision {
    Exact,
    YearMonth,
    YearOnly,
    Range,
    Approximate,
    Unknown,
}

impl DatePrecision {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::YearMonth => "year_month",
            Self::YearOnly => "year_only",
            Self::Range => "range",
            Self::Approximate => "approximate",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "exact" => Some(Self::Exact),
            "year_month" => Some(Self::YearMonth),
            "year_only" => Some(Self::YearOnly),
            "range" => Some(Self::Range),
            "approximate" => Some(Self::Approximate),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Structured form of a free-text date string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDate {
    /// Trimmed input text.
    pub original_text: String,
    pub year_start: Option<i32>,
    /// Only set for ranges.
    pub year_end: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub precision: DatePrecision,
    pub sort_key: Option<i64>,
}

impl ParsedDate {
    /// Creates the `unknown` value for unparseable text.
    pub fn unknown(original_text: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            year_start: None,
            year_end: None,
            month: None,
            day: None,
            precision: DatePrecision::Unknown,
            sort_key: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.precision == DatePrecision::Unknown
    }
}

/// Computes the sort key, applying month/day defaults.
pub fn sort_key(year: i32, month: Option<u32>, day: Option<u32>) -> i64 {
    i64::from(year) * 10_000
        + i64::from(month.unwrap_or(DEFAULT_SORT_MONTH)) * 100
        + i64::from(day.unwrap_or(DEFAULT_SORT_DAY))
}
