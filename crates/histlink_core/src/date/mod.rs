//! Historical date parsing.
//!
//! # Responsibility
//! - Resolve scanned/typed date strings into precision-tagged values.
//! - Provide the inverse rendering used by read-time handlers.
//!
//! # See also
//! - `model::date` for the `ParsedDate` shape and sort-key defaults.

pub mod parser;

pub use parser::{format_date, month_from_name, parse_date};
