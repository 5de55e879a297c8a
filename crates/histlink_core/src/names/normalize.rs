//! Display-name canonicalization helpers.
//!
//! # Invariants
//! - Output is lowercase with single spaces and no leading/trailing blanks.
//! - Parenthetical content never survives `normalize_name`.
//! - Composed and decomposed spellings of a name normalize identically (NFKC).

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static PARENTHETICAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]*)\)").expect("valid parenthetical regex"));
static SLUG_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug separator regex"));

const TITLE_TOKENS: &[&str] = &["dr", "mr", "mrs", "ms", "sr", "jr"];

/// Canonicalizes a display name for comparison.
///
/// Lowercases, removes `(...)` content, drops title/suffix tokens
/// (`dr mr mrs ms sr jr`), strips periods and commas, collapses whitespace.
pub fn normalize_name(name: &str) -> String {
    let lower = fold_case(name);
    let without_parens = PARENTHETICAL_RE.replace_all(&lower, " ");
    without_parens
        .split_whitespace()
        .filter(|token| !is_title_token(token))
        .map(|token| token.replace(['.', ','], ""))
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// NFKC fold followed by lowercasing.
pub fn fold_case(value: &str) -> String {
    value.nfkc().collect::<String>().to_lowercase()
}

/// Sort key for display names: accents removed (NFKD without combining
/// marks), then lowercased. "Émile" sorts with "emile".
pub fn collation_key(name: &str) -> String {
    name.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Converts a name into its URL slug form (runs of `[^a-z0-9]` become `-`).
pub fn slugify(name: &str) -> String {
    let lower = fold_case(name);
    SLUG_SEPARATOR_RE
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Returns the trimmed content of the first parenthetical, if non-blank.
pub fn parenthetical_content(name: &str) -> Option<String> {
    let caps = PARENTHETICAL_RE.captures(name)?;
    let inner = collapse_whitespace(caps.get(1)?.as_str());
    (!inner.is_empty()).then_some(inner)
}

/// Removes every parenthetical and collapses the remaining whitespace.
pub fn strip_parenthetical(name: &str) -> String {
    collapse_whitespace(&PARENTHETICAL_RE.replace_all(name, " "))
}

/// Collapses runs of whitespace into single spaces and trims.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_title_token(token: &str) -> bool {
    let core = token.trim_end_matches(['.', ',']);
    TITLE_TOKENS.contains(&core)
}
