//! Strict person-name matching.
//!
//! # Invariants
//! - Fragments with fewer than two words (of 2+ chars) never match.
//! - Last names must correspond before first names are considered.
//! - Candidates are tried in registry order; the first hit wins.

use crate::model::entity::CanonicalEntity;
use crate::model::link::{Confidence, EntityMatch};
use crate::names::nicknames::NicknameTable;
use crate::names::normalize::normalize_name;
use crate::registry::Registry;
use once_cell::sync::Lazy;
use regex::Regex;

static INITIALS_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]\.?\s*(?:[A-Z]\.?)?\s").expect("valid initials regex"));

const MIN_WORDS: usize = 2;
const MIN_LAST_NAME_CONTAINMENT_CHARS: usize = 4;
const MIN_FIRST_NAME_CONTAINMENT_CHARS: usize = 3;

/// Resolves a raw person fragment against every person in the registry.
pub fn match_person(
    raw_name: &str,
    registry: &Registry,
    nicknames: &NicknameTable,
) -> Option<EntityMatch> {
    let normalized = normalize_name(raw_name);
    let words = significant_words(&normalized);
    if words.len() < MIN_WORDS {
        return None;
    }

    registry.people().find_map(|candidate| {
        classify_candidate(raw_name, &normalized, &words, candidate, nicknames).map(|confidence| {
            EntityMatch {
                id: candidate.id,
                slug: candidate.slug.clone(),
                confidence,
            }
        })
    })
}

fn classify_candidate(
    raw_name: &str,
    normalized: &str,
    words: &[&str],
    candidate: &CanonicalEntity,
    nicknames: &NicknameTable,
) -> Option<Confidence> {
    let candidate_normalized = normalize_name(&candidate.display_name);
    if candidate_normalized.is_empty() {
        return None;
    }
    if candidate_normalized == normalized {
        return Some(Confidence::Confirmed);
    }

    let candidate_words = significant_words(&candidate_normalized);
    let (raw_last, raw_leading) = words.split_last()?;
    let (candidate_last, candidate_leading) = candidate_words.split_last()?;
    if candidate_leading.is_empty() || !last_names_correspond(raw_last, candidate_last) {
        return None;
    }

    if token_pairs(raw_leading, candidate_leading)
        .any(|(raw, cand)| nicknames.are_variants(raw, cand))
    {
        return Some(Confidence::Likely);
    }
    if token_pairs(raw_leading, candidate_leading)
        .any(|(raw, cand)| first_names_overlap(raw, cand))
    {
        return Some(Confidence::Likely);
    }
    if starts_with_initials(raw_name) || starts_with_initials(&candidate.display_name) {
        return Some(Confidence::Uncertain);
    }
    None
}

fn token_pairs<'a>(
    left: &'a [&'a str],
    right: &'a [&'a str],
) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    left.iter().flat_map(move |l| right.iter().map(move |r| (*l, *r)))
}

/// Prefix in either direction, or containment once the shorter token has
/// 3+ chars ("ann" in "joann").
fn first_names_overlap(left: &str, right: &str) -> bool {
    if left.starts_with(right) || right.starts_with(left) {
        return true;
    }
    let (shorter, longer) = if left.len() <= right.len() {
        (left, right)
    } else {
        (right, left)
    };
    shorter.chars().count() >= MIN_FIRST_NAME_CONTAINMENT_CHARS && longer.contains(shorter)
}

/// Splits a normalized name into words longer than one character.
fn significant_words(normalized: &str) -> Vec<&str> {
    normalized
        .split_whitespace()
        .filter(|word| word.chars().count() > 1)
        .collect()
}

/// Last names correspond when equal, or when the shorter one (4+ chars) is
/// contained in the longer one ("culver" vs "culvers").
fn last_names_correspond(left: &str, right: &str) -> bool {
    if left == right {
        return true;
    }
    let (shorter, longer) = if left.len() <= right.len() {
        (left, right)
    } else {
        (right, left)
    };
    shorter.chars().count() >= MIN_LAST_NAME_CONTAINMENT_CHARS && longer.contains(shorter)
}

fn starts_with_initials(value: &str) -> bool {
    INITIALS_PREFIX_RE.is_match(value.trim_start())
}
