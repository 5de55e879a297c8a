//! Place caption matching.
//!
//! # Invariants
//! - Sentinel captions (`TBD`, `Unknown`, blank) never attempt a match.
//! - An exact normalized hit anywhere in the registry beats containment.

use crate::model::entity::CanonicalEntity;
use crate::model::link::{Confidence, EntityMatch};
use crate::names::normalize::normalize_name;
use crate::registry::Registry;

const SENTINEL_LOCATIONS: &[&str] = &["tbd", "unknown"];

/// Returns whether a caption is a placeholder rather than a location.
///
/// Sentinels are neither matched nor reported as unmatched.
pub fn is_sentinel_location(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty()
        || SENTINEL_LOCATIONS
            .iter()
            .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
}

/// Resolves a raw location caption against every place in the registry.
pub fn match_place(raw_location: &str, registry: &Registry) -> Option<EntityMatch> {
    if is_sentinel_location(raw_location) {
        return None;
    }
    let normalized = normalize_name(raw_location);
    if normalized.is_empty() {
        return None;
    }

    let exact = registry
        .places()
        .find(|place| normalize_name(&place.display_name) == normalized);
    if let Some(place) = exact {
        return Some(to_match(place, Confidence::Confirmed));
    }

    registry
        .places()
        .find(|place| contains_either_way(&normalized, place))
        .map(|place| to_match(place, Confidence::Likely))
}

fn contains_either_way(normalized: &str, place: &CanonicalEntity) -> bool {
    let candidate = normalize_name(&place.display_name);
    if !candidate.is_empty() && (normalized.contains(&candidate) || candidate.contains(normalized)) {
        return true;
    }

    let slug_words = place.slug.replace('-', " ");
    let slug_words = slug_words.trim();
    !slug_words.is_empty() && (normalized.contains(slug_words) || slug_words.contains(normalized))
}

fn to_match(place: &CanonicalEntity, confidence: Confidence) -> EntityMatch {
    EntityMatch {
        id: place.id,
        slug: place.slug.clone(),
        confidence,
    }
}
