//! Raw extracted records fed to batch linking.
//!
//! # Responsibility
//! - Give each seed source (photo, clipping, person page) an explicit shape.
//! - Normalize every shape once into `NormalizedRecord` before matching.
//!
//! # Invariants
//! - Normalized fragments are trimmed and never empty.
//! - Splitting is purely lexical; no registry lookups happen here.

use crate::model::entity::FamilyRecord;
use crate::model::link::{SourceKind, SourceRef};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PEOPLE_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*(?:[,;&/\n]|\band\b)\s*").expect("valid people separator regex")
});
static LOCATION_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[;\n]\s*").expect("valid location separator regex"));

/// Raw record extracted by a seed/import job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawRecord {
    /// Scanned photograph with free-text caption fields.
    Photo {
        id: String,
        #[serde(default)]
        people: String,
        #[serde(default)]
        location: String,
        #[serde(default)]
        date: String,
    },
    /// Digitized newspaper clipping.
    News {
        id: String,
        #[serde(default)]
        headline: String,
        #[serde(default)]
        body: String,
        #[serde(default)]
        people: String,
        #[serde(default)]
        date: String,
    },
    /// Biographical page whose family lists should resolve to people.
    Person {
        slug: String,
        #[serde(default)]
        family: FamilyRecord,
    },
}

/// Person fragment taken from a family relation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationFragment {
    pub relation: &'static str,
    pub text: String,
}

/// Uniform view of a raw record consumed by the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub source: SourceRef,
    pub person_fragments: Vec<String>,
    pub location_fragments: Vec<String>,
    pub relation_fragments: Vec<RelationFragment>,
    pub date_text: Option<String>,
    /// Prose scanned for mentions (clipping headline + body).
    pub body: Option<String>,
}

impl RawRecord {
    pub fn source(&self) -> SourceRef {
        match self {
            Self::Photo { id, .. } => SourceRef::new(SourceKind::Photo, id.trim()),
            Self::News { id, .. } => SourceRef::new(SourceKind::News, id.trim()),
            Self::Person { slug, .. } => SourceRef::new(SourceKind::Person, slug.trim()),
        }
    }

    /// Normalizes the record into fragments ready for matching.
    pub fn normalize(&self) -> NormalizedRecord {
        let source = self.source();
        match self {
            Self::Photo {
                people,
                location,
                date,
                ..
            } => NormalizedRecord {
                source,
                person_fragments: split_people(people),
                location_fragments: split_locations(location),
                relation_fragments: Vec::new(),
                date_text: non_blank(date),
                body: None,
            },
            Self::News {
                headline,
                body,
                people,
                date,
                ..
            } => {
                let prose = [headline.trim(), body.trim()]
                    .into_iter()
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n");
                NormalizedRecord {
                    source,
                    person_fragments: split_people(people),
                    location_fragments: Vec::new(),
                    relation_fragments: Vec::new(),
                    date_text: non_blank(date),
                    body: non_blank(&prose),
                }
            }
            Self::Person { family, .. } => NormalizedRecord {
                source,
                person_fragments: Vec::new(),
                location_fragments: Vec::new(),
                relation_fragments: family
                    .members()
                    .filter_map(|(relation, member)| {
                        let text = member.name()?.trim();
                        (!text.is_empty()).then(|| RelationFragment {
                            relation,
                            text: text.to_string(),
                        })
                    })
                    .collect(),
                date_text: None,
                body: None,
            },
        }
    }
}

/// Splits a free-text "people present" field into name fragments.
pub fn split_people(value: &str) -> Vec<String> {
    split_with(&PEOPLE_SEPARATOR_RE, value)
}

/// Splits a location caption into place fragments.
///
/// Commas stay inside a fragment; captions like "Point Lawrence Lodge,
/// Orcas Island" describe one place.
pub fn split_locations(value: &str) -> Vec<String> {
    split_with(&LOCATION_SEPARATOR_RE, value)
}

fn split_with(separator: &Regex, value: &str) -> Vec<String> {
    separator
        .split(value)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
