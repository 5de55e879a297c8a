//! Link candidates, match results and backlink payloads.
//!
//! # Invariants
//! - `Confidence` is ordered `Uncertain < Likely < Confirmed`.
//! - `BacklinkResult` buckets are deduplicated by slug and sorted by display
//!   name (see `linking::backlinks`).

use crate::model::entity::{EntityId, EntityKind, EntityRef};
use serde::{Deserialize, Serialize};

/// Coarse, non-probabilistic certainty label for an automatic match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Uncertain,
    Likely,
    Confirmed,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uncertain => "uncertain",
            Self::Likely => "likely",
            Self::Confirmed => "confirmed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "uncertain" => Some(Self::Uncertain),
            "likely" => Some(Self::Likely),
            "confirmed" => Some(Self::Confirmed),
            _ => None,
        }
    }
}

/// Registry entry resolved from a raw text fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMatch {
    pub id: EntityId,
    pub slug: String,
    pub confidence: Confidence,
}

/// Kind of source document a link originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Photo,
    News,
    Person,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::News => "news",
            Self::Person => "person",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "photo" => Some(Self::Photo),
            "news" => Some(Self::News),
            "person" => Some(Self::Person),
            _ => None,
        }
    }
}

/// Identity of the document or entity a link starts from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    pub kind: SourceKind,
    pub id: String,
}

impl SourceRef {
    pub fn new(kind: SourceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// One resolved link, written into junction storage by batch runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCandidate {
    pub source: SourceRef,
    #[serde(rename = "target_type")]
    pub target_kind: EntityKind,
    pub target_slug: String,
    pub confidence: Confidence,
    /// Raw fragment (or alias) that produced this link.
    pub matched_text: String,
    pub note: Option<String>,
}

impl LinkCandidate {
    /// Identity used for de-duplication inside one batch.
    pub fn key(&self) -> (&SourceRef, EntityKind, &str) {
        (&self.source, self.target_kind, self.target_slug.as_str())
    }
}

/// Kind of raw fragment that failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    Person,
    Place,
}

impl FragmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Place => "place",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "person" => Some(Self::Person),
            "place" => Some(Self::Place),
            _ => None,
        }
    }
}

/// Raw fragment kept for manual curation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnmatchedFragment {
    pub kind: FragmentKind,
    pub text: String,
}

/// Entities that reference a target, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklinkResult {
    pub people: Vec<EntityRef>,
    pub places: Vec<EntityRef>,
    pub topics: Vec<EntityRef>,
}

impl BacklinkResult {
    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.places.is_empty() && self.topics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.people.len() + self.places.len() + self.topics.len()
    }

    /// Returns whether any bucket contains the given slug of the given kind.
    pub fn contains(&self, kind: EntityKind, slug: &str) -> bool {
        self.bucket(kind).iter().any(|entry| entry.slug == slug)
    }

    pub fn bucket(&self, kind: EntityKind) -> &[EntityRef] {
        match kind {
            EntityKind::Person => &self.people,
            EntityKind::Place => &self.places,
            EntityKind::Topic => &self.topics,
        }
    }
}
