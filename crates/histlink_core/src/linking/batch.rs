//! Batch linking of raw extracted records.
//!
//! # Responsibility
//! - Resolve every fragment of every raw record against one registry snapshot.
//! - Collect unresolved fragments for manual curation.
//!
//! # Invariants
//! - One candidate per (source, target kind, target slug); the strongest
//!   confidence wins.
//! - Unmatched fragments are unique per kind and keep first-seen order.
//! - Sentinel locations are neither linked nor reported.
//! - Accumulation is a pure fold; no step mutates shared state.

use crate::date::parse_date;
use crate::matching::{is_sentinel_location, match_person, match_place};
use crate::mention::AliasMatcher;
use crate::model::date::ParsedDate;
use crate::model::entity::{CanonicalEntity, EntityKind};
use crate::model::link::{
    Confidence, EntityMatch, FragmentKind, LinkCandidate, SourceKind, SourceRef,
    UnmatchedFragment,
};
use crate::model::record::{NormalizedRecord, RawRecord};
use crate::names::aliases::generate_aliases;
use crate::names::nicknames::NicknameTable;
use crate::registry::Registry;
use log::debug;
use serde::{Deserialize, Serialize};

pub const BODY_MENTION_NOTE: &str = "mentioned in body";

/// Parsed date attached to one source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedSource {
    pub source: SourceRef,
    pub date: ParsedDate,
}

/// Links found for one record, before merging into a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordLinks {
    pub candidates: Vec<LinkCandidate>,
    pub unmatched: Vec<UnmatchedFragment>,
    pub date: Option<DatedSource>,
}

/// Accumulated output of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkBatch {
    pub candidates: Vec<LinkCandidate>,
    pub unmatched: Vec<UnmatchedFragment>,
    pub dates: Vec<DatedSource>,
}

impl LinkBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one record's links, returning the grown batch.
    pub fn absorb(self, links: RecordLinks) -> Self {
        let RecordLinks {
            candidates,
            unmatched,
            date,
        } = links;
        let batch = candidates
            .into_iter()
            .fold(self, |batch, candidate| batch.with_candidate(candidate));
        let mut batch = unmatched
            .into_iter()
            .fold(batch, |batch, fragment| batch.with_unmatched(fragment));
        if let Some(date) = date {
            batch.dates.retain(|existing| existing.source != date.source);
            batch.dates.push(date);
        }
        batch
    }

    /// Adds a candidate, upgrading an existing one with the same key when the
    /// new confidence is stronger.
    pub fn with_candidate(mut self, candidate: LinkCandidate) -> Self {
        match self
            .candidates
            .iter_mut()
            .find(|existing| existing.key() == candidate.key())
        {
            Some(existing) if candidate.confidence > existing.confidence => *existing = candidate,
            Some(_) => {}
            None => self.candidates.push(candidate),
        }
        self
    }

    pub fn with_unmatched(mut self, fragment: UnmatchedFragment) -> Self {
        if !self.unmatched.contains(&fragment) {
            self.unmatched.push(fragment);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty() && self.unmatched.is_empty() && self.dates.is_empty()
    }

    /// Candidates whose confidence is at least `floor`.
    pub fn candidates_at_least(&self, floor: Confidence) -> impl Iterator<Item = &LinkCandidate> {
        self.candidates
            .iter()
            .filter(move |candidate| candidate.confidence >= floor)
    }
}

/// Links every record against the registry.
pub fn link_records(
    records: &[RawRecord],
    registry: &Registry,
    nicknames: &NicknameTable,
) -> LinkBatch {
    let linker = RecordLinker::new(registry, nicknames);
    records
        .iter()
        .fold(LinkBatch::new(), |batch, record| batch.absorb(linker.link(record)))
}

/// Registry-bound linker that compiles person alias patterns once.
pub struct RecordLinker<'r> {
    registry: &'r Registry,
    nicknames: &'r NicknameTable,
    people: Vec<(&'r CanonicalEntity, AliasMatcher)>,
}

impl<'r> RecordLinker<'r> {
    pub fn new(registry: &'r Registry, nicknames: &'r NicknameTable) -> Self {
        let people = registry
            .people()
            .map(|person| {
                let aliases = generate_aliases(&person.display_name, nicknames);
                (person, AliasMatcher::new(&aliases))
            })
            .collect();
        Self {
            registry,
            nicknames,
            people,
        }
    }

    /// Resolves one raw record.
    pub fn link(&self, record: &RawRecord) -> RecordLinks {
        let normalized = record.normalize();
        let mut links = RecordLinks::default();

        for fragment in &normalized.person_fragments {
            match match_person(fragment, self.registry, self.nicknames) {
                Some(found) => links.candidates.push(candidate(
                    &normalized.source,
                    EntityKind::Person,
                    found,
                    fragment,
                    None,
                )),
                None => links.unmatched.push(unmatched(FragmentKind::Person, fragment)),
            }
        }

        for fragment in &normalized.location_fragments {
            if is_sentinel_location(fragment) {
                continue;
            }
            match match_place(fragment, self.registry) {
                Some(found) => links.candidates.push(candidate(
                    &normalized.source,
                    EntityKind::Place,
                    found,
                    fragment,
                    None,
                )),
                None => links.unmatched.push(unmatched(FragmentKind::Place, fragment)),
            }
        }

        for fragment in &normalized.relation_fragments {
            let Some(found) = match_person(&fragment.text, self.registry, self.nicknames) else {
                links
                    .unmatched
                    .push(unmatched(FragmentKind::Person, &fragment.text));
                continue;
            };
            if is_self_reference(&normalized.source, &found) {
                continue;
            }
            links.candidates.push(candidate(
                &normalized.source,
                EntityKind::Person,
                found,
                &fragment.text,
                Some(format!("family:{}", fragment.relation)),
            ));
        }

        links.candidates.extend(self.body_mentions(&normalized));

        links.date = normalized.date_text.as_deref().map(|text| DatedSource {
            source: normalized.source.clone(),
            date: parse_date(text),
        });

        debug!(
            "event=link_record module=linking status=ok source_kind={} candidates={} unmatched={}",
            normalized.source.kind.as_str(),
            links.candidates.len(),
            links.unmatched.len()
        );
        links
    }

    /// People named in clipping prose by a multi-word alias.
    fn body_mentions(&self, record: &NormalizedRecord) -> Vec<LinkCandidate> {
        let Some(body) = record.body.as_deref() else {
            return Vec::new();
        };
        self.people
            .iter()
            .filter_map(|(person, matcher)| {
                let mention = matcher.first_multi_word_mention(body)?;
                Some(LinkCandidate {
                    source: record.source.clone(),
                    target_kind: EntityKind::Person,
                    target_slug: person.slug.clone(),
                    confidence: Confidence::Likely,
                    matched_text: body[mention.start..mention.end].to_string(),
                    note: Some(BODY_MENTION_NOTE.to_string()),
                })
            })
            .collect()
    }
}

fn is_self_reference(source: &SourceRef, found: &EntityMatch) -> bool {
    source.kind == SourceKind::Person && source.id == found.slug
}

fn candidate(
    source: &SourceRef,
    target_kind: EntityKind,
    found: EntityMatch,
    fragment: &str,
    note: Option<String>,
) -> LinkCandidate {
    LinkCandidate {
        source: source.clone(),
        target_kind,
        target_slug: found.slug,
        confidence: found.confidence,
        matched_text: fragment.to_string(),
        note,
    }
}

fn unmatched(kind: FragmentKind, text: &str) -> UnmatchedFragment {
    UnmatchedFragment {
        kind,
        text: text.to_string(),
    }
}
