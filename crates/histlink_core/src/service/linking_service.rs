//! Linking use-case service.
//!
//! # Responsibility
//! - Run batch linking and persist its output through a `LinkRepository`.
//! - Serve backlink queries for read-time handlers.
//!
//! # Invariants
//! - The service never edits canonical entities; it only reads the registry
//!   snapshot it is handed.
//! - A failed persist leaves the previous run's rows in place.

use crate::linking::backlinks::{compute_backlinks, BacklinkOptions};
use crate::linking::batch::link_records;
use crate::model::entity::EntityKind;
use crate::model::link::{BacklinkResult, Confidence, LinkCandidate};
use crate::model::record::RawRecord;
use crate::names::nicknames::NicknameTable;
use crate::registry::Registry;
use crate::repo::link_repo::{LinkRepository, RepoError, RepoResult};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Errors surfaced by linking service entry points.
#[derive(Debug)]
pub enum LinkingServiceError {
    Repo(RepoError),
}

impl Display for LinkingServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "link store failure: {err}"),
        }
    }
}

impl Error for LinkingServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for LinkingServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Summary of one persisted batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub records: usize,
    pub links: usize,
    pub confirmed: usize,
    pub likely: usize,
    pub uncertain: usize,
    pub unmatched: usize,
    pub dated_sources: usize,
}

/// Use-case service wrapper around a link repository.
pub struct LinkingService<R: LinkRepository> {
    repo: R,
    nicknames: NicknameTable,
}

impl<R: LinkRepository> LinkingService<R> {
    /// Creates a service using the bundled nickname table.
    pub fn new(repo: R) -> Self {
        Self::with_nicknames(repo, NicknameTable::bundled())
    }

    pub fn with_nicknames(repo: R, nicknames: NicknameTable) -> Self {
        Self { repo, nicknames }
    }

    pub fn nicknames(&self) -> &NicknameTable {
        &self.nicknames
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Links every record against `registry` and replaces stored rows.
    ///
    /// # Side effects
    /// - Clears and regenerates every derived row.
    /// - Emits `batch_link` events with counts and duration.
    pub fn run_batch(
        &self,
        registry: &Registry,
        records: &[RawRecord],
    ) -> Result<BatchReport, LinkingServiceError> {
        let started_at = Instant::now();
        info!(
            "event=batch_link module=service status=start records={} registry_size={}",
            records.len(),
            registry.len()
        );

        let batch = link_records(records, registry, &self.nicknames);
        let stored = match self.repo.replace_all(&batch) {
            Ok(stored) => stored,
            Err(err) => {
                error!(
                    "event=batch_link module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        let count_at = |confidence: Confidence| {
            batch
                .candidates
                .iter()
                .filter(|candidate| candidate.confidence == confidence)
                .count()
        };
        let report = BatchReport {
            records: records.len(),
            links: stored.links,
            confirmed: count_at(Confidence::Confirmed),
            likely: count_at(Confidence::Likely),
            uncertain: count_at(Confidence::Uncertain),
            unmatched: stored.unmatched,
            dated_sources: stored.dates,
        };

        info!(
            "event=batch_link module=service status=ok duration_ms={} links={} unmatched={} dated_sources={}",
            started_at.elapsed().as_millis(),
            report.links,
            report.unmatched,
            report.dated_sources
        );
        Ok(report)
    }

    /// Entities that reference `(kind, slug)` in the registry snapshot.
    pub fn backlinks(
        &self,
        kind: EntityKind,
        slug: &str,
        registry: &Registry,
        options: &BacklinkOptions,
    ) -> BacklinkResult {
        let started_at = Instant::now();
        let result = compute_backlinks(kind, slug, registry, options, &self.nicknames);
        info!(
            "event=backlinks module=service status=ok target_kind={} include_mentions={} results={} duration_ms={}",
            kind.as_str(),
            options.include_mentions,
            result.len(),
            started_at.elapsed().as_millis()
        );
        result
    }

    /// Stored links whose target is `(kind, slug)`, from the last batch run.
    pub fn sources_linking_to(&self, kind: EntityKind, slug: &str) -> RepoResult<Vec<LinkCandidate>> {
        self.repo.links_for_target(kind, slug)
    }
}
