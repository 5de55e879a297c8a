//! Entity resolution and backlink engine for a community history archive.
//!
//! Resolves free-text fragments from scanned photos, clippings and
//! biographical pages (names, places, dates) to canonical registry entities,
//! and computes which entities reference one another.

pub mod config;
pub mod date;
pub mod db;
pub mod linking;
pub mod logging;
pub mod matching;
pub mod mention;
pub mod model;
pub mod names;
pub mod registry;
pub mod repo;
pub mod service;

pub use config::{ConfigError, EngineConfig};
pub use date::{format_date, parse_date};
pub use linking::{compute_backlinks, link_records, BacklinkOptions, LinkBatch, RelationGraph};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use matching::{match_person, match_place};
pub use mention::{mentions, AliasMatcher};
pub use model::date::{DatePrecision, ParsedDate};
pub use model::entity::{CanonicalEntity, EntityId, EntityKind, EntityRef, RelatedPage};
pub use model::link::{
    BacklinkResult, Confidence, EntityMatch, FragmentKind, LinkCandidate, SourceKind, SourceRef,
    UnmatchedFragment,
};
pub use model::record::RawRecord;
pub use names::{generate_aliases, normalize_name, AliasSet, NicknameTable, NicknameTableError};
pub use registry::{Registry, RegistryError};
pub use repo::{LinkRepository, RepoError, RepoResult, SqliteLinkRepository};
pub use service::{BatchReport, LinkingService, LinkingServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
