//! Repository layer for derived link data.
//!
//! # Responsibility
//! - Define the storage contract the linking service depends on.
//! - Keep SQL details out of matching and orchestration code.
//!
//! # Invariants
//! - Repositories only store derived rows; canonical entities are owned by
//!   the registry snapshot and never written here.

pub mod link_repo;

pub use link_repo::{LinkRepository, RepoError, RepoResult, SqliteLinkRepository, StoredCounts};
