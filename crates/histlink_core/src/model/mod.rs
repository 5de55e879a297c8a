//! Domain model for the entity resolution engine.
//!
//! # Responsibility
//! - Define canonical entities, parsed dates, link payloads and raw records.
//! - Keep every shape serde-serializable for seed jobs and query handlers.
//!
//! # Invariants
//! - Entities are identified by a stable `EntityId` and a per-kind slug.
//! - Derived values (alias sets, backlinks) are never stored on the model.

pub mod date;
pub mod entity;
pub mod link;
pub mod record;
