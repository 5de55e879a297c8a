//! Resolution of raw fragments to registry entities.
//!
//! # Responsibility
//! - Resolve person and place fragments to one entity with a confidence tier.
//! - Reject ambiguous fragments instead of guessing.
//!
//! # Invariants
//! - Matching is stateless and side-effect free; unmatched fragments are
//!   collected by batch callers, not here.

pub mod person;
pub mod place;

pub use person::match_person;
pub use place::{is_sentinel_location, match_place};
