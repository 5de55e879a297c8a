//! Word-boundary-safe mention detection.
//!
//! # Responsibility
//! - Answer "does this text mention this entity" for one direction.
//!
//! # Invariants
//! - Every alias is matched case-insensitively between word boundaries, so
//!   an alias never matches inside a longer word.

pub mod scanner;

pub use scanner::{mentions, AliasMatcher, Mention};
