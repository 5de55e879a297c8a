//! Name normalization and alias expansion.
//!
//! # Responsibility
//! - Canonicalize display names for comparison.
//! - Expand names into alias sets using an injected nickname table.
//!
//! # Invariants
//! - Alias sets are derived on demand and never persisted.

pub mod aliases;
pub mod nicknames;
pub mod normalize;

pub use aliases::{generate_aliases, AliasSet};
pub use nicknames::{NicknameTable, NicknameTableError};
pub use normalize::{normalize_name, slugify};
