//! Bidirectional given-name to nickname lookup.
//!
//! # Responsibility
//! - Hold the nickname table as an injectable, versionable resource.
//! - Answer lookups in both directions for alias generation and matching.
//!
//! # Invariants
//! - Keys and nicknames are stored lowercase and trimmed.
//! - Both directions are always rebuilt together, so they never drift.

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const BUNDLED_NICKNAMES_JSON: &str = include_str!("nicknames.json");

static BUNDLED_TABLE: Lazy<NicknameTable> = Lazy::new(|| {
    NicknameTable::from_json_str(BUNDLED_NICKNAMES_JSON).expect("bundled nickname table is valid")
});

/// Nickname table load/validation errors.
#[derive(Debug)]
pub enum NicknameTableError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    /// A given name or nickname is blank after trimming.
    EmptyName,
}

impl Display for NicknameTableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read nickname table `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid nickname table json: {err}"),
            Self::EmptyName => write!(f, "nickname table contains a blank name"),
        }
    }
}

impl Error for NicknameTableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::EmptyName => None,
        }
    }
}

impl From<serde_json::Error> for NicknameTableError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Closed given-name to nickname table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NicknameTable {
    by_full_name: BTreeMap<String, BTreeSet<String>>,
    by_nickname: BTreeMap<String, BTreeSet<String>>,
}

impl NicknameTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table shipped with the crate.
    pub fn bundled() -> Self {
        BUNDLED_TABLE.clone()
    }

    /// Parses a JSON object of `{"full name": ["nick", ...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, NicknameTableError> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        Self::from_map(raw)
    }

    /// Loads a JSON table from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NicknameTableError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| NicknameTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Builds a table from a plain map, normalizing every entry.
    pub fn from_map(raw: BTreeMap<String, Vec<String>>) -> Result<Self, NicknameTableError> {
        let mut table = Self::new();
        for (full_name, nicknames) in raw {
            table.insert(&full_name, nicknames.iter().map(String::as_str))?;
        }
        Ok(table)
    }

    /// Adds nicknames for one given name.
    pub fn insert<'a>(
        &mut self,
        full_name: &str,
        nicknames: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), NicknameTableError> {
        let full_name = normalize_entry(full_name)?;
        for nickname in nicknames {
            let nickname = normalize_entry(nickname)?;
            if nickname == full_name {
                continue;
            }
            self.by_full_name
                .entry(full_name.clone())
                .or_default()
                .insert(nickname.clone());
            self.by_nickname
                .entry(nickname)
                .or_default()
                .insert(full_name.clone());
        }
        Ok(())
    }

    /// Merges every entry of `other` into this table.
    pub fn merge(&mut self, other: &NicknameTable) {
        for (full_name, nicknames) in &other.by_full_name {
            for nickname in nicknames {
                self.by_full_name
                    .entry(full_name.clone())
                    .or_default()
                    .insert(nickname.clone());
                self.by_nickname
                    .entry(nickname.clone())
                    .or_default()
                    .insert(full_name.clone());
            }
        }
    }

    /// Number of given names with at least one nickname.
    pub fn len(&self) -> usize {
        self.by_full_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_full_name.is_empty()
    }

    /// Nicknames of a given name (empty when the token is not a key).
    pub fn nicknames_of<'a>(&'a self, full_name: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.by_full_name
            .get(full_name)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Given names a nickname may stand for.
    pub fn full_names_of<'a>(&'a self, nickname: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.by_nickname
            .get(nickname)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Returns the token together with every name it is interchangeable with.
    pub fn variants(&self, token: &str) -> BTreeSet<String> {
        let mut variants = BTreeSet::new();
        variants.insert(token.to_string());
        variants.extend(self.nicknames_of(token).map(str::to_string));
        variants.extend(self.full_names_of(token).map(str::to_string));
        variants
    }

    /// Returns whether two tokens share a nickname-expanded variant.
    pub fn are_variants(&self, left: &str, right: &str) -> bool {
        if left == right {
            return true;
        }
        let left_variants = self.variants(left);
        self.variants(right)
            .iter()
            .any(|variant| left_variants.contains(variant))
    }
}

fn normalize_entry(value: &str) -> Result<String, NicknameTableError> {
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(NicknameTableError::EmptyName);
    }
    Ok(normalized)
}
