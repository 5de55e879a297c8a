//! In-memory registry snapshot.
//!
//! # Responsibility
//! - Hold the canonical entities one engine invocation resolves against.
//! - Validate snapshot-level invariants once, at construction.
//!
//! # Invariants
//! - Slugs are unique per `EntityKind` and non-blank.
//! - Iteration order is the snapshot order; matchers rely on it for ties.

use crate::model::entity::{CanonicalEntity, EntityKind};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Registry construction/load errors.
#[derive(Debug)]
pub enum RegistryError {
    EmptySlug { kind: EntityKind },
    EmptyName { kind: EntityKind, slug: String },
    DuplicateSlug { kind: EntityKind, slug: String },
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySlug { kind } => write!(f, "{kind} entity has an empty slug"),
            Self::EmptyName { kind, slug } => {
                write!(f, "{kind} `{slug}` has an empty display name")
            }
            Self::DuplicateSlug { kind, slug } => {
                write!(f, "duplicate {kind} slug in registry: {slug}")
            }
            Self::Io { path, source } => {
                write!(f, "failed to read registry `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid registry json: {err}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Validated snapshot of every canonical entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entities: Vec<CanonicalEntity>,
}

impl Registry {
    /// Builds a registry, rejecting blank or duplicate slugs.
    pub fn new(entities: Vec<CanonicalEntity>) -> Result<Self, RegistryError> {
        let mut seen = BTreeSet::new();
        for entity in &entities {
            let kind = entity.kind();
            if entity.slug.trim().is_empty() {
                return Err(RegistryError::EmptySlug { kind });
            }
            if entity.display_name.trim().is_empty() {
                return Err(RegistryError::EmptyName {
                    kind,
                    slug: entity.slug.clone(),
                });
            }
            if !seen.insert((kind, entity.slug.clone())) {
                return Err(RegistryError::DuplicateSlug {
                    kind,
                    slug: entity.slug.clone(),
                });
            }
        }
        Ok(Self { entities })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a JSON array of entities.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let entities: Vec<CanonicalEntity> = serde_json::from_str(json)?;
        Self::new(entities)
    }

    /// Loads a JSON snapshot from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn entities(&self) -> &[CanonicalEntity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates entities of one kind in snapshot order.
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &CanonicalEntity> + '_ {
        self.entities
            .iter()
            .filter(move |entity| entity.kind() == kind)
    }

    pub fn people(&self) -> impl Iterator<Item = &CanonicalEntity> + '_ {
        self.of_kind(EntityKind::Person)
    }

    pub fn places(&self) -> impl Iterator<Item = &CanonicalEntity> + '_ {
        self.of_kind(EntityKind::Place)
    }

    /// Looks up one entity by kind and slug.
    pub fn find(&self, kind: EntityKind, slug: &str) -> Option<&CanonicalEntity> {
        self.of_kind(kind).find(|entity| entity.slug == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::{Registry, RegistryError};
    use crate::model::entity::{CanonicalEntity, EntityKind};

    #[test]
    fn same_slug_is_allowed_across_kinds() {
        let registry = Registry::new(vec![
            CanonicalEntity::person("orcas", "Orcas Smith"),
            CanonicalEntity::place("orcas", "Orcas"),
        ])
        .unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.find(EntityKind::Place, "orcas").is_some());
    }

    #[test]
    fn duplicate_slug_within_kind_is_rejected() {
        let err = Registry::new(vec![
            CanonicalEntity::person("ken-culver", "Ken Culver"),
            CanonicalEntity::person("ken-culver", "Kenneth Culver"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateSlug {
                kind: EntityKind::Person,
                ..
            }
        ));
    }

    #[test]
    fn blank_display_name_is_rejected() {
        let err = Registry::new(vec![CanonicalEntity::topic("fishing", "  ")]).unwrap_err();
        assert!(matches!(err, RegistryError::EmptyName { .. }));
    }

    #[test]
    fn from_json_reads_flat_tagged_entities() {
        let json = r#"[
            {
                "id": "11111111-2222-4333-8444-555555555555",
                "type": "person",
                "slug": "ken-culver",
                "display_name": "Ken Culver",
                "biography": "Ran the lodge.",
                "related_pages": [
                    {"type": "place", "slug": "point-lawrence-lodge", "name": "Point Lawrence Lodge"}
                ]
            },
            {
                "id": "11111111-2222-4333-8444-666666666666",
                "type": "place",
                "slug": "point-lawrence-lodge",
                "display_name": "Point Lawrence Lodge"
            }
        ]"#;

        let registry = Registry::from_json_str(json).unwrap();
        let ken = registry.find(EntityKind::Person, "ken-culver").unwrap();
        assert!(ken.links_to(EntityKind::Place, "point-lawrence-lodge"));
        assert_eq!(ken.searchable_text(), "Ran the lodge.");
        assert_eq!(registry.places().count(), 1);
    }
}
