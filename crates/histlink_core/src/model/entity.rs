//! Canonical entity model.
//!
//! # Responsibility
//! - Define the person/place/topic records the engine resolves text against.
//! - Keep curator-entered links (`related_pages`, family lists) as plain data.
//!
//! # Invariants
//! - `slug` is unique per `EntityKind` inside one registry snapshot.
//! - The engine only reads entities; edits are owned by external handlers.
//! - `kind()` is derived from `details`, so the two can never disagree.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one canonical entity.
pub type EntityId = Uuid;

/// Category of a canonical entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Place,
    Topic,
}

impl EntityKind {
    /// Stable lowercase string used in storage and wire payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Place => "place",
            Self::Topic => "topic",
        }
    }

    /// Parses the stable lowercase string form.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "person" => Some(Self::Person),
            "place" => Some(Self::Place),
            "topic" => Some(Self::Topic),
            _ => None,
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Curator-entered link from one entity page to another.
///
/// Stored as an ordered list on the source entity. It is not symmetrized:
/// the target only links back if its own list is edited too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedPage {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub slug: String,
    pub name: String,
}

/// Lightweight reference to an entity, as returned in backlink buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub slug: String,
    pub name: String,
}

/// One entry of a family relation list.
///
/// Seed data mostly carries display-name strings; curated records may point
/// at a registry entry by slug instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FamilyMember {
    Name(String),
    Entity { slug: String },
}

impl FamilyMember {
    /// Returns the display-name string when this entry is a plain name.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name.as_str()),
            Self::Entity { .. } => None,
        }
    }
}

/// Structured family relations of one person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRecord {
    #[serde(default)]
    pub parents: Vec<FamilyMember>,
    #[serde(default)]
    pub spouses: Vec<FamilyMember>,
    #[serde(default)]
    pub children: Vec<FamilyMember>,
    #[serde(default)]
    pub siblings: Vec<FamilyMember>,
}

impl FamilyRecord {
    /// Iterates every member together with its relation label.
    pub fn members(&self) -> impl Iterator<Item = (&'static str, &FamilyMember)> {
        let parents = self.parents.iter().map(|member| ("parent", member));
        let spouses = self.spouses.iter().map(|member| ("spouse", member));
        let children = self.children.iter().map(|member| ("child", member));
        let siblings = self.siblings.iter().map(|member| ("sibling", member));
        parents.chain(spouses).chain(children).chain(siblings)
    }

    /// Returns whether any member refers to the given entity, either by exact
    /// display-name equality or by slug reference.
    pub fn refers_to(&self, display_name: &str, slug: &str) -> bool {
        self.members().any(|(_, member)| match member {
            FamilyMember::Name(name) => name == display_name,
            FamilyMember::Entity { slug: member_slug } => member_slug == slug,
        })
    }
}

/// Free-text content section of a place or topic page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub body: String,
}

/// Kind-specific auxiliary fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityDetails {
    Person {
        #[serde(default)]
        family: Option<FamilyRecord>,
        #[serde(default)]
        biography: Option<String>,
        #[serde(default)]
        connection: Option<String>,
        #[serde(default)]
        misc: Option<String>,
    },
    Place {
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        sections: Vec<ContentSection>,
    },
    Topic {
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        sections: Vec<ContentSection>,
    },
}

impl EntityDetails {
    fn empty(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Person => Self::Person {
                family: None,
                biography: None,
                connection: None,
                misc: None,
            },
            EntityKind::Place => Self::Place {
                description: None,
                sections: Vec::new(),
            },
            EntityKind::Topic => Self::Topic {
                description: None,
                sections: Vec::new(),
            },
        }
    }
}

/// Canonical registry record for a person, place or topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEntity {
    pub id: EntityId,
    pub slug: String,
    pub display_name: String,
    #[serde(default)]
    pub related_pages: Vec<RelatedPage>,
    #[serde(flatten)]
    pub details: EntityDetails,
}

impl CanonicalEntity {
    /// Creates an entity with a generated id and empty auxiliary fields.
    pub fn new(kind: EntityKind, slug: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            slug: slug.into(),
            display_name: display_name.into(),
            related_pages: Vec::new(),
            details: EntityDetails::empty(kind),
        }
    }

    pub fn person(slug: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(EntityKind::Person, slug, display_name)
    }

    pub fn place(slug: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(EntityKind::Place, slug, display_name)
    }

    pub fn topic(slug: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(EntityKind::Topic, slug, display_name)
    }

    pub fn kind(&self) -> EntityKind {
        match self.details {
            EntityDetails::Person { .. } => EntityKind::Person,
            EntityDetails::Place { .. } => EntityKind::Place,
            EntityDetails::Topic { .. } => EntityKind::Topic,
        }
    }

    /// Returns a lightweight reference to this entity.
    pub fn to_ref(&self) -> EntityRef {
        EntityRef {
            kind: self.kind(),
            slug: self.slug.clone(),
            name: self.display_name.clone(),
        }
    }

    /// Returns the structured family record for people, if any.
    pub fn family(&self) -> Option<&FamilyRecord> {
        match &self.details {
            EntityDetails::Person { family, .. } => family.as_ref(),
            _ => None,
        }
    }

    /// Returns whether this entity's curator-entered links name the target.
    pub fn links_to(&self, kind: EntityKind, slug: &str) -> bool {
        self.related_pages
            .iter()
            .any(|page| page.kind == kind && page.slug == slug)
    }

    /// Concatenates the free-text fields that mention scanning searches.
    ///
    /// People contribute biography/connection/misc; places and topics
    /// contribute their description plus every section heading and body.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        match &self.details {
            EntityDetails::Person {
                biography,
                connection,
                misc,
                ..
            } => {
                parts.extend(
                    [biography, connection, misc]
                        .into_iter()
                        .filter_map(|value| value.as_deref()),
                );
            }
            EntityDetails::Place {
                description,
                sections,
            }
            | EntityDetails::Topic {
                description,
                sections,
            } => {
                parts.extend(description.as_deref());
                for section in sections {
                    parts.push(section.heading.as_str());
                    parts.push(section.body.as_str());
                }
            }
        }

        parts
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Builder-style helper for attaching a curator-entered related page.
    pub fn with_related_page(mut self, target: &CanonicalEntity) -> Self {
        self.related_pages.push(RelatedPage {
            kind: target.kind(),
            slug: target.slug.clone(),
            name: target.display_name.clone(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{CanonicalEntity, ContentSection, EntityDetails, EntityKind, FamilyMember};

    #[test]
    fn kind_follows_details_variant() {
        assert_eq!(CanonicalEntity::person("a", "A").kind(), EntityKind::Person);
        assert_eq!(CanonicalEntity::place("b", "B").kind(), EntityKind::Place);
        assert_eq!(CanonicalEntity::topic("c", "C").kind(), EntityKind::Topic);
    }

    #[test]
    fn searchable_text_joins_place_description_and_sections() {
        let mut place = CanonicalEntity::place("lodge", "Lodge");
        place.details = EntityDetails::Place {
            description: Some("Resort on the point.".to_string()),
            sections: vec![ContentSection {
                heading: "Owners".to_string(),
                body: "Run by the Culver family.".to_string(),
            }],
        };

        let text = place.searchable_text();
        assert!(text.contains("Resort on the point."));
        assert!(text.contains("Owners"));
        assert!(text.contains("Culver family"));
    }

    #[test]
    fn family_member_deserializes_from_name_or_slug() {
        let members: Vec<FamilyMember> =
            serde_json::from_str(r#"["Ruth Culver", {"slug": "ken-culver"}]"#).unwrap();
        assert_eq!(members[0].name(), Some("Ruth Culver"));
        assert_eq!(
            members[1],
            FamilyMember::Entity {
                slug: "ken-culver".to_string()
            }
        );
    }
}
