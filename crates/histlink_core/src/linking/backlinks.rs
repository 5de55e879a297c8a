//! Backlink computation over a registry snapshot.
//!
//! # Responsibility
//! - Answer "which entities point at this one" for entity pages.
//! - Keep curator links primary and mention scanning opt-in.
//!
//! # Invariants
//! - The target itself never appears in its own result.
//! - Buckets are deduplicated by slug and sorted by display name
//!   (case-insensitive, slug as tiebreaker) regardless of registry order.
//! - Links are not symmetrized: `A -> B` in `A.related_pages` makes `A` a
//!   backlink of `B`, never the reverse.

use crate::mention::AliasMatcher;
use crate::model::entity::{CanonicalEntity, EntityKind, EntityRef};
use crate::model::link::BacklinkResult;
use crate::names::aliases::generate_aliases;
use crate::names::nicknames::NicknameTable;
use crate::names::normalize::collation_key;
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Strategy switches for one backlink query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklinkOptions {
    /// Also include entities whose free text mentions the target (or is
    /// mentioned by it). Off by default.
    #[serde(default)]
    pub include_mentions: bool,
}

impl BacklinkOptions {
    pub fn explicit_only() -> Self {
        Self::default()
    }

    pub fn with_mentions() -> Self {
        Self {
            include_mentions: true,
        }
    }
}

/// Computes the backlinks of `(kind, slug)` in one pass over the registry.
///
/// Unknown targets and empty registries yield an empty result.
pub fn compute_backlinks(
    kind: EntityKind,
    slug: &str,
    registry: &Registry,
    options: &BacklinkOptions,
    nicknames: &NicknameTable,
) -> BacklinkResult {
    let Some(target) = registry.find(kind, slug) else {
        return BacklinkResult::default();
    };

    let mut sources: Vec<&CanonicalEntity> = registry
        .entities()
        .iter()
        .filter(|other| !is_same_entity(other, target))
        .filter(|other| links_explicitly(other, target))
        .collect();

    if options.include_mentions {
        let target_node = RelationNode::new(target, nicknames);
        sources.extend(
            registry
                .entities()
                .iter()
                .filter(|other| !is_same_entity(other, target))
                .filter(|other| {
                    target_node.mentions_or_is_mentioned_by(&RelationNode::new(other, nicknames))
                }),
        );
    }

    into_result(sources)
}

/// Precomputed searchable text and alias matchers for a whole registry.
///
/// Use this when many backlink queries run against the same snapshot; alias
/// patterns are compiled once per entity instead of once per query.
#[derive(Debug)]
pub struct RelationGraph<'r> {
    registry: &'r Registry,
    nodes: Vec<RelationNode<'r>>,
}

impl<'r> RelationGraph<'r> {
    pub fn build(registry: &'r Registry, nicknames: &NicknameTable) -> Self {
        let nodes = registry
            .entities()
            .iter()
            .map(|entity| RelationNode::new(entity, nicknames))
            .collect();
        Self { registry, nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Same result as [`compute_backlinks`] for the graph's registry.
    pub fn backlinks_for(
        &self,
        kind: EntityKind,
        slug: &str,
        options: &BacklinkOptions,
    ) -> BacklinkResult {
        let Some(target) = self
            .nodes
            .iter()
            .find(|node| node.entity.kind() == kind && node.entity.slug == slug)
        else {
            return BacklinkResult::default();
        };

        let sources = self
            .nodes
            .iter()
            .filter(|node| !is_same_entity(node.entity, target.entity))
            .filter(|node| {
                links_explicitly(node.entity, target.entity)
                    || (options.include_mentions && target.mentions_or_is_mentioned_by(node))
            })
            .map(|node| node.entity)
            .collect();

        into_result(sources)
    }

    /// Backlinks of every entity, in registry order.
    pub fn all_backlinks(&self, options: &BacklinkOptions) -> Vec<(EntityRef, BacklinkResult)> {
        self.registry
            .entities()
            .iter()
            .map(|entity| {
                (
                    entity.to_ref(),
                    self.backlinks_for(entity.kind(), &entity.slug, options),
                )
            })
            .collect()
    }
}

#[derive(Debug)]
struct RelationNode<'r> {
    entity: &'r CanonicalEntity,
    text: String,
    matcher: AliasMatcher,
}

impl<'r> RelationNode<'r> {
    fn new(entity: &'r CanonicalEntity, nicknames: &NicknameTable) -> Self {
        Self {
            entity,
            text: entity.searchable_text(),
            matcher: AliasMatcher::new(&generate_aliases(&entity.display_name, nicknames)),
        }
    }

    /// Mention discovery runs in both directions and ORs the results.
    fn mentions_or_is_mentioned_by(&self, other: &RelationNode<'_>) -> bool {
        self.matcher.is_mentioned_in(&other.text) || other.matcher.is_mentioned_in(&self.text)
    }
}

fn is_same_entity(left: &CanonicalEntity, right: &CanonicalEntity) -> bool {
    left.kind() == right.kind() && left.slug == right.slug
}

/// Curator-entered link from `source` to `target`.
///
/// Person targets are also linked from other people whose family lists name
/// them by exact display name or by slug reference.
fn links_explicitly(source: &CanonicalEntity, target: &CanonicalEntity) -> bool {
    if source.links_to(target.kind(), &target.slug) {
        return true;
    }
    target.kind() == EntityKind::Person
        && source
            .family()
            .is_some_and(|family| family.refers_to(&target.display_name, &target.slug))
}

fn into_result(sources: Vec<&CanonicalEntity>) -> BacklinkResult {
    let mut result = BacklinkResult::default();
    let mut seen = BTreeSet::new();
    for source in sources {
        if !seen.insert((source.kind(), source.slug.as_str())) {
            continue;
        }
        let bucket = match source.kind() {
            EntityKind::Person => &mut result.people,
            EntityKind::Place => &mut result.places,
            EntityKind::Topic => &mut result.topics,
        };
        bucket.push(source.to_ref());
    }
    for bucket in [&mut result.people, &mut result.places, &mut result.topics] {
        bucket.sort_by_cached_key(|entry| (collation_key(&entry.name), entry.slug.clone()));
    }
    result
}
