//! Entity diagrams: relationship inference from attribute names, then layout.

use rustc_hash::FxHashMap;
use tracing::debug;

use super::{LayoutConfig, LayoutEdge, LayoutNode, layout};
use crate::base::{Id, Positions};
use crate::model::Entity;

const REFERENCE_SUFFIX: &str = "Id";

/// An edge guessed from naming: `target` has an attribute named after
/// `source` plus `Id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationship {
    /// The referenced entity.
    pub source: Id,
    /// The entity owning the referencing attribute.
    pub target: Id,
    pub via_attribute: String,
}

#[derive(Clone, Debug, Default)]
pub struct EntityDiagram {
    pub positions: Positions,
    pub relationships: Vec<Relationship>,
}

/// Relationships implied by `<Name>Id` attributes.
///
/// A heuristic: references named differently are missed, and a
/// coincidental name match produces a relationship that does not exist.
/// Matching is case-sensitive, a bare `Id` attribute never matches, and an
/// entity never references itself. With duplicate entity names the first
/// one wins.
pub fn infer_relationships(entities: &[Entity]) -> Vec<Relationship> {
    let mut by_name: FxHashMap<&str, &Entity> = FxHashMap::default();
    for entity in entities {
        by_name.entry(entity.name.as_str()).or_insert(entity);
    }

    let mut relationships = Vec::new();
    for owner in entities {
        for attribute in &owner.attributes {
            let Some(stem) = attribute.name.strip_suffix(REFERENCE_SUFFIX) else {
                continue;
            };
            if stem.is_empty() {
                continue;
            }
            if let Some(referenced) = by_name.get(stem).filter(|r| r.id != owner.id) {
                relationships.push(Relationship {
                    source: referenced.id.clone(),
                    target: owner.id.clone(),
                    via_attribute: attribute.name.clone(),
                });
            }
        }
    }
    relationships
}

/// Lay out `entities` as cards whose height grows with their attribute
/// count, connected by [`infer_relationships`].
pub fn layout_entity_graph(entities: &[Entity], config: &LayoutConfig) -> EntityDiagram {
    let sizing = &config.sizing;
    let nodes: Vec<LayoutNode> = entities
        .iter()
        .map(|e| {
            LayoutNode::new(
                e.id.clone(),
                sizing.entity_width,
                sizing.entity_height(e.attributes.len()),
            )
        })
        .collect();

    let relationships = infer_relationships(entities);
    let edges: Vec<LayoutEdge> = relationships
        .iter()
        .map(|r| LayoutEdge::new(r.source.clone(), r.target.clone()))
        .collect();
    debug!(
        entities = entities.len(),
        relationships = relationships.len(),
        "entity diagram"
    );

    EntityDiagram {
        positions: layout(&nodes, &edges, config),
        relationships,
    }
}
