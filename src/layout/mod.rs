//! Layered (top-to-bottom) layout for flow and entity diagrams.
//!
//! ```text
//! nodes + edges ─▶ IndexedGraph ─▶ back_edges ─▶ assign_ranks ─▶ order_ranks ─▶ coordinates
//! ```
//!
//! 1. **Ranks**: longest path from the sources, with cycle-closing edges
//!    left out of the computation.
//! 2. **Order**: barycenter sweeps within each rank, seeded by input order.
//! 3. **Coordinates**: a rank sits below the tallest node of the rank
//!    above plus `rank_gap`; nodes in a rank are packed left to right with
//!    `node_gap` between them and the rank is centered against the widest.
//!
//! Public functions never fail. Any [`LayoutError`] is logged and replaced
//! by the identity layout, where every node sits at the origin.

mod config;
mod entity;
mod error;
mod graph;
mod order;
mod rank;

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::base::{Id, Point, Positions};
use crate::model::{FlowEdge, FlowNode};
use graph::IndexedGraph;

pub use config::{ConfigError, LayoutConfig, NodeSizing};
pub use entity::{EntityDiagram, Relationship, infer_relationships, layout_entity_graph};
pub use error::LayoutError;

/// A node to place, with the size it will be rendered at.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub id: Id,
    pub width: f64,
    pub height: f64,
}

impl LayoutNode {
    pub fn new(id: impl Into<Id>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutEdge {
    pub source: Id,
    pub target: Id,
}

impl LayoutEdge {
    pub fn new(source: impl Into<Id>, target: impl Into<Id>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Top-left position for every node, keyed by id in input order.
///
/// Deterministic for a given node and edge order. Falls back to the
/// identity layout when the input is inconsistent (unknown edge endpoint,
/// duplicate id, bad size) or `config` holds a negative or non-finite
/// setting.
pub fn layout(nodes: &[LayoutNode], edges: &[LayoutEdge], config: &LayoutConfig) -> Positions {
    match try_layout(nodes, edges, config) {
        Ok(positions) => positions,
        Err(err) => {
            warn!(%err, nodes = nodes.len(), "layout failed; placing every node at the origin");
            identity(nodes)
        }
    }
}

/// Lay out a flow graph with nominal flow-node sizes.
///
/// Imported flows take node ids from the editor's names, so they may repeat
/// an id or link to a node that is not there. Only the first node with a
/// given id is placed, and edges with an endpoint outside `nodes` are
/// dropped, so such a flow still gets a real layout.
pub fn layout_flow(nodes: &[FlowNode], edges: &[FlowEdge], config: &LayoutConfig) -> Positions {
    let sizing = &config.sizing;
    let mut known: FxHashSet<&str> = FxHashSet::default();
    let layout_nodes: Vec<LayoutNode> = nodes
        .iter()
        .filter(|n| known.insert(n.id.as_str()))
        .map(|n| LayoutNode::new(n.id.clone(), sizing.flow_width, sizing.flow_height))
        .collect();
    if layout_nodes.len() < nodes.len() {
        debug!(
            duplicates = nodes.len() - layout_nodes.len(),
            "placing only the first flow node per id"
        );
    }

    let layout_edges: Vec<LayoutEdge> = edges
        .iter()
        .filter(|e| known.contains(e.source.as_str()) && known.contains(e.target.as_str()))
        .map(|e| LayoutEdge::new(e.source.clone(), e.target.clone()))
        .collect();
    if layout_edges.len() < edges.len() {
        debug!(dropped = edges.len() - layout_edges.len(), "ignoring dangling flow edges for layout");
    }

    layout(&layout_nodes, &layout_edges, config)
}

fn identity(nodes: &[LayoutNode]) -> Positions {
    nodes.iter().map(|n| (n.id.clone(), Point::ORIGIN)).collect()
}

fn try_layout(
    nodes: &[LayoutNode],
    edges: &[LayoutEdge],
    config: &LayoutConfig,
) -> Result<Positions, LayoutError> {
    if let Some(field) = config.out_of_range() {
        return Err(LayoutError::InvalidConfig { field });
    }
    let graph = IndexedGraph::build(nodes, edges)?;
    let back = rank::back_edges(&graph);
    let ranks = rank::assign_ranks(&graph, &back)?;
    let layers = order::order_ranks(&graph, &ranks, config.ordering_passes);
    debug!(
        nodes = nodes.len(),
        ranks = layers.len(),
        back_edges = back.len(),
        "layered layout"
    );
    coordinates(nodes, &layers, config)
}

fn coordinates(
    nodes: &[LayoutNode],
    layers: &[Vec<usize>],
    config: &LayoutConfig,
) -> Result<Positions, LayoutError> {
    let layer_width = |layer: &Vec<usize>| {
        let widths: f64 = layer.iter().map(|&n| nodes[n].width).sum();
        widths + config.node_gap * layer.len().saturating_sub(1) as f64
    };
    let widest = layers.iter().map(layer_width).fold(0.0, f64::max);

    let mut points = vec![Point::ORIGIN; nodes.len()];
    let mut y = 0.0;
    for layer in layers {
        let mut x = (widest - layer_width(layer)) / 2.0;
        for &n in layer {
            points[n] = Point::new(x, y);
            x += nodes[n].width + config.node_gap;
        }
        let tallest = layer.iter().map(|&n| nodes[n].height).fold(0.0, f64::max);
        y += tallest + config.rank_gap;
    }

    nodes
        .iter()
        .zip(points)
        .map(|(node, point)| {
            if point.x.is_finite() && point.y.is_finite() {
                Ok((node.id.clone(), point))
            } else {
                Err(LayoutError::NonFiniteCoordinate { id: node.id.clone() })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FlowStep;

    fn square(id: &str) -> LayoutNode {
        LayoutNode::new(id, 100.0, 60.0)
    }

    #[test]
    fn test_chain_stacks_vertically() {
        let nodes = [square("a"), square("b")];
        let edges = [LayoutEdge::new("a", "b")];
        let positions = layout(&nodes, &edges, &LayoutConfig::flow());
        assert_eq!(positions["a"], Point::new(0.0, 0.0));
        assert_eq!(positions["b"], Point::new(0.0, 110.0));
    }

    #[test]
    fn test_rank_is_centered_against_widest() {
        let nodes = [square("root"), square("left"), square("right")];
        let edges = [LayoutEdge::new("root", "left"), LayoutEdge::new("root", "right")];
        let positions = layout(&nodes, &edges, &LayoutConfig::flow());
        // widest rank: 100 + 50 + 100 = 250
        assert_eq!(positions["root"], Point::new(75.0, 0.0));
        assert_eq!(positions["left"], Point::new(0.0, 110.0));
        assert_eq!(positions["right"], Point::new(150.0, 110.0));
    }

    #[test]
    fn test_unknown_endpoint_gives_identity() {
        let nodes = [square("a"), square("b")];
        let edges = [LayoutEdge::new("a", "ghost")];
        let positions = layout(&nodes, &edges, &LayoutConfig::flow());
        assert!(positions.values().all(|p| *p == Point::ORIGIN));
        assert_eq!(positions.len(), 2);
    }

    #[test]
    fn test_invalid_size_gives_identity() {
        let nodes = [square("a"), LayoutNode::new("b", f64::NAN, 10.0)];
        let positions = layout(&nodes, &[], &LayoutConfig::flow());
        assert!(positions.values().all(|p| *p == Point::ORIGIN));
    }

    #[test]
    fn test_errors_are_reported_by_the_fallible_core() {
        let nodes = [square("a"), square("a")];
        assert_eq!(
            try_layout(&nodes, &[], &LayoutConfig::flow()),
            Err(LayoutError::DuplicateNode { id: Id::new("a") })
        );
    }

    #[test]
    fn test_layout_flow_ignores_dangling_edges() {
        let nodes = [
            FlowNode::new("s", FlowStep::Start),
            FlowNode::new("e", FlowStep::End),
        ];
        let edges = [FlowEdge::new("s", "e"), FlowEdge::new("e", "missing")];
        let positions = layout_flow(&nodes, &edges, &LayoutConfig::flow());
        assert_eq!(positions["e"].y, 110.0);
    }

    #[test]
    fn test_negative_gap_gives_identity() {
        let nodes = [square("root"), square("a"), square("b")];
        let edges = [LayoutEdge::new("root", "a"), LayoutEdge::new("root", "b")];
        let config = LayoutConfig {
            node_gap: -80.0,
            ..LayoutConfig::flow()
        };
        assert_eq!(
            try_layout(&nodes, &edges, &config),
            Err(LayoutError::InvalidConfig { field: "node_gap" })
        );
        let positions = layout(&nodes, &edges, &config);
        assert!(positions.values().all(|p| *p == Point::ORIGIN));
    }

    #[test]
    fn test_layout_flow_places_first_of_repeated_ids() {
        let nodes = [
            FlowNode::new("a", FlowStep::Start),
            FlowNode::new("a", FlowStep::Aggregate),
            FlowNode::new("b", FlowStep::End),
        ];
        let edges = [FlowEdge::new("a", "b")];
        let positions = layout_flow(&nodes, &edges, &LayoutConfig::flow());
        assert_eq!(positions.len(), 2);
        assert_eq!(positions["a"], Point::new(0.0, 0.0));
        assert_eq!(positions["b"], Point::new(0.0, 110.0));
    }

    #[test]
    fn test_empty_graph() {
        assert!(layout(&[], &[], &LayoutConfig::flow()).is_empty());
    }
}
