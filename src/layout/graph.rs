//! Index-based view of a caller's node/edge lists.

use rustc_hash::FxHashMap;

use super::{LayoutEdge, LayoutError, LayoutNode};
use crate::base::Id;

/// Nodes and edges resolved to positions in the input slices.
pub(super) struct IndexedGraph<'a> {
    pub nodes: &'a [LayoutNode],
    /// `(source, target)` node indices, in input edge order.
    pub edges: Vec<(usize, usize)>,
    /// Outgoing edge indices per node, in input edge order.
    pub outgoing: Vec<Vec<usize>>,
    pub in_degree: Vec<usize>,
}

impl<'a> IndexedGraph<'a> {
    pub fn build(nodes: &'a [LayoutNode], edges: &[LayoutEdge]) -> Result<Self, LayoutError> {
        let mut index: FxHashMap<&str, usize> = FxHashMap::default();
        index.reserve(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            let sized = |v: f64| v.is_finite() && v >= 0.0;
            if !sized(node.width) || !sized(node.height) {
                return Err(LayoutError::InvalidSize { id: node.id.clone() });
            }
            if index.insert(node.id.as_str(), i).is_some() {
                return Err(LayoutError::DuplicateNode { id: node.id.clone() });
            }
        }

        let resolve = |edge_index: usize, id: &Id| {
            index
                .get(id.as_str())
                .copied()
                .ok_or_else(|| LayoutError::UnknownEndpoint {
                    edge_index,
                    id: id.clone(),
                })
        };

        let mut resolved = Vec::with_capacity(edges.len());
        let mut outgoing = vec![Vec::new(); nodes.len()];
        let mut in_degree = vec![0; nodes.len()];
        for (i, edge) in edges.iter().enumerate() {
            let source = resolve(i, &edge.source)?;
            let target = resolve(i, &edge.target)?;
            outgoing[source].push(i);
            in_degree[target] += 1;
            resolved.push((source, target));
        }

        Ok(Self {
            nodes,
            edges: resolved,
            outgoing,
            in_degree,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Undirected adjacency without self-loops, neighbours in edge order.
    pub fn neighbours(&self) -> Vec<Vec<usize>> {
        let mut adjacent = vec![Vec::new(); self.len()];
        for &(source, target) in &self.edges {
            if source != target {
                adjacent[source].push(target);
                adjacent[target].push(source);
            }
        }
        adjacent
    }
}
