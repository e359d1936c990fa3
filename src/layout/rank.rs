//! Rank assignment: back-edge removal, then longest path from the sources.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use tracing::trace;

use super::LayoutError;
use super::graph::IndexedGraph;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unseen,
    OnStack,
    Done,
}

/// Edges that close a cycle, as edge indices.
///
/// Depth-first from every source in input order, then from any node not yet
/// reached (nodes on a cycle with no source). An edge into a node still on
/// the DFS stack is a back-edge; self-loops always are.
pub(super) fn back_edges(graph: &IndexedGraph<'_>) -> FxHashSet<usize> {
    let mut state = vec![Visit::Unseen; graph.len()];
    let mut back = FxHashSet::default();
    let mut stack: Vec<(usize, usize)> = Vec::new();

    let sources = (0..graph.len()).filter(|&n| graph.in_degree[n] == 0);
    for root in sources.chain(0..graph.len()) {
        if state[root] != Visit::Unseen {
            continue;
        }
        state[root] = Visit::OnStack;
        stack.push((root, 0));

        while let Some(&(node, cursor)) = stack.last() {
            let Some(&edge) = graph.outgoing[node].get(cursor) else {
                state[node] = Visit::Done;
                stack.pop();
                continue;
            };
            let top = stack.len() - 1;
            stack[top].1 += 1;

            let target = graph.edges[edge].1;
            match state[target] {
                Visit::OnStack => {
                    back.insert(edge);
                }
                Visit::Unseen => {
                    state[target] = Visit::OnStack;
                    stack.push((target, 0));
                }
                Visit::Done => {}
            }
        }
    }
    back
}

/// Longest-path rank per node, ignoring `back` edges. Nodes with no
/// incoming forward edge sit at rank 0.
pub(super) fn assign_ranks(
    graph: &IndexedGraph<'_>,
    back: &FxHashSet<usize>,
) -> Result<Vec<usize>, LayoutError> {
    let n = graph.len();
    let mut remaining = vec![0usize; n];
    for (i, &(_, target)) in graph.edges.iter().enumerate() {
        if !back.contains(&i) {
            remaining[target] += 1;
        }
    }

    let mut rank = vec![0usize; n];
    let mut queue: VecDeque<usize> = (0..n).filter(|&v| remaining[v] == 0).collect();
    let mut placed = 0;
    while let Some(node) = queue.pop_front() {
        placed += 1;
        trace!(node = %graph.nodes[node].id, rank = rank[node], "ranked");
        for &edge in &graph.outgoing[node] {
            if back.contains(&edge) {
                continue;
            }
            let target = graph.edges[edge].1;
            rank[target] = rank[target].max(rank[node] + 1);
            remaining[target] -= 1;
            if remaining[target] == 0 {
                queue.push_back(target);
            }
        }
    }

    if placed < n {
        let stuck = (0..n).find(|&v| remaining[v] > 0).unwrap_or_default();
        return Err(LayoutError::UnresolvedCycle {
            id: graph.nodes[stuck].id.clone(),
        });
    }
    Ok(rank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutEdge, LayoutNode};

    fn nodes(ids: &[&str]) -> Vec<LayoutNode> {
        ids.iter().map(|id| LayoutNode::new(*id, 10.0, 10.0)).collect()
    }

    fn edges(pairs: &[(&str, &str)]) -> Vec<LayoutEdge> {
        pairs.iter().map(|(s, t)| LayoutEdge::new(*s, *t)).collect()
    }

    #[test]
    fn test_longest_path_wins() {
        let n = nodes(&["a", "b", "c"]);
        let e = edges(&[("a", "b"), ("b", "c"), ("a", "c")]);
        let graph = IndexedGraph::build(&n, &e).unwrap();
        let back = back_edges(&graph);
        assert!(back.is_empty());
        assert_eq!(assign_ranks(&graph, &back).unwrap(), [0, 1, 2]);
    }

    #[test]
    fn test_loop_edge_is_not_rank_determining() {
        let n = nodes(&["start", "check", "body", "end"]);
        let e = edges(&[
            ("start", "check"),
            ("check", "body"),
            ("body", "check"),
            ("check", "end"),
        ]);
        let graph = IndexedGraph::build(&n, &e).unwrap();
        let back = back_edges(&graph);
        assert_eq!(back.iter().copied().collect::<Vec<_>>(), [2]);
        assert_eq!(assign_ranks(&graph, &back).unwrap(), [0, 1, 2, 2]);
    }

    #[test]
    fn test_sourceless_cycle_and_self_loop() {
        let n = nodes(&["a", "b", "lonely"]);
        let e = edges(&[("a", "b"), ("b", "a"), ("lonely", "lonely")]);
        let graph = IndexedGraph::build(&n, &e).unwrap();
        let back = back_edges(&graph);
        assert!(back.contains(&1));
        assert!(back.contains(&2));
        assert_eq!(assign_ranks(&graph, &back).unwrap(), [0, 1, 0]);
    }
}
