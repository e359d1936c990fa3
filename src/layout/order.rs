//! In-rank ordering by the barycenter heuristic.

use tracing::trace;

use super::graph::IndexedGraph;

/// Group nodes by rank (input order within a rank), then sweep down and up
/// reordering each rank by the mean position of its neighbours in the
/// adjacent rank. Stops after `passes` sweeps or once a sweep changes
/// nothing.
pub(super) fn order_ranks(graph: &IndexedGraph<'_>, rank: &[usize], passes: usize) -> Vec<Vec<usize>> {
    let depth = rank.iter().max().map_or(0, |max| max + 1);
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); depth];
    for (node, &r) in rank.iter().enumerate() {
        layers[r].push(node);
    }

    let neighbours = graph.neighbours();
    let mut slot = vec![0usize; graph.len()];
    index_slots(&layers, &mut slot);

    for pass in 0..passes {
        let mut changed = false;
        for r in 1..depth {
            changed |= reorder(&mut layers[r], r - 1, rank, &neighbours, &slot);
            index_slots(&layers[r..=r], &mut slot);
        }
        for r in (0..depth.saturating_sub(1)).rev() {
            changed |= reorder(&mut layers[r], r + 1, rank, &neighbours, &slot);
            index_slots(&layers[r..=r], &mut slot);
        }
        trace!(pass, changed, "barycenter sweep");
        if !changed {
            break;
        }
    }
    layers
}

fn index_slots(layers: &[Vec<usize>], slot: &mut [usize]) {
    for layer in layers {
        for (i, &node) in layer.iter().enumerate() {
            slot[node] = i;
        }
    }
}

/// Stable-sort `layer` by barycenter against the rank `toward`. A node with
/// no neighbour there keeps its current slot as its key.
fn reorder(
    layer: &mut Vec<usize>,
    toward: usize,
    rank: &[usize],
    neighbours: &[Vec<usize>],
    slot: &[usize],
) -> bool {
    let mut keyed: Vec<(f64, usize)> = layer
        .iter()
        .map(|&node| {
            let (sum, count) = neighbours[node]
                .iter()
                .filter(|&&other| rank[other] == toward)
                .fold((0.0, 0usize), |(sum, count), &other| {
                    (sum + slot[other] as f64, count + 1)
                });
            let key = if count == 0 {
                slot[node] as f64
            } else {
                sum / count as f64
            };
            (key, node)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let reordered: Vec<usize> = keyed.into_iter().map(|(_, node)| node).collect();
    let changed = reordered != *layer;
    *layer = reordered;
    changed
}
