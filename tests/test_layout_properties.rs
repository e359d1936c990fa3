//! Layout guarantees: determinism, no overlap inside a rank, identity
//! fallback and relationship inference.

mod helpers;

use butler::layout::{LayoutEdge, LayoutNode, infer_relationships};
use butler::{LayoutConfig, Point, Positions, import, layout, layout_entity_graph, layout_flow};
use helpers::{MODULE, ORDER_MODULE, customer, loop_action, order};

fn diamond() -> (Vec<LayoutNode>, Vec<LayoutEdge>) {
    let nodes = vec![
        LayoutNode::new("top", 100.0, 60.0),
        LayoutNode::new("left", 140.0, 60.0),
        LayoutNode::new("right", 80.0, 90.0),
        LayoutNode::new("extra", 100.0, 60.0),
        LayoutNode::new("bottom", 100.0, 60.0),
    ];
    let edges = vec![
        LayoutEdge::new("top", "left"),
        LayoutEdge::new("top", "right"),
        LayoutEdge::new("top", "extra"),
        LayoutEdge::new("left", "bottom"),
        LayoutEdge::new("right", "bottom"),
        LayoutEdge::new("extra", "bottom"),
    ];
    (nodes, edges)
}

fn assert_no_overlap(nodes: &[LayoutNode], positions: &Positions) {
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            let (pa, pb) = (positions[&a.id], positions[&b.id]);
            if pa.y != pb.y {
                continue;
            }
            let apart = pa.x + a.width <= pb.x || pb.x + b.width <= pa.x;
            assert!(apart, "{} and {} overlap in the same rank", a.id, b.id);
        }
    }
}

#[test]
fn test_layout_is_deterministic() {
    let (nodes, edges) = diamond();
    let config = LayoutConfig::flow();
    let first = layout(&nodes, &edges, &config);
    let second = layout(&nodes, &edges, &config);
    assert_eq!(first, second);
    assert_eq!(first.keys().collect::<Vec<_>>(), nodes.iter().map(|n| &n.id).collect::<Vec<_>>());
}

#[test]
fn test_same_rank_nodes_do_not_overlap() {
    let (nodes, edges) = diamond();
    let positions = layout(&nodes, &edges, &LayoutConfig::flow());
    assert_no_overlap(&nodes, &positions);

    // The middle rank sits under the top node's height plus the gap.
    assert_eq!(positions["left"].y, 110.0);
    // The bottom rank clears the tallest middle node.
    assert_eq!(positions["bottom"].y, 110.0 + 90.0 + 50.0);
}

#[test]
fn test_malformed_edges_give_identity_layout() {
    let (nodes, mut edges) = diamond();
    edges.push(LayoutEdge::new("bottom", "nowhere"));
    let positions = layout(&nodes, &edges, &LayoutConfig::flow());
    assert_eq!(positions.len(), nodes.len());
    assert!(positions.values().all(|p| *p == Point::ORIGIN));
}

#[test]
fn test_negative_gap_gives_identity_layout() {
    let (nodes, edges) = diamond();
    let config = LayoutConfig {
        node_gap: -80.0,
        ..LayoutConfig::flow()
    };
    let positions = layout(&nodes, &edges, &config);
    assert_eq!(positions.len(), nodes.len());
    assert!(positions.values().all(|p| *p == Point::ORIGIN));
}

#[test]
fn test_cyclic_flow_is_laid_out() {
    let action = loop_action();
    let positions = layout_flow(&action.flow.nodes, &action.flow.edges, &LayoutConfig::flow());
    let y = |id: &str| positions[id].y;
    assert!(y("Start") < y("Each"));
    assert!(y("Each") < y("Bump"));
    assert_eq!(y("Bump"), y("End"));

    let placed = action.flow.with_positions(&positions);
    assert_eq!(placed.node("Each").map(|n| n.position), Some(positions["Each"]));
    assert_eq!(action.flow.node("Each").map(|n| n.position), Some(Point::ORIGIN));
}

#[test]
fn test_imported_flow_is_laid_out_without_overlap() {
    let result = import(ORDER_MODULE, MODULE).unwrap();
    let flow = &result.actions[0].flow;
    let config = LayoutConfig::flow();
    let positions = layout_flow(&flow.nodes, &flow.edges, &config);

    let nodes: Vec<_> = flow
        .nodes
        .iter()
        .map(|n| LayoutNode::new(n.id.clone(), config.sizing.flow_width, config.sizing.flow_height))
        .collect();
    assert_no_overlap(&nodes, &positions);
    assert!(positions["Start"].y < positions["End"].y);
}

#[test]
fn test_customer_order_relationship() {
    let entities = [customer(), order()];
    let relationships = infer_relationships(&entities);
    assert_eq!(relationships.len(), 1);
    assert_eq!(relationships[0].source, entities[0].id);
    assert_eq!(relationships[0].target, entities[1].id);

    let diagram = layout_entity_graph(&entities, &LayoutConfig::entity());
    assert_eq!(diagram.relationships, relationships);
    assert!(diagram.positions[&entities[0].id].y < diagram.positions[&entities[1].id].y);
}

#[test]
fn test_entity_cards_grow_with_attributes() {
    let entities = [customer(), order()];
    let config = LayoutConfig::from_json(r#"{"node_gap": 10, "rank_gap": 20}"#).unwrap();
    let diagram = layout_entity_graph(&entities, &config);
    // Customer has two attributes: 45 + 2 * 30.
    assert_eq!(diagram.positions[&entities[1].id].y, 105.0 + 20.0);
}
