//! Flow graphs: the procedural steps of a logic action.
//!
//! A [`FlowNode`]'s payload lives in its [`FlowStep`] variant, so a node can
//! only ever carry the fields that belong to its type tag.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::base::{Id, Point, Positions};

// ============================================================================
// STEPS
// ============================================================================

/// One `variable = value` line of an Assign node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub variable: String,
    pub value: String,
}

impl Assignment {
    pub fn new(variable: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            value: value.into(),
        }
    }
}

/// The type tag of a flow node together with its type-specific payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FlowStep {
    Start,
    End,
    Assign {
        assignments: Vec<Assignment>,
    },
    If {
        /// Written as element text; leading and trailing whitespace does not
        /// survive an export and re-import.
        condition: String,
    },
    Switch {
        /// The switched-on expression; may be empty.
        variable: String,
        cases: Vec<String>,
    },
    ExecuteServerAction {
        action_name: String,
    },
    RunServerAction {
        action_name: String,
    },
    RunClientAction {
        action_name: String,
    },
    Aggregate,
    #[serde(rename = "SQL")]
    Sql {
        query: String,
    },
    JavaScript {
        code: String,
    },
    ForEach {
        record_list: String,
    },
    Comment {
        text: String,
    },
    RaiseException {
        exception: String,
        message: String,
    },
    Message {
        message: String,
        msg_type: String,
    },
    Download,
    Destination,
    /// A node type this crate has no payload rules for.
    Other {
        tag: String,
    },
}

impl FlowStep {
    /// The external type tag (element label) of this step.
    pub fn tag(&self) -> &str {
        match self {
            Self::Start => "Start",
            Self::End => "End",
            Self::Assign { .. } => "Assign",
            Self::If { .. } => "If",
            Self::Switch { .. } => "Switch",
            Self::ExecuteServerAction { .. } => "ExecuteServerAction",
            Self::RunServerAction { .. } => "RunServerAction",
            Self::RunClientAction { .. } => "RunClientAction",
            Self::Aggregate => "Aggregate",
            Self::Sql { .. } => "SQL",
            Self::JavaScript { .. } => "JavaScript",
            Self::ForEach { .. } => "ForEach",
            Self::Comment { .. } => "Comment",
            Self::RaiseException { .. } => "RaiseException",
            Self::Message { .. } => "Message",
            Self::Download => "Download",
            Self::Destination => "Destination",
            Self::Other { tag } => tag,
        }
    }

    /// Name of the action invoked by an Execute/Run step.
    pub fn called_action(&self) -> Option<&str> {
        match self {
            Self::ExecuteServerAction { action_name }
            | Self::RunServerAction { action_name }
            | Self::RunClientAction { action_name } => Some(action_name),
            _ => None,
        }
    }
}

// ============================================================================
// NODES AND EDGES
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: Id,
    /// Display label; defaults to the type tag.
    pub label: String,
    pub position: Point,
    pub step: FlowStep,
}

impl FlowNode {
    /// A node at the origin, labelled with its type tag.
    pub fn new(id: impl Into<Id>, step: FlowStep) -> Self {
        Self {
            id: id.into(),
            label: step.tag().to_string(),
            position: Point::ORIGIN,
            step,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn tag(&self) -> &str {
        self.step.tag()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub id: Id,
    pub source: Id,
    pub target: Id,
    /// Conventionally `True`/`False` on branches, or a switch-case value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FlowEdge {
    pub fn new(source: impl Into<Id>, target: impl Into<Id>) -> Self {
        Self {
            id: Id::generate(),
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Which end of an edge failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Target,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// An edge endpoint referencing a node that is not in the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DanglingEdge {
    pub edge: Id,
    pub endpoint: Endpoint,
    pub missing: Id,
}

// ============================================================================
// GRAPH
// ============================================================================

/// Directed, possibly cyclic, possibly disconnected node/edge set owned by
/// one logic action.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: FlowNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_edge(mut self, edge: FlowEdge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    /// Every edge endpoint that does not reference a node of this graph,
    /// in edge order (source checked before target).
    pub fn dangling_edges(&self) -> Vec<DanglingEdge> {
        let known: FxHashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut dangling = Vec::new();
        for edge in &self.edges {
            for (endpoint, id) in [(Endpoint::Source, &edge.source), (Endpoint::Target, &edge.target)] {
                if !known.contains(id.as_str()) {
                    dangling.push(DanglingEdge {
                        edge: edge.id.clone(),
                        endpoint,
                        missing: id.clone(),
                    });
                }
            }
        }
        dangling
    }

    /// True when every edge endpoint resolves to a node of this graph.
    pub fn is_structurally_complete(&self) -> bool {
        self.dangling_edges().is_empty()
    }

    /// A copy of this graph with node positions taken from `positions`.
    /// Nodes missing from the map keep their current position.
    pub fn with_positions(&self, positions: &Positions) -> FlowGraph {
        let mut graph = self.clone();
        for node in &mut graph.nodes {
            if let Some(point) = positions.get(&node.id) {
                node.position = *point;
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch_graph() -> FlowGraph {
        FlowGraph::new()
            .with_node(FlowNode::new("Start", FlowStep::Start))
            .with_node(FlowNode::new(
                "Check",
                FlowStep::If {
                    condition: "x > 1".into(),
                },
            ))
            .with_node(FlowNode::new("End", FlowStep::End))
            .with_edge(FlowEdge::new("Start", "Check"))
            .with_edge(FlowEdge::new("Check", "End").with_label("True"))
    }

    #[test]
    fn test_complete_graph_has_no_dangling_edges() {
        let graph = branch_graph();
        assert!(graph.is_structurally_complete());
        assert!(graph.dangling_edges().is_empty());
    }

    #[test]
    fn test_dangling_target_is_reported() {
        let graph = branch_graph().with_edge(FlowEdge::new("Check", "Nowhere").with_label("False"));
        let dangling = graph.dangling_edges();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].endpoint, Endpoint::Target);
        assert_eq!(dangling[0].missing.as_str(), "Nowhere");
        assert!(!graph.is_structurally_complete());
    }

    #[test]
    fn test_step_tags_match_external_labels() {
        assert_eq!(FlowStep::Sql { query: String::new() }.tag(), "SQL");
        assert_eq!(FlowStep::Other { tag: "Wait".into() }.tag(), "Wait");
        assert_eq!(FlowNode::new("n1", FlowStep::Download).label, "Download");
    }

    #[test]
    fn test_with_positions_leaves_original_untouched() {
        let graph = branch_graph();
        let mut positions = Positions::default();
        positions.insert(Id::new("Check"), Point::new(10.0, 110.0));

        let placed = graph.with_positions(&positions);
        assert_eq!(placed.node("Check").map(|n| n.position), Some(Point::new(10.0, 110.0)));
        assert_eq!(placed.node("Start").map(|n| n.position), Some(Point::ORIGIN));
        assert_eq!(graph.node("Check").map(|n| n.position), Some(Point::ORIGIN));
    }
}
