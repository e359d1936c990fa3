//! Logic actions: parameters plus an owned flow graph.

use serde::{Deserialize, Serialize};

use super::{FlowGraph, Variable};
use crate::base::Id;

/// Where an action runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    #[default]
    Server,
    Service,
    Client,
}

impl ActionKind {
    /// Element label used for this kind in the clipboard markup.
    pub fn element_name(&self) -> &'static str {
        match self {
            Self::Server => "ServerAction",
            Self::Service => "ServiceAction",
            Self::Client => "ClientAction",
        }
    }

    /// Kind for an action element label. Unknown labels are server actions.
    pub fn from_element_name(label: &str) -> Self {
        match label {
            "ClientAction" => Self::Client,
            "ServiceAction" => Self::Service,
            _ => Self::Server,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogicAction {
    pub id: Id,
    pub module_id: Id,
    pub name: String,
    pub kind: ActionKind,
    pub description: String,
    pub is_function: bool,
    pub is_public: bool,
    pub inputs: Vec<Variable>,
    pub outputs: Vec<Variable>,
    /// Flow-local variables.
    #[serde(default)]
    pub locals: Vec<Variable>,
    /// Human-readable one-liner describing the flow.
    pub flow_summary: String,
    pub flow: FlowGraph,
}

impl LogicAction {
    pub fn new(module_id: impl Into<Id>, name: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            id: Id::generate(),
            module_id: module_id.into(),
            name: name.into(),
            kind,
            description: String::new(),
            is_function: false,
            is_public: false,
            inputs: Vec::new(),
            outputs: Vec::new(),
            locals: Vec::new(),
            flow_summary: String::new(),
            flow: FlowGraph::default(),
        }
    }

    pub fn with_input(mut self, variable: Variable) -> Self {
        self.inputs.push(variable);
        self
    }

    pub fn with_output(mut self, variable: Variable) -> Self {
        self.outputs.push(variable);
        self
    }

    pub fn with_local(mut self, variable: Variable) -> Self {
        self.locals.push(variable);
        self
    }

    pub fn with_flow(mut self, flow: FlowGraph) -> Self {
        self.flow = flow;
        self
    }
}
