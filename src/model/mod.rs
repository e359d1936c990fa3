//! Typed graph model shared by the importer, exporter and layout engine.
//!
//! ```text
//! Entity ── attributes: Vec<Attribute>
//! LogicAction
//! ├── inputs / outputs / locals: Vec<Variable>
//! └── flow: FlowGraph
//!     ├── nodes: Vec<FlowNode>   (FlowStep carries the type-specific payload)
//!     └── edges: Vec<FlowEdge>
//! ```
//!
//! Values are plain data: they own their children and carry no reference
//! to how they are stored or rendered.

mod action;
mod data;
mod flow;

pub use action::{ActionKind, LogicAction};
pub use data::{Attribute, DataType, Entity, Variable};
pub use flow::{Assignment, DanglingEdge, Endpoint, FlowEdge, FlowGraph, FlowNode, FlowStep};
