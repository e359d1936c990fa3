//! # butler-core
//!
//! Clipboard-markup interchange and diagram layout for low-code models:
//! data entities and logic actions whose bodies are flow graphs.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! layout       → layered layout, entity relationship inference
//!   ↓
//! interchange  → clipboard XML import/export, type mapping
//!   ↓
//! model        → Entity, LogicAction, FlowGraph, FlowStep
//!   ↓
//! base         → Id, Point, Positions
//! ```
//!
//! Every operation is a pure function over in-memory values; nothing here
//! keeps state between calls.

// ============================================================================
// MODULES (dependency order: base → model → interchange → layout)
// ============================================================================

/// Foundation types: identifiers and positions
pub mod base;

/// Typed graph model: entities, actions, flows
pub mod model;

/// Clipboard markup: import, export, type mapping
pub mod interchange;

/// Layered layout for flow and entity diagrams
pub mod layout;

// The four entry points used by the editor.
pub use interchange::{ImportResult, ParseError, export, import};
pub use layout::{EntityDiagram, LayoutConfig, layout, layout_entity_graph, layout_flow};

pub use base::{Id, Point, Positions};
