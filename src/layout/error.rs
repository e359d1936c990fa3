//! Reasons a layout degrades to the identity placement.

use thiserror::Error;

use crate::base::Id;

/// Inconsistencies found while laying out a graph. Never escapes a public
/// layout function; each one degrades to the identity layout.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("edge #{edge_index} references unknown node `{id}`")]
    UnknownEndpoint { edge_index: usize, id: Id },

    #[error("node `{id}` has a negative or non-finite size")]
    InvalidSize { id: Id },

    #[error("node `{id}` appears more than once")]
    DuplicateNode { id: Id },

    #[error("cycle through `{id}` survived back-edge removal")]
    UnresolvedCycle { id: Id },

    #[error("layout setting `{field}` must be a finite, non-negative number")]
    InvalidConfig { field: &'static str },

    #[error("coordinate for `{id}` is not finite")]
    NonFiniteCoordinate { id: Id },
}
