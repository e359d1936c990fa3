//! Diagram coordinates.
//!
//! Layout output is the top-left corner of a node's box; the rendering
//! side is free to translate it (e.g. to a center anchor).
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Id;

/// Node positions keyed by node id, in node input order.
pub type Positions = IndexMap<Id, Point>;

/// A point in diagram space. `y` grows downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset by half a box so the point becomes the box center.
    pub fn centered(self, width: f64, height: f64) -> Self {
        Self {
            x: self.x + width / 2.0,
            y: self.y + height / 2.0,
        }
    }
}
