//! Foundation types shared by the model, interchange and layout modules.
//!
//! - [`Id`] - Opaque, globally unique identifiers
//! - [`Point`], [`Positions`] - Diagram coordinates
//!
//! This module has NO dependencies on other butler modules.

mod id;
mod position;

pub use id::Id;
pub use position::{Point, Positions};
