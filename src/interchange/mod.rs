//! Clipboard markup interchange.
//!
//! Reading and writing the XML the low-code editor puts on the clipboard:
//!
//! ```text
//! ┌──────────────────┐   Document::parse   ┌──────────────┐
//! │  clipboard text  │ ──────────────────▶ │  TreeNode    │
//! └──────────────────┘                     └──────┬───────┘
//!          ▲                                      │ import (visitor)
//!          │ export                               ▼
//! ┌────────┴─────────────────────────────────────────────────┐
//! │          Vec<Entity>  +  Vec<LogicAction>                │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! [`ClipboardXml`] wraps both directions behind the [`ModelFormat`] trait.
//!
//! ## Usage
//!
//! ```ignore
//! use butler::interchange::{import, export};
//!
//! let result = import(&clipboard_text, "module-1")?;
//! let text = export(&result.entities, &result.actions);
//! ```

mod error;
mod export;
mod format;
mod import;
pub mod tree;
pub mod types;

pub use error::ParseError;
pub use export::export;
pub use format::{ClipboardXml, FormatCapability, ModelFormat};
pub use import::{ImportResult, import};
pub use tree::{Document, TreeNode};
pub use types::{external_type_label, map_external_type};
