//! Layout tuning: gaps, ordering effort and node sizes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid layout configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("layout setting `{field}` must be a finite, non-negative number")]
    OutOfRange { field: &'static str },
}

/// Nominal node sizes used by [`layout_flow`](super::layout_flow) and
/// [`layout_entity_graph`](super::layout_entity_graph).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSizing {
    pub flow_width: f64,
    pub flow_height: f64,
    pub entity_width: f64,
    /// Height of an entity card with no attributes.
    pub entity_header_height: f64,
    /// Added to an entity card's height per attribute.
    pub entity_row_height: f64,
}

impl Default for NodeSizing {
    fn default() -> Self {
        Self {
            flow_width: 100.0,
            flow_height: 60.0,
            entity_width: 256.0,
            entity_header_height: 45.0,
            entity_row_height: 30.0,
        }
    }
}

impl NodeSizing {
    pub fn entity_height(&self, attribute_count: usize) -> f64 {
        self.entity_header_height + self.entity_row_height * attribute_count as f64
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal gap between neighbours in one rank.
    pub node_gap: f64,
    /// Vertical gap between consecutive ranks.
    pub rank_gap: f64,
    /// Upper bound on barycenter sweeps; ordering stops early once stable.
    pub ordering_passes: usize,
    pub sizing: NodeSizing,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::flow()
    }
}

impl LayoutConfig {
    /// Spacing for logic flow diagrams.
    pub fn flow() -> Self {
        Self {
            node_gap: 50.0,
            rank_gap: 50.0,
            ordering_passes: 4,
            sizing: NodeSizing::default(),
        }
    }

    /// Wider spacing for entity diagrams, whose cards are large.
    pub fn entity() -> Self {
        Self {
            node_gap: 80.0,
            rank_gap: 100.0,
            ..Self::flow()
        }
    }

    /// Parse a (possibly partial) JSON override; absent keys keep the
    /// [`flow`](Self::flow) defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.out_of_range() {
            Some(field) => Err(ConfigError::OutOfRange { field }),
            None => Ok(()),
        }
    }

    /// First setting that is negative or not finite.
    pub(super) fn out_of_range(&self) -> Option<&'static str> {
        let s = &self.sizing;
        let fields = [
            ("node_gap", self.node_gap),
            ("rank_gap", self.rank_gap),
            ("sizing.flow_width", s.flow_width),
            ("sizing.flow_height", s.flow_height),
            ("sizing.entity_width", s.entity_width),
            ("sizing.entity_header_height", s.entity_header_height),
            ("sizing.entity_row_height", s.entity_row_height),
        ];
        fields
            .iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
            .map(|(field, _)| *field)
    }
}
