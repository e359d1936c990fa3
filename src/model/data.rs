//! Data-layer values: entities, their attributes, and typed variables.

use serde::{Deserialize, Serialize};

use crate::base::Id;

// ============================================================================
// DATA TYPES
// ============================================================================

/// The closed set of internal data types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    #[default]
    Text,
    Integer,
    LongInteger,
    Decimal,
    Boolean,
    DateTime,
    Date,
    Binary,
    Identifier,
    Record,
    List,
}

impl DataType {
    pub const ALL: [DataType; 11] = [
        Self::Text,
        Self::Integer,
        Self::LongInteger,
        Self::Decimal,
        Self::Boolean,
        Self::DateTime,
        Self::Date,
        Self::Binary,
        Self::Identifier,
        Self::Record,
        Self::List,
    ];

    /// Canonical external label, as written by the exporter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Integer => "Integer",
            Self::LongInteger => "LongInteger",
            Self::Decimal => "Decimal",
            Self::Boolean => "Boolean",
            Self::DateTime => "DateTime",
            Self::Date => "Date",
            Self::Binary => "Binary",
            Self::Identifier => "Identifier",
            Self::Record => "Record",
            Self::List => "List",
        }
    }

    /// Only text carries a meaningful length.
    pub fn has_length(&self) -> bool {
        matches!(self, Self::Text)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ENTITIES
// ============================================================================

/// A record schema owned by a module.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: Id,
    /// Owning module; assigned by the caller of the importer.
    pub module_id: Id,
    pub name: String,
    pub description: String,
    pub is_static: bool,
    pub is_public: bool,
    pub attributes: Vec<Attribute>,
}

impl Entity {
    pub fn new(module_id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: Id::generate(),
            module_id: module_id.into(),
            name: name.into(),
            description: String::new(),
            is_static: false,
            is_public: false,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Attributes flagged as part of the primary key. The model does not
    /// require exactly one.
    pub fn identifiers(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.is_identifier)
    }
}

/// A column of an [`Entity`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: Id,
    pub name: String,
    pub data_type: DataType,
    /// Meaningful only for [`DataType::Text`].
    pub length: Option<u32>,
    pub is_mandatory: bool,
    pub is_identifier: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: Id::generate(),
            name: name.into(),
            data_type,
            length: None,
            is_mandatory: false,
            is_identifier: false,
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.is_mandatory = true;
        self
    }

    pub fn identifier(mut self) -> Self {
        self.is_identifier = true;
        self
    }
}

// ============================================================================
// VARIABLES
// ============================================================================

/// An action parameter or a flow-local variable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: Id,
    pub name: String,
    pub data_type: DataType,
    pub is_list: bool,
    pub is_mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Variable {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: Id::generate(),
            name: name.into(),
            data_type,
            is_list: false,
            is_mandatory: false,
            description: None,
        }
    }

    pub fn mandatory(mut self) -> Self {
        self.is_mandatory = true;
        self
    }

    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_text_has_length() {
        for dt in DataType::ALL {
            assert_eq!(dt.has_length(), dt == DataType::Text, "{dt}");
        }
    }

    #[test]
    fn test_entity_identifiers_preserves_multiple_keys() {
        let entity = Entity::new("m1", "OrderLine")
            .with_attribute(Attribute::new("OrderId", DataType::LongInteger).identifier())
            .with_attribute(Attribute::new("LineNo", DataType::Integer).identifier())
            .with_attribute(Attribute::new("Qty", DataType::Integer));

        let keys: Vec<_> = entity.identifiers().map(|a| a.name.as_str()).collect();
        assert_eq!(keys, ["OrderId", "LineNo"]);
    }
}
