//! Common trait for model interchange formats.

use super::{ImportResult, ParseError, export, import};
use crate::model::{Entity, LogicAction};

/// Capabilities supported by a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatCapability {
    pub read: bool,
    pub write: bool,
    /// Everything written is read back unchanged.
    pub lossless: bool,
}

impl FormatCapability {
    pub const READ_WRITE: Self = Self {
        read: true,
        write: true,
        lossless: false,
    };
}

/// A serialization of entities and logic actions.
pub trait ModelFormat: Send + Sync {
    /// Human-readable name of the format.
    fn name(&self) -> &'static str;

    /// File extension(s) for this format.
    fn extensions(&self) -> &'static [&'static str];

    fn mime_type(&self) -> &'static str;

    fn capabilities(&self) -> FormatCapability;

    /// Read every entity and action in `input`, assigning them to `owner_id`.
    fn read(&self, input: &[u8], owner_id: &str) -> Result<ImportResult, ParseError>;

    fn write(&self, entities: &[Entity], actions: &[LogicAction]) -> Vec<u8>;

    /// Cheap check that `input` looks like this format, without parsing it.
    fn validate(&self, input: &[u8]) -> Result<(), ParseError> {
        let _ = input;
        Ok(())
    }
}

/// The clipboard markup exchanged with the low-code editor.
///
/// Not lossless: attribute identifiers and the Identifier/Record/List type
/// labels do not survive a round trip.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClipboardXml;

impl ModelFormat for ClipboardXml {
    fn name(&self) -> &'static str {
        "Clipboard XML"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["xml"]
    }

    fn mime_type(&self) -> &'static str {
        "application/xml"
    }

    fn capabilities(&self) -> FormatCapability {
        FormatCapability::READ_WRITE
    }

    fn read(&self, input: &[u8], owner_id: &str) -> Result<ImportResult, ParseError> {
        import(std::str::from_utf8(input)?, owner_id)
    }

    fn write(&self, entities: &[Entity], actions: &[LogicAction]) -> Vec<u8> {
        export(entities, actions).into_bytes()
    }

    fn validate(&self, input: &[u8]) -> Result<(), ParseError> {
        let text = std::str::from_utf8(input)?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        if text.trim_start().starts_with('<') {
            Ok(())
        } else {
            Err(ParseError::Empty)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_descriptor() {
        let format = ClipboardXml;
        assert_eq!(format.extensions(), &["xml"]);
        assert_eq!(format.mime_type(), "application/xml");
        assert!(format.capabilities().read);
        assert!(!format.capabilities().lossless);
    }

    #[test]
    fn test_validate_rejects_plain_text() {
        let format = ClipboardXml;
        assert!(format.validate(b"  <ClipboardData/>").is_ok());
        assert!(matches!(format.validate(b"hello"), Err(ParseError::Empty)));
        assert!(matches!(format.validate(&[0xff, 0xfe]), Err(ParseError::Encoding(_))));
    }

    #[test]
    fn test_read_write_through_trait() {
        let format: &dyn ModelFormat = &ClipboardXml;
        let written = format.write(&[Entity::new("m", "Order")], &[]);
        let read = format.read(&written, "m2").unwrap();
        assert_eq!(read.entities[0].name, "Order");
        assert_eq!(read.entities[0].module_id.as_str(), "m2");
    }
}
