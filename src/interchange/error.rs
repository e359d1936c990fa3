//! Error types for interchange operations.

use thiserror::Error;

/// The document could not be read as markup.
///
/// Well-formed documents never produce this error, even when they contain
/// nothing the importer recognizes.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input bytes are not UTF-8.
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The markup reader rejected the text.
    #[error("XML error at position {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// A closing tag with no element open.
    #[error("unexpected closing tag </{0}>")]
    UnexpectedClose(String),

    /// Input ended while elements were still open.
    #[error("document ended inside <{0}>")]
    Unclosed(String),

    /// No root element at all.
    #[error("document has no root element")]
    Empty,

    /// Elements nested deeper than the reader accepts.
    #[error("elements nested more than {limit} levels deep")]
    TooDeep { limit: usize },
}

impl ParseError {
    pub(crate) fn xml(position: u64, source: impl Into<quick_xml::Error>) -> Self {
        Self::Xml {
            position,
            source: source.into(),
        }
    }
}
