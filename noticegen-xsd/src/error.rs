//! Error types for schema parsing and sorting.

use noticegen_model::ModelError;
use thiserror::Error;

/// Errors produced while resolving schema order or sorting a document.
#[derive(Debug, Error)]
pub enum SortError {
    /// A schema file could not be read.
    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    /// A schema file is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A name or value in a schema file is not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The embedded version identifier is missing or malformed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The document carries no version identifier element.
    #[error("document has no embedded SDK version identifier")]
    MissingVersion,

    /// The document was authored against a different SDK version than the
    /// sorter was constructed for.
    #[error("SDK version mismatch: sorter is for {expected}, document has {found}")]
    VersionMismatch {
        /// Version the sorter was constructed for.
        expected: String,
        /// Version embedded in the document.
        found: String,
    },
}
