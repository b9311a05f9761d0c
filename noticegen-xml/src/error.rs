//! Error types for path parsing, XML building and serialization.

use noticegen_model::ModelError;
use thiserror::Error;

/// Errors produced while parsing a relative XML path.
#[derive(Debug, Error)]
pub enum PathError {
    /// Brackets in the path are not balanced.
    #[error("unbalanced brackets in path: {path}")]
    UnbalancedBrackets {
        /// The rejected path.
        path: String,
    },

    /// The path contains an empty segment (leading, trailing or doubled `/`).
    #[error("empty segment in path: {path}")]
    EmptySegment {
        /// The rejected path.
        path: String,
    },
}

impl PathError {
    /// Creates a [`PathError::UnbalancedBrackets`] error.
    pub fn unbalanced_brackets(path: impl Into<String>) -> Self {
        Self::UnbalancedBrackets { path: path.into() }
    }

    /// Creates a [`PathError::EmptySegment`] error.
    pub fn empty_segment(path: impl Into<String>) -> Self {
        Self::EmptySegment { path: path.into() }
    }
}

/// Errors produced while building the physical XML tree.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Metadata lookup failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A relative path could not be parsed.
    #[error(transparent)]
    Path(#[from] PathError),

    /// A node's relative path contains an attribute segment.
    #[error("node {node_id} has an attribute segment in its path: {segment}")]
    AttributeInNodePath {
        /// The offending node id.
        node_id: String,
        /// The attribute segment.
        segment: String,
    },

    /// An attribute segment appears before the end of a field path.
    #[error("field {field_id} has a non-terminal attribute segment: {segment}")]
    MisplacedAttribute {
        /// The offending field id.
        field_id: String,
        /// The attribute segment.
        segment: String,
    },

    /// A `code` field has no code list to derive its `listName` from.
    #[error("code field {field_id} has no code list id")]
    MissingCodeList {
        /// The offending field id.
        field_id: String,
    },
}

impl BuildError {
    /// Creates a [`BuildError::AttributeInNodePath`] error.
    pub fn attribute_in_node_path(node_id: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::AttributeInNodePath {
            node_id: node_id.into(),
            segment: segment.into(),
        }
    }

    /// Creates a [`BuildError::MisplacedAttribute`] error.
    pub fn misplaced_attribute(field_id: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::MisplacedAttribute {
            field_id: field_id.into(),
            segment: segment.into(),
        }
    }

    /// Creates a [`BuildError::MissingCodeList`] error.
    pub fn missing_code_list(field_id: impl Into<String>) -> Self {
        Self::MissingCodeList {
            field_id: field_id.into(),
        }
    }
}

/// Errors produced while serializing the XML tree.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The underlying writer failed.
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),

    /// The serialized bytes are not valid UTF-8.
    #[error("serialized XML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
