//! Error types for metadata lookups and conceptual model construction.

use thiserror::Error;

/// Errors produced while loading SDK metadata or building the conceptual tree.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A visual item references a field id absent from the SDK field table.
    #[error("unknown field id: {id}")]
    UnknownField {
        /// The unresolved field identifier.
        id: String,
    },

    /// A visual item or a parent chain references a node id absent from the
    /// SDK node table.
    #[error("unknown node id: {id}")]
    UnknownNode {
        /// The unresolved node identifier.
        id: String,
    },

    /// The same field id appears twice in the field table.
    #[error("duplicate field id: {id}")]
    DuplicateField {
        /// The repeated field identifier.
        id: String,
    },

    /// The same node id appears twice in the node table.
    #[error("duplicate node id: {id}")]
    DuplicateNode {
        /// The repeated node identifier.
        id: String,
    },

    /// The node table has no root (a node without a parent id).
    #[error("node table has no root node")]
    NoRootNode,

    /// The node table declares more than one root.
    #[error("node table has multiple root nodes: {first} and {second}")]
    MultipleRootNodes {
        /// First root encountered.
        first: String,
        /// Second root encountered.
        second: String,
    },

    /// A node is its own ancestor, either directly in the metadata or through
    /// an attachment that would nest a node id inside itself.
    #[error("node {node_id} is its own ancestor")]
    SelfReference {
        /// The offending node identifier.
        node_id: String,
    },

    /// Walking a node's parent chain never reached the expected ancestor.
    #[error("node {node_id} is not reachable from {ancestor}")]
    DetachedNode {
        /// The node whose chain was walked.
        node_id: String,
        /// The ancestor the chain was expected to reach.
        ancestor: String,
    },

    /// The visual root is missing a node id or carries the wrong one.
    #[error("visual root must carry node id {expected}, found {found}")]
    InvalidRoot {
        /// The root node id declared by the metadata.
        expected: String,
        /// What the visual tree carried instead.
        found: String,
    },

    /// A non-root group claims the root node id, or a node without a declared
    /// parent appears below the root.
    #[error("node {node_id} without a parent appears below the root")]
    MisplacedRoot {
        /// The offending node identifier.
        node_id: String,
    },

    /// A visual item carries a zero instance counter; counters are 1-based.
    #[error("item {content_id} has a zero instance counter")]
    InvalidCounter {
        /// Content id of the offending item.
        content_id: String,
    },

    /// A mandatory metadata field or node is absent from the conceptual tree.
    #[error("notice metadata {id} is missing from the conceptual tree")]
    MissingNoticeMetadata {
        /// The well-known field or node identifier.
        id: String,
    },

    /// A version string does not match `major.minor[.patch]` or lacks the
    /// expected prefix.
    #[error("invalid SDK version: {text}")]
    InvalidVersion {
        /// The rejected version text.
        text: String,
    },

    /// The visual tree and the metadata tables come from different SDK
    /// versions.
    #[error("SDK version mismatch: visual tree has {visual}, metadata has {metadata}")]
    VersionMismatch {
        /// Version embedded in the visual tree.
        visual: String,
        /// Version the metadata tables were loaded for.
        metadata: String,
    },

    /// The notice sub type has no entry in the notice-type table.
    #[error("unknown notice sub type: {sub_type}")]
    UnknownNoticeSubType {
        /// The unresolved sub type.
        sub_type: String,
    },

    /// A notice-type entry points at a document type with no definition.
    #[error("unknown document type: {id}")]
    UnknownDocumentType {
        /// The unresolved document type identifier.
        id: String,
    },

    /// The input JSON could not be deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Creates an [`ModelError::UnknownField`] error.
    pub fn unknown_field(id: impl Into<String>) -> Self {
        Self::UnknownField { id: id.into() }
    }

    /// Creates an [`ModelError::UnknownNode`] error.
    pub fn unknown_node(id: impl Into<String>) -> Self {
        Self::UnknownNode { id: id.into() }
    }

    /// Creates a [`ModelError::SelfReference`] error.
    pub fn self_reference(node_id: impl Into<String>) -> Self {
        Self::SelfReference {
            node_id: node_id.into(),
        }
    }

    /// Creates a [`ModelError::DetachedNode`] error.
    pub fn detached_node(node_id: impl Into<String>, ancestor: impl Into<String>) -> Self {
        Self::DetachedNode {
            node_id: node_id.into(),
            ancestor: ancestor.into(),
        }
    }

    /// Creates a [`ModelError::InvalidCounter`] error.
    pub fn invalid_counter(content_id: impl Into<String>) -> Self {
        Self::InvalidCounter {
            content_id: content_id.into(),
        }
    }

    /// Creates a [`ModelError::InvalidVersion`] error.
    pub fn invalid_version(text: impl Into<String>) -> Self {
        Self::InvalidVersion { text: text.into() }
    }

    /// Creates a [`ModelError::MissingNoticeMetadata`] error.
    pub fn missing_notice_metadata(id: impl Into<String>) -> Self {
        Self::MissingNoticeMetadata { id: id.into() }
    }
}

/// Result alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
