//! SDK metadata tables.
//!
//! Each SDK version ships a field table and a node table (the `fields.json`
//! shape) plus a notice-type table mapping notice sub types to document types
//! (the `notice-types.json` shape). Nodes form a tree through `parentId`;
//! every field hangs off exactly one node through `parentNodeId`. The XML
//! location of each field and node is given as a path relative to its parent
//! node.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::ModelError;
use crate::version::SdkVersion;

/// Value type of a field, as declared in the field table.
///
/// Only `code` influences XML generation (it adds a `listName` attribute);
/// the other variants are carried for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldValueType {
    /// Code from a code list.
    Code,
    /// Free text.
    Text,
    /// Identifier.
    Id,
    /// Date.
    Date,
    /// Time.
    Time,
    /// Number.
    Number,
    /// Amount of money.
    Amount,
    /// URL.
    Url,
    /// Indicator (boolean).
    Indicator,
    /// Any type this crate does not special-case.
    #[serde(other)]
    Other,
}

/// Metadata for a single field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadata {
    /// Field identifier, e.g. `BT-500-Business`.
    pub id: String,
    /// Node this field hangs off.
    pub parent_node_id: String,
    /// XML path relative to the parent node's element.
    pub xpath_relative: String,
    /// Declared value type.
    #[serde(rename = "type")]
    pub value_type: FieldValueType,
    /// Whether several instances of this field may exist under one parent.
    #[serde(default)]
    pub repeatable: bool,
    /// Code list identifier, present for `code` fields.
    #[serde(default)]
    pub code_list_id: Option<String>,
}

/// Metadata for a single node.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    /// Node identifier, e.g. `ND-BusinessParty`.
    pub id: String,
    /// Parent node, absent only on the root.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// XML path relative to the parent node's element.
    pub xpath_relative: String,
    /// Whether several instances of this node may exist under one parent.
    #[serde(default)]
    pub repeatable: bool,
}

/// The field and node tables of one SDK version, keyed by id.
#[derive(Debug, Clone)]
pub struct FieldsAndNodes {
    fields: HashMap<String, FieldMetadata>,
    nodes: HashMap<String, NodeMetadata>,
    root_node_id: String,
    sdk_version: SdkVersion,
}

impl FieldsAndNodes {
    /// Builds the tables, checking id uniqueness and that exactly one node
    /// has no parent.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateField`], [`ModelError::DuplicateNode`],
    /// [`ModelError::NoRootNode`] or [`ModelError::MultipleRootNodes`] when
    /// the tables are inconsistent.
    pub fn new(
        fields: Vec<FieldMetadata>,
        nodes: Vec<NodeMetadata>,
        sdk_version: SdkVersion,
    ) -> Result<Self, ModelError> {
        let mut field_map = HashMap::with_capacity(fields.len());
        for field in fields {
            let id = field.id.clone();
            if field_map.insert(id.clone(), field).is_some() {
                return Err(ModelError::DuplicateField { id });
            }
        }

        let mut node_map = HashMap::with_capacity(nodes.len());
        let mut root: Option<String> = None;
        for node in nodes {
            let id = node.id.clone();
            if node.parent_id.is_none() {
                match &root {
                    None => root = Some(id.clone()),
                    Some(first) => {
                        return Err(ModelError::MultipleRootNodes {
                            first: first.clone(),
                            second: id,
                        });
                    }
                }
            }
            if node_map.insert(id.clone(), node).is_some() {
                return Err(ModelError::DuplicateNode { id });
            }
        }
        let root_node_id = root.ok_or(ModelError::NoRootNode)?;

        Ok(Self {
            fields: field_map,
            nodes: node_map,
            root_node_id,
            sdk_version,
        })
    }

    /// Looks up a field by id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownField`] when the id is not in the table.
    pub fn field(&self, id: &str) -> Result<&FieldMetadata, ModelError> {
        self.fields.get(id).ok_or_else(|| ModelError::unknown_field(id))
    }

    /// Looks up a node by id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownNode`] when the id is not in the table.
    pub fn node(&self, id: &str) -> Result<&NodeMetadata, ModelError> {
        self.nodes.get(id).ok_or_else(|| ModelError::unknown_node(id))
    }

    /// Id of the single node without a parent.
    #[must_use]
    pub fn root_node_id(&self) -> &str {
        &self.root_node_id
    }

    /// SDK version these tables were loaded for.
    #[must_use]
    pub fn sdk_version(&self) -> SdkVersion {
        self.sdk_version
    }
}

/// One namespace binding of a document type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeNamespace {
    /// Namespace prefix, e.g. `cac`.
    pub prefix: String,
    /// Namespace URI bound to the prefix.
    pub uri: String,
    /// XSD file for this namespace, relative to the SDK version root.
    #[serde(default)]
    pub schema_location: Option<String>,
}

/// Description of one document type (notice envelope).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeInfo {
    /// Primary (default) namespace URI of the document.
    #[serde(rename = "namespace")]
    pub namespace_uri: String,
    /// Tag of the root element.
    pub root_element: String,
    /// Main XSD of the document type, relative to the SDK version root.
    /// Absent on SDK versions that do not ship sortable schemas.
    #[serde(default)]
    pub xsd_path: Option<String>,
    /// Additional prefix bindings declared on the root element.
    #[serde(default)]
    pub additional_namespaces: Vec<DocumentTypeNamespace>,
}

impl DocumentTypeInfo {
    /// Schema location for a given prefix, if one is declared.
    #[must_use]
    pub fn schema_location(&self, prefix: &str) -> Option<&str> {
        self.additional_namespaces
            .iter()
            .find(|ns| ns.prefix == prefix)
            .and_then(|ns| ns.schema_location.as_deref())
    }
}

/// The notice-type table: sub type to document type to document info.
#[derive(Debug, Clone, Default)]
pub struct NoticeTypes {
    document_type_by_sub_type: HashMap<String, String>,
    info_by_document_type: HashMap<String, DocumentTypeInfo>,
}

impl NoticeTypes {
    /// Builds the table from its two maps.
    #[must_use]
    pub fn new(
        document_type_by_sub_type: HashMap<String, String>,
        info_by_document_type: HashMap<String, DocumentTypeInfo>,
    ) -> Self {
        Self {
            document_type_by_sub_type,
            info_by_document_type,
        }
    }

    /// Resolves the document type info for a notice sub type.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownNoticeSubType`] or
    /// [`ModelError::UnknownDocumentType`] when either table misses the key.
    pub fn document_type_for(&self, sub_type: &str) -> Result<&DocumentTypeInfo, ModelError> {
        let doc_type = self
            .document_type_by_sub_type
            .get(sub_type)
            .ok_or_else(|| ModelError::UnknownNoticeSubType {
                sub_type: sub_type.to_string(),
            })?;
        self.info_by_document_type
            .get(doc_type)
            .ok_or_else(|| ModelError::UnknownDocumentType {
                id: doc_type.clone(),
            })
    }
}
