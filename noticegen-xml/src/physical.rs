//! Physical XML tree construction.
//!
//! Walks the conceptual tree and materializes elements along each node's and
//! field's relative path. Node elements are shared: a segment reuses an
//! existing child created for the same sub-expression, except for the final
//! element of a repeatable node, which gets one sibling per conceptual
//! instance. Field elements are never shared; each field instance creates its
//! own leaf (and any intermediate elements of its path).

use noticegen_model::metadata::{DocumentTypeInfo, FieldMetadata, FieldsAndNodes};
use noticegen_model::{
    ConceptField, ConceptNode, ConceptualModel, FIELD_SECTOR_OF_ACTIVITY, FieldValueType,
    SdkVersion,
};

use crate::element::XmlElement;
use crate::error::{BuildError, WriteError};
use crate::path::{ATTR_SCHEME_NAME, SegmentTarget, parse_relative_path};
use crate::writer::serialize;

/// Attribute naming the conceptual node an element was built for.
pub const ATTR_EDITOR_NODE_ID: &str = "editorNodeId";

/// Attribute naming the field an element was built for.
pub const ATTR_EDITOR_FIELD_ID: &str = "editorFieldId";

/// Attribute carrying the instance counter of the originating item.
pub const ATTR_EDITOR_COUNTER_SELF: &str = "editorCounterSelf";

/// Attribute carrying the instance counter of the enclosing repeated group.
pub const ATTR_EDITOR_COUNTER_PARENT: &str = "editorCounterPrnt";

/// Attribute carrying the code list of a `code` field.
pub const ATTR_LIST_NAME: &str = "listName";

/// Forced list name of the sector-of-activity field.
const LIST_NAME_SECTOR: &str = "sector";

/// Options controlling physical tree construction.
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Decorate elements with `editorNodeId`, `editorFieldId` and
    /// `editorCounterSelf` attributes. Off by default; generated notices
    /// must not carry them.
    pub debug: bool,
    /// Build field elements. Disabling this produces the node skeleton only.
    pub build_fields: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            debug: false,
            build_fields: true,
        }
    }
}

/// The physical XML form of one notice.
#[derive(Debug, Clone)]
pub struct PhysicalModel {
    root: XmlElement,
    sdk_version: SdkVersion,
}

impl PhysicalModel {
    /// The root element.
    #[must_use]
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Mutable access to the root element, for in-place sorting.
    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    /// SDK version the notice was built against.
    #[must_use]
    pub fn sdk_version(&self) -> SdkVersion {
        self.sdk_version
    }

    /// Serializes the tree to XML text.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] when serialization fails.
    pub fn to_xml_text(&self, indented: bool) -> Result<String, WriteError> {
        serialize(&self.root, indented)
    }
}

/// Builds the physical XML tree for a conceptual model.
///
/// # Errors
///
/// Fails on metadata lookup failures, malformed relative paths, attribute
/// segments in node paths, non-terminal attribute segments in field paths,
/// and `code` fields without a code list.
pub fn build_physical_model(
    concept: &ConceptualModel,
    tables: &FieldsAndNodes,
    doc_type: &DocumentTypeInfo,
    options: &BuildOptions,
) -> Result<PhysicalModel, BuildError> {
    tracing::debug!(
        root_element = %doc_type.root_element,
        debug = options.debug,
        "building physical model"
    );

    let mut root = XmlElement::new(&doc_type.root_element);
    root.set_attribute("xmlns", &doc_type.namespace_uri);
    for ns in &doc_type.additional_namespaces {
        root.set_attribute(format!("xmlns:{}", ns.prefix), &ns.uri);
    }

    build_contents(concept.root(), &mut root, tables, options)?;

    Ok(PhysicalModel {
        root,
        sdk_version: concept.sdk_version(),
    })
}

fn build_contents(
    node: &ConceptNode,
    elem: &mut XmlElement,
    tables: &FieldsAndNodes,
    options: &BuildOptions,
) -> Result<(), BuildError> {
    for child in &node.nodes {
        build_node(child, elem, tables, options)?;
    }
    if options.build_fields {
        for field in &node.fields {
            build_field(field, elem, tables, options)?;
        }
    }
    Ok(())
}

fn build_node(
    node: &ConceptNode,
    parent_elem: &mut XmlElement,
    tables: &FieldsAndNodes,
    options: &BuildOptions,
) -> Result<(), BuildError> {
    let meta = tables.node(&node.node_id)?;
    let segments = parse_relative_path(&meta.xpath_relative)?;
    let last = segments.len() - 1;

    let mut current = parent_elem;
    for (i, segment) in segments.iter().enumerate() {
        let Some(tag) = segment.element_tag() else {
            return Err(BuildError::attribute_in_node_path(
                &node.node_id,
                &segment.expr,
            ));
        };
        // The final element of a repeatable node repeats per instance; the
        // leading elements of the path are shared wrappers.
        let reusable = !(i == last && meta.repeatable);
        let position = if reusable {
            current.position_by_selector(&segment.expr)
        } else {
            None
        };
        let index = match position {
            Some(p) => p,
            None => {
                let mut elem = XmlElement::with_selector(tag, &segment.expr);
                if let Some(scheme) = &segment.scheme_name {
                    elem.set_attribute(ATTR_SCHEME_NAME, scheme);
                }
                current.children.push(elem);
                current.children.len() - 1
            }
        };
        current = &mut current.children[index];
    }

    if options.debug {
        current.set_attribute(ATTR_EDITOR_COUNTER_SELF, node.counter.to_string());
        current.set_attribute(ATTR_EDITOR_COUNTER_PARENT, node.parent_counter.to_string());
        current.set_attribute(ATTR_EDITOR_NODE_ID, &node.node_id);
    }

    build_contents(node, current, tables, options)
}

fn build_field(
    field: &ConceptField,
    node_elem: &mut XmlElement,
    tables: &FieldsAndNodes,
    options: &BuildOptions,
) -> Result<(), BuildError> {
    let meta = tables.field(&field.field_id)?;
    let segments = parse_relative_path(&meta.xpath_relative)?;
    let Some((terminal, intermediate)) = segments.split_last() else {
        return Ok(());
    };

    let mut current = node_elem;
    for segment in intermediate {
        let Some(tag) = segment.element_tag() else {
            return Err(BuildError::misplaced_attribute(
                &field.field_id,
                &segment.expr,
            ));
        };
        let mut elem = XmlElement::new(tag);
        if let Some(scheme) = &segment.scheme_name {
            elem.set_attribute(ATTR_SCHEME_NAME, scheme);
        }
        current.children.push(elem);
        let index = current.children.len() - 1;
        current = &mut current.children[index];
    }

    match &terminal.target {
        SegmentTarget::Attribute(name) => {
            current.set_attribute(name, &field.value);
        }
        SegmentTarget::Element(tag) => {
            let mut elem = XmlElement::new(tag);
            if let Some(scheme) = &terminal.scheme_name {
                elem.set_attribute(ATTR_SCHEME_NAME, scheme);
            }
            elem.text = Some(field.value.clone());
            if meta.value_type == FieldValueType::Code {
                elem.set_attribute(ATTR_LIST_NAME, list_name(meta, field)?);
            }
            if options.debug {
                elem.set_attribute(ATTR_EDITOR_COUNTER_SELF, field.counter.to_string());
                elem.set_attribute(ATTR_EDITOR_COUNTER_PARENT, field.parent_counter.to_string());
                elem.set_attribute(ATTR_EDITOR_FIELD_ID, &field.field_id);
            }
            current.children.push(elem);
        }
    }
    Ok(())
}

fn list_name(meta: &FieldMetadata, field: &ConceptField) -> Result<String, BuildError> {
    if field.field_id == FIELD_SECTOR_OF_ACTIVITY {
        // Legacy exception: the SDK metadata carries a different list here.
        return Ok(LIST_NAME_SECTOR.to_string());
    }
    meta.code_list_id
        .clone()
        .ok_or_else(|| BuildError::missing_code_list(&field.field_id))
}
