//! Conceptual model construction.
//!
//! The conceptual tree sits between the visual form and the physical XML: it
//! follows the SDK node hierarchy instead of the visual grouping. Purely
//! visual groups are flattened away, and non-repeatable nodes the form
//! omitted are filled in by walking each item's declared parent chain.
//!
//! Instances are identified by `(node id, counter)`. Repeatable nodes get one
//! conceptual instance per counter value; non-repeatable nodes are fused into
//! a single instance regardless of where the visual tree mentions them.

use crate::error::ModelError;
use crate::metadata::FieldsAndNodes;
use crate::version::SdkVersion;
use crate::visual::{VisualItem, VisualKind, VisualModel};

/// Root node id in every SDK field table.
pub const ND_ROOT: &str = "ND-Root";

/// Extension node carrying notice-level metadata.
pub const ND_ROOT_EXTENSION: &str = "ND-RootExtension";

/// Field holding the prefixed SDK version.
pub const FIELD_ID_SDK_VERSION: &str = "OPT-002-notice";

/// Field holding the notice sub type.
pub const FIELD_ID_NOTICE_SUB_TYPE: &str = "OPP-070-notice";

/// Sector-of-activity field, subject to a legacy list-name override.
pub const FIELD_SECTOR_OF_ACTIVITY: &str = "OPP-105-Business";

/// Suffix appended to the unique id of filled-in nodes.
const GENERATED_SUFFIX: &str = "-generated";

/// A field instance in the conceptual tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptField {
    /// Field id, as in the SDK field table.
    pub field_id: String,
    /// Unique id of the originating visual item.
    pub id_unique: String,
    /// Submitted value.
    pub value: String,
    /// 1-based instance counter.
    pub counter: u32,
    /// 1-based instance counter of the enclosing repeated group.
    pub parent_counter: u32,
}

/// A node instance in the conceptual tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptNode {
    /// Node id, as in the SDK node table.
    pub node_id: String,
    /// Unique id: the visual content id, or the node id with a `-generated`
    /// suffix for filled-in nodes.
    pub id_unique: String,
    /// 1-based instance counter. Always 1 for filled-in nodes.
    pub counter: u32,
    /// 1-based instance counter of the enclosing repeated group. Always 1
    /// for filled-in nodes.
    pub parent_counter: u32,
    /// Child node instances, in attachment order.
    pub nodes: Vec<ConceptNode>,
    /// Field instances attached directly to this node.
    pub fields: Vec<ConceptField>,
}

impl ConceptNode {
    /// Creates an empty node instance.
    #[must_use]
    pub fn new(
        node_id: impl Into<String>,
        id_unique: impl Into<String>,
        counter: u32,
        parent_counter: u32,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            id_unique: id_unique.into(),
            counter,
            parent_counter,
            nodes: Vec::new(),
            fields: Vec::new(),
        }
    }

    fn generated(node_id: &str) -> Self {
        Self::new(node_id, format!("{node_id}{GENERATED_SUFFIX}"), 1, 1)
    }

    /// First node instance with the given node id, searching depth first.
    #[must_use]
    pub fn find_node(&self, node_id: &str) -> Option<&ConceptNode> {
        if self.node_id == node_id {
            return Some(self);
        }
        self.nodes.iter().find_map(|n| n.find_node(node_id))
    }

    /// First field instance with the given field id, searching depth first.
    #[must_use]
    pub fn find_field(&self, field_id: &str) -> Option<&ConceptField> {
        if let Some(field) = self.fields.iter().find(|f| f.field_id == field_id) {
            return Some(field);
        }
        self.nodes.iter().find_map(|n| n.find_field(field_id))
    }
}

/// The conceptual model of one notice.
#[derive(Debug, Clone)]
pub struct ConceptualModel {
    root: ConceptNode,
    sdk_version: SdkVersion,
}

impl ConceptualModel {
    /// The root node instance.
    #[must_use]
    pub fn root(&self) -> &ConceptNode {
        &self.root
    }

    /// SDK version the notice was authored against.
    #[must_use]
    pub fn sdk_version(&self) -> SdkVersion {
        self.sdk_version
    }

    /// The notice sub type, read from the well-known field under the root
    /// extension node.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingNoticeMetadata`] when the extension node
    /// or the sub-type field is absent.
    pub fn notice_sub_type(&self) -> Result<&str, ModelError> {
        let extension = self
            .root
            .nodes
            .iter()
            .find(|n| n.node_id == ND_ROOT_EXTENSION)
            .ok_or_else(|| ModelError::missing_notice_metadata(ND_ROOT_EXTENSION))?;
        let field = extension
            .fields
            .iter()
            .find(|f| f.field_id == FIELD_ID_NOTICE_SUB_TYPE)
            .ok_or_else(|| ModelError::missing_notice_metadata(FIELD_ID_NOTICE_SUB_TYPE))?;
        Ok(&field.value)
    }
}

/// Builds the conceptual model for a submitted visual form.
///
/// # Errors
///
/// Fails on unknown field or node ids, on a self-referencing parent chain,
/// on a visual root that does not carry the metadata root node id, and on an
/// SDK version mismatch between the form and the metadata tables.
pub fn build_conceptual_model(
    visual: &VisualModel,
    tables: &FieldsAndNodes,
) -> Result<ConceptualModel, ModelError> {
    let form_version = visual.parsed_sdk_version()?;
    if !form_version.same_ignoring_patch(&tables.sdk_version()) {
        return Err(ModelError::VersionMismatch {
            visual: form_version.to_string(),
            metadata: tables.sdk_version().to_string(),
        });
    }

    let root_id = tables.root_node_id();
    let declared = visual.root.node_id.as_deref().unwrap_or_default();
    if declared != root_id {
        return Err(ModelError::InvalidRoot {
            expected: root_id.to_string(),
            found: declared.to_string(),
        });
    }

    if visual.root.content_count == 0 || visual.root.content_parent_count == 0 {
        return Err(ModelError::invalid_counter(&visual.root.content_id));
    }

    let mut root = ConceptNode::new(root_id, visual.root.content_id.clone(), 1, 1);
    for child in &visual.root.children {
        attach_visual_item(child, &mut root, tables)?;
    }

    Ok(ConceptualModel {
        root,
        sdk_version: form_version,
    })
}

fn attach_visual_item(
    item: &VisualItem,
    closest_parent: &mut ConceptNode,
    tables: &FieldsAndNodes,
) -> Result<(), ModelError> {
    if item.content_count == 0 || item.content_parent_count == 0 {
        return Err(ModelError::invalid_counter(&item.content_id));
    }
    match item.kind {
        VisualKind::Field => {
            let field = tables.field(&item.content_id)?;
            let target = attach_point(closest_parent, &field.parent_node_id, tables)?;
            target.fields.push(ConceptField {
                field_id: item.content_id.clone(),
                id_unique: item.content_id.clone(),
                value: item.value.clone().unwrap_or_default(),
                counter: item.content_count,
                parent_counter: item.content_parent_count,
            });
            Ok(())
        }
        VisualKind::Group => match item.node_id.as_deref() {
            None => {
                // Purely visual grouping, contributes nothing to the tree.
                tracing::debug!(content_id = %item.content_id, "flattening visual group");
                for child in &item.children {
                    attach_visual_item(child, closest_parent, tables)?;
                }
                Ok(())
            }
            Some(node_id) => {
                let node = tables.node(node_id)?;
                let parent_id = node.parent_id.clone().ok_or_else(|| {
                    ModelError::MisplacedRoot {
                        node_id: node_id.to_string(),
                    }
                })?;
                let target = attach_point(closest_parent, &parent_id, tables)?;
                let instance = attach_instance(
                    target,
                    node_id,
                    &item.content_id,
                    item.content_count,
                    item.content_parent_count,
                    tables,
                )?;
                for child in &item.children {
                    attach_visual_item(child, instance, tables)?;
                }
                Ok(())
            }
        },
    }
}

/// Finds or creates the node instance with the given id inside `scope`,
/// filling in any omitted intermediate nodes along the metadata parent chain.
fn attach_point<'a>(
    scope: &'a mut ConceptNode,
    target_id: &str,
    tables: &FieldsAndNodes,
) -> Result<&'a mut ConceptNode, ModelError> {
    if scope.node_id == target_id {
        return Ok(scope);
    }
    if contains_node(scope, target_id) {
        return find_node_mut(scope, target_id)
            .ok_or_else(|| ModelError::unknown_node(target_id));
    }

    // Walk the declared parent chain upwards until it meets something
    // already materialized in this scope.
    let mut missing = vec![target_id.to_string()];
    let mut current = target_id.to_string();
    let anchor = loop {
        let node = tables.node(&current)?;
        let parent_id = match &node.parent_id {
            Some(p) => p.clone(),
            None => return Err(ModelError::detached_node(target_id, &scope.node_id)),
        };
        if parent_id == current || missing.contains(&parent_id) {
            return Err(ModelError::self_reference(parent_id));
        }
        if parent_id == scope.node_id || contains_node(scope, &parent_id) {
            break parent_id;
        }
        missing.push(parent_id.clone());
        current = parent_id;
    };
    missing.reverse();

    let mut current_node: &mut ConceptNode = if scope.node_id == anchor {
        scope
    } else {
        find_node_mut(scope, &anchor).ok_or_else(|| ModelError::unknown_node(&anchor))?
    };
    for node_id in &missing {
        let node = tables.node(node_id)?;
        if node.repeatable {
            tracing::warn!(
                node_id = %node_id,
                "filling in a repeatable node omitted by the visual tree"
            );
        } else {
            tracing::debug!(node_id = %node_id, "filling in omitted node");
        }
        let position = current_node.nodes.iter().position(|n| n.node_id == *node_id);
        let index = match position {
            Some(i) => i,
            None => {
                current_node.nodes.push(ConceptNode::generated(node_id));
                current_node.nodes.len() - 1
            }
        };
        current_node = &mut current_node.nodes[index];
    }
    Ok(current_node)
}

/// Attaches one node instance under its parent, fusing with an existing
/// instance when the node is non-repeatable or the counter matches.
fn attach_instance<'a>(
    parent: &'a mut ConceptNode,
    node_id: &str,
    id_unique: &str,
    counter: u32,
    parent_counter: u32,
    tables: &FieldsAndNodes,
) -> Result<&'a mut ConceptNode, ModelError> {
    if parent.node_id == node_id {
        return Err(ModelError::self_reference(node_id));
    }
    let node = tables.node(node_id)?;
    let position = parent
        .nodes
        .iter()
        .position(|n| n.node_id == node_id && (!node.repeatable || n.counter == counter));
    let index = match position {
        Some(i) => i,
        None => {
            parent
                .nodes
                .push(ConceptNode::new(node_id, id_unique, counter, parent_counter));
            parent.nodes.len() - 1
        }
    };
    Ok(&mut parent.nodes[index])
}

fn contains_node(node: &ConceptNode, node_id: &str) -> bool {
    node.node_id == node_id || node.nodes.iter().any(|n| contains_node(n, node_id))
}

fn find_node_mut<'a>(node: &'a mut ConceptNode, node_id: &str) -> Option<&'a mut ConceptNode> {
    if node.node_id == node_id {
        return Some(node);
    }
    for child in &mut node.nodes {
        if let Some(found) = find_node_mut(child, node_id) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{FieldMetadata, FieldValueType, NodeMetadata};
    use crate::visual::VisualKind;

    fn node_meta(id: &str, parent: Option<&str>, xpath: &str, repeatable: bool) -> NodeMetadata {
        NodeMetadata {
            id: id.to_string(),
            parent_id: parent.map(str::to_string),
            xpath_relative: xpath.to_string(),
            repeatable,
        }
    }

    fn field_meta(id: &str, parent: &str, xpath: &str) -> FieldMetadata {
        FieldMetadata {
            id: id.to_string(),
            parent_node_id: parent.to_string(),
            xpath_relative: xpath.to_string(),
            value_type: FieldValueType::Text,
            repeatable: false,
            code_list_id: None,
        }
    }

    fn tables() -> FieldsAndNodes {
        let nodes = vec![
            node_meta(ND_ROOT, None, "/*", false),
            node_meta("ND-X", Some(ND_ROOT), "x", false),
            node_meta("ND-Y", Some("ND-X"), "y", false),
            node_meta("ND-R", Some(ND_ROOT), "r", true),
            node_meta("ND-Loop", Some("ND-Loop"), "loop", false),
            node_meta(ND_ROOT_EXTENSION, Some(ND_ROOT), "ext:Extension", false),
        ];
        let fields = vec![
            field_meta("BT-field-z", "ND-Y", "z"),
            field_meta("BT-field-r", "ND-R", "rv"),
            field_meta("BT-field-loop", "ND-Loop", "lv"),
            field_meta(FIELD_ID_NOTICE_SUB_TYPE, ND_ROOT_EXTENSION, "efac:NoticeSubType/cbc:SubTypeCode"),
        ];
        FieldsAndNodes::new(fields, nodes, SdkVersion::new(1, 8, 0)).unwrap()
    }

    fn field_item(id: &str, value: &str, count: u32) -> VisualItem {
        VisualItem {
            kind: VisualKind::Field,
            content_id: id.to_string(),
            node_id: None,
            value: Some(value.to_string()),
            content_count: count,
            content_parent_count: 1,
            children: vec![],
        }
    }

    fn group_item(content_id: &str, node_id: Option<&str>, count: u32, children: Vec<VisualItem>) -> VisualItem {
        VisualItem {
            kind: VisualKind::Group,
            content_id: content_id.to_string(),
            node_id: node_id.map(str::to_string),
            value: None,
            content_count: count,
            content_parent_count: 1,
            children,
        }
    }

    fn model(children: Vec<VisualItem>) -> VisualModel {
        VisualModel {
            sdk_version: "eforms-sdk-1.8".to_string(),
            notice_sub_type: "X02".to_string(),
            notice_uuid: None,
            root: group_item("notice-root", Some(ND_ROOT), 1, children),
        }
    }

    #[test]
    fn test_fills_in_omitted_ancestors() {
        // The form attaches z directly to the root even though the metadata
        // declares z under ND-Y under ND-X.
        let concept =
            build_conceptual_model(&model(vec![field_item("BT-field-z", "zv", 1)]), &tables())
                .unwrap();
        let root = concept.root();
        assert_eq!(root.nodes.len(), 1);
        let x = &root.nodes[0];
        assert_eq!(x.node_id, "ND-X");
        assert_eq!(x.id_unique, "ND-X-generated");
        assert_eq!(x.counter, 1);
        assert_eq!(x.parent_counter, 1);
        assert_eq!(x.nodes.len(), 1);
        let y = &x.nodes[0];
        assert_eq!(y.node_id, "ND-Y");
        assert_eq!(y.fields.len(), 1);
        assert_eq!(y.fields[0].value, "zv");
    }

    #[test]
    fn test_ancestors_filled_in_once() {
        let concept = build_conceptual_model(
            &model(vec![
                field_item("BT-field-z", "first", 1),
                field_item("BT-field-z", "second", 2),
            ]),
            &tables(),
        )
        .unwrap();
        let root = concept.root();
        assert_eq!(root.nodes.len(), 1);
        assert_eq!(root.nodes[0].nodes.len(), 1);
        assert_eq!(root.nodes[0].nodes[0].fields.len(), 2);
    }

    #[test]
    fn test_transparent_group_flattened() {
        let concept = build_conceptual_model(
            &model(vec![group_item(
                "GR-visual-only",
                None,
                1,
                vec![field_item("BT-field-z", "zv", 1)],
            )]),
            &tables(),
        )
        .unwrap();
        assert_eq!(concept.root().find_field("BT-field-z").unwrap().value, "zv");
    }

    #[test]
    fn test_repeatable_instances_split_by_counter() {
        let concept = build_conceptual_model(
            &model(vec![
                group_item("GR-R-1", Some("ND-R"), 1, vec![field_item("BT-field-r", "a", 1)]),
                group_item("GR-R-2", Some("ND-R"), 2, vec![field_item("BT-field-r", "b", 1)]),
                group_item("GR-R-1b", Some("ND-R"), 1, vec![field_item("BT-field-r", "c", 2)]),
            ]),
            &tables(),
        )
        .unwrap();
        let root = concept.root();
        let instances: Vec<&ConceptNode> =
            root.nodes.iter().filter(|n| n.node_id == "ND-R").collect();
        assert_eq!(instances.len(), 2);
        // The third group has counter 1 and fuses into the first instance.
        assert_eq!(instances[0].fields.len(), 2);
        assert_eq!(instances[1].fields.len(), 1);
    }

    #[test]
    fn test_non_repeatable_groups_fused() {
        let concept = build_conceptual_model(
            &model(vec![
                group_item(
                    "GR-X-a",
                    Some("ND-X"),
                    1,
                    vec![field_item("BT-field-z", "a", 1)],
                ),
                group_item(
                    "GR-X-b",
                    Some("ND-X"),
                    1,
                    vec![field_item("BT-field-z", "b", 2)],
                ),
            ]),
            &tables(),
        )
        .unwrap();
        let root = concept.root();
        assert_eq!(root.nodes.len(), 1);
        let y = root.nodes[0].find_node("ND-Y").unwrap();
        assert_eq!(y.fields.len(), 2);
    }

    #[test]
    fn test_parent_counters_recorded() {
        let mut field = field_item("BT-field-r", "v", 1);
        field.content_parent_count = 2;
        let mut group = group_item("GR-R", Some("ND-R"), 2, vec![field]);
        group.content_parent_count = 1;
        let concept = build_conceptual_model(&model(vec![group]), &tables()).unwrap();
        let instance = concept.root().find_node("ND-R").unwrap();
        assert_eq!(instance.counter, 2);
        assert_eq!(instance.parent_counter, 1);
        assert_eq!(instance.fields[0].parent_counter, 2);
    }

    #[test]
    fn test_zero_counter_rejected() {
        let mut field = field_item("BT-field-z", "v", 1);
        field.content_count = 0;
        let err = build_conceptual_model(&model(vec![field]), &tables()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidCounter { .. }));

        let mut group = group_item("GR-R", Some("ND-R"), 1, vec![]);
        group.content_parent_count = 0;
        let err = build_conceptual_model(&model(vec![group]), &tables()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidCounter { .. }));
    }

    #[test]
    fn test_self_referencing_parent_rejected() {
        let err = build_conceptual_model(
            &model(vec![field_item("BT-field-loop", "v", 1)]),
            &tables(),
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::SelfReference { .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = build_conceptual_model(
            &model(vec![field_item("BT-unknown", "v", 1)]),
            &tables(),
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::UnknownField { .. }));
    }

    #[test]
    fn test_wrong_root_rejected() {
        let mut bad = model(vec![]);
        bad.root.node_id = Some("ND-X".to_string());
        let err = build_conceptual_model(&bad, &tables()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidRoot { .. }));
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut bad = model(vec![]);
        bad.sdk_version = "eforms-sdk-1.9".to_string();
        let err = build_conceptual_model(&bad, &tables()).unwrap_err();
        assert!(matches!(err, ModelError::VersionMismatch { .. }));
    }

    #[test]
    fn test_notice_sub_type_lookup() {
        let concept = build_conceptual_model(
            &model(vec![field_item(FIELD_ID_NOTICE_SUB_TYPE, "X02", 1)]),
            &tables(),
        )
        .unwrap();
        assert_eq!(concept.notice_sub_type().unwrap(), "X02");

        let empty = build_conceptual_model(&model(vec![]), &tables()).unwrap();
        assert!(matches!(
            empty.notice_sub_type(),
            Err(ModelError::MissingNoticeMetadata { .. })
        ));
    }
}
