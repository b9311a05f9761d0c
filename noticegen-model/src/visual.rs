//! Visual form model.
//!
//! The editor front end submits the filled-in form as a JSON tree. Items are
//! either fields (carrying a value) or groups (carrying children). Groups may
//! declare the node they correspond to; groups without a node id are purely
//! visual and are flattened away during conceptual model construction.
//!
//! The visual nesting is allowed to be shallower than the node hierarchy:
//! non-repeatable intermediate nodes may be omitted and are filled in later.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::version::SdkVersion;

/// Kind of a visual item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualKind {
    /// Leaf item holding a field value.
    Field,
    /// Container item holding child items.
    Group,
}

fn default_count() -> u32 {
    1
}

/// One item of the visual tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualItem {
    /// Field or group.
    #[serde(rename = "type")]
    pub kind: VisualKind,
    /// Content identifier. For fields this is the field id.
    pub content_id: String,
    /// Node this group corresponds to, absent on purely visual groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    /// Field value, absent on groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// 1-based instance counter among repeated siblings.
    #[serde(default = "default_count")]
    pub content_count: u32,
    /// 1-based instance counter of the enclosing repeated group.
    #[serde(default = "default_count")]
    pub content_parent_count: u32,
    /// Child items, empty on fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<VisualItem>,
}

/// The submitted form: the root group plus notice-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualModel {
    /// Prefixed SDK version the form was authored against.
    pub sdk_version: String,
    /// Notice sub type, e.g. `X02`.
    pub notice_sub_type: String,
    /// Identifier assigned to the notice, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice_uuid: Option<String>,
    /// The root group.
    #[serde(flatten)]
    pub root: VisualItem,
}

impl VisualModel {
    /// Deserializes a visual model from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Json`] when the JSON does not match the
    /// expected shape.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ModelError> {
        Ok(serde_json::from_value(value)?)
    }

    /// The SDK version parsed from its prefixed form.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidVersion`] when the embedded version text
    /// is malformed.
    pub fn parsed_sdk_version(&self) -> Result<SdkVersion, ModelError> {
        SdkVersion::parse_prefixed(&self.sdk_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let model = VisualModel::from_json(json!({
            "sdkVersion": "eforms-sdk-1.8",
            "noticeSubType": "X02",
            "type": "group",
            "contentId": "notice-root",
            "nodeId": "ND-Root",
            "children": [
                {
                    "type": "field",
                    "contentId": "BT-500-Business",
                    "value": "ACME",
                    "contentCount": 1
                }
            ]
        }))
        .unwrap();

        assert_eq!(model.notice_sub_type, "X02");
        assert_eq!(model.root.node_id.as_deref(), Some("ND-Root"));
        assert_eq!(model.root.children.len(), 1);
        let field = &model.root.children[0];
        assert_eq!(field.kind, VisualKind::Field);
        assert_eq!(field.value.as_deref(), Some("ACME"));
        assert_eq!(field.content_count, 1);
        assert_eq!(field.content_parent_count, 1);
        assert_eq!(
            model.parsed_sdk_version().unwrap(),
            SdkVersion::new(1, 8, 0)
        );
    }

    #[test]
    fn test_bad_version_rejected() {
        let model = VisualModel::from_json(json!({
            "sdkVersion": "1.8",
            "noticeSubType": "X02",
            "type": "group",
            "contentId": "notice-root",
            "nodeId": "ND-Root"
        }))
        .unwrap();
        assert!(model.parsed_sdk_version().is_err());
    }
}
