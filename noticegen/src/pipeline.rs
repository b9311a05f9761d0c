//! End-to-end notice generation.
//!
//! Chains the three stages: visual form to conceptual tree, conceptual tree
//! to physical XML, schema sort, then serialization. Any failure discards
//! the partial result; there is nothing to retry.

use std::path::PathBuf;

use thiserror::Error;

use noticegen_model::metadata::{FieldsAndNodes, NoticeTypes};
use noticegen_model::visual::VisualModel;
use noticegen_model::{ModelError, build_conceptual_model};
use noticegen_xml::{BuildError, BuildOptions, WriteError, build_physical_model};
use noticegen_xsd::{ElementSorter, ResolverCache, SortError};

/// Errors produced by the generation pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Conceptual model construction or a metadata lookup failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Physical tree construction failed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Schema sorting failed.
    #[error(transparent)]
    Sort(#[from] SortError),

    /// Serialization failed.
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Generates notice XML from submitted visual forms, sharing parsed schemas
/// across requests.
#[derive(Debug, Default)]
pub struct NoticeGenerator {
    sdk_root: PathBuf,
    resolvers: ResolverCache,
}

impl NoticeGenerator {
    /// Creates a generator reading SDK schemas below `sdk_root`.
    #[must_use]
    pub fn new(sdk_root: impl Into<PathBuf>) -> Self {
        Self {
            sdk_root: sdk_root.into(),
            resolvers: ResolverCache::new(),
        }
    }

    /// Builds, sorts and serializes the notice XML for a visual form.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when any stage fails; no partial output is
    /// produced.
    pub fn generate(
        &self,
        visual: &VisualModel,
        tables: &FieldsAndNodes,
        notice_types: &NoticeTypes,
        options: &BuildOptions,
        indented: bool,
    ) -> Result<String, PipelineError> {
        let concept = build_conceptual_model(visual, tables)?;
        let sub_type = concept.notice_sub_type()?.to_string();
        let doc_type = notice_types.document_type_for(&sub_type)?;
        tracing::info!(
            sub_type = %sub_type,
            version = %concept.sdk_version(),
            "generating notice XML"
        );

        let mut physical = build_physical_model(&concept, tables, doc_type, options)?;
        let resolver =
            self.resolvers
                .resolver_for(&self.sdk_root, doc_type, concept.sdk_version());
        ElementSorter::new(&resolver).sort(physical.root_mut())?;
        Ok(physical.to_xml_text(indented)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noticegen_model::metadata::{
        DocumentTypeInfo, DocumentTypeNamespace, FieldMetadata, FieldValueType, NodeMetadata,
    };
    use noticegen_model::version::SdkVersion;
    use noticegen_model::{
        FIELD_ID_NOTICE_SUB_TYPE, FIELD_ID_SDK_VERSION, ND_ROOT, ND_ROOT_EXTENSION,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use std::path::PathBuf;

    const MAIN_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
  <xsd:element name="BusinessRegistrationInformationNotice" type="BrinType"/>
  <xsd:complexType name="BrinType">
    <xsd:sequence>
      <xsd:element ref="cbc:CustomizationID"/>
      <xsd:element ref="cbc:ID"/>
      <xsd:element ref="ext:UBLExtensions"/>
    </xsd:sequence>
  </xsd:complexType>
</xsd:schema>
"#;

    fn write_sdk() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("noticegen-pipeline-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("main.xsd"), MAIN_XSD).unwrap();
        dir
    }

    fn tables() -> FieldsAndNodes {
        let nodes = vec![
            NodeMetadata {
                id: ND_ROOT.to_string(),
                parent_id: None,
                xpath_relative: "/*".to_string(),
                repeatable: false,
            },
            NodeMetadata {
                id: ND_ROOT_EXTENSION.to_string(),
                parent_id: Some(ND_ROOT.to_string()),
                xpath_relative:
                    "ext:UBLExtensions/ext:UBLExtension/ext:ExtensionContent/efext:EformsExtension"
                        .to_string(),
                repeatable: false,
            },
        ];
        let fields = vec![
            FieldMetadata {
                id: FIELD_ID_SDK_VERSION.to_string(),
                parent_node_id: ND_ROOT.to_string(),
                xpath_relative: "cbc:CustomizationID".to_string(),
                value_type: FieldValueType::Id,
                repeatable: false,
                code_list_id: None,
            },
            FieldMetadata {
                id: FIELD_ID_NOTICE_SUB_TYPE.to_string(),
                parent_node_id: ND_ROOT_EXTENSION.to_string(),
                xpath_relative: "efac:NoticeSubType/cbc:SubTypeCode".to_string(),
                value_type: FieldValueType::Code,
                repeatable: false,
                code_list_id: Some("notice-subtype".to_string()),
            },
            FieldMetadata {
                id: "BT-701-notice".to_string(),
                parent_node_id: ND_ROOT.to_string(),
                xpath_relative: "cbc:ID[@schemeName='notice-id']".to_string(),
                value_type: FieldValueType::Id,
                repeatable: false,
                code_list_id: None,
            },
        ];
        FieldsAndNodes::new(fields, nodes, SdkVersion::new(1, 8, 0)).unwrap()
    }

    fn notice_types() -> NoticeTypes {
        let mut by_sub_type = HashMap::new();
        by_sub_type.insert("X02".to_string(), "BRIN".to_string());
        let mut by_doc_type = HashMap::new();
        by_doc_type.insert(
            "BRIN".to_string(),
            DocumentTypeInfo {
                namespace_uri: "urn:brin".to_string(),
                root_element: "BusinessRegistrationInformationNotice".to_string(),
                xsd_path: Some("main.xsd".to_string()),
                additional_namespaces: vec![
                    DocumentTypeNamespace {
                        prefix: "cbc".to_string(),
                        uri: "urn:cbc".to_string(),
                        schema_location: None,
                    },
                    DocumentTypeNamespace {
                        prefix: "ext".to_string(),
                        uri: "urn:ext".to_string(),
                        schema_location: None,
                    },
                    DocumentTypeNamespace {
                        prefix: "efext".to_string(),
                        uri: "urn:efext".to_string(),
                        schema_location: None,
                    },
                    DocumentTypeNamespace {
                        prefix: "efac".to_string(),
                        uri: "urn:efac".to_string(),
                        schema_location: None,
                    },
                ],
            },
        );
        NoticeTypes::new(by_sub_type, by_doc_type)
    }

    fn visual() -> VisualModel {
        VisualModel::from_json(json!({
            "sdkVersion": "eforms-sdk-1.8",
            "noticeSubType": "X02",
            "type": "group",
            "contentId": "notice-root",
            "nodeId": ND_ROOT,
            "children": [
                {
                    "type": "field",
                    "contentId": FIELD_ID_SDK_VERSION,
                    "value": "eforms-sdk-1.8"
                },
                {
                    "type": "field",
                    "contentId": FIELD_ID_NOTICE_SUB_TYPE,
                    "value": "X02"
                },
                {
                    "type": "field",
                    "contentId": "BT-701-notice",
                    "value": "notice-1"
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_generate_sorted_notice() {
        let generator = NoticeGenerator::new(write_sdk());
        let xml = generator
            .generate(
                &visual(),
                &tables(),
                &notice_types(),
                &BuildOptions::default(),
                false,
            )
            .unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(xml.contains("xmlns=\"urn:brin\""));
        assert!(xml.contains("listName=\"notice-subtype\">X02</cbc:SubTypeCode>"));
        assert!(xml.contains("schemeName=\"notice-id\""));
        assert!(!xml.contains("editor"));

        // Fields are built after the extension chain; the declared order puts
        // the extension chain last.
        let customization = xml.find("<cbc:CustomizationID").unwrap();
        let id = xml.find("<cbc:ID").unwrap();
        let extensions = xml.find("<ext:UBLExtensions").unwrap();
        assert!(customization < id);
        assert!(id < extensions);
    }

    #[test]
    fn test_generate_rejects_unknown_sub_type() {
        let generator = NoticeGenerator::new(write_sdk());
        let mut bad = visual();
        for child in &mut bad.root.children {
            if child.content_id == FIELD_ID_NOTICE_SUB_TYPE {
                child.value = Some("X99".to_string());
            }
        }
        let err = generator
            .generate(
                &bad,
                &tables(),
                &notice_types(),
                &BuildOptions::default(),
                false,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Model(ModelError::UnknownNoticeSubType { .. })
        ));
    }
}
