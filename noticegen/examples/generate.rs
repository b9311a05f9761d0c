//! Example generating a sorted notice from a small visual form.
//!
//! Run with: `cargo run --example generate`
//!
//! The SDK metadata and the main XSD are dummies built inline; a real
//! deployment loads them from an eForms SDK checkout.

use std::collections::HashMap;
use std::path::PathBuf;

use noticegen::prelude::*;

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

fn tables() -> Result<FieldsAndNodes, ModelError> {
    let nodes = vec![
        NodeMetadata {
            id: "ND-Root".to_string(),
            parent_id: None,
            xpath_relative: "/*".to_string(),
            repeatable: false,
        },
        NodeMetadata {
            id: "ND-RootExtension".to_string(),
            parent_id: Some("ND-Root".to_string()),
            xpath_relative:
                "ext:UBLExtensions/ext:UBLExtension/ext:ExtensionContent/efext:EformsExtension"
                    .to_string(),
            repeatable: false,
        },
    ];
    let fields = vec![
        FieldMetadata {
            id: "OPT-002-notice".to_string(),
            parent_node_id: "ND-Root".to_string(),
            xpath_relative: "cbc:CustomizationID".to_string(),
            value_type: FieldValueType::Id,
            repeatable: false,
            code_list_id: None,
        },
        FieldMetadata {
            id: "OPP-070-notice".to_string(),
            parent_node_id: "ND-RootExtension".to_string(),
            xpath_relative: "efac:NoticeSubType/cbc:SubTypeCode".to_string(),
            value_type: FieldValueType::Code,
            repeatable: false,
            code_list_id: Some("notice-subtype".to_string()),
        },
        FieldMetadata {
            id: "BT-701-notice".to_string(),
            parent_node_id: "ND-Root".to_string(),
            xpath_relative: "cbc:ID[@schemeName='notice-id']".to_string(),
            value_type: FieldValueType::Id,
            repeatable: false,
            code_list_id: None,
        },
    ];
    FieldsAndNodes::new(fields, nodes, SdkVersion::new(1, 8, 0))
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

fn write_sdk() -> std::io::Result<PathBuf> {
    let dir = std::env::temp_dir().join("noticegen-example-sdk");
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join("main.xsd"), MAIN_XSD)?;
    Ok(dir)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let sdk_root = write_sdk()?;
    let generator = NoticeGenerator::new(&sdk_root);

    let visual = VisualModel::from_json(serde_json::json!({
        "sdkVersion": "eforms-sdk-1.8",
        "noticeSubType": "X02",
        "type": "group",
        "contentId": "notice-root",
        "nodeId": "ND-Root",
        "children": [
            { "type": "field", "contentId": "OPT-002-notice", "value": "eforms-sdk-1.8" },
            { "type": "field", "contentId": "OPP-070-notice", "value": "X02" },
            { "type": "field", "contentId": "BT-701-notice", "value": "notice-1" }
        ]
    }))?;

    let xml = generator.generate(
        &visual,
        &tables()?,
        &notice_types(),
        &BuildOptions::default(),
        true,
    )?;

    println!("{xml}");
    Ok(())
}
