//! Visual form model, SDK metadata tables and conceptual tree.
//!
//! This crate covers the first half of the notice generation pipeline:
//!
//! - [`visual`] - the JSON tree submitted by the form front end
//! - [`metadata`] - the SDK field, node and notice-type tables
//! - [`concept`] - the conceptual tree following the SDK node hierarchy
//! - [`version`] - the SDK version identifier and its prefixed notice form
//!
//! The conceptual model is the input of the physical XML builder in
//! `noticegen-xml`.

pub mod concept;
pub mod error;
pub mod metadata;
pub mod version;
pub mod visual;

pub use concept::{
    ConceptField, ConceptNode, ConceptualModel, FIELD_ID_NOTICE_SUB_TYPE, FIELD_ID_SDK_VERSION,
    FIELD_SECTOR_OF_ACTIVITY, ND_ROOT, ND_ROOT_EXTENSION, build_conceptual_model,
};
pub use error::{ModelError, Result};
pub use metadata::{
    DocumentTypeInfo, DocumentTypeNamespace, FieldMetadata, FieldValueType, FieldsAndNodes,
    NodeMetadata, NoticeTypes,
};
pub use version::{EFORMS_SDK_PREFIX, SdkVersion};
pub use visual::{VisualItem, VisualKind, VisualModel};
