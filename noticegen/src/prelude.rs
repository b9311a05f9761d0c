//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types.
//!
//! ```ignore
//! use noticegen::prelude::*;
//! ```

// Model types
pub use noticegen_model::metadata::{
    DocumentTypeInfo, DocumentTypeNamespace, FieldMetadata, FieldValueType, FieldsAndNodes,
    NodeMetadata, NoticeTypes,
};
pub use noticegen_model::version::{EFORMS_SDK_PREFIX, SdkVersion};
pub use noticegen_model::visual::{VisualItem, VisualKind, VisualModel};
pub use noticegen_model::{
    ConceptField, ConceptNode, ConceptualModel, ModelError, build_conceptual_model,
};

// XML types
pub use noticegen_xml::{
    BuildError, BuildOptions, PathError, PhysicalModel, WriteError, XmlElement,
    build_physical_model, parse_relative_path, serialize,
};

// Schema order types
pub use noticegen_xsd::{ElementSorter, ResolverCache, SchemaOrderResolver, SortError};

// Pipeline
pub use crate::pipeline::{NoticeGenerator, PipelineError};
