//! # noticegen
//!
//! eForms notice XML generation for Rust.
//!
//! noticegen turns the JSON tree a notice editor form submits into
//! schema-valid notice XML, driven entirely by the metadata tables and XSD
//! schemas of an eForms SDK version.
//!
//! ## Pipeline
//!
//! 1. **Visual to conceptual** - the form tree is re-parented onto the SDK
//!    node hierarchy, flattening purely visual groups and filling in omitted
//!    non-repeatable nodes
//! 2. **Conceptual to physical** - elements are materialized along each
//!    node's and field's relative path
//! 3. **Schema sort** - children are reordered into the order the XSDs
//!    declare, after a version gate against the embedded SDK version
//!
//! ## Quick Start
//!
//! ```ignore
//! use noticegen::prelude::*;
//!
//! let generator = NoticeGenerator::new("/path/to/eforms-sdk/1.8");
//! let visual = VisualModel::from_json(form_json)?;
//! let xml = generator.generate(&visual, &tables, &notice_types,
//!     &BuildOptions::default(), false)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`model`] - visual form, SDK metadata tables, conceptual tree
//! - [`xml`] - relative-path parsing, physical tree building, serialization
//! - [`xsd`] - declared-order resolution and in-place sorting

pub mod pipeline;
pub mod prelude;

/// Visual form, metadata tables and conceptual tree.
pub mod model {
    pub use noticegen_model::*;
}

/// Physical XML tree building and serialization.
pub mod xml {
    pub use noticegen_xml::*;
}

/// Schema order resolution and sorting.
pub mod xsd {
    pub use noticegen_xsd::*;
}

// Re-export commonly used items at the crate root
pub use noticegen_model::{
    ConceptualModel, FieldsAndNodes, ModelError, NoticeTypes, SdkVersion, VisualModel,
    build_conceptual_model,
};
pub use noticegen_xml::{BuildOptions, PhysicalModel, build_physical_model};
pub use noticegen_xsd::{ElementSorter, ResolverCache, SchemaOrderResolver};

pub use pipeline::{NoticeGenerator, PipelineError};
