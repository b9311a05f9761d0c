//! Physical XML tree building and serialization.
//!
//! The second half of the notice generation pipeline:
//!
//! - [`path`] - the relative-path mini-language of the SDK metadata
//! - [`element`] - the owned XML element tree
//! - [`physical`] - conceptual tree to physical tree construction
//! - [`writer`] - UTF-8 serialization with stable attribute order

pub mod element;
pub mod error;
pub mod path;
pub mod physical;
pub mod writer;

pub use element::{XmlAttribute, XmlElement};
pub use error::{BuildError, PathError, WriteError};
pub use path::{
    ATTR_SCHEME_NAME, PathSegment, SCHEME_NAME_NATIONAL, SegmentTarget, parse_relative_path,
};
pub use physical::{
    ATTR_EDITOR_COUNTER_PARENT, ATTR_EDITOR_COUNTER_SELF, ATTR_EDITOR_FIELD_ID,
    ATTR_EDITOR_NODE_ID, ATTR_LIST_NAME, BuildOptions, PhysicalModel, build_physical_model,
};
pub use writer::serialize;
