//! XSD-driven element order resolution and document sorting.
//!
//! - [`resolver`] - declared child order per element, extracted lazily from
//!   the SDK schema files
//! - [`sorter`] - in-place, idempotent document sorting with a version gate
//! - [`cache`] - process-wide resolver sharing per SDK version

pub mod cache;
pub mod error;
pub mod resolver;
pub mod sorter;

pub use cache::ResolverCache;
pub use error::SortError;
pub use resolver::SchemaOrderResolver;
pub use sorter::{ElementSorter, TAG_CUSTOMIZATION_ID};
