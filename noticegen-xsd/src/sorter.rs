//! In-place element sorting against the declared schema order.
//!
//! For each element with a resolvable type, direct children are stably
//! partitioned by the rank of their tag in the declared order: children of
//! each declared tag are moved to the end in turn, preserving their relative
//! order. Children with tags the schema does not declare keep their relative
//! positions at the front. Sorting is idempotent.

use noticegen_model::version::SdkVersion;
use noticegen_xml::XmlElement;

use crate::error::SortError;
use crate::resolver::SchemaOrderResolver;

/// Element carrying the embedded SDK version identifier.
pub const TAG_CUSTOMIZATION_ID: &str = "cbc:CustomizationID";

/// Sorts a document's elements into their schema-declared order.
#[derive(Debug)]
pub struct ElementSorter<'a> {
    resolver: &'a SchemaOrderResolver,
}

impl<'a> ElementSorter<'a> {
    /// Creates a sorter over the given resolver.
    #[must_use]
    pub fn new(resolver: &'a SchemaOrderResolver) -> Self {
        Self { resolver }
    }

    /// Sorts the document rooted at `root` in place.
    ///
    /// The version embedded in the document must match the resolver's SDK
    /// version, patch ignored. When the SDK version ships no main XSD,
    /// sorting is skipped and the document is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SortError::VersionMismatch`] or [`SortError::MissingVersion`]
    /// on a failed version check, and propagates schema read and parse
    /// failures.
    pub fn sort(&self, root: &mut XmlElement) -> Result<(), SortError> {
        if !self.resolver.is_supported() {
            tracing::info!(
                version = %self.resolver.sdk_version(),
                "sorting not supported: SDK version ships no main XSD"
            );
            return Ok(());
        }
        self.check_version(root)?;

        let Some(order) = self.resolver.order_for_element(&root.name)? else {
            tracing::warn!(root = %root.name, "no declared order for root element");
            return Ok(());
        };
        self.sort_children(root, &order)
    }

    fn check_version(&self, root: &XmlElement) -> Result<(), SortError> {
        let version_elem = root
            .find_child(TAG_CUSTOMIZATION_ID)
            .ok_or(SortError::MissingVersion)?;
        let text = version_elem.text.as_deref().unwrap_or_default();
        let found = SdkVersion::parse_prefixed(text)?;
        let expected = self.resolver.sdk_version();
        if !found.same_ignoring_patch(&expected) {
            return Err(SortError::VersionMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    fn sort_children(&self, elem: &mut XmlElement, order: &[String]) -> Result<(), SortError> {
        for tag in order {
            let mut moved = Vec::new();
            let mut i = 0;
            while i < elem.children.len() {
                if elem.children[i].name == *tag {
                    moved.push(elem.children.remove(i));
                } else {
                    i += 1;
                }
            }
            elem.children.append(&mut moved);
        }

        for i in 0..elem.children.len() {
            let name = elem.children[i].name.clone();
            if let Some(child_order) = self.resolver.order_for_element(&name)? {
                self.sort_children(&mut elem.children[i], &child_order)?;
            }
        }
        Ok(())
    }
}
