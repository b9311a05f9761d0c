//! Process-wide resolver cache.
//!
//! Schema parsing is the only per-version work worth sharing between
//! requests; one resolver per (SDK version, document type) is kept for the
//! lifetime of the process.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use noticegen_model::metadata::DocumentTypeInfo;
use noticegen_model::version::SdkVersion;

use crate::resolver::SchemaOrderResolver;

/// Shared cache of [`SchemaOrderResolver`] instances.
#[derive(Debug, Default)]
pub struct ResolverCache {
    inner: RwLock<HashMap<(SdkVersion, String), Arc<SchemaOrderResolver>>>,
}

impl ResolverCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the resolver for the given SDK version and document type,
    /// creating it on first use.
    pub fn resolver_for(
        &self,
        sdk_root: &Path,
        doc_type: &DocumentTypeInfo,
        sdk_version: SdkVersion,
    ) -> Arc<SchemaOrderResolver> {
        let key = (sdk_version, doc_type.root_element.clone());
        if let Some(resolver) = self.inner.read().get(&key) {
            return Arc::clone(resolver);
        }

        let mut cache = self.inner.write();
        Arc::clone(cache.entry(key).or_insert_with(|| {
            tracing::debug!(
                version = %sdk_version,
                root_element = %doc_type.root_element,
                "creating schema order resolver"
            );
            Arc::new(SchemaOrderResolver::new(sdk_root, doc_type, sdk_version))
        }))
    }
}
