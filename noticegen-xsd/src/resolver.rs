//! Declared element order, extracted from the SDK schemas.
//!
//! The main XSD of a document type declares the root element and its complex
//! type; each complex type declares its child elements in order. Elements
//! with a foreign prefix are declared in the schema file bound to that prefix
//! through the document-type namespace table. Files are read and parsed
//! lazily, at most once, and the resulting order lists are memoized by type
//! name; nothing is parsed per element instance.
//!
//! Nested `choice` and sibling `sequence` blocks inside a complex type are
//! flattened: every element reference counts, in document order.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use noticegen_model::metadata::DocumentTypeInfo;
use noticegen_model::version::SdkVersion;

use crate::error::SortError;

/// Resolves the declared child order of document elements for one SDK
/// version and document type.
#[derive(Debug)]
pub struct SchemaOrderResolver {
    sdk_version: SdkVersion,
    main_xsd: Option<PathBuf>,
    location_by_prefix: HashMap<String, PathBuf>,
    state: RwLock<ResolverState>,
}

#[derive(Debug, Default)]
struct ResolverState {
    /// Per schema file: local element name to type name. Empty entry marks a
    /// file as parsed.
    element_types: HashMap<PathBuf, HashMap<String, String>>,
    /// Type name to ordered child element references.
    order_by_type: HashMap<String, Arc<Vec<String>>>,
}

impl SchemaOrderResolver {
    /// Creates a resolver for one SDK version and document type. No files
    /// are read until an order is requested.
    #[must_use]
    pub fn new(sdk_root: &Path, doc_type: &DocumentTypeInfo, sdk_version: SdkVersion) -> Self {
        let main_xsd = doc_type.xsd_path.as_ref().map(|p| sdk_root.join(p));
        let location_by_prefix = doc_type
            .additional_namespaces
            .iter()
            .filter_map(|ns| {
                ns.schema_location
                    .as_ref()
                    .map(|loc| (ns.prefix.clone(), sdk_root.join(loc)))
            })
            .collect();
        Self {
            sdk_version,
            main_xsd,
            location_by_prefix,
            state: RwLock::new(ResolverState::default()),
        }
    }

    /// SDK version this resolver was constructed for.
    #[must_use]
    pub fn sdk_version(&self) -> SdkVersion {
        self.sdk_version
    }

    /// Whether the document type ships a main XSD for this SDK version.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.main_xsd.is_some()
    }

    /// Declared child order for the element with the given (possibly
    /// prefixed) tag, or `None` when no schema declares it.
    ///
    /// # Errors
    ///
    /// Returns [`SortError`] when a schema file cannot be read or parsed.
    pub fn order_for_element(&self, tag: &str) -> Result<Option<Arc<Vec<String>>>, SortError> {
        let (prefix, local) = match tag.split_once(':') {
            Some((p, l)) => (Some(p), l),
            None => (None, tag),
        };
        let file = match prefix {
            None => self.main_xsd.clone(),
            Some(p) => self.location_by_prefix.get(p).cloned(),
        };
        let Some(file) = file else {
            return Ok(None);
        };
        self.ensure_parsed(&file)?;

        let state = self.state.read();
        let order = state
            .element_types
            .get(&file)
            .and_then(|types| types.get(local))
            .and_then(|type_name| state.order_by_type.get(type_name))
            .cloned();
        Ok(order)
    }

    fn ensure_parsed(&self, file: &Path) -> Result<(), SortError> {
        if self.state.read().element_types.contains_key(file) {
            return Ok(());
        }
        let text = fs::read_to_string(file)?;
        let parsed = parse_xsd(&text)?;
        tracing::info!(
            file = %file.display(),
            elements = parsed.element_types.len(),
            types = parsed.order_by_type.len(),
            "parsed schema file"
        );

        let mut state = self.state.write();
        if state
            .element_types
            .insert(file.to_path_buf(), parsed.element_types)
            .is_none()
        {
            for (type_name, refs) in parsed.order_by_type {
                match state.order_by_type.entry(type_name) {
                    Entry::Occupied(entry) => {
                        if entry.get().as_slice() != refs.as_slice() {
                            tracing::warn!(
                                type_name = %entry.key(),
                                file = %file.display(),
                                "complex type declared with a different child order in \
                                 another schema file, keeping the first"
                            );
                        }
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(Arc::new(refs));
                    }
                }
            }
        }
        Ok(())
    }
}

struct ParsedXsd {
    element_types: HashMap<String, String>,
    order_by_type: HashMap<String, Vec<String>>,
}

/// Parses one schema file, recording top-level element declarations and the
/// ordered element references of each complex type.
fn parse_xsd(xml: &str) -> Result<ParsedXsd, SortError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut element_types = HashMap::new();
    let mut order_by_type: HashMap<String, Vec<String>> = HashMap::new();
    let mut current_type: Option<String> = None;
    let mut depth = 0usize;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                handle_tag(
                    e,
                    depth,
                    &mut element_types,
                    &mut order_by_type,
                    &mut current_type,
                )?;
                depth += 1;
            }
            Ok(Event::Empty(ref e)) => {
                handle_tag(
                    e,
                    depth,
                    &mut element_types,
                    &mut order_by_type,
                    &mut current_type,
                )?;
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    current_type = None;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SortError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(ParsedXsd {
        element_types,
        order_by_type,
    })
}

fn handle_tag(
    e: &BytesStart<'_>,
    depth: usize,
    element_types: &mut HashMap<String, String>,
    order_by_type: &mut HashMap<String, Vec<String>>,
    current_type: &mut Option<String>,
) -> Result<(), SortError> {
    let name_bytes = e.name().as_ref().to_vec();
    let name = std::str::from_utf8(&name_bytes)?;
    match local_name(name) {
        "element" if depth == 1 => {
            if let (Some(elem_name), Some(type_name)) =
                (attr_value(e, "name")?, attr_value(e, "type")?)
            {
                element_types.insert(elem_name, type_name);
            }
        }
        "element" if depth > 1 => {
            if let Some(type_name) = current_type {
                if let Some(reference) = attr_value(e, "ref")? {
                    order_by_type
                        .entry(type_name.clone())
                        .or_default()
                        .push(reference);
                }
            }
        }
        "complexType" if depth == 1 => {
            if let Some(type_name) = attr_value(e, "name")? {
                order_by_type.entry(type_name.clone()).or_default();
                *current_type = Some(type_name);
            }
        }
        _ => {}
    }
    Ok(())
}

fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

fn attr_value(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, SortError> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key.as_bytes() {
            return Ok(Some(std::str::from_utf8(&attr.value)?.to_string()));
        }
    }
    Ok(None)
}
