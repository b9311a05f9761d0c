//! Relative-path mini-language.
//!
//! Field and node locations in the SDK metadata are given as a restricted
//! XPath subset: slash-separated element steps, an optional terminal
//! attribute step (`@name`), and at most one predicate per step. The only
//! predicate with build-time meaning is `[@schemeName = 'X']`; anything else
//! is kept verbatim in the step's expression so that distinct predicates
//! still map to distinct elements.

use crate::error::PathError;

/// Attribute carrying the scheme name on identifier elements.
pub const ATTR_SCHEME_NAME: &str = "schemeName";

/// Scheme name the legacy `[not(@schemeName = 'EU')]` predicate stands for.
pub const SCHEME_NAME_NATIONAL: &str = "national";

/// What a path segment addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentTarget {
    /// An element with the given tag.
    Element(String),
    /// An attribute with the given name on the enclosing element.
    Attribute(String),
}

/// One step of a relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// The full sub-expression, predicate included, after normalization.
    /// Used as the lookup key when node elements are reused.
    pub expr: String,
    /// Element tag or attribute name.
    pub target: SegmentTarget,
    /// Scheme name extracted from the predicate, if any.
    pub scheme_name: Option<String>,
}

impl PathSegment {
    /// The element tag, if this segment addresses an element.
    #[must_use]
    pub fn element_tag(&self) -> Option<&str> {
        match &self.target {
            SegmentTarget::Element(tag) => Some(tag),
            SegmentTarget::Attribute(_) => None,
        }
    }
}

/// Parses a relative path into its segments.
///
/// Slashes inside balanced brackets do not split; unbalanced brackets are
/// rejected. The self-path `/*` of the root node parses to a single wildcard
/// element segment.
///
/// # Errors
///
/// Returns [`PathError::UnbalancedBrackets`] or [`PathError::EmptySegment`].
pub fn parse_relative_path(path: &str) -> Result<Vec<PathSegment>, PathError> {
    if path == "/*" {
        return Ok(vec![PathSegment {
            expr: "/*".to_string(),
            target: SegmentTarget::Element("*".to_string()),
            scheme_name: None,
        }]);
    }
    split_segments(path)?
        .into_iter()
        .map(|raw| parse_segment(raw, path))
        .collect()
}

fn split_segments(path: &str) -> Result<Vec<&str>, PathError> {
    let mut parts = Vec::new();
    let mut depth: u32 = 0;
    let mut start = 0;
    for (i, c) in path.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| PathError::unbalanced_brackets(path))?;
            }
            '/' if depth == 0 => {
                parts.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(PathError::unbalanced_brackets(path));
    }
    parts.push(&path[start..]);
    Ok(parts)
}

fn parse_segment(raw: &str, path: &str) -> Result<PathSegment, PathError> {
    if let Some(attr) = raw.strip_prefix('@') {
        if attr.is_empty() || attr.contains('[') {
            return Err(PathError::empty_segment(path));
        }
        return Ok(PathSegment {
            expr: raw.to_string(),
            target: SegmentTarget::Attribute(attr.to_string()),
            scheme_name: None,
        });
    }

    let (tag, predicate) = match raw.find('[') {
        Some(i) => (&raw[..i], Some(&raw[i..])),
        None => (raw, None),
    };
    if tag.is_empty() {
        return Err(PathError::empty_segment(path));
    }

    let mut expr = raw.to_string();
    let mut scheme_name = None;
    if let Some(predicate) = predicate {
        if is_negated_eu_scheme(predicate) {
            // Legacy alternative spelling of the national scheme.
            scheme_name = Some(SCHEME_NAME_NATIONAL.to_string());
            expr = format!("{tag}[@{ATTR_SCHEME_NAME} = '{SCHEME_NAME_NATIONAL}']");
        } else if let Some(value) = extract_scheme_name(predicate) {
            scheme_name = Some(value.to_string());
        }
    }

    Ok(PathSegment {
        expr,
        target: SegmentTarget::Element(tag.to_string()),
        scheme_name,
    })
}

fn is_negated_eu_scheme(predicate: &str) -> bool {
    let compact: String = predicate.chars().filter(|c| !c.is_whitespace()).collect();
    compact == "[not(@schemeName='EU')]"
}

fn extract_scheme_name(predicate: &str) -> Option<&str> {
    // Only the element's own attribute counts; a path inside the predicate
    // (e.g. `[cbc:ID/@schemeName = 'X']`) constrains a descendant instead.
    let rest = predicate
        .trim_start_matches('[')
        .trim_start()
        .strip_prefix("@schemeName")?;
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let rest = rest.strip_prefix('\'')?;
    let end = rest.find('\'')?;
    Some(&rest[..end])
}
