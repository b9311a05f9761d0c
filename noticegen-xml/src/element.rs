//! Owned XML element tree.
//!
//! The physical model is built on this tree instead of a DOM: children are
//! plain vectors, so the sorter can reorder them in place and the builder can
//! scan them directly instead of evaluating XPath expressions.

/// One attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Attribute name, possibly prefixed.
    pub name: String,
    /// Attribute value, unescaped.
    pub value: String,
}

/// One element of the physical tree.
///
/// Elements created for conceptual nodes carry the path sub-expression that
/// produced them (tag plus predicate). Node building reuses an existing child
/// only when that expression matches, which keeps elements distinguished by
/// their scheme-name predicate apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Tag name, possibly prefixed.
    pub name: String,
    /// Attributes in insertion order. Serialization orders them by name.
    pub attributes: Vec<XmlAttribute>,
    /// Text content, written before any child elements.
    pub text: Option<String>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
    selector: Option<String>,
}

impl XmlElement {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            selector: None,
        }
    }

    /// Creates an empty element carrying the path sub-expression it was
    /// created for.
    #[must_use]
    pub fn with_selector(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            selector: Some(selector.into()),
            ..Self::new(name)
        }
    }

    /// The path sub-expression this element was created for, if any.
    #[must_use]
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    /// Sets an attribute, replacing an existing one with the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(XmlAttribute { name, value }),
        }
    }

    /// Value of an attribute, if set.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Index of the first child created for the given path sub-expression.
    #[must_use]
    pub fn position_by_selector(&self, selector: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|c| c.selector.as_deref() == Some(selector))
    }

    /// First direct child with the given tag name.
    #[must_use]
    pub fn find_child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Number of descendants (including self) with the given tag name.
    #[must_use]
    pub fn count_descendants(&self, name: &str) -> usize {
        let own = usize::from(self.name == name);
        own + self
            .children
            .iter()
            .map(|c| c.count_descendants(name))
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attribute_replaces() {
        let mut elem = XmlElement::new("cbc:ID");
        elem.set_attribute("schemeName", "a");
        elem.set_attribute("schemeName", "b");
        assert_eq!(elem.attributes.len(), 1);
        assert_eq!(elem.attribute("schemeName"), Some("b"));
    }

    #[test]
    fn test_position_by_selector() {
        let mut parent = XmlElement::new("root");
        parent
            .children
            .push(XmlElement::with_selector("cac:A", "cac:A[@schemeName = 'EU']"));
        parent.children.push(XmlElement::new("cac:A"));
        assert_eq!(
            parent.position_by_selector("cac:A[@schemeName = 'EU']"),
            Some(0)
        );
        assert_eq!(parent.position_by_selector("cac:A"), None);
    }

    #[test]
    fn test_count_descendants() {
        let mut root = XmlElement::new("root");
        let mut a = XmlElement::new("a");
        a.children.push(XmlElement::new("b"));
        a.children.push(XmlElement::new("b"));
        root.children.push(a);
        assert_eq!(root.count_descendants("b"), 2);
    }
}
