//! XML serialization.
//!
//! Output starts with an XML declaration and is UTF-8. Attributes are written
//! with `xmlns` first and the rest sorted by name, so serialization is
//! byte-stable regardless of build order. Indented output is for logs and
//! diffs; comparisons should use the unindented form.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::element::{XmlAttribute, XmlElement};
use crate::error::WriteError;

/// Serializes an element tree to XML text.
///
/// # Errors
///
/// Returns [`WriteError`] when the underlying writer fails.
pub fn serialize(root: &XmlElement, indented: bool) -> Result<String, WriteError> {
    let mut buffer = Vec::new();
    if indented {
        let mut writer = Writer::new_with_indent(&mut buffer, b' ', 2);
        write_document(&mut writer, root)?;
    } else {
        let mut writer = Writer::new(&mut buffer);
        write_document(&mut writer, root)?;
    }
    Ok(String::from_utf8(buffer)?)
}

fn write_document<W: Write>(writer: &mut Writer<W>, root: &XmlElement) -> Result<(), WriteError> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    write_element(writer, root)
}

fn write_element<W: Write>(writer: &mut Writer<W>, elem: &XmlElement) -> Result<(), WriteError> {
    let mut start = BytesStart::new(elem.name.as_str());
    let mut attributes: Vec<&XmlAttribute> = elem.attributes.iter().collect();
    attributes.sort_by_key(|a| (a.name != "xmlns", a.name.as_str()));
    for attr in attributes {
        start.push_attribute((attr.name.as_str(), attr.value.as_str()));
    }

    let text = elem.text.as_deref().unwrap_or("");
    if text.is_empty() && elem.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if !text.is_empty() {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &elem.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(elem.name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_and_empty_element() {
        let root = XmlElement::new("Notice");
        let xml = serialize(&root, false).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?><Notice/>"
        );
    }

    #[test]
    fn test_attribute_order() {
        let mut root = XmlElement::new("Notice");
        root.set_attribute("xmlns:cbc", "urn:cbc");
        root.set_attribute("xmlns", "urn:main");
        root.set_attribute("listName", "x");
        root.set_attribute("editorCounterSelf", "1");
        let xml = serialize(&root, false).unwrap();
        assert!(xml.contains(
            "<Notice xmlns=\"urn:main\" editorCounterSelf=\"1\" listName=\"x\" xmlns:cbc=\"urn:cbc\"/>"
        ));
    }

    #[test]
    fn test_text_and_nesting() {
        let mut root = XmlElement::new("a");
        let mut child = XmlElement::new("b");
        child.text = Some("1 < 2 & so on".to_string());
        root.children.push(child);
        let xml = serialize(&root, false).unwrap();
        assert!(xml.ends_with("<a><b>1 &lt; 2 &amp; so on</b></a>"));
    }

    #[test]
    fn test_attribute_value_escaped() {
        let mut root = XmlElement::new("a");
        root.set_attribute("v", "x\"y<z");
        let xml = serialize(&root, false).unwrap();
        assert!(xml.contains("v=\"x&quot;y&lt;z\""));
    }
}
