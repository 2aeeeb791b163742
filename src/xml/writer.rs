/// Serialization of the owned tree back to part bytes.
use crate::xml::node::{XmlElement, XmlNode};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Serialize a part root element to bytes, prefixed with the standard
/// declaration Word emits.
pub fn serialize_document(root: &XmlElement) -> Vec<u8> {
    let mut out = String::with_capacity(4096);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    write_element(root, &mut out);
    out.into_bytes()
}

fn write_element(el: &XmlElement, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for (key, value) in &el.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_attr(value, out);
        out.push('"');
    }
    if el.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &el.children {
        match child {
            XmlNode::Element(e) => write_element(e, out),
            XmlNode::Text(t) => escape_text(t, out),
        }
    }
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

fn escape_text(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parser::parse_document;

    #[test]
    fn test_round_trip_structure() {
        let xml = br#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t xml:space="preserve">a &amp; b </w:t></w:r></w:p>"#;
        let tree = parse_document(xml).unwrap();
        let bytes = serialize_document(&tree);
        let reparsed = parse_document(&bytes).unwrap();
        assert_eq!(tree, reparsed);
    }

    #[test]
    fn test_self_closing_empty_elements() {
        let el = XmlElement::new("w:br");
        let mut out = String::new();
        write_element(&el, &mut out);
        assert_eq!(out, "<w:br/>");
    }

    #[test]
    fn test_attribute_escaping() {
        let el = XmlElement::new("w:t").with_attr("w:val", "a \"quote\" & <tag>");
        let mut out = String::new();
        write_element(&el, &mut out);
        assert_eq!(out, r#"<w:t w:val="a &quot;quote&quot; &amp; &lt;tag&gt;"/>"#);
    }

    #[test]
    fn test_text_escaping() {
        let el = XmlElement::new("w:t").with_text("1 < 2 && 3 > 2");
        let mut out = String::new();
        write_element(&el, &mut out);
        assert_eq!(out, "<w:t>1 &lt; 2 &amp;&amp; 3 &gt; 2</w:t>");
    }
}
