/// Streaming parse of an XML part into the owned tree.
///
/// Text is kept verbatim (no trimming) because run text inside `w:t` is
/// whitespace-significant. Entities are decoded on the way in; the writer
/// re-escapes on the way out.
use crate::error::{DocxError, Result};
use crate::xml::node::{XmlElement, XmlNode};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parse a complete XML part into its root element.
///
/// The XML declaration, processing instructions, and comments are dropped;
/// the writer emits a standard declaration when the part is serialized back.
pub fn parse_document(xml_bytes: &[u8]) -> Result<XmlElement> {
    let mut reader = Reader::from_reader(xml_bytes);

    // One open element per nesting level; the root pops last.
    let mut stack: Vec<XmlElement> = Vec::with_capacity(16);
    let mut root: Option<XmlElement> = None;
    let mut buf = Vec::with_capacity(1024);

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                stack.push(element_from_start(&e)?);
            },
            Ok(Event::Empty(e)) => {
                let el = element_from_start(&e)?;
                match stack.last_mut() {
                    Some(parent) => parent.push_element(el),
                    None if root.is_none() => root = Some(el),
                    None => {
                        return Err(DocxError::Xml("multiple root elements".to_string()));
                    },
                }
            },
            Ok(Event::End(_)) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| DocxError::Xml("unbalanced end tag".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.push_element(el),
                    None => root = Some(el),
                }
            },
            Ok(Event::Text(e)) => {
                if let Some(parent) = stack.last_mut() {
                    let text = e
                        .unescape()
                        .map_err(|err| DocxError::Xml(err.to_string()))?;
                    if !text.is_empty() {
                        parent.push(XmlNode::Text(text.into_owned()));
                    }
                }
            },
            Ok(Event::CData(e)) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    parent.push(XmlNode::Text(text));
                }
            },
            Ok(Event::Eof) => break,
            Ok(_) => {},
            Err(e) => return Err(DocxError::Xml(e.to_string())),
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(DocxError::Xml("unterminated element".to_string()));
    }
    root.ok_or_else(|| DocxError::Xml("empty document".to_string()))
}

fn element_from_start(e: &BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut el = XmlElement::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| DocxError::Xml(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| DocxError::Xml(err.to_string()))?
            .into_owned();
        el.attrs.push((key, value));
    }
    Ok(el)
}
