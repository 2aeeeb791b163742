/// Relationship parsing and serialization.
///
/// Relationship parts are small, flat XML files; they are scanned with a
/// streaming reader and patched textually so unrelated entries keep their
/// exact source bytes.
use crate::error::{DocxError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// A single relationship entry.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID, e.g. `rId3`
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target, relative to the source part's directory unless rooted
    pub target: String,
    /// Whether TargetMode="External"
    pub external: bool,
}

/// Parse all relationships from a `.rels` part.
pub fn parse_relationships(xml_bytes: &[u8]) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_reader(xml_bytes);
    reader.config_mut().trim_text(true);

    let mut rels = Vec::new();
    let mut buf = Vec::with_capacity(512);

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut id = String::new();
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = String::from_utf8_lossy(&attr.value).into_owned(),
                            b"Type" => {
                                rel_type = String::from_utf8_lossy(&attr.value).into_owned();
                            },
                            b"Target" => {
                                target = String::from_utf8_lossy(&attr.value).into_owned();
                            },
                            b"TargetMode" => {
                                external = attr.value.as_ref() == b"External";
                            },
                            _ => {},
                        }
                    }

                    rels.push(Relationship {
                        id,
                        rel_type,
                        target,
                        external,
                    });
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocxError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(rels)
}

/// The smallest `rId{n}` not used by any existing relationship.
pub fn next_relationship_id(rels: &[Relationship]) -> String {
    let max = rels
        .iter()
        .filter_map(|r| r.id.strip_prefix("rId"))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("rId{}", max + 1)
}

/// An empty relationships part.
pub fn empty_relationships_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        "\n",
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#,
    )
    .to_string()
}
