/// Package metadata from the docProps parts.
///
/// Core properties (`/docProps/core.xml`) carry title, creator, revision and
/// timestamps; extended properties (`/docProps/app.xml`) carry the word and
/// paragraph counters. Both parts are optional in a well-formed package.
use crate::error::{DocxError, Result};
use crate::opc::{DocxPackage, PackURI};
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::{Serialize, Serializer};

/// Document metadata record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PackageMetadata {
    /// Document title
    pub title: Option<String>,
    /// Document author/creator
    pub author: Option<String>,
    /// Last person to modify the document
    pub last_modified_by: Option<String>,
    /// Creation timestamp
    #[serde(serialize_with = "iso_seconds")]
    pub created: Option<DateTime<Utc>>,
    /// Last modification timestamp
    #[serde(serialize_with = "iso_seconds")]
    pub modified: Option<DateTime<Utc>>,
    /// Revision counter, preserved verbatim
    pub revision: Option<String>,
    /// Word count from extended properties
    pub word_count: Option<u32>,
    /// Paragraph count from extended properties
    pub paragraph_count: Option<u32>,
}

/// ISO-8601 UTC with second precision.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn iso_seconds<S: Serializer>(
    dt: &Option<DateTime<Utc>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match dt {
        Some(dt) => serializer.serialize_some(&format_timestamp(dt)),
        None => serializer.serialize_none(),
    }
}

impl PackageMetadata {
    /// Read metadata from a package's docProps parts.
    pub fn from_package(package: &DocxPackage) -> Result<Self> {
        let mut meta = Self::default();

        let core_uri = PackURI::new("/docProps/core.xml")?;
        if package.contains(&core_uri) {
            meta.parse_core(package.part(&core_uri)?)?;
        }
        let app_uri = PackURI::new("/docProps/app.xml")?;
        if package.contains(&app_uri) {
            meta.parse_app(package.part(&app_uri)?)?;
        }
        Ok(meta)
    }

    fn parse_core(&mut self, xml_bytes: &[u8]) -> Result<()> {
        let mut reader = Reader::from_reader(xml_bytes);
        reader.config_mut().trim_text(true);

        let mut current: Option<CoreField> = None;
        let mut buf = Vec::with_capacity(512);

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    current = match e.local_name().as_ref() {
                        b"title" => Some(CoreField::Title),
                        b"creator" => Some(CoreField::Creator),
                        b"lastModifiedBy" => Some(CoreField::LastModifiedBy),
                        b"created" => Some(CoreField::Created),
                        b"modified" => Some(CoreField::Modified),
                        b"revision" => Some(CoreField::Revision),
                        _ => None,
                    };
                },
                Ok(Event::Text(e)) => {
                    if let Some(field) = current {
                        let text = e
                            .unescape()
                            .map_err(|err| DocxError::Xml(err.to_string()))?
                            .into_owned();
                        match field {
                            CoreField::Title => self.title = Some(text),
                            CoreField::Creator => self.author = Some(text),
                            CoreField::LastModifiedBy => self.last_modified_by = Some(text),
                            CoreField::Created => self.created = parse_timestamp(&text),
                            CoreField::Modified => self.modified = parse_timestamp(&text),
                            CoreField::Revision => self.revision = Some(text),
                        }
                    }
                },
                Ok(Event::End(_)) => current = None,
                Ok(Event::Eof) => break,
                Err(e) => return Err(DocxError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }
        Ok(())
    }

    fn parse_app(&mut self, xml_bytes: &[u8]) -> Result<()> {
        let mut reader = Reader::from_reader(xml_bytes);
        reader.config_mut().trim_text(true);

        let mut current: Option<AppField> = None;
        let mut buf = Vec::with_capacity(512);

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    current = match e.local_name().as_ref() {
                        b"Words" => Some(AppField::Words),
                        b"Paragraphs" => Some(AppField::Paragraphs),
                        _ => None,
                    };
                },
                Ok(Event::Text(e)) => {
                    if let Some(field) = current {
                        let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                        let value = text.trim().parse::<u32>().ok();
                        match field {
                            AppField::Words => self.word_count = value,
                            AppField::Paragraphs => self.paragraph_count = value,
                        }
                    }
                },
                Ok(Event::End(_)) => current = None,
                Ok(Event::Eof) => break,
                Err(e) => return Err(DocxError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum CoreField {
    Title,
    Creator,
    LastModifiedBy,
    Created,
    Modified,
    Revision,
}

#[derive(Clone, Copy)]
enum AppField {
    Words,
    Paragraphs,
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_core_properties() {
        let core = br#"<?xml version="1.0"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
    xmlns:dc="http://purl.org/dc/elements/1.1/"
    xmlns:dcterms="http://purl.org/dc/terms/">
    <dc:title>Study Protocol Draft v1</dc:title>
    <dc:creator>Dr. Smith</dc:creator>
    <cp:lastModifiedBy>Dr. Jones</cp:lastModifiedBy>
    <cp:revision>3</cp:revision>
    <dcterms:created>2024-01-15T08:30:00Z</dcterms:created>
    <dcterms:modified>2024-02-20T16:45:12Z</dcterms:modified>
</cp:coreProperties>"#;
        let mut meta = PackageMetadata::default();
        meta.parse_core(core).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Study Protocol Draft v1"));
        assert_eq!(meta.author.as_deref(), Some("Dr. Smith"));
        assert_eq!(meta.last_modified_by.as_deref(), Some("Dr. Jones"));
        assert_eq!(meta.revision.as_deref(), Some("3"));
        assert_eq!(
            meta.created.map(|dt| format_timestamp(&dt)).as_deref(),
            Some("2024-01-15T08:30:00Z")
        );
    }

    #[test]
    fn test_parse_app_properties() {
        let app = br#"<?xml version="1.0"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
    <Words>1420</Words>
    <Paragraphs>38</Paragraphs>
</Properties>"#;
        let mut meta = PackageMetadata::default();
        meta.parse_app(app).unwrap();
        assert_eq!(meta.word_count, Some(1420));
        assert_eq!(meta.paragraph_count, Some(38));
    }

    #[test]
    fn test_timestamp_second_precision() {
        let dt = parse_timestamp("2024-02-20T16:45:12.345Z").unwrap();
        assert_eq!(format_timestamp(&dt), "2024-02-20T16:45:12Z");
    }
}
