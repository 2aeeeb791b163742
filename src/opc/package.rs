/// The part store backing every mode of the tool.
///
/// `DocxPackage` reads the whole archive up front, keeps each part as a raw
/// blob in original archive order, and tracks which parts an operation
/// replaced. On save, untouched parts are written back from their original
/// bytes, so styles, numbering, settings, fonts, media, headers, footers,
/// and anything else the tool does not understand survive bit-for-bit.
use crate::error::{DocxError, Result};
use crate::opc::constants::relationship_type;
use crate::opc::packuri::{CONTENT_TYPES_URI, PackURI};
use crate::opc::rel::{self, Relationship};
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

struct PackageEntry {
    name: String,
    data: Vec<u8>,
}

/// An OPC package held in memory.
pub struct DocxPackage {
    /// Parts in original archive order; new parts append at the end
    entries: Vec<PackageEntry>,
    /// Member name -> entry index
    index: HashMap<String, usize>,
}

impl DocxPackage {
    /// Open a package from a file.
    ///
    /// # Errors
    ///
    /// `PackageNotFound` if the path does not exist; `InvalidPackage` if the
    /// file is not a readable ZIP archive.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DocxError::PackageNotFound(path.display().to_string()));
        }
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Load a package from archive bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| DocxError::InvalidPackage(e.to_string()))?;

        let mut entries = Vec::with_capacity(archive.len());
        let mut index = HashMap::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| DocxError::InvalidPackage(e.to_string()))?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            index.insert(name.clone(), entries.len());
            entries.push(PackageEntry { name, data });
        }

        if !index.contains_key(CONTENT_TYPES_URI.trim_start_matches('/')) {
            return Err(DocxError::InvalidPackage(
                "missing [Content_Types].xml".to_string(),
            ));
        }

        Ok(Self { entries, index })
    }

    /// Whether a part exists.
    #[inline]
    pub fn contains(&self, uri: &PackURI) -> bool {
        self.index.contains_key(uri.membername())
    }

    /// Get a part's bytes.
    pub fn part(&self, uri: &PackURI) -> Result<&[u8]> {
        self.index
            .get(uri.membername())
            .map(|&i| self.entries[i].data.as_slice())
            .ok_or_else(|| DocxError::PartNotFound(uri.to_string()))
    }

    /// Replace a part's bytes, or append the part if it is new.
    pub fn set_part(&mut self, uri: &PackURI, data: Vec<u8>) {
        match self.index.get(uri.membername()) {
            Some(&i) => self.entries[i].data = data,
            None => {
                let name = uri.membername().to_string();
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push(PackageEntry { name, data });
            },
        }
    }

    /// Iterate over (pack URI, bytes) for every part.
    pub fn iter_parts(&self) -> impl Iterator<Item = (PackURI, &[u8])> {
        self.entries
            .iter()
            .map(|e| (PackURI::from_membername(&e.name), e.data.as_slice()))
    }

    /// Resolve the main document part via the package relationships.
    ///
    /// # Errors
    ///
    /// `PartNotFound` when the package has no officeDocument relationship or
    /// the target part is absent — both fatal for a .docx.
    pub fn main_document_uri(&self) -> Result<PackURI> {
        let root = PackURI::new("/")?;
        let rels = self.relationships_for(&root)?;
        let rel = rels
            .iter()
            .find(|r| r.rel_type == relationship_type::OFFICE_DOCUMENT)
            .ok_or_else(|| DocxError::PartNotFound("main document part".to_string()))?;
        let uri = root.resolve(&rel.target);
        if !self.contains(&uri) {
            return Err(DocxError::PartNotFound(uri.to_string()));
        }
        Ok(uri)
    }

    /// Parse the relationships of a part (or of the package for `/`).
    ///
    /// A part with no relationships file has no relationships.
    pub fn relationships_for(&self, uri: &PackURI) -> Result<Vec<Relationship>> {
        let rels_uri = uri.rels_uri();
        match self.part(&rels_uri) {
            Ok(bytes) => rel::parse_relationships(bytes),
            Err(DocxError::PartNotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Add a relationship from `source` to `target`, returning the new rId.
    ///
    /// The relationships part is patched textually so existing entries keep
    /// their source bytes; it is created when the part had none.
    pub fn add_relationship(
        &mut self,
        source: &PackURI,
        rel_type: &str,
        target: &str,
    ) -> Result<String> {
        let rels_uri = source.rels_uri();
        let existing = self.relationships_for(source)?;
        let rid = rel::next_relationship_id(&existing);

        let xml = match self.part(&rels_uri) {
            Ok(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Err(DocxError::PartNotFound(_)) => rel::empty_relationships_xml(),
            Err(e) => return Err(e),
        };

        let insert_at = xml.rfind("</Relationships>").ok_or_else(|| {
            DocxError::InvalidPackage(format!("malformed relationships part {rels_uri}"))
        })?;
        let mut patched = xml;
        patched.insert_str(
            insert_at,
            &format!(r#"<Relationship Id="{rid}" Type="{rel_type}" Target="{target}"/>"#),
        );
        self.set_part(&rels_uri, patched.into_bytes());
        Ok(rid)
    }

    /// Register a content type override for a part, if not already present.
    pub fn ensure_content_type_override(
        &mut self,
        uri: &PackURI,
        content_type: &str,
    ) -> Result<()> {
        let ct_uri = PackURI::new(CONTENT_TYPES_URI)?;
        let xml = String::from_utf8_lossy(self.part(&ct_uri)?).into_owned();
        if xml.contains(&format!(r#"PartName="{}""#, uri.as_str())) {
            return Ok(());
        }
        let insert_at = xml
            .rfind("</Types>")
            .ok_or_else(|| DocxError::InvalidPackage("malformed [Content_Types].xml".to_string()))?;
        let mut patched = xml;
        patched.insert_str(
            insert_at,
            &format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                uri.as_str(),
                content_type
            ),
        );
        self.set_part(&ct_uri, patched.into_bytes());
        Ok(())
    }

    /// Look up the declared content type of a part.
    ///
    /// Checks Override entries first, then Default entries by extension.
    pub fn content_type_of(&self, uri: &PackURI) -> Result<Option<String>> {
        use quick_xml::Reader;
        use quick_xml::events::Event;

        let ct_uri = PackURI::new(CONTENT_TYPES_URI)?;
        let bytes = self.part(&ct_uri)?;
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(true);

        let ext = uri.ext().to_ascii_lowercase();
        let mut default_match = None;
        let mut buf = Vec::with_capacity(512);

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"Override" => {
                        let mut part_name = None;
                        let mut ct = None;
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"PartName" => {
                                    part_name =
                                        Some(String::from_utf8_lossy(&attr.value).into_owned());
                                },
                                b"ContentType" => {
                                    ct = Some(String::from_utf8_lossy(&attr.value).into_owned());
                                },
                                _ => {},
                            }
                        }
                        if part_name.as_deref() == Some(uri.as_str()) {
                            return Ok(ct);
                        }
                    },
                    b"Default" => {
                        let mut extension = None;
                        let mut ct = None;
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"Extension" => {
                                    extension =
                                        Some(String::from_utf8_lossy(&attr.value).to_lowercase());
                                },
                                b"ContentType" => {
                                    ct = Some(String::from_utf8_lossy(&attr.value).into_owned());
                                },
                                _ => {},
                            }
                        }
                        if extension.as_deref() == Some(ext.as_str()) {
                            default_match = ct;
                        }
                    },
                    _ => {},
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(DocxError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(default_match)
    }

    /// Serialize the package to archive bytes, preserving part order.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in &self.entries {
            writer.start_file(entry.name.as_str(), options)?;
            writer.write_all(&entry.data)?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| DocxError::InvalidPackage(e.to_string()))?;
        Ok(cursor.into_inner())
    }

    /// Write the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
