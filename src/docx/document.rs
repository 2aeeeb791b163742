/// The open document: package plus parsed review-layer parts.
///
/// Only the main document part and the comments part are ever parsed into
/// trees; everything else stays as raw bytes in the part store. Commit
/// serializes exactly the trees that were marked modified, so a run with no
/// successful operations writes the input parts back byte-for-byte.
use crate::docx::metadata::PackageMetadata;
use crate::error::{DocxError, Result};
use crate::opc::constants::{WML_NAMESPACE, content_type, relationship_type};
use crate::opc::{DocxPackage, PackURI};
use crate::xml::{XmlElement, parse_document, serialize_document};
use std::path::Path;

/// A .docx opened for review operations.
pub struct ReviewDocument {
    package: DocxPackage,
    document_uri: PackURI,
    root: XmlElement,
    comments_uri: PackURI,
    comments_root: Option<XmlElement>,
    /// The input had no comments part; commit must register one
    comments_part_is_new: bool,
    body_modified: bool,
    comments_modified: bool,
}

impl ReviewDocument {
    /// Open a document from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(DocxPackage::open(path)?)
    }

    /// Open a document from archive bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::load(DocxPackage::from_bytes(data)?)
    }

    fn load(package: DocxPackage) -> Result<Self> {
        let document_uri = package.main_document_uri()?;
        let root = parse_document(package.part(&document_uri)?)?;
        if root.find("body").is_none() {
            return Err(DocxError::CorruptDocument(
                "main document part has no w:body".to_string(),
            ));
        }

        // The comments part is wherever the document's relationships say it
        // is; default to the conventional sibling path when absent.
        let rels = package.relationships_for(&document_uri)?;
        let comments_uri = match rels
            .iter()
            .find(|r| r.rel_type == relationship_type::COMMENTS)
        {
            Some(rel) => document_uri.resolve(&rel.target),
            None => {
                let base = document_uri.basedir();
                PackURI::new(format!("/{base}/comments.xml"))?
            },
        };
        let (comments_root, comments_part_is_new) = if package.contains(&comments_uri) {
            (Some(parse_document(package.part(&comments_uri)?)?), false)
        } else {
            (None, true)
        };

        Ok(Self {
            package,
            document_uri,
            root,
            comments_uri,
            comments_root,
            comments_part_is_new,
            body_modified: false,
            comments_modified: false,
        })
    }

    /// The underlying part store.
    #[inline]
    pub fn package(&self) -> &DocxPackage {
        &self.package
    }

    /// The main document part's URI.
    #[inline]
    pub fn document_uri(&self) -> &PackURI {
        &self.document_uri
    }

    /// The `w:body` element.
    pub fn body(&self) -> Result<&XmlElement> {
        self.root
            .find("body")
            .ok_or_else(|| DocxError::CorruptDocument("main document part has no w:body".to_string()))
    }

    /// The `w:body` element, mutably.
    pub fn body_mut(&mut self) -> Result<&mut XmlElement> {
        self.root
            .find_mut("body")
            .ok_or_else(|| DocxError::CorruptDocument("main document part has no w:body".to_string()))
    }

    /// The parsed comments part, if the document has one.
    #[inline]
    pub fn comments_root(&self) -> Option<&XmlElement> {
        self.comments_root.as_ref()
    }

    /// The parsed comments part, creating an empty one on first use.
    pub fn comments_root_mut(&mut self) -> &mut XmlElement {
        self.comments_root.get_or_insert_with(|| {
            XmlElement::new("w:comments").with_attr("xmlns:w", WML_NAMESPACE)
        })
    }

    /// Record that the body tree changed and must be re-serialized.
    #[inline]
    pub fn mark_body_modified(&mut self) {
        self.body_modified = true;
    }

    /// Record that the comments tree changed and must be re-serialized.
    #[inline]
    pub fn mark_comments_modified(&mut self) {
        self.comments_modified = true;
    }

    /// Package metadata from the docProps parts.
    pub fn metadata(&self) -> Result<PackageMetadata> {
        PackageMetadata::from_package(&self.package)
    }

    /// Serialize modified trees back into the part store.
    ///
    /// When this run created the comments part, its relationship from the
    /// main document and its content type override are registered here.
    pub fn commit(&mut self) -> Result<()> {
        if self.body_modified {
            self.package
                .set_part(&self.document_uri, serialize_document(&self.root));
            self.body_modified = false;
        }
        if self.comments_modified
            && let Some(comments) = &self.comments_root
        {
            if self.comments_part_is_new {
                self.package.add_relationship(
                    &self.document_uri,
                    relationship_type::COMMENTS,
                    self.comments_uri.filename(),
                )?;
                self.package
                    .ensure_content_type_override(&self.comments_uri, content_type::WML_COMMENTS)?;
                self.comments_part_is_new = false;
            }
            self.package
                .set_part(&self.comments_uri, serialize_document(comments));
            self.comments_modified = false;
        }
        Ok(())
    }

    /// Write the package to a file. Call [`commit`](Self::commit) first.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.package.save(path)
    }

    /// Serialize the package to bytes. Call [`commit`](Self::commit) first.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.package.to_bytes()
    }
}
