/// Pack URI handling for OPC part names.
///
/// A pack URI is the absolute, `/`-rooted name of a part within the package,
/// e.g. `/word/document.xml`. ZIP member names are the same string without
/// the leading slash.
use crate::error::{DocxError, Result};
use std::fmt;

/// The URI of the content types stream.
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

/// An absolute part name within an OPC package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackURI(String);

impl PackURI {
    /// Create a PackURI, validating the leading slash.
    pub fn new(uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(DocxError::InvalidPackage(format!(
                "pack URI must begin with '/': {uri}"
            )));
        }
        Ok(Self(uri))
    }

    /// Build a PackURI from a ZIP member name.
    pub fn from_membername(name: &str) -> Self {
        Self(format!("/{}", name.trim_start_matches('/')))
    }

    /// The URI as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The ZIP member name for this part (no leading slash).
    #[inline]
    pub fn membername(&self) -> &str {
        &self.0[1..]
    }

    /// The final path segment.
    pub fn filename(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// The directory part, without trailing slash (empty for the root).
    pub fn basedir(&self) -> &str {
        match self.0.rfind('/') {
            Some(0) | None => "",
            Some(pos) => &self.0[1..pos],
        }
    }

    /// The extension, lowercased convention left to the caller.
    pub fn ext(&self) -> &str {
        self.filename().rsplit('.').next().unwrap_or("")
    }

    /// The URI of the relationships part for this part.
    ///
    /// `/word/document.xml` -> `/word/_rels/document.xml.rels`; the package
    /// root maps to `/_rels/.rels`.
    pub fn rels_uri(&self) -> PackURI {
        let base = self.basedir();
        if base.is_empty() {
            PackURI(format!("/_rels/{}.rels", self.filename()))
        } else {
            PackURI(format!("/{}/_rels/{}.rels", base, self.filename()))
        }
    }

    /// Resolve a relationship target relative to this part's directory.
    ///
    /// Targets in relationship files are relative (`media/image1.png`) or
    /// package-absolute (`/word/media/image1.png`).
    pub fn resolve(&self, target: &str) -> PackURI {
        if let Some(stripped) = target.strip_prefix('/') {
            return PackURI(format!("/{stripped}"));
        }
        let base = self.basedir();
        let mut segments: Vec<&str> = if base.is_empty() {
            Vec::new()
        } else {
            base.split('/').collect()
        };
        for seg in target.split('/') {
            match seg {
                "." | "" => {},
                ".." => {
                    segments.pop();
                },
                other => segments.push(other),
            }
        }
        PackURI(format!("/{}", segments.join("/")))
    }
}

impl fmt::Display for PackURI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
