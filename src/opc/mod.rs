/// Open Packaging Conventions container access.
///
/// A .docx file is a ZIP archive of named parts plus relationship files.
/// This module provides the part store: it reads the archive once, hands out
/// part blobs by pack URI, overlays the parts an edit rewrites, and writes
/// the archive back with every untouched part byte-for-byte intact.
pub mod constants;
pub mod package;
pub mod packuri;
pub mod rel;

pub use package::DocxPackage;
pub use packuri::PackURI;
pub use rel::Relationship;
