/// Error types for document review operations.
use thiserror::Error;

/// Result type for document review operations.
pub type Result<T> = std::result::Result<T, DocxError>;

/// Error types for document review operations.
#[derive(Error, Debug)]
pub enum DocxError {
    /// Input package file does not exist
    #[error("package not found: {0}")]
    PackageNotFound(String),

    /// Container is not a readable OPC package
    #[error("invalid .docx package: {0}")]
    InvalidPackage(String),

    /// A required part is missing from the package
    #[error("part not found: {0}")]
    PartNotFound(String),

    /// XML parsing or serialization error
    #[error("XML error: {0}")]
    Xml(String),

    /// Edit manifest could not be parsed
    #[error("manifest error: {0}")]
    Manifest(String),

    /// Structural invariant violated by the input document
    #[error("corrupt document: {0}")]
    CorruptDocument(String),

    /// ZIP container error
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<quick_xml::Error> for DocxError {
    fn from(err: quick_xml::Error) -> Self {
        DocxError::Xml(err.to_string())
    }
}

impl From<serde_json::Error> for DocxError {
    fn from(err: serde_json::Error) -> Self {
        DocxError::Other(err.to_string())
    }
}
