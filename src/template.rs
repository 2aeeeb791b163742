/// Blank-document template.
///
/// Provides the minimal valid parts for creating a new Word document. The
/// create mode copies these into a fresh archive, then hands the result to
/// the edit driver like any other input.
use crate::error::Result;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Generate a minimal valid document.xml content.
pub fn default_document_xml() -> &'static str {
    include_str!("resources/document.xml")
}

/// Generate default styles.xml content.
pub fn default_styles_xml() -> &'static str {
    include_str!("resources/styles.xml")
}

/// Generate a minimal valid core.xml (core properties) content.
pub fn default_core_props_xml() -> &'static str {
    include_str!("resources/docProps/core.xml")
}

/// Generate a minimal valid app.xml (extended properties) content.
pub fn default_app_props_xml() -> &'static str {
    include_str!("resources/docProps/app.xml")
}

/// Assemble a blank .docx archive.
pub fn blank_document_bytes() -> Result<Vec<u8>> {
    let parts: [(&str, &str); 7] = [
        ("[Content_Types].xml", include_str!("resources/content_types.xml")),
        ("_rels/.rels", include_str!("resources/package_rels.xml")),
        ("word/document.xml", default_document_xml()),
        ("word/_rels/document.xml.rels", include_str!("resources/document_rels.xml")),
        ("word/styles.xml", default_styles_xml()),
        ("docProps/core.xml", default_core_props_xml()),
        ("docProps/app.xml", default_app_props_xml()),
    ];

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in parts {
        writer.start_file(name, options)?;
        writer.write_all(content.as_bytes())?;
    }
    Ok(writer
        .finish()
        .map_err(|e| crate::error::DocxError::InvalidPackage(e.to_string()))?
        .into_inner())
}
