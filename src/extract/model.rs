/// The neutral read model.
///
/// Everything the read, diff, and textconv paths consume comes through
/// these types; none of them hold references into the XML tree.
use crate::docx::metadata::PackageMetadata;
use crate::docx::properties::RunProperties;
use serde::Serialize;

/// A fully extracted document.
#[derive(Debug, Default, Serialize)]
pub struct DocumentModel {
    pub paragraphs: Vec<ParagraphModel>,
    pub comments: Vec<CommentModel>,
    pub tables: Vec<TableModel>,
    pub images: Vec<ImageModel>,
    pub headers_footers: Vec<HeaderFooterModel>,
    pub metadata: PackageMetadata,
}

impl DocumentModel {
    /// All tracked changes across paragraphs, flattened in document order.
    pub fn tracked_changes(&self) -> impl Iterator<Item = &TrackedChange> {
        self.paragraphs.iter().flat_map(|p| p.tracked_changes.iter())
    }

    /// Word count over the visible text of every paragraph.
    pub fn computed_word_count(&self) -> usize {
        self.paragraphs
            .iter()
            .map(|p| p.text.split_whitespace().count())
            .sum()
    }
}

/// One paragraph with its runs and tracked changes.
#[derive(Debug, Default, Serialize)]
pub struct ParagraphModel {
    /// 0-based paragraph index among top-level paragraphs
    pub index: usize,
    /// Paragraph style identifier, if any
    pub style: Option<String>,
    /// Visible text (regular + inserted runs; deletions excluded)
    pub text: String,
    /// Inline runs in document order, deletions included
    #[serde(skip)]
    pub runs: Vec<RunModel>,
    pub tracked_changes: Vec<TrackedChange>,
}

/// A run in the read model.
#[derive(Debug, Clone, Serialize)]
pub struct RunModel {
    pub text: String,
    #[serde(skip)]
    pub props: RunProperties,
    #[serde(skip)]
    pub kind: RunKind,
}

/// How a run participates in the review layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    /// Plain document text
    Normal,
    /// Inside a `w:ins`/`w:moveTo` container
    Inserted,
    /// Inside a `w:del`/`w:moveFrom` container
    Deleted,
}

/// A tracked change attached to a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedChange {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub text: String,
    pub author: String,
    pub date: Option<String>,
    pub id: String,
}

/// Insertions and deletions; moves fold into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Delete,
}

/// An anchored comment joined with its range information.
#[derive(Debug, Clone, Serialize)]
pub struct CommentModel {
    pub id: String,
    pub author: String,
    pub date: Option<String>,
    /// Visible text between the range markers
    pub anchor_text: String,
    /// Body paragraphs joined with newlines
    pub text: String,
    /// Paragraph containing the range start marker
    pub paragraph_index: Option<usize>,
}

/// A table in the body.
#[derive(Debug, Serialize)]
pub struct TableModel {
    pub rows: usize,
    pub cols: usize,
    /// Cell text, row-major; only cell text is compared by the differ
    pub cells: Vec<Vec<String>>,
    /// Number of paragraphs preceding the table
    pub paragraph_index: usize,
}

/// An embedded image.
#[derive(Debug, Serialize)]
pub struct ImageModel {
    pub rel_id: String,
    pub file_name: String,
    pub media_type: String,
    pub size_bytes: usize,
    /// Hex SHA-256 of the payload
    pub sha256: String,
}

/// Header or footer text with its section scope.
#[derive(Debug, Serialize)]
pub struct HeaderFooterModel {
    /// `header` or `footer`
    pub kind: String,
    /// `default`, `first`, or `even`
    pub scope: String,
    pub text: String,
}
