/// The semantic differ.
///
/// Compares two extracted documents across five layers: metadata fields,
/// paragraphs (similarity-tolerant LCS alignment), words within aligned
/// paragraphs, comments (keyed by author + anchor), and tracked changes
/// (keyed by type + text + author). `summary.identical` is the
/// authoritative equality signal.
pub mod lcs;

use crate::docx::metadata::{PackageMetadata, format_timestamp};
use crate::extract::{CommentModel, DocumentModel, ParagraphModel, RunKind, TrackedChange};
use lcs::lcs_pairs;
use serde::Serialize;
use std::collections::BTreeSet;

/// Two paragraphs align when their word sets overlap at least this much.
const SIMILARITY_THRESHOLD: f64 = 0.5;

/// The complete diff of two documents.
#[derive(Debug, Serialize)]
pub struct DocumentDiff {
    pub old_file: String,
    pub new_file: String,
    pub metadata: MetadataDiff,
    pub paragraphs: ParagraphDiff,
    pub comments: CommentDiff,
    pub tracked_changes: TrackedChangeDiff,
    pub summary: DiffSummary,
}

#[derive(Debug, Default, Serialize)]
pub struct MetadataDiff {
    pub changes: Vec<MetadataChange>,
}

#[derive(Debug, Serialize)]
pub struct MetadataChange {
    pub field: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct ParagraphDiff {
    pub added: Vec<ParagraphRef>,
    pub deleted: Vec<ParagraphRef>,
    pub modified: Vec<ParagraphModification>,
}

/// An unmatched paragraph on either side.
#[derive(Debug, Serialize)]
pub struct ParagraphRef {
    pub index: usize,
    pub text: String,
}

/// A matched pair of paragraphs that differ.
#[derive(Debug, Serialize)]
pub struct ParagraphModification {
    pub old_index: usize,
    pub new_index: usize,
    pub old_text: String,
    pub new_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_change: Option<StyleChange>,
    pub formatting_changes: Vec<FormattingChange>,
    pub word_changes: Vec<WordChange>,
}

#[derive(Debug, Serialize)]
pub struct StyleChange {
    pub old: Option<String>,
    pub new: Option<String>,
}

/// One formatting attribute that changed for a word present on both sides.
#[derive(Debug, Serialize)]
pub struct FormattingChange {
    pub word: String,
    pub attribute: String,
    pub old: String,
    pub new: String,
}

/// One word-level edit inside a modified paragraph.
#[derive(Debug, PartialEq, Serialize)]
pub struct WordChange {
    #[serde(rename = "type")]
    pub kind: WordChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<String>,
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WordChangeKind {
    Add,
    Delete,
    Replace,
}

#[derive(Debug, Default, Serialize)]
pub struct CommentDiff {
    pub added: Vec<CommentModel>,
    pub deleted: Vec<CommentModel>,
    pub modified: Vec<CommentModification>,
}

/// A comment present on both sides (same author + anchor) whose body changed.
#[derive(Debug, Serialize)]
pub struct CommentModification {
    pub author: String,
    pub anchor_text: String,
    pub old_text: String,
    pub new_text: String,
}

#[derive(Debug, Default, Serialize)]
pub struct TrackedChangeDiff {
    pub added: Vec<TrackedChange>,
    pub deleted: Vec<TrackedChange>,
}

/// Counts from the sub-diffs; `identical` iff every sub-diff is empty.
#[derive(Debug, Serialize)]
pub struct DiffSummary {
    pub metadata_changes: usize,
    pub paragraphs_added: usize,
    pub paragraphs_deleted: usize,
    pub paragraphs_modified: usize,
    pub comments_added: usize,
    pub comments_deleted: usize,
    pub comments_modified: usize,
    pub tracked_changes_added: usize,
    pub tracked_changes_deleted: usize,
    pub identical: bool,
}

/// Diff two extracted documents.
pub fn diff_documents(
    old: &DocumentModel,
    new: &DocumentModel,
    old_file: impl Into<String>,
    new_file: impl Into<String>,
) -> DocumentDiff {
    let metadata = diff_metadata(&old.metadata, &new.metadata);
    let paragraphs = diff_paragraphs(&old.paragraphs, &new.paragraphs);
    let comments = diff_comments(&old.comments, &new.comments);
    let tracked_changes = diff_tracked_changes(old, new);

    let summary = DiffSummary {
        metadata_changes: metadata.changes.len(),
        paragraphs_added: paragraphs.added.len(),
        paragraphs_deleted: paragraphs.deleted.len(),
        paragraphs_modified: paragraphs.modified.len(),
        comments_added: comments.added.len(),
        comments_deleted: comments.deleted.len(),
        comments_modified: comments.modified.len(),
        tracked_changes_added: tracked_changes.added.len(),
        tracked_changes_deleted: tracked_changes.deleted.len(),
        identical: metadata.changes.is_empty()
            && paragraphs.added.is_empty()
            && paragraphs.deleted.is_empty()
            && paragraphs.modified.is_empty()
            && comments.added.is_empty()
            && comments.deleted.is_empty()
            && comments.modified.is_empty()
            && tracked_changes.added.is_empty()
            && tracked_changes.deleted.is_empty(),
    };

    DocumentDiff {
        old_file: old_file.into(),
        new_file: new_file.into(),
        metadata,
        paragraphs,
        comments,
        tracked_changes,
        summary,
    }
}

// ---------------------------------------------------------------------------
// Metadata

fn diff_metadata(old: &PackageMetadata, new: &PackageMetadata) -> MetadataDiff {
    let mut changes = Vec::new();
    let mut field = |name: &str, old_val: Option<String>, new_val: Option<String>| {
        if old_val != new_val {
            changes.push(MetadataChange {
                field: name.to_string(),
                old: old_val,
                new: new_val,
            });
        }
    };

    field("title", old.title.clone(), new.title.clone());
    field("author", old.author.clone(), new.author.clone());
    field(
        "last_modified_by",
        old.last_modified_by.clone(),
        new.last_modified_by.clone(),
    );
    field(
        "created",
        old.created.as_ref().map(format_timestamp),
        new.created.as_ref().map(format_timestamp),
    );
    field(
        "modified",
        old.modified.as_ref().map(format_timestamp),
        new.modified.as_ref().map(format_timestamp),
    );
    field("revision", old.revision.clone(), new.revision.clone());
    field(
        "word_count",
        old.word_count.map(|n| n.to_string()),
        new.word_count.map(|n| n.to_string()),
    );

    MetadataDiff { changes }
}

// ---------------------------------------------------------------------------
// Paragraphs

fn diff_paragraphs(old: &[ParagraphModel], new: &[ParagraphModel]) -> ParagraphDiff {
    let pairs = lcs_pairs(old, new, |a, b| paragraphs_similar(a, b));

    let mut diff = ParagraphDiff::default();
    let (mut oi, mut ni) = (0, 0);
    for &(po, pn) in pairs.iter().chain(std::iter::once(&(old.len(), new.len()))) {
        for o in oi..po {
            diff.deleted.push(ParagraphRef {
                index: old[o].index,
                text: old[o].text.clone(),
            });
        }
        for n in ni..pn {
            diff.added.push(ParagraphRef {
                index: new[n].index,
                text: new[n].text.clone(),
            });
        }
        if po < old.len() && pn < new.len()
            && let Some(modification) = diff_paragraph_pair(&old[po], &new[pn])
        {
            diff.modified.push(modification);
        }
        oi = po + 1;
        ni = pn + 1;
    }
    diff
}

/// Equal text, both whitespace-only, or word-set Jaccard >= 0.5.
fn paragraphs_similar(a: &ParagraphModel, b: &ParagraphModel) -> bool {
    if a.text == b.text {
        return true;
    }
    let a_blank = a.text.trim().is_empty();
    let b_blank = b.text.trim().is_empty();
    if a_blank || b_blank {
        return a_blank && b_blank;
    }
    jaccard(&a.text, &b.text) >= SIMILARITY_THRESHOLD
}

fn jaccard(a: &str, b: &str) -> f64 {
    let a_words: BTreeSet<&str> = a.split_whitespace().collect();
    let b_words: BTreeSet<&str> = b.split_whitespace().collect();
    let intersection = a_words.intersection(&b_words).count();
    let union = a_words.union(&b_words).count();
    if union == 0 {
        return 1.0;
    }
    intersection as f64 / union as f64
}

fn diff_paragraph_pair(
    old: &ParagraphModel,
    new: &ParagraphModel,
) -> Option<ParagraphModification> {
    let style_change = (old.style != new.style).then(|| StyleChange {
        old: old.style.clone(),
        new: new.style.clone(),
    });
    let formatting_changes = diff_formatting(old, new);
    let text_differs = old.text != new.text;

    if !text_differs && style_change.is_none() && formatting_changes.is_empty() {
        return None;
    }

    let word_changes = if text_differs {
        diff_words(&old.text, &new.text)
    } else {
        Vec::new()
    };

    Some(ParagraphModification {
        old_index: old.index,
        new_index: new.index,
        old_text: old.text.clone(),
        new_text: new.text.clone(),
        style_change,
        formatting_changes,
        word_changes,
    })
}

// ---------------------------------------------------------------------------
// Words

/// Word-level diff with delete+add collapse.
pub fn diff_words(old_text: &str, new_text: &str) -> Vec<WordChange> {
    let old_words: Vec<&str> = old_text.split_whitespace().collect();
    let new_words: Vec<&str> = new_text.split_whitespace().collect();
    let pairs = lcs_pairs(&old_words, &new_words, |a, b| a == b);

    let mut raw = Vec::new();
    let (mut oi, mut ni) = (0, 0);
    for &(po, pn) in pairs
        .iter()
        .chain(std::iter::once(&(old_words.len(), new_words.len())))
    {
        for o in oi..po {
            raw.push(WordChange {
                kind: WordChangeKind::Delete,
                old: Some(old_words[o].to_string()),
                new: None,
                position: o,
            });
        }
        for n in ni..pn {
            raw.push(WordChange {
                kind: WordChangeKind::Add,
                old: None,
                new: Some(new_words[n].to_string()),
                position: n,
            });
        }
        oi = po + 1;
        ni = pn + 1;
    }

    collapse_replacements(raw)
}

/// An adjacent delete-then-add pair becomes one replace at the delete's
/// position.
fn collapse_replacements(raw: Vec<WordChange>) -> Vec<WordChange> {
    let mut out: Vec<WordChange> = Vec::with_capacity(raw.len());
    let mut pending: Option<WordChange> = None;
    for change in raw {
        match pending.take() {
            Some(held)
                if held.kind == WordChangeKind::Delete && change.kind == WordChangeKind::Add =>
            {
                out.push(WordChange {
                    kind: WordChangeKind::Replace,
                    old: held.old,
                    new: change.new,
                    position: held.position,
                });
            },
            Some(held) => {
                out.push(held);
                pending = Some(change);
            },
            None => pending = Some(change),
        }
    }
    if let Some(last) = pending {
        out.push(last);
    }
    out
}

// ---------------------------------------------------------------------------
// Formatting

const FORMATTING_ATTRIBUTES: [&str; 6] = ["bold", "italic", "underline", "font", "size", "color"];

fn diff_formatting(old: &ParagraphModel, new: &ParagraphModel) -> Vec<FormattingChange> {
    let old_map = word_format_map(old);
    let new_map = word_format_map(new);

    let mut changes = Vec::new();
    for (word, old_props) in &old_map {
        let Some(new_props) = new_map.iter().find(|(w, _)| w == word).map(|(_, p)| p) else {
            continue;
        };
        for attribute in FORMATTING_ATTRIBUTES {
            let old_val = format_attr(old_props, attribute);
            let new_val = format_attr(new_props, attribute);
            if old_val != new_val {
                changes.push(FormattingChange {
                    word: word.clone(),
                    attribute: attribute.to_string(),
                    old: old_val,
                    new: new_val,
                });
            }
        }
    }
    changes
}

/// First whitespace token of each visible run, first occurrence wins.
fn word_format_map(para: &ParagraphModel) -> Vec<(String, crate::docx::RunProperties)> {
    let mut map: Vec<(String, crate::docx::RunProperties)> = Vec::new();
    for run in para.runs.iter().filter(|r| r.kind != RunKind::Deleted) {
        let Some(word) = run.text.split_whitespace().next() else {
            continue;
        };
        if !map.iter().any(|(w, _)| w == word) {
            map.push((word.to_string(), run.props.clone()));
        }
    }
    map
}

fn format_attr(props: &crate::docx::RunProperties, attribute: &str) -> String {
    fn tri(value: Option<bool>) -> String {
        match value {
            Some(true) => "true".to_string(),
            Some(false) => "false".to_string(),
            None => "unset".to_string(),
        }
    }
    fn opt(value: &Option<String>) -> String {
        value.clone().unwrap_or_else(|| "unset".to_string())
    }
    match attribute {
        "bold" => tri(props.bold),
        "italic" => tri(props.italic),
        "underline" => tri(props.underline),
        "font" => opt(&props.font_name),
        "size" => opt(&props.font_size),
        _ => opt(&props.color),
    }
}

// ---------------------------------------------------------------------------
// Comments

fn diff_comments(old: &[CommentModel], new: &[CommentModel]) -> CommentDiff {
    let key = |c: &CommentModel| (c.author.clone(), c.anchor_text.clone());

    let mut diff = CommentDiff::default();
    for comment in new {
        match old.iter().find(|o| key(o) == key(comment)) {
            None => diff.added.push(comment.clone()),
            Some(matching) if matching.text != comment.text => {
                diff.modified.push(CommentModification {
                    author: comment.author.clone(),
                    anchor_text: comment.anchor_text.clone(),
                    old_text: matching.text.clone(),
                    new_text: comment.text.clone(),
                });
            },
            Some(_) => {},
        }
    }
    for comment in old {
        if !new.iter().any(|n| key(n) == key(comment)) {
            diff.deleted.push(comment.clone());
        }
    }
    diff
}

// ---------------------------------------------------------------------------
// Tracked changes

fn diff_tracked_changes(old: &DocumentModel, new: &DocumentModel) -> TrackedChangeDiff {
    fn key(c: &TrackedChange) -> (ChangeKindKey, String, String) {
        let kind = match c.kind {
            crate::extract::ChangeKind::Insert => ChangeKindKey::Insert,
            crate::extract::ChangeKind::Delete => ChangeKindKey::Delete,
        };
        (kind, c.text.clone(), c.author.clone())
    }

    let old_keys: BTreeSet<_> = old.tracked_changes().map(key).collect();
    let new_keys: BTreeSet<_> = new.tracked_changes().map(key).collect();

    let mut diff = TrackedChangeDiff::default();
    let mut seen = BTreeSet::new();
    for change in new.tracked_changes() {
        let k = key(change);
        if !old_keys.contains(&k) && seen.insert(k) {
            diff.added.push(change.clone());
        }
    }
    seen.clear();
    for change in old.tracked_changes() {
        let k = key(change);
        if !new_keys.contains(&k) && seen.insert(k) {
            diff.deleted.push(change.clone());
        }
    }
    diff
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum ChangeKindKey {
    Insert,
    Delete,
}
