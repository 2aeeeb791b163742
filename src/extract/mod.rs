/// Read-only extraction into the neutral model.
///
/// The inverse of the edit path: one walk over the body produces
/// paragraphs with runs and tracked changes, comment anchors from the range
/// markers, tables, images, and header/footer text. The walk never mutates
/// anything.
pub mod model;

pub use model::{
    ChangeKind, CommentModel, DocumentModel, HeaderFooterModel, ImageModel, ParagraphModel,
    RunKind, RunModel, TableModel, TrackedChange,
};

use crate::docx::ReviewDocument;
use crate::docx::properties::RunProperties;
use crate::error::{DocxError, Result};
use crate::opc::constants::relationship_type;
use crate::xml::{XmlElement, parse_document};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Extract the whole document into the read model.
pub fn extract(doc: &ReviewDocument) -> Result<DocumentModel> {
    let body = doc.body()?;

    let mut state = BodyWalk::default();
    for node in &body.children {
        let Some(el) = node.as_element() else { continue };
        if el.is("p") {
            state.visit_paragraph(el)?;
        } else if el.is("tbl") {
            state.visit_table(el);
        }
    }
    if let Some(id) = state.open_comments.keys().next() {
        return Err(DocxError::CorruptDocument(format!(
            "comment range {id} is never closed"
        )));
    }

    let comments = collect_comments(doc, &state.anchors);
    let images = collect_images(doc)?;
    let headers_footers = collect_headers_footers(doc)?;

    Ok(DocumentModel {
        paragraphs: state.paragraphs,
        comments,
        tables: state.tables,
        images,
        headers_footers,
        metadata: doc.metadata()?,
    })
}

/// Anchor information learned from the range markers.
struct CommentAnchor {
    paragraph_index: usize,
    anchor_text: String,
}

#[derive(Default)]
struct BodyWalk {
    paragraphs: Vec<ParagraphModel>,
    tables: Vec<TableModel>,
    /// Comment id -> accumulating anchor, while the range is open
    open_comments: HashMap<String, CommentAnchor>,
    /// Comment id -> finished anchor
    anchors: HashMap<String, CommentAnchor>,
}

impl BodyWalk {
    fn visit_paragraph(&mut self, para: &XmlElement) -> Result<()> {
        let index = self.paragraphs.len();
        let style = para
            .find("pPr")
            .and_then(|ppr| ppr.find("pStyle"))
            .and_then(|s| s.attr("val"))
            .map(str::to_string);

        let mut model = ParagraphModel {
            index,
            style,
            ..Default::default()
        };

        for node in &para.children {
            let Some(el) = node.as_element() else { continue };
            self.visit_inline(el, index, &mut model);
        }

        model.text = model
            .runs
            .iter()
            .filter(|r| r.kind != RunKind::Deleted)
            .map(|r| r.text.as_str())
            .collect();
        self.paragraphs.push(model);
        Ok(())
    }

    fn visit_inline(&mut self, el: &XmlElement, para_index: usize, model: &mut ParagraphModel) {
        if el.is("r") {
            let text = run_text(el, false);
            if !text.is_empty() {
                self.feed_open_anchors(&text, None);
                model.runs.push(RunModel {
                    props: RunProperties::from_run(el),
                    text,
                    kind: RunKind::Normal,
                });
            }
        } else if el.is("ins") || el.is("moveTo") {
            self.visit_insertion(el, para_index, model);
        } else if el.is("del") || el.is("moveFrom") {
            self.visit_deletion(el, model, None);
        } else {
            self.visit_marker(el, para_index);
        }
    }

    /// Walk a `w:ins`/`w:moveTo` container.
    ///
    /// Anchor scoping: a whole insertion lying between a comment's range
    /// markers was spliced in after the comment was anchored, so its text
    /// does not belong to the anchor. Only anchors whose start marker sits
    /// inside the container collect its text.
    fn visit_insertion(&mut self, el: &XmlElement, para_index: usize, model: &mut ParagraphModel) {
        let outer: Vec<String> = self.open_comments.keys().cloned().collect();
        let mut change_text = String::new();

        for node in &el.children {
            let Some(inner) = node.as_element() else { continue };
            if inner.is("r") {
                let text = run_text(inner, false);
                if !text.is_empty() {
                    self.feed_open_anchors(&text, Some(&outer));
                    change_text.push_str(&text);
                    model.runs.push(RunModel {
                        props: RunProperties::from_run(inner),
                        text,
                        kind: RunKind::Inserted,
                    });
                }
            } else if inner.is("del") || inner.is("moveFrom") {
                // inserted, then deleted
                self.visit_deletion(inner, model, Some(&outer));
            } else {
                self.visit_marker(inner, para_index);
            }
        }

        model.tracked_changes.push(TrackedChange {
            kind: ChangeKind::Insert,
            text: change_text,
            author: el.attr("author").unwrap_or_default().to_string(),
            date: el.attr("date").map(str::to_string),
            id: el.attr("id").unwrap_or_default().to_string(),
        });
    }

    /// Walk a `w:del`/`w:moveFrom` container.
    ///
    /// Deleted text stays part of any open comment anchor: the comment was
    /// anchored on it before the deletion made it invisible.
    fn visit_deletion(
        &mut self,
        el: &XmlElement,
        model: &mut ParagraphModel,
        skip_anchors: Option<&[String]>,
    ) {
        let mut change_text = String::new();
        for inner in el.elements("r") {
            let text = run_text(inner, true);
            if !text.is_empty() {
                self.feed_open_anchors(&text, skip_anchors);
                change_text.push_str(&text);
                model.runs.push(RunModel {
                    props: RunProperties::from_run(inner),
                    text,
                    kind: RunKind::Deleted,
                });
            }
        }
        model.tracked_changes.push(TrackedChange {
            kind: ChangeKind::Delete,
            text: change_text,
            author: el.attr("author").unwrap_or_default().to_string(),
            date: el.attr("date").map(str::to_string),
            id: el.attr("id").unwrap_or_default().to_string(),
        });
    }

    fn visit_marker(&mut self, el: &XmlElement, para_index: usize) {
        if el.is("commentRangeStart") {
            if let Some(id) = el.attr("id") {
                self.open_comments.insert(
                    id.to_string(),
                    CommentAnchor {
                        paragraph_index: para_index,
                        anchor_text: String::new(),
                    },
                );
            }
        } else if el.is("commentRangeEnd")
            && let Some(id) = el.attr("id")
            && let Some(anchor) = self.open_comments.remove(id)
        {
            self.anchors.insert(id.to_string(), anchor);
        }
    }

    fn feed_open_anchors(&mut self, text: &str, skip: Option<&[String]>) {
        for (id, anchor) in self.open_comments.iter_mut() {
            if skip.is_some_and(|outer| outer.contains(id)) {
                continue;
            }
            anchor.anchor_text.push_str(text);
        }
    }

    fn visit_table(&mut self, tbl: &XmlElement) {
        let mut cells: Vec<Vec<String>> = Vec::new();
        for row in tbl.elements("tr") {
            let mut row_cells = Vec::new();
            for cell in row.elements("tc") {
                let texts: Vec<String> = cell
                    .elements("p")
                    .map(visible_paragraph_text)
                    .collect();
                row_cells.push(texts.join("\n"));
            }
            cells.push(row_cells);
        }
        let rows = cells.len();
        let cols = cells.iter().map(Vec::len).max().unwrap_or(0);
        self.tables.push(TableModel {
            rows,
            cols,
            cells,
            paragraph_index: self.paragraphs.len(),
        });
    }
}

/// Text of a run, mapping `w:tab` to `\t` and `w:br` to `\n`.
fn run_text(run: &XmlElement, deleted: bool) -> String {
    let mut out = String::new();
    for child in run.child_elements() {
        if deleted && child.is("delText") {
            out.push_str(&child.text());
        } else if !deleted && child.is("t") {
            out.push_str(&child.text());
        } else if child.is("tab") {
            out.push('\t');
        } else if child.is("br") {
            out.push('\n');
        }
    }
    out
}

/// Visible text of one paragraph element (cell contents, not the body walk).
fn visible_paragraph_text(para: &XmlElement) -> String {
    let mut out = String::new();
    for child in para.child_elements() {
        if child.is("r") {
            out.push_str(&run_text(child, false));
        } else if child.is("ins") || child.is("moveTo") {
            for run in child.elements("r") {
                out.push_str(&run_text(run, false));
            }
        }
    }
    out
}

fn collect_comments(
    doc: &ReviewDocument,
    anchors: &HashMap<String, CommentAnchor>,
) -> Vec<CommentModel> {
    let Some(root) = doc.comments_root() else {
        return Vec::new();
    };
    root.elements("comment")
        .map(|comment| {
            let id = comment.attr("id").unwrap_or_default().to_string();
            let body: Vec<String> = comment
                .elements("p")
                .map(visible_paragraph_text)
                .collect();
            let anchor = anchors.get(&id);
            CommentModel {
                author: comment.attr("author").unwrap_or_default().to_string(),
                date: comment.attr("date").map(str::to_string),
                anchor_text: anchor.map(|a| a.anchor_text.clone()).unwrap_or_default(),
                paragraph_index: anchor.map(|a| a.paragraph_index),
                text: body.join("\n"),
                id,
            }
        })
        .collect()
}

fn collect_images(doc: &ReviewDocument) -> Result<Vec<ImageModel>> {
    let body = doc.body()?;
    let mut rel_ids = Vec::new();
    collect_blip_ids(body, &mut rel_ids);

    let rels = doc.package().relationships_for(doc.document_uri())?;
    let mut images = Vec::new();
    for rel_id in rel_ids {
        let Some(rel) = rels.iter().find(|r| r.id == rel_id && !r.external) else {
            continue;
        };
        let uri = doc.document_uri().resolve(&rel.target);
        let Ok(payload) = doc.package().part(&uri) else {
            continue;
        };
        let digest = Sha256::digest(payload);
        let media_type = doc
            .package()
            .content_type_of(&uri)?
            .unwrap_or_else(|| "application/octet-stream".to_string());
        images.push(ImageModel {
            rel_id,
            file_name: uri.filename().to_string(),
            media_type,
            size_bytes: payload.len(),
            sha256: format!("{digest:x}"),
        });
    }
    Ok(images)
}

fn collect_blip_ids(el: &XmlElement, out: &mut Vec<String>) {
    for child in el.child_elements() {
        if child.is("blip")
            && let Some(id) = child.attr("embed")
            && !out.iter().any(|existing| existing == id)
        {
            out.push(id.to_string());
        }
        collect_blip_ids(child, out);
    }
}

fn collect_headers_footers(doc: &ReviewDocument) -> Result<Vec<HeaderFooterModel>> {
    let body = doc.body()?;
    let rels = doc.package().relationships_for(doc.document_uri())?;

    let mut refs = Vec::new();
    collect_hf_references(body, &mut refs);

    let mut out = Vec::new();
    for (kind, scope, rel_id) in refs {
        let Some(rel) = rels.iter().find(|r| {
            r.id == rel_id
                && (r.rel_type == relationship_type::HEADER
                    || r.rel_type == relationship_type::FOOTER)
        }) else {
            continue;
        };
        let uri = doc.document_uri().resolve(&rel.target);
        let Ok(bytes) = doc.package().part(&uri) else {
            continue;
        };
        let root = parse_document(bytes)?;
        let mut text = String::new();
        collect_run_text(&root, &mut text);
        out.push(HeaderFooterModel { kind, scope, text });
    }
    Ok(out)
}

fn collect_hf_references(el: &XmlElement, out: &mut Vec<(String, String, String)>) {
    for child in el.child_elements() {
        if child.is("headerReference") || child.is("footerReference") {
            let kind = if child.is("headerReference") { "header" } else { "footer" };
            let scope = child.attr("type").unwrap_or("default").to_string();
            if let Some(id) = child.attr("id") {
                out.push((kind.to_string(), scope, id.to_string()));
            }
        }
        collect_hf_references(child, out);
    }
}

fn collect_run_text(el: &XmlElement, out: &mut String) {
    for child in el.child_elements() {
        if child.is("t") {
            out.push_str(&child.text());
        } else {
            collect_run_text(child, out);
        }
    }
}

// ---------------------------------------------------------------------------
// Read report

/// The read-mode JSON shape.
#[derive(Debug, Serialize)]
pub struct ReadReport {
    pub file: String,
    pub paragraphs: Vec<ParagraphModel>,
    pub comments: Vec<CommentModel>,
    pub metadata: crate::docx::PackageMetadata,
    pub summary: ReadSummary,
}

/// Aggregate counts over the review layer.
#[derive(Debug, Serialize)]
pub struct ReadSummary {
    pub total_tracked_changes: usize,
    pub insertions: usize,
    pub deletions: usize,
    pub total_comments: usize,
    pub change_authors: Vec<String>,
    pub comment_authors: Vec<String>,
}

impl ReadReport {
    /// Build the report from an extracted model.
    pub fn new(file: impl Into<String>, model: DocumentModel) -> Self {
        let insertions = model
            .tracked_changes()
            .filter(|c| c.kind == ChangeKind::Insert)
            .count();
        let deletions = model
            .tracked_changes()
            .filter(|c| c.kind == ChangeKind::Delete)
            .count();
        let change_authors = sorted_unique(model.tracked_changes().map(|c| c.author.as_str()));
        let comment_authors = sorted_unique(model.comments.iter().map(|c| c.author.as_str()));

        Self {
            file: file.into(),
            summary: ReadSummary {
                total_tracked_changes: insertions + deletions,
                insertions,
                deletions,
                total_comments: model.comments.len(),
                change_authors,
                comment_authors,
            },
            metadata: model.metadata,
            paragraphs: model.paragraphs,
            comments: model.comments,
        }
    }
}

fn sorted_unique<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = items
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    out.sort();
    out.dedup();
    out
}
