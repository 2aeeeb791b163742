/// Deterministic line-oriented projection of a document.
///
/// Five sections, each preceded by a `=== NAME ===` header and separated by
/// blank lines, capture every review-visible layer. The output is stable
/// across runs on identical inputs, which makes it usable as a diff driver
/// for a version-control system.
use crate::extract::{DocumentModel, RunKind, RunModel};
use std::fmt::Write;

const ANCHOR_PREVIEW_CHARS: usize = 60;

/// Render a document model as textconv output.
pub fn render(model: &DocumentModel) -> String {
    let mut out = String::with_capacity(4096);

    render_metadata(model, &mut out);
    out.push('\n');
    render_body(model, &mut out);
    out.push('\n');
    render_tables(model, &mut out);
    out.push('\n');
    render_comments(model, &mut out);
    out.push('\n');
    render_images(model, &mut out);

    out
}

fn render_metadata(model: &DocumentModel, out: &mut String) {
    out.push_str("=== METADATA ===\n");
    let meta = &model.metadata;
    if let Some(title) = &meta.title {
        let _ = writeln!(out, "Title: {}", single_line(title));
    }
    if let Some(author) = &meta.author {
        let _ = writeln!(out, "Author: {}", single_line(author));
    }
    if let Some(by) = &meta.last_modified_by {
        let _ = writeln!(out, "LastModifiedBy: {}", single_line(by));
    }
    if let Some(modified) = &meta.modified {
        let _ = writeln!(out, "Modified: {}", crate::docx::metadata::format_timestamp(modified));
    }
    if let Some(revision) = &meta.revision {
        let _ = writeln!(out, "Revision: {revision}");
    }
    let words = meta
        .word_count
        .map(|n| n as usize)
        .unwrap_or_else(|| model.computed_word_count());
    let _ = writeln!(out, "Words: {words}");
    let paragraphs = meta
        .paragraph_count
        .map(|n| n as usize)
        .unwrap_or(model.paragraphs.len());
    let _ = writeln!(out, "Paragraphs: {paragraphs}");
}

fn render_body(model: &DocumentModel, out: &mut String) {
    out.push_str("=== BODY ===\n");
    for para in &model.paragraphs {
        let _ = write!(out, "\u{b6}{}", para.index);
        if let Some(style) = &para.style {
            let _ = write!(out, " [{style}]");
        }
        let rich = rich_text(&para.runs);
        if !rich.is_empty() {
            let _ = write!(out, " {}", single_line(&rich));
        }
        for comment in model
            .comments
            .iter()
            .filter(|c| c.paragraph_index == Some(para.index))
        {
            let _ = write!(
                out,
                " /* [{}] {} */",
                comment.author,
                single_line(&comment.text)
            );
        }
        out.push('\n');
    }
}

/// Concatenate runs with inline markers: deletions as `[-text-]`,
/// insertions as `[+text+]`, formatting as `[B]`/`[I]`/`[U]`/`[S]` pairs.
fn rich_text(runs: &[RunModel]) -> String {
    let mut out = String::new();
    for run in runs {
        match run.kind {
            RunKind::Deleted => {
                let _ = write!(out, "[-{}-]", run.text);
            },
            RunKind::Inserted => {
                let _ = write!(out, "[+{}+]", formatted(run));
            },
            RunKind::Normal => out.push_str(&formatted(run)),
        }
    }
    out
}

fn formatted(run: &RunModel) -> String {
    let mut text = run.text.clone();
    if run.props.strikethrough == Some(true) {
        text = format!("[S]{text}[/S]");
    }
    if run.props.underline == Some(true) {
        text = format!("[U]{text}[/U]");
    }
    if run.props.italic == Some(true) {
        text = format!("[I]{text}[/I]");
    }
    if run.props.bold == Some(true) {
        text = format!("[B]{text}[/B]");
    }
    text
}

fn render_tables(model: &DocumentModel, out: &mut String) {
    out.push_str("=== TABLES ===\n");
    for (n, table) in model.tables.iter().enumerate() {
        let _ = writeln!(
            out,
            "Table {} ({}\u{d7}{}) at \u{b6}{}:",
            n + 1,
            table.rows,
            table.cols,
            table.paragraph_index
        );
        for row in &table.cells {
            let cells: Vec<String> = row.iter().map(|c| single_line(c)).collect();
            let _ = writeln!(out, "{}", cells.join(" | "));
        }
    }
}

fn render_comments(model: &DocumentModel, out: &mut String) {
    out.push_str("=== COMMENTS ===\n");
    for comment in &model.comments {
        let anchor: String = comment.anchor_text.chars().take(ANCHOR_PREVIEW_CHARS).collect();
        let position = match comment.paragraph_index {
            Some(index) => format!("\u{b6}{index}"),
            None => "\u{b6}?".to_string(),
        };
        let _ = writeln!(
            out,
            "#{} [{}] on \"{}\" ({}): {}",
            comment.id,
            comment.author,
            single_line(&anchor),
            position,
            single_line(&comment.text)
        );
    }
}

fn render_images(model: &DocumentModel, out: &mut String) {
    out.push_str("=== IMAGES ===\n");
    for image in &model.images {
        let digest: String = image.sha256.chars().take(12).collect();
        let _ = writeln!(
            out,
            "[IMG] {} ({}, {} bytes, sha256:{}...)",
            image.file_name, image.media_type, image.size_bytes, digest
        );
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}
