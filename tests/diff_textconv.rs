//! Diff and textconv scenarios over complete in-memory documents.
mod common;

use common::{body_with_runs, docx_with_body, docx_with_body_and_parts};
use docx_review::diff::{WordChangeKind, diff_documents};
use docx_review::docx::ReviewDocument;
use docx_review::extract::{DocumentModel, extract};
use docx_review::textconv;

fn model(bytes: Vec<u8>) -> DocumentModel {
    extract(&ReviewDocument::from_bytes(bytes).unwrap()).unwrap()
}

#[test]
fn scenario_e_document_is_identical_to_itself() {
    let bytes = docx_with_body(
        "<w:body>\
         <w:p><w:pPr><w:pStyle w:val=\"Heading1\"/></w:pPr><w:r><w:t>Introduction</w:t></w:r></w:p>\
         <w:p><w:r><w:t>Body text with several words.</w:t></w:r></w:p>\
         </w:body>",
    );
    let old = model(bytes.clone());
    let new = model(bytes);
    let diff = diff_documents(&old, &new, "same.docx", "same.docx");

    assert!(diff.summary.identical);
    assert!(diff.metadata.changes.is_empty());
    assert!(diff.paragraphs.added.is_empty());
    assert!(diff.paragraphs.deleted.is_empty());
    assert!(diff.paragraphs.modified.is_empty());
    assert!(diff.comments.added.is_empty());
    assert!(diff.comments.deleted.is_empty());
    assert!(diff.comments.modified.is_empty());
    assert!(diff.tracked_changes.added.is_empty());
    assert!(diff.tracked_changes.deleted.is_empty());

    // The JSON shape carries every required field.
    let json = serde_json::to_value(&diff).unwrap();
    for key in ["old_file", "new_file", "metadata", "paragraphs", "comments", "tracked_changes", "summary"] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(json["summary"]["identical"], serde_json::Value::Bool(true));
}

#[test]
fn scenario_f_word_replace_collapses() {
    let old = model(docx_with_body(&body_with_runs(&["foo bar baz qux"])));
    let new = model(docx_with_body(&body_with_runs(&["foo zar baz qux"])));
    let diff = diff_documents(&old, &new, "old.docx", "new.docx");

    assert_eq!(diff.paragraphs.modified.len(), 1);
    let words = &diff.paragraphs.modified[0].word_changes;
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].kind, WordChangeKind::Replace);
    assert_eq!(words[0].old.as_deref(), Some("bar"));
    assert_eq!(words[0].new.as_deref(), Some("zar"));
    assert_eq!(words[0].position, 1);
}

#[test]
fn metadata_fields_diff_one_entry_per_change() {
    let core_old = br#"<?xml version="1.0"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/">
<dc:title>Study Protocol Draft v1</dc:title><dc:creator>Dr. Smith</dc:creator><cp:revision>1</cp:revision>
</cp:coreProperties>"#;
    let core_new = br#"<?xml version="1.0"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/">
<dc:title>Study Protocol Final Draft</dc:title><dc:creator>Dr. Smith</dc:creator><cp:revision>2</cp:revision>
</cp:coreProperties>"#;

    let body = body_with_runs(&["unchanged body"]);
    let old = model(docx_with_body_and_parts(&body, &[("docProps/core.xml", core_old.as_slice())]));
    let new = model(docx_with_body_and_parts(&body, &[("docProps/core.xml", core_new.as_slice())]));
    let diff = diff_documents(&old, &new, "old.docx", "new.docx");

    assert!(!diff.summary.identical);
    assert_eq!(diff.metadata.changes.len(), 2);
    let fields: Vec<&str> = diff.metadata.changes.iter().map(|c| c.field.as_str()).collect();
    assert_eq!(fields, ["title", "revision"]);
    assert_eq!(diff.metadata.changes[0].old.as_deref(), Some("Study Protocol Draft v1"));
    assert_eq!(diff.metadata.changes[0].new.as_deref(), Some("Study Protocol Final Draft"));
}

#[test]
fn paragraph_additions_and_deletions_interleave() {
    let old = model(docx_with_body(
        "<w:body>\
         <w:p><w:r><w:t>first shared paragraph of text</w:t></w:r></w:p>\
         <w:p><w:r><w:t>completely unique old content nothing shared</w:t></w:r></w:p>\
         <w:p><w:r><w:t>final shared paragraph closing out</w:t></w:r></w:p>\
         </w:body>",
    ));
    let new = model(docx_with_body(
        "<w:body>\
         <w:p><w:r><w:t>first shared paragraph of text</w:t></w:r></w:p>\
         <w:p><w:r><w:t>brand new replacement territory entirely different</w:t></w:r></w:p>\
         <w:p><w:r><w:t>final shared paragraph closing out</w:t></w:r></w:p>\
         </w:body>",
    ));
    let diff = diff_documents(&old, &new, "old.docx", "new.docx");

    assert_eq!(diff.paragraphs.deleted.len(), 1);
    assert_eq!(diff.paragraphs.deleted[0].index, 1);
    assert_eq!(diff.paragraphs.added.len(), 1);
    assert_eq!(diff.paragraphs.added[0].index, 1);
    assert!(diff.paragraphs.modified.is_empty());
}

#[test]
fn tracked_change_sets_diff_by_identity() {
    let old = model(docx_with_body(&body_with_runs(&["plain text"])));
    let new = model(docx_with_body(
        r#"<w:body><w:p>
        <w:r><w:t xml:space="preserve">plain text</w:t></w:r>
        <w:ins w:id="5" w:author="Jane"><w:r><w:t> with more</w:t></w:r></w:ins>
        </w:p></w:body>"#,
    ));
    let diff = diff_documents(&old, &new, "old.docx", "new.docx");

    assert_eq!(diff.tracked_changes.added.len(), 1);
    assert_eq!(diff.tracked_changes.added[0].text, " with more");
    assert_eq!(diff.tracked_changes.added[0].author, "Jane");
    assert!(diff.tracked_changes.deleted.is_empty());
    assert!(!diff.summary.identical);
}

#[test]
fn comment_bodies_diff_under_same_anchor() {
    let body = r#"<w:body><w:p>
        <w:commentRangeStart w:id="0"/>
        <w:r><w:t>anchored text</w:t></w:r>
        <w:commentRangeEnd w:id="0"/>
        <w:r><w:commentReference w:id="0"/></w:r>
        </w:p></w:body>"#;
    let doc_rels = br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments" Target="comments.xml"/></Relationships>"#;
    let comments_old = br#"<?xml version="1.0"?><w:comments xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:comment w:id="0" w:author="Jane"><w:p><w:r><w:t>first draft note</w:t></w:r></w:p></w:comment></w:comments>"#;
    let comments_new = br#"<?xml version="1.0"?><w:comments xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:comment w:id="0" w:author="Jane"><w:p><w:r><w:t>revised note</w:t></w:r></w:p></w:comment></w:comments>"#;

    let old = model(docx_with_body_and_parts(
        body,
        &[
            ("word/comments.xml", comments_old.as_slice()),
            ("word/_rels/document.xml.rels", doc_rels.as_slice()),
        ],
    ));
    let new = model(docx_with_body_and_parts(
        body,
        &[
            ("word/comments.xml", comments_new.as_slice()),
            ("word/_rels/document.xml.rels", doc_rels.as_slice()),
        ],
    ));
    let diff = diff_documents(&old, &new, "old.docx", "new.docx");

    assert_eq!(diff.comments.modified.len(), 1);
    assert_eq!(diff.comments.modified[0].old_text, "first draft note");
    assert_eq!(diff.comments.modified[0].new_text, "revised note");
    assert!(diff.comments.added.is_empty());
    assert!(diff.comments.deleted.is_empty());
}

#[test]
fn textconv_covers_every_layer_and_is_stable() {
    let body = r#"<w:body>
        <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Results</w:t></w:r></w:p>
        <w:p>
            <w:r><w:t xml:space="preserve">The outcome was </w:t></w:r>
            <w:del w:id="1" w:author="Jane"><w:r><w:delText>bad</w:delText></w:r></w:del>
            <w:ins w:id="2" w:author="Jane"><w:r><w:t>good</w:t></w:r></w:ins>
            <w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve"> (p &lt; 0.001)</w:t></w:r>
        </w:p>
        <w:tbl>
            <w:tr><w:tc><w:p><w:r><w:t>Group</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>N</w:t></w:r></w:p></w:tc></w:tr>
            <w:tr><w:tc><w:p><w:r><w:t>Treatment</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>42</w:t></w:r></w:p></w:tc></w:tr>
        </w:tbl>
        </w:body>"#;
    let core = br#"<?xml version="1.0"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/">
<dc:title>Trial Report</dc:title><dc:creator>Dr. Smith</dc:creator>
</cp:coreProperties>"#;

    let bytes = docx_with_body_and_parts(body, &[("docProps/core.xml", core.as_slice())]);
    let output = textconv::render(&model(bytes.clone()));

    assert!(output.contains("=== METADATA ===\nTitle: Trial Report\nAuthor: Dr. Smith\n"));
    assert!(output.contains("\u{b6}0 [Heading1] Results\n"));
    assert!(output.contains("\u{b6}1 The outcome was [-bad-][+good+][B] (p < 0.001)[/B]\n"));
    assert!(output.contains("Table 1 (2\u{d7}2) at \u{b6}2:\nGroup | N\nTreatment | 42\n"));
    assert!(output.contains("=== COMMENTS ===\n"));
    assert!(output.contains("=== IMAGES ===\n"));

    // Stable across runs on identical inputs.
    assert_eq!(output, textconv::render(&model(bytes)));
}

#[test]
fn edits_made_by_the_tool_diff_as_tracked_changes() {
    use docx_review::docx::driver::EditDriver;
    use docx_review::docx::Manifest;

    let input = docx_with_body(&body_with_runs(&["the quick brown fox"]));
    let old = model(input.clone());

    let manifest = Manifest::from_json_str(
        r#"{ "author": "Editor", "changes": [ { "type": "replace", "find": "quick", "replace": "sly" } ] }"#,
    )
    .unwrap();
    let mut doc = ReviewDocument::from_bytes(input).unwrap();
    let driver = EditDriver::new("Editor", false);
    assert!(driver.apply(&mut doc, &manifest).unwrap().success);
    doc.commit().unwrap();

    let new = model(doc.to_bytes().unwrap());
    let diff = diff_documents(&old, &new, "before.docx", "after.docx");

    assert_eq!(diff.tracked_changes.added.len(), 2);
    assert!(diff
        .tracked_changes
        .added
        .iter()
        .all(|c| c.author == "Editor"));
    assert_eq!(diff.paragraphs.modified.len(), 1);
    let words = &diff.paragraphs.modified[0].word_changes;
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].kind, WordChangeKind::Replace);
}
