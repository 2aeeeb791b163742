/// Anchored comment writing.
///
/// A comment is three zero-width markers in the body — `w:commentRangeStart`
/// before the anchor, `w:commentRangeEnd` and a reference run after it —
/// plus a `w:comment` entry in the comments part. IDs are allocated as the
/// smallest non-negative integer not already used anywhere in the input.
use crate::docx::index::RunIndex;
use crate::docx::splice::{self, ReviewContext};
use crate::error::{DocxError, Result};
use crate::xml::{XmlElement, XmlNode};
use std::collections::BTreeSet;
use std::ops::Range;

/// Collect every numeric comment ID used in the body or the comments part.
pub fn used_comment_ids(body: &XmlElement, comments_root: Option<&XmlElement>) -> BTreeSet<u32> {
    let mut used = BTreeSet::new();
    collect_marker_ids(body, &mut used);
    if let Some(root) = comments_root {
        for comment in root.elements("comment") {
            if let Some(id) = comment.attr("id").and_then(|v| v.parse::<u32>().ok()) {
                used.insert(id);
            }
        }
    }
    used
}

fn collect_marker_ids(el: &XmlElement, used: &mut BTreeSet<u32>) {
    for child in el.child_elements() {
        if child.is("commentRangeStart")
            || child.is("commentRangeEnd")
            || child.is("commentReference")
        {
            if let Some(id) = child.attr("id").and_then(|v| v.parse::<u32>().ok()) {
                used.insert(id);
            }
        }
        collect_marker_ids(child, used);
    }
}

/// The smallest non-negative integer not in `used`.
pub fn allocate_comment_id(used: &BTreeSet<u32>) -> u32 {
    let mut candidate = 0u32;
    for &id in used {
        if id == candidate {
            candidate += 1;
        } else if id > candidate {
            break;
        }
    }
    candidate
}

/// Bracket the range with comment markers.
///
/// Boundary runs are split the same way the splicer splits them; the start
/// marker lands immediately before the first run of the range, the end
/// marker and the reference run immediately after the last. Consumes the
/// index: marker insertion invalidates it.
pub fn annotate_range(
    body: &mut XmlElement,
    index: RunIndex,
    range: Range<usize>,
    comment_id: u32,
) -> Result<()> {
    if range.is_empty() {
        return Err(DocxError::Other("cannot comment on an empty range".to_string()));
    }
    splice::split_range_boundaries(body, &index, &range)?;
    drop(index);

    let index = RunIndex::build(body);
    let segments = index.segments_within(&range);
    let (first, last) = match (segments.first(), segments.last()) {
        (Some(f), Some(l)) => ((f.para, f.path.clone()), (l.para, l.path.clone())),
        _ => return Err(DocxError::Other("range resolves to no runs".to_string())),
    };

    let id = comment_id.to_string();

    // End side first so the start insertion cannot shift it.
    {
        let parent = splice::parent_of_path(body, last.0, &last.1)?;
        let after = last.1[last.1.len() - 1] + 1;
        parent.children.insert(
            after,
            XmlNode::Element(reference_run(&id)),
        );
        parent.children.insert(
            after,
            XmlNode::Element(
                XmlElement::new("w:commentRangeEnd").with_attr("w:id", id.clone()),
            ),
        );
    }
    {
        let parent = splice::parent_of_path(body, first.0, &first.1)?;
        let at = first.1[first.1.len() - 1];
        parent.children.insert(
            at,
            XmlNode::Element(
                XmlElement::new("w:commentRangeStart").with_attr("w:id", id.clone()),
            ),
        );
    }
    Ok(())
}

fn reference_run(id: &str) -> XmlElement {
    XmlElement::new("w:r")
        .with_child(XmlElement::new("w:commentReference").with_attr("w:id", id))
}

/// Build the `w:comment` element for the comments part.
///
/// The body text splits on newlines into paragraphs; the first paragraph
/// leads with an annotation reference mark run.
pub fn comment_entry(comment_id: u32, ctx: &ReviewContext, text: &str) -> XmlElement {
    let mut comment = XmlElement::new("w:comment")
        .with_attr("w:id", comment_id.to_string())
        .with_attr("w:author", ctx.author.clone())
        .with_attr("w:date", ctx.date.clone());
    if let Some(initials) = initials_of(&ctx.author) {
        comment.set_attr("w:initials", initials);
    }

    for (i, line) in text.split('\n').enumerate() {
        let mut para = XmlElement::new("w:p");
        if i == 0 {
            para.push_element(
                XmlElement::new("w:r").with_child(XmlElement::new("w:annotationRef")),
            );
        }
        if !line.is_empty() {
            para.push_element(
                XmlElement::new("w:r").with_child(XmlElement::new("w:t").with_text(line)),
            );
        }
        comment.push_element(para);
    }
    comment
}

fn initials_of(author: &str) -> Option<String> {
    let initials: String = author
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect();
    if initials.is_empty() { None } else { Some(initials) }
}
