/// Revision splicing.
///
/// Takes a resolved `[start, end)` range in the visible stream and rewrites
/// the body so the selection becomes tracked revision markup. Boundary runs
/// are split in two so the range corresponds to whole runs; the selection is
/// then wrapped in `w:del` (its `w:t` children become `w:delText`), and for
/// replace/insert operations a `w:ins` with a single new run is placed next
/// to it. Formatting is carried by deep-copying the source run's `w:rPr`
/// element, so properties this tool does not model survive unchanged.
///
/// A range whose runs sit inside an existing `w:ins`/`w:moveTo` container is
/// wrapped *inside* that container (`<w:ins><w:del>…` is the markup for
/// "inserted, then deleted"); runs grouped by parent each get their own
/// `w:del`.
///
/// Every operation here invalidates any live `RunIndex`; the functions
/// consume the index they were given and rebuild internally after boundary
/// splits.
use crate::docx::index::{RunIndex, Segment};
use crate::error::{DocxError, Result};
use crate::xml::{XmlElement, XmlNode};
use std::ops::Range;

/// Author and timestamp stamped onto emitted revision markup.
#[derive(Debug, Clone)]
pub struct ReviewContext {
    /// Revision author
    pub author: String,
    /// ISO-8601 UTC timestamp
    pub date: String,
}

/// Monotonic revision-ID allocator, seeded past the input's maximum.
#[derive(Debug)]
pub struct RevisionCounter {
    next: u32,
}

impl RevisionCounter {
    /// Seed the counter to one past the largest revision ID in the body.
    pub fn seed_from(body: &XmlElement) -> Self {
        Self {
            next: max_revision_id(body) + 1,
        }
    }

    /// Allocate the next revision ID.
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

fn max_revision_id(el: &XmlElement) -> u32 {
    let mut max = 0;
    for child in el.child_elements() {
        if child.is("ins") || child.is("del") || child.is("moveFrom") || child.is("moveTo") {
            if let Some(id) = child.attr("id").and_then(|v| v.parse::<u32>().ok()) {
                max = max.max(id);
            }
        }
        max = max.max(max_revision_id(child));
    }
    max
}

/// Replace the range with `new_text`: wrap the selection in `w:del` and
/// insert a `w:ins` carrying the replacement immediately after it.
///
/// The replacement run's formatting is cloned from the first run of the
/// range. Rejects empty ranges.
pub fn replace(
    body: &mut XmlElement,
    index: RunIndex,
    range: Range<usize>,
    new_text: &str,
    ctx: &ReviewContext,
    counter: &mut RevisionCounter,
) -> Result<()> {
    if range.is_empty() {
        return Err(DocxError::Other("cannot replace an empty range".to_string()));
    }
    split_boundaries(body, &index, &range)?;
    drop(index);

    let index = RunIndex::build(body);
    let segments = index.segments_within(&range);
    let rpr = segments
        .first()
        .and_then(|seg| cloned_rpr(body, seg));
    let groups = group_runs(&segments);
    if groups.is_empty() {
        return Err(DocxError::Other("range resolves to no runs".to_string()));
    }

    let (para, pos) = position_after_groups(&groups);
    wrap_groups_in_del(body, &groups, ctx, counter)?;

    let ins = make_ins_element(rpr, new_text, ctx, counter.next_id());
    paragraph_mut(body, para)?
        .children
        .insert(pos, XmlNode::Element(ins));
    Ok(())
}

/// Wrap the range in `w:del` without inserting replacement text.
///
/// Rejects empty ranges.
pub fn delete(
    body: &mut XmlElement,
    index: RunIndex,
    range: Range<usize>,
    ctx: &ReviewContext,
    counter: &mut RevisionCounter,
) -> Result<()> {
    if range.is_empty() {
        return Err(DocxError::Other("cannot delete an empty range".to_string()));
    }
    split_boundaries(body, &index, &range)?;
    drop(index);

    let index = RunIndex::build(body);
    let groups = group_runs(&index.segments_within(&range));
    if groups.is_empty() {
        return Err(DocxError::Other("range resolves to no runs".to_string()));
    }
    wrap_groups_in_del(body, &groups, ctx, counter)
}

/// Insert `text` as a tracked insertion immediately after the range.
///
/// The range itself is left untouched; formatting is cloned from its last
/// run. A zero-length range is treated as a caret position.
pub fn insert_after(
    body: &mut XmlElement,
    index: RunIndex,
    range: Range<usize>,
    text: &str,
    ctx: &ReviewContext,
    counter: &mut RevisionCounter,
) -> Result<()> {
    split_at_caret(body, &index, range.end)?;
    drop(index);

    let index = RunIndex::build(body);
    let (para, pos, rpr) = if range.is_empty() {
        caret_insert_point(body, &index, range.start)?
    } else {
        // Only the trailing boundary was split, so the anchor's first run
        // may still extend left of the range; take the last run overlapping
        // it, which now ends exactly at the range end.
        let seg = overlapping_segments(&index, &range)
            .last()
            .copied()
            .ok_or_else(|| DocxError::Other("range resolves to no runs".to_string()))?;
        (seg.para, seg.path[0] + 1, cloned_rpr(body, seg))
    };

    let ins = make_ins_element(rpr, text, ctx, counter.next_id());
    paragraph_mut(body, para)?
        .children
        .insert(pos, XmlNode::Element(ins));
    Ok(())
}

/// Insert `text` as a tracked insertion immediately before the range.
///
/// Symmetric to [`insert_after`]; formatting is cloned from the first run
/// of the range.
pub fn insert_before(
    body: &mut XmlElement,
    index: RunIndex,
    range: Range<usize>,
    text: &str,
    ctx: &ReviewContext,
    counter: &mut RevisionCounter,
) -> Result<()> {
    split_at_caret(body, &index, range.start)?;
    drop(index);

    let index = RunIndex::build(body);
    let (para, pos, rpr) = if range.is_empty() {
        caret_insert_point(body, &index, range.start)?
    } else {
        // The first run overlapping the range starts exactly at the range
        // start after the caret split.
        let seg = overlapping_segments(&index, &range)
            .first()
            .copied()
            .ok_or_else(|| DocxError::Other("range resolves to no runs".to_string()))?;
        (seg.para, seg.path[0], cloned_rpr(body, seg))
    };

    let ins = make_ins_element(rpr, text, ctx, counter.next_id());
    paragraph_mut(body, para)?
        .children
        .insert(pos, XmlNode::Element(ins));
    Ok(())
}

// ---------------------------------------------------------------------------
// Boundary splitting

/// Split the runs at both range boundaries so the range afterwards covers
/// whole runs only. The end is split first so the start segment's
/// coordinates stay valid.
fn split_boundaries(body: &mut XmlElement, index: &RunIndex, range: &Range<usize>) -> Result<()> {
    if let Some(seg) = index.segment_at(range.end)
        && seg.start < range.end
    {
        let offset = range.end - seg.start;
        split_run_at(body, seg, offset)?;
    }
    if let Some(seg) = index.segment_at(range.start)
        && seg.start < range.start
    {
        let offset = range.start - seg.start;
        split_run_at(body, seg, offset)?;
    }
    Ok(())
}

/// Boundary splitting for the comment writer, which brackets a range with
/// markers instead of wrapping it.
pub(crate) fn split_range_boundaries(
    body: &mut XmlElement,
    index: &RunIndex,
    range: &Range<usize>,
) -> Result<()> {
    split_boundaries(body, index, range)
}

/// The parent element a run path points into: the paragraph itself for a
/// one-step path, the revision container for a two-step path.
pub(crate) fn parent_of_path<'a>(
    body: &'a mut XmlElement,
    para: usize,
    path: &[usize],
) -> Result<&'a mut XmlElement> {
    let mut el = paragraph_mut(body, para)?;
    for &idx in &path[..path.len().saturating_sub(1)] {
        el = el
            .children
            .get_mut(idx)
            .and_then(XmlNode::as_element_mut)
            .ok_or_else(|| DocxError::Other("run path no longer valid".to_string()))?;
    }
    Ok(el)
}

fn split_at_caret(body: &mut XmlElement, index: &RunIndex, pos: usize) -> Result<()> {
    if let Some(seg) = index.segment_at(pos)
        && seg.start < pos
    {
        split_run_at(body, seg, pos - seg.start)?;
    }
    Ok(())
}

/// Split the run owning `seg` at a byte offset within its text node.
///
/// The original run keeps the prefix (and every child before the text
/// node); a clone inheriting the run's attributes and a deep copy of its
/// `w:rPr` holds the suffix and the children after the text node.
fn split_run_at(body: &mut XmlElement, seg: &Segment, offset: usize) -> Result<()> {
    let (parent, run_idx) = run_parent_mut(body, seg)?;
    let XmlNode::Element(run) = parent.children.remove(run_idx) else {
        return Err(DocxError::Other("run path does not address an element".to_string()));
    };

    let mut children = run.children;
    let after: Vec<XmlNode> = children.split_off(seg.text_child + 1);
    let Some(XmlNode::Element(text_el)) = children.pop() else {
        return Err(DocxError::Other("run text child is not an element".to_string()));
    };
    let before = children;

    let text = text_el.text();
    let (prefix, suffix) = text.split_at(offset);

    let mut first = XmlElement {
        name: run.name.clone(),
        attrs: run.attrs.clone(),
        children: before,
    };
    let rpr = first.find("rPr").cloned();
    first.push_element(make_text_node(&text_el, prefix));

    let mut second = XmlElement {
        name: run.name,
        attrs: run.attrs,
        children: Vec::with_capacity(after.len() + 2),
    };
    if let Some(rpr) = rpr {
        second.push_element(rpr);
    }
    second.push_element(make_text_node(&text_el, suffix));
    second.children.extend(after);

    parent.children.insert(run_idx, XmlNode::Element(second));
    parent.children.insert(run_idx, XmlNode::Element(first));
    Ok(())
}

/// Clone a `w:t`-shaped element with new text, keeping its attributes and
/// marking whitespace-significant content.
fn make_text_node(template: &XmlElement, text: &str) -> XmlElement {
    let mut t = XmlElement {
        name: template.name.clone(),
        attrs: template.attrs.clone(),
        children: vec![XmlNode::Text(text.to_string())],
    };
    mark_space_preserved(&mut t, text);
    t
}

fn mark_space_preserved(t: &mut XmlElement, text: &str) {
    let significant = text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace);
    if significant && t.attr("space").is_none() {
        t.set_attr("xml:space", "preserve");
    }
}

// ---------------------------------------------------------------------------
// Deletion wrapping

/// A maximal group of adjacent sibling runs covered by the range.
#[derive(Debug, PartialEq)]
struct RunGroup {
    para: usize,
    /// Paragraph child index of the revision container the runs live in,
    /// or `None` for direct paragraph children
    container: Option<usize>,
    /// Index of the first run within its parent
    first: usize,
    len: usize,
}

fn group_runs(segments: &[&Segment]) -> Vec<RunGroup> {
    let mut groups: Vec<RunGroup> = Vec::new();
    let mut last_run: Option<(usize, Vec<usize>)> = None;

    for seg in segments {
        let key = (seg.para, seg.path.to_vec());
        if last_run.as_ref() == Some(&key) {
            continue; // more text from the same run
        }
        last_run = Some(key);

        let (container, idx) = match seg.path.len() {
            1 => (None, seg.path[0]),
            _ => (Some(seg.path[0]), seg.path[1]),
        };
        match groups.last_mut() {
            Some(g)
                if g.para == seg.para && g.container == container && idx == g.first + g.len =>
            {
                g.len += 1;
            },
            _ => groups.push(RunGroup {
                para: seg.para,
                container,
                first: idx,
                len: 1,
            }),
        }
    }
    groups
}

/// Wrap each group in its own `w:del`, converting `w:t` to `w:delText`.
///
/// Groups are processed in reverse document order so earlier groups' sibling
/// indices stay valid; revision IDs are pre-allocated in document order.
fn wrap_groups_in_del(
    body: &mut XmlElement,
    groups: &[RunGroup],
    ctx: &ReviewContext,
    counter: &mut RevisionCounter,
) -> Result<()> {
    let ids: Vec<u32> = groups.iter().map(|_| counter.next_id()).collect();

    for (group, id) in groups.iter().zip(ids).rev() {
        let para = paragraph_mut(body, group.para)?;
        let parent = match group.container {
            None => para,
            Some(ci) => para
                .children
                .get_mut(ci)
                .and_then(XmlNode::as_element_mut)
                .ok_or_else(|| {
                    DocxError::Other("revision container vanished during splice".to_string())
                })?,
        };

        let removed: Vec<XmlNode> = parent
            .children
            .drain(group.first..group.first + group.len)
            .collect();

        let mut del = XmlElement::new("w:del")
            .with_attr("w:id", id.to_string())
            .with_attr("w:author", ctx.author.clone())
            .with_attr("w:date", ctx.date.clone());
        for node in removed {
            match node {
                XmlNode::Element(mut run) => {
                    convert_run_to_deleted(&mut run);
                    del.push_element(run);
                },
                other => del.push(other),
            }
        }
        parent.children.insert(group.first, XmlNode::Element(del));
    }
    Ok(())
}

fn convert_run_to_deleted(run: &mut XmlElement) {
    for child in run.children.iter_mut().filter_map(XmlNode::as_element_mut) {
        if child.is("t") {
            child.name = deleted_text_name(&child.name);
        }
    }
}

fn deleted_text_name(name: &str) -> String {
    match name.rfind(':') {
        Some(pos) => format!("{}:delText", &name[..pos]),
        None => "delText".to_string(),
    }
}

/// Paragraph-level insertion point immediately after the last group, once
/// all groups have been wrapped.
///
/// Every wrap of an earlier top-level group shrinks the paragraph's child
/// list by `len - 1`, which shifts the last group's position left.
fn position_after_groups(groups: &[RunGroup]) -> (usize, usize) {
    let last = &groups[groups.len() - 1];
    let base = last.container.unwrap_or(last.first);
    let shift: usize = groups[..groups.len() - 1]
        .iter()
        .filter(|g| g.para == last.para && g.container.is_none() && g.first < base)
        .map(|g| g.len - 1)
        .sum();
    (last.para, base - shift + 1)
}

// ---------------------------------------------------------------------------
// Insertion markup

fn make_ins_element(
    rpr: Option<XmlElement>,
    text: &str,
    ctx: &ReviewContext,
    id: u32,
) -> XmlElement {
    let mut run = XmlElement::new("w:r");
    if let Some(rpr) = rpr {
        run.push_element(rpr);
    }
    let mut t = XmlElement::new("w:t").with_text(text);
    mark_space_preserved(&mut t, text);
    run.push_element(t);

    XmlElement::new("w:ins")
        .with_attr("w:id", id.to_string())
        .with_attr("w:author", ctx.author.clone())
        .with_attr("w:date", ctx.date.clone())
        .with_child(run)
}

/// Insertion point for a caret position with no selected runs.
fn caret_insert_point(
    body: &XmlElement,
    index: &RunIndex,
    pos: usize,
) -> Result<(usize, usize, Option<XmlElement>)> {
    // A run ending exactly at the caret anchors the formatting.
    if let Some(seg) = index.segments().iter().rev().find(|s| s.end == pos) {
        return Ok((seg.para, seg.path[0] + 1, cloned_rpr(body, seg)));
    }
    if let Some(seg) = index.segments().iter().find(|s| s.start >= pos) {
        return Ok((seg.para, seg.path[0], cloned_rpr(body, seg)));
    }
    let span = index
        .paragraphs()
        .iter()
        .find(|p| p.start <= pos && pos <= p.end)
        .or_else(|| index.paragraphs().last())
        .ok_or_else(|| DocxError::Other("document has no paragraphs".to_string()))?;
    let para = body
        .children
        .get(span.para)
        .and_then(XmlNode::as_element)
        .ok_or_else(|| DocxError::Other("paragraph vanished during splice".to_string()))?;
    Ok((span.para, para.children.len(), None))
}

// ---------------------------------------------------------------------------
// Tree navigation

fn paragraph_mut<'a>(body: &'a mut XmlElement, para: usize) -> Result<&'a mut XmlElement> {
    body.children
        .get_mut(para)
        .and_then(XmlNode::as_element_mut)
        .ok_or_else(|| DocxError::Other("paragraph vanished during splice".to_string()))
}

/// Resolve a segment to its run's parent element and child index.
fn run_parent_mut<'a>(
    body: &'a mut XmlElement,
    seg: &Segment,
) -> Result<(&'a mut XmlElement, usize)> {
    let (run_idx, parents) = seg
        .path
        .split_last()
        .ok_or_else(|| DocxError::Other("empty run path".to_string()))?;
    let mut el = paragraph_mut(body, seg.para)?;
    for &idx in parents {
        el = el
            .children
            .get_mut(idx)
            .and_then(XmlNode::as_element_mut)
            .ok_or_else(|| DocxError::Other("run path no longer valid".to_string()))?;
    }
    Ok((el, *run_idx))
}

fn overlapping_segments<'a>(index: &'a RunIndex, range: &Range<usize>) -> Vec<&'a Segment> {
    index
        .segments()
        .iter()
        .filter(|seg| seg.start < range.end && seg.end > range.start)
        .collect()
}

fn run_at<'a>(body: &'a XmlElement, seg: &Segment) -> Option<&'a XmlElement> {
    let mut el = body.children.get(seg.para)?.as_element()?;
    for &idx in seg.path.iter() {
        el = el.children.get(idx)?.as_element()?;
    }
    Some(el)
}

fn cloned_rpr(body: &XmlElement, seg: &Segment) -> Option<XmlElement> {
    run_at(body, seg).and_then(|run| run.find("rPr").cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::matching::find_first;
    use crate::xml::{parse_document, serialize_document};

    fn ctx() -> ReviewContext {
        ReviewContext {
            author: "Reviewer".to_string(),
            date: "2025-06-01T09:00:00Z".to_string(),
        }
    }

    fn body(xml: &str) -> XmlElement {
        parse_document(xml.as_bytes()).unwrap()
    }

    fn visible(body: &XmlElement) -> String {
        RunIndex::build(body).text().to_string()
    }

    #[test]
    fn test_replace_single_run() {
        let mut body = body(
            "<w:body><w:p><w:r><w:t>The methodology was applied to all subjects</w:t></w:r></w:p></w:body>",
        );
        let mut counter = RevisionCounter::seed_from(&body);
        let index = RunIndex::build(&body);
        let range = find_first(&index, "methodology").unwrap();
        replace(&mut body, index, range, "methods", &ctx(), &mut counter).unwrap();

        // Visible stream: prefix + replacement + suffix.
        assert_eq!(visible(&body), "The methods was applied to all subjects");

        let para = body.children[0].as_element().unwrap();
        let kinds: Vec<&str> = para
            .child_elements()
            .map(|el| el.name.as_str())
            .collect();
        assert_eq!(kinds, ["w:r", "w:del", "w:ins", "w:r"]);

        let del = para.find("del").unwrap();
        assert_eq!(del.text(), "methodology");
        assert!(del.descendant("delText").is_some());
        assert_eq!(del.attr("author"), Some("Reviewer"));

        let ins = para.find("ins").unwrap();
        assert_eq!(ins.text(), "methods");
    }

    #[test]
    fn test_replace_across_run_boundary_preserves_formatting() {
        let mut body = body(
            r#"<w:body><w:p><w:r><w:rPr><w:b/></w:rPr><w:t>The metho</w:t></w:r><w:r><w:rPr><w:i/></w:rPr><w:t>dology was</w:t></w:r></w:p></w:body>"#,
        );
        let mut counter = RevisionCounter::seed_from(&body);
        let index = RunIndex::build(&body);
        let range = find_first(&index, "methodology").unwrap();
        replace(&mut body, index, range, "methods", &ctx(), &mut counter).unwrap();

        assert_eq!(visible(&body), "The methods was");

        let para = body.children[0].as_element().unwrap();
        let del = para.find("del").unwrap();
        let del_runs: Vec<&XmlElement> = del.elements("r").collect();
        assert_eq!(del_runs.len(), 2);
        assert_eq!(del_runs[0].text(), "metho");
        assert!(del_runs[0].find("rPr").unwrap().find("b").is_some());
        assert_eq!(del_runs[1].text(), "dology");
        assert!(del_runs[1].find("rPr").unwrap().find("i").is_some());

        // Replacement formatting comes from the first run of the range.
        let ins = para.find("ins").unwrap();
        let ins_run = ins.find("r").unwrap();
        assert!(ins_run.find("rPr").unwrap().find("b").is_some());
    }

    #[test]
    fn test_delete_keeps_boundary_formatting_intact() {
        let mut body = body(
            "<w:body><w:p><w:r><w:t>keep this gone keep that</w:t></w:r></w:p></w:body>",
        );
        let mut counter = RevisionCounter::seed_from(&body);
        let index = RunIndex::build(&body);
        let range = find_first(&index, " gone").unwrap();
        delete(&mut body, index, range, &ctx(), &mut counter).unwrap();

        assert_eq!(visible(&body), "keep this keep that");
        let para = body.children[0].as_element().unwrap();
        assert_eq!(para.find("del").unwrap().text(), " gone");
        // Leading space in the split suffix must be preserved.
        let serialized = String::from_utf8(serialize_document(&body)).unwrap();
        assert!(serialized.contains(r#"xml:space="preserve""#));
    }

    #[test]
    fn test_insert_after_leaves_anchor_untouched() {
        let mut body = body("<w:body><w:p><w:r><w:t>alpha beta</w:t></w:r></w:p></w:body>");
        let mut counter = RevisionCounter::seed_from(&body);
        let index = RunIndex::build(&body);
        let range = find_first(&index, "alpha").unwrap();
        insert_after(&mut body, index, range, " inserted", &ctx(), &mut counter).unwrap();

        assert_eq!(visible(&body), "alpha inserted beta");
        let para = body.children[0].as_element().unwrap();
        assert!(para.find("del").is_none());
        assert_eq!(para.find("ins").unwrap().text(), " inserted");
    }

    #[test]
    fn test_insert_after_anchor_ending_mid_run() {
        let mut body = body("<w:body><w:p><w:r><w:t>alpha beta gamma</w:t></w:r></w:p></w:body>");
        let mut counter = RevisionCounter::seed_from(&body);
        let index = RunIndex::build(&body);
        let range = find_first(&index, "beta").unwrap();
        insert_after(&mut body, index, range, "!", &ctx(), &mut counter).unwrap();

        assert_eq!(visible(&body), "alpha beta! gamma");
    }

    #[test]
    fn test_insert_before() {
        let mut body = body("<w:body><w:p><w:r><w:t>alpha beta</w:t></w:r></w:p></w:body>");
        let mut counter = RevisionCounter::seed_from(&body);
        let index = RunIndex::build(&body);
        let range = find_first(&index, "beta").unwrap();
        insert_before(&mut body, index, range, "new ", &ctx(), &mut counter).unwrap();

        assert_eq!(visible(&body), "alpha new beta");
    }

    #[test]
    fn test_replace_rejects_empty_range() {
        let mut body = body("<w:body><w:p><w:r><w:t>x</w:t></w:r></w:p></w:body>");
        let mut counter = RevisionCounter::seed_from(&body);
        let index = RunIndex::build(&body);
        assert!(replace(&mut body, index, 0..0, "y", &ctx(), &mut counter).is_err());
    }

    #[test]
    fn test_revision_ids_seed_past_existing() {
        let body = body(
            r#"<w:body><w:p><w:ins w:id="7" w:author="A"><w:r><w:t>x</w:t></w:r></w:ins></w:p></w:body>"#,
        );
        let mut counter = RevisionCounter::seed_from(&body);
        assert_eq!(counter.next_id(), 8);
        assert_eq!(counter.next_id(), 9);
    }

    #[test]
    fn test_delete_inside_insertion_nests_del() {
        let mut body = body(
            r#"<w:body><w:p><w:ins w:id="1" w:author="A"><w:r><w:t>freshly added</w:t></w:r></w:ins></w:p></w:body>"#,
        );
        let mut counter = RevisionCounter::seed_from(&body);
        let index = RunIndex::build(&body);
        let range = find_first(&index, "added").unwrap();
        delete(&mut body, index, range, &ctx(), &mut counter).unwrap();

        assert_eq!(visible(&body), "freshly ");
        let para = body.children[0].as_element().unwrap();
        let ins = para.find("ins").unwrap();
        let del = ins.find("del").expect("w:del nested inside w:ins");
        assert_eq!(del.text(), "added");
    }

    #[test]
    fn test_three_run_match_wraps_middle_run_whole() {
        let mut body = body(
            "<w:body><w:p>\
             <w:r><w:t>aaXX</w:t></w:r>\
             <w:r><w:t>YY</w:t></w:r>\
             <w:r><w:t>ZZbb</w:t></w:r>\
             </w:p></w:body>",
        );
        let mut counter = RevisionCounter::seed_from(&body);
        let index = RunIndex::build(&body);
        let range = find_first(&index, "XXYYZZ").unwrap();
        delete(&mut body, index, range, &ctx(), &mut counter).unwrap();

        assert_eq!(visible(&body), "aabb");
        let para = body.children[0].as_element().unwrap();
        let del = para.find("del").unwrap();
        // Two boundary splits plus the untouched middle run.
        assert_eq!(del.elements("r").count(), 3);
        assert_eq!(del.text(), "XXYYZZ");
    }
}
