/// The visible-text index over the document body.
///
/// A `RunIndex` is a snapshot projection: the concatenation of all visible
/// run text across top-level paragraphs, with a back-pointer from every
/// contiguous text span to the run element that owns it. Visible text is
/// regular run text plus text inside `w:ins`/`w:moveTo` containers; text
/// inside `w:del`/`w:moveFrom` is invisible. Comment range markers and
/// references occupy zero characters.
///
/// Positions are byte offsets into the visible stream. Any structural
/// mutation of the body invalidates the index; the driver rebuilds it before
/// every match.
use crate::xml::XmlElement;
use smallvec::SmallVec;
use std::ops::Range;

/// Child indices from a paragraph element down to a run element.
///
/// One entry for a run that is a direct paragraph child, two for a run
/// inside a revision container.
pub type RunPath = SmallVec<[usize; 2]>;

/// One visible text span and the run element that owns it.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Start offset in the visible stream
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Index of the owning paragraph among the body's children
    pub para: usize,
    /// Path from the paragraph to the run
    pub path: RunPath,
    /// Index of the `w:t` element within the run's children
    pub text_child: usize,
}

/// Visible-text span of one paragraph.
#[derive(Debug, Clone, Copy)]
pub struct ParagraphSpan {
    /// Index among the body's children
    pub para: usize,
    /// Start offset in the visible stream
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

/// A flattened snapshot of the body's visible text.
pub struct RunIndex {
    text: String,
    segments: Vec<Segment>,
    paragraphs: Vec<ParagraphSpan>,
}

impl RunIndex {
    /// Build an index from the current state of a `w:body` element.
    pub fn build(body: &XmlElement) -> Self {
        let mut index = Self {
            text: String::new(),
            segments: Vec::new(),
            paragraphs: Vec::new(),
        };

        for (pi, node) in body.children.iter().enumerate() {
            let Some(para) = node.as_element() else { continue };
            if !para.is("p") {
                continue;
            }
            let start = index.text.len();
            for (ci, child) in para.children.iter().enumerate() {
                let Some(el) = child.as_element() else { continue };
                if el.is("r") {
                    index.push_run(pi, SmallVec::from_slice(&[ci]), el);
                } else if el.is("ins") || el.is("moveTo") {
                    for (ri, inner) in el.children.iter().enumerate() {
                        if let Some(run) = inner.as_element()
                            && run.is("r")
                        {
                            index.push_run(pi, SmallVec::from_slice(&[ci, ri]), run);
                        }
                    }
                }
                // w:del / w:moveFrom text is not visible; comment range
                // markers and anything else occupy zero characters.
            }
            index.paragraphs.push(ParagraphSpan {
                para: pi,
                start,
                end: index.text.len(),
            });
        }

        index
    }

    fn push_run(&mut self, para: usize, path: RunPath, run: &XmlElement) {
        for (ti, child) in run.children.iter().enumerate() {
            let Some(el) = child.as_element() else { continue };
            if !el.is("t") {
                continue;
            }
            let text = el.text();
            if text.is_empty() {
                continue;
            }
            let start = self.text.len();
            self.text.push_str(&text);
            self.segments.push(Segment {
                start,
                end: self.text.len(),
                para,
                path: path.clone(),
                text_child: ti,
            });
        }
    }

    /// The visible stream.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// All segments in document order.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Paragraph spans in document order.
    #[inline]
    pub fn paragraphs(&self) -> &[ParagraphSpan] {
        &self.paragraphs
    }

    /// The body child index of the single paragraph containing the range,
    /// or `None` when the range crosses a paragraph boundary.
    ///
    /// A zero-length range is attributed to the first paragraph whose span
    /// contains the caret position.
    pub fn paragraph_of_range(&self, range: &Range<usize>) -> Option<usize> {
        self.paragraphs
            .iter()
            .find(|span| {
                if range.start == range.end {
                    span.start <= range.start && range.start <= span.end
                } else {
                    span.start <= range.start && range.end <= span.end
                }
            })
            .map(|span| span.para)
    }

    /// The segment containing the given position, if any.
    pub fn segment_at(&self, pos: usize) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|seg| seg.start <= pos && pos < seg.end)
    }

    /// Segments lying entirely inside the range, in document order.
    pub fn segments_within(&self, range: &Range<usize>) -> Vec<&Segment> {
        self.segments
            .iter()
            .filter(|seg| seg.start >= range.start && seg.end <= range.end)
            .collect()
    }
}
