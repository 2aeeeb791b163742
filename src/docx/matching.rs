/// Ordinal substring search over the visible stream.
///
/// Matching is byte-for-byte: no Unicode normalization, no case folding, no
/// whitespace collapsing. Disambiguation is by document order; the manifest
/// contract requires enough surrounding context to make the intended
/// occurrence the first one.
use crate::docx::index::RunIndex;
use memchr::memmem;
use std::ops::Range;

/// Find the first occurrence of `needle` in the visible stream.
///
/// Returns the half-open byte range of the match, or `None`. Matching a
/// valid UTF-8 needle against a valid UTF-8 haystack always lands on
/// character boundaries, so the range is safe to slice with.
pub fn find_first(index: &RunIndex, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }
    memmem::find(index.text().as_bytes(), needle.as_bytes()).map(|start| start..start + needle.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    fn index(xml: &str) -> RunIndex {
        RunIndex::build(&parse_document(xml.as_bytes()).unwrap())
    }

    #[test]
    fn test_first_match_in_document_order() {
        let index = index(
            "<w:body>\
             <w:p><w:r><w:t>alpha beta</w:t></w:r></w:p>\
             <w:p><w:r><w:t>beta gamma</w:t></w:r></w:p>\
             </w:body>",
        );
        assert_eq!(find_first(&index, "beta"), Some(6..10));
        assert_eq!(find_first(&index, "gamma"), Some(15..20));
        assert_eq!(find_first(&index, "delta"), None);
    }

    #[test]
    fn test_match_across_run_boundary() {
        let index = index(
            "<w:body><w:p>\
             <w:r><w:t>The metho</w:t></w:r>\
             <w:r><w:t>dology was</w:t></w:r>\
             </w:p></w:body>",
        );
        assert_eq!(find_first(&index, "methodology"), Some(4..15));
    }

    #[test]
    fn test_ordinal_no_case_folding() {
        let index = index("<w:body><w:p><w:r><w:t>Methodology</w:t></w:r></w:p></w:body>");
        assert_eq!(find_first(&index, "methodology"), None);
        assert_eq!(find_first(&index, "Methodology"), Some(0..11));
    }

    #[test]
    fn test_empty_needle_never_matches() {
        let index = index("<w:body><w:p><w:r><w:t>x</w:t></w:r></w:p></w:body>");
        assert_eq!(find_first(&index, ""), None);
    }
}
