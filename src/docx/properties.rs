/// Run formatting properties.
///
/// A projection of `w:rPr` used by extraction, diffing, and textconv. The
/// splicer never goes through this type: new runs get a deep copy of the
/// source `w:rPr` element so unknown properties survive.
use crate::xml::XmlElement;

/// Formatting attributes of a run.
///
/// Boolean properties are tri-state: `None` means the property element is
/// absent (inherited), `Some(false)` means explicitly off (`w:val="0"` or,
/// for underline, `w:val="none"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunProperties {
    /// Bold
    pub bold: Option<bool>,
    /// Italic
    pub italic: Option<bool>,
    /// Underline (any style counts as on)
    pub underline: Option<bool>,
    /// Strikethrough
    pub strikethrough: Option<bool>,
    /// Font face: the `w:ascii` slot wins, else `w:hAnsi`, else `w:cs`
    pub font_name: Option<String>,
    /// Font size in half-points, preserved verbatim
    pub font_size: Option<String>,
    /// Text color as a hex string
    pub color: Option<String>,
    /// Named highlight color
    pub highlight: Option<String>,
}

impl RunProperties {
    /// Read the properties of a run element (`w:r`-shaped).
    pub fn from_run(run: &XmlElement) -> Self {
        match run.find("rPr") {
            Some(rpr) => Self::from_rpr(rpr),
            None => Self::default(),
        }
    }

    /// Read a `w:rPr` element.
    pub fn from_rpr(rpr: &XmlElement) -> Self {
        let mut props = Self::default();
        for child in rpr.child_elements() {
            if child.is("b") {
                props.bold = Some(toggle_on(child));
            } else if child.is("i") {
                props.italic = Some(toggle_on(child));
            } else if child.is("u") {
                props.underline = Some(child.attr("val") != Some("none"));
            } else if child.is("strike") {
                props.strikethrough = Some(toggle_on(child));
            } else if child.is("rFonts") {
                props.font_name = child
                    .attr("ascii")
                    .or_else(|| child.attr("hAnsi"))
                    .or_else(|| child.attr("cs"))
                    .map(str::to_string);
            } else if child.is("sz") {
                props.font_size = child.attr("val").map(str::to_string);
            } else if child.is("color") {
                props.color = child.attr("val").map(str::to_string);
            } else if child.is("highlight") {
                props.highlight = child.attr("val").map(str::to_string);
            }
        }
        props
    }

    /// Whether any attribute is set.
    pub fn any(&self) -> bool {
        self.bold.is_some()
            || self.italic.is_some()
            || self.underline.is_some()
            || self.strikethrough.is_some()
            || self.font_name.is_some()
            || self.font_size.is_some()
            || self.color.is_some()
            || self.highlight.is_some()
    }
}

/// Toggle properties are on unless `w:val` says otherwise.
fn toggle_on(el: &XmlElement) -> bool {
    !matches!(el.attr("val"), Some("0") | Some("false") | Some("none"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    #[test]
    fn test_absent_rpr_is_default() {
        let run = parse_document(b"<w:r><w:t>plain</w:t></w:r>").unwrap();
        assert_eq!(RunProperties::from_run(&run), RunProperties::default());
    }

    #[test]
    fn test_toggle_properties() {
        let run = parse_document(
            br#"<w:r><w:rPr><w:b/><w:i w:val="0"/><w:strike w:val="true"/></w:rPr><w:t>x</w:t></w:r>"#,
        )
        .unwrap();
        let props = RunProperties::from_run(&run);
        assert_eq!(props.bold, Some(true));
        assert_eq!(props.italic, Some(false));
        assert_eq!(props.strikethrough, Some(true));
    }

    #[test]
    fn test_underline_none_is_explicit_off() {
        let run = parse_document(
            br#"<w:r><w:rPr><w:u w:val="none"/></w:rPr><w:t>x</w:t></w:r>"#,
        )
        .unwrap();
        assert_eq!(RunProperties::from_run(&run).underline, Some(false));

        let run = parse_document(
            br#"<w:r><w:rPr><w:u w:val="single"/></w:rPr><w:t>x</w:t></w:r>"#,
        )
        .unwrap();
        assert_eq!(RunProperties::from_run(&run).underline, Some(true));
    }

    #[test]
    fn test_font_slot_precedence() {
        let run = parse_document(
            br#"<w:r><w:rPr><w:rFonts w:hAnsi="Calibri" w:cs="Arial"/><w:sz w:val="28"/><w:color w:val="FF0000"/></w:rPr><w:t>x</w:t></w:r>"#,
        )
        .unwrap();
        let props = RunProperties::from_run(&run);
        assert_eq!(props.font_name.as_deref(), Some("Calibri"));
        assert_eq!(props.font_size.as_deref(), Some("28"));
        assert_eq!(props.color.as_deref(), Some("FF0000"));

        let run = parse_document(
            br#"<w:r><w:rPr><w:rFonts w:ascii="Georgia" w:hAnsi="Calibri"/></w:rPr><w:t>x</w:t></w:r>"#,
        )
        .unwrap();
        assert_eq!(RunProperties::from_run(&run).font_name.as_deref(), Some("Georgia"));
    }
}
