//! # Base-14 Font Metrics
//!
//! Glyph advance widths (1/1000 em) for printable ASCII, taken from the
//! Adobe core font AFM files. Needed for right/centre alignment and line
//! wrapping; the fonts themselves are never embedded.
//!
//! Oblique and italic faces reuse the upright widths. Courier is fixed
//! pitch at 600.

/// Typeface family of a base-14 font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    Helvetica,
    Times,
    Courier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

/// One of the twelve text faces of the base-14 set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Font {
    pub family: Family,
    pub style: FontStyle,
}

impl Font {
    pub const fn new(family: Family, style: FontStyle) -> Self {
        Font { family, style }
    }

    /// PostScript name written as `/BaseFont`.
    pub fn base_name(&self) -> &'static str {
        use FontStyle::*;
        match (self.family, self.style) {
            (Family::Helvetica, Regular) => "Helvetica",
            (Family::Helvetica, Bold) => "Helvetica-Bold",
            (Family::Helvetica, Italic) => "Helvetica-Oblique",
            (Family::Helvetica, BoldItalic) => "Helvetica-BoldOblique",
            (Family::Times, Regular) => "Times-Roman",
            (Family::Times, Bold) => "Times-Bold",
            (Family::Times, Italic) => "Times-Italic",
            (Family::Times, BoldItalic) => "Times-BoldItalic",
            (Family::Courier, Regular) => "Courier",
            (Family::Courier, Bold) => "Courier-Bold",
            (Family::Courier, Italic) => "Courier-Oblique",
            (Family::Courier, BoldItalic) => "Courier-BoldOblique",
        }
    }

    /// Fixed page-resource name (`F1`..`F12`), stable across documents.
    pub fn resource_name(&self) -> String {
        let family = match self.family {
            Family::Helvetica => 0,
            Family::Times => 4,
            Family::Courier => 8,
        };
        let style = match self.style {
            FontStyle::Regular => 1,
            FontStyle::Bold => 2,
            FontStyle::Italic => 3,
            FontStyle::BoldItalic => 4,
        };
        format!("F{}", family + style)
    }

    /// Advance width of one character in 1/1000 em. Characters outside
    /// printable ASCII are measured as `?`, which is how they are drawn.
    pub fn glyph_width(&self, c: char) -> u16 {
        let table = match (self.family, self.style) {
            (Family::Courier, _) => return 600,
            (Family::Helvetica, FontStyle::Regular | FontStyle::Italic) => &HELVETICA,
            (Family::Helvetica, _) => &HELVETICA_BOLD,
            (Family::Times, FontStyle::Regular | FontStyle::Italic) => &TIMES_ROMAN,
            (Family::Times, _) => &TIMES_BOLD,
        };
        let code = if (' '..='~').contains(&c) { c } else { '?' };
        table[code as usize - 32]
    }

    /// Width of `text` in em-thousandths.
    pub fn text_units(&self, text: &str) -> u32 {
        text.chars().map(|c| self.glyph_width(c) as u32).sum()
    }
}

// Widths for codes 32 (space) ..= 126 (~).

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 930,
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
    722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
    333, 278, 333, 581, 500, 333,
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
    556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
    394, 220, 394, 520,
];

#[cfg(test)]
mod tests {
    use super::*;

    const HELV: Font = Font::new(Family::Helvetica, FontStyle::Regular);

    #[test]
    fn test_known_widths() {
        assert_eq!(HELV.glyph_width(' '), 278);
        assert_eq!(HELV.glyph_width('W'), 944);
        assert_eq!(HELV.glyph_width('i'), 222);
        assert_eq!(HELV.glyph_width('~'), 584);
        let bold = Font::new(Family::Helvetica, FontStyle::Bold);
        assert_eq!(bold.glyph_width('a'), 556);
        assert_eq!(bold.glyph_width('b'), 611);
        let times = Font::new(Family::Times, FontStyle::Regular);
        assert_eq!(times.glyph_width('A'), 722);
        assert_eq!(times.glyph_width('z'), 444);
        let times_bold = Font::new(Family::Times, FontStyle::Bold);
        assert_eq!(times_bold.glyph_width('W'), 1000);
    }

    #[test]
    fn test_courier_is_fixed_pitch() {
        let courier = Font::new(Family::Courier, FontStyle::Bold);
        assert_eq!(courier.text_units("iW"), 1200);
    }

    #[test]
    fn test_non_ascii_measured_as_question_mark() {
        assert_eq!(HELV.glyph_width('é'), HELV.glyph_width('?'));
    }

    #[test]
    fn test_resource_names_are_unique() {
        let mut names = Vec::new();
        for family in [Family::Helvetica, Family::Times, Family::Courier] {
            for style in [FontStyle::Regular, FontStyle::Bold, FontStyle::Italic, FontStyle::BoldItalic] {
                names.push(Font::new(family, style).resource_name());
            }
        }
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 12);
        assert_eq!(HELV.resource_name(), "F1");
        assert_eq!(HELV.base_name(), "Helvetica");
    }
}
