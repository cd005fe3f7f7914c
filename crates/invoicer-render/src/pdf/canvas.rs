//! # PDF Canvas
//!
//! A small cursor-based drawing surface over `lopdf`, measured in
//! millimetres from the top-left corner of an A4 page.
//!
//! ```text
//!  (0,0) ──────────────────────────── x (mm) ──► 210
//!    │   ┌ l_margin                   r_margin ┐
//!    │   │  cell(w, h, "text", ...) ──► cursor  │
//!    │   │  ln(h) ──► next line, back to margin │
//!    y   │                                      │
//!    ▼   └──────────── break_trigger ───────────┘
//!   297
//! ```
//!
//! Every drawing call appends self-contained operations (wrapped in `q`/`Q`)
//! to the current page, so no graphics state leaks between calls and a page
//! break needs no state replay. [`PdfCanvas::finish`] assembles the object
//! tree in a fixed order, which keeps the output byte-for-byte reproducible.

use std::collections::BTreeSet;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use tracing::debug;

use crate::error::RenderResult;
use crate::logo::Logo;

use super::metrics::{Family, Font, FontStyle};

/// Points per millimetre.
pub const K: f64 = 72.0 / 25.4;

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;

const DEFAULT_MARGIN: f64 = 10.0;
const CELL_MARGIN: f64 = 1.0;
const BOTTOM_MARGIN: f64 = 20.0;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);
    pub const RED: Color = Color(255, 0, 0);

    pub const fn gray(level: u8) -> Self {
        Color(level, level, level)
    }

    fn operands(&self) -> Vec<Object> {
        [self.0, self.1, self.2]
            .iter()
            .map(|c| Object::Real(*c as f32 / 255.0))
            .collect()
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color(r, g, b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    None,
    All,
    Bottom,
}

/// Where the cursor goes after a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// To the right of the cell.
    Right,
    /// Start of the next line, at the left margin.
    NewLine,
    /// Directly below the cell.
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Fill,
    Stroke,
}

pub struct PdfCanvas {
    pages: Vec<Vec<Operation>>,
    images: Vec<Logo>,
    fonts_used: BTreeSet<Font>,
    x: f64,
    y: f64,
    l_margin: f64,
    t_margin: f64,
    r_margin: f64,
    font: Font,
    font_size: f64,
    text_color: Color,
    fill_color: Color,
    draw_color: Color,
    line_width: f64,
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfCanvas {
    /// A canvas with one empty page, Helvetica 12 and black ink.
    pub fn new() -> Self {
        PdfCanvas {
            pages: vec![Vec::new()],
            images: Vec::new(),
            fonts_used: BTreeSet::new(),
            x: DEFAULT_MARGIN,
            y: DEFAULT_MARGIN,
            l_margin: DEFAULT_MARGIN,
            t_margin: DEFAULT_MARGIN,
            r_margin: DEFAULT_MARGIN,
            font: Font::new(Family::Helvetica, FontStyle::Regular),
            font_size: 12.0,
            text_color: Color::BLACK,
            fill_color: Color::BLACK,
            draw_color: Color::BLACK,
            line_width: 0.2,
        }
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    pub fn set_font(&mut self, family: Family, style: FontStyle, size_pt: f64) {
        self.font = Font::new(family, style);
        self.font_size = size_pt;
    }

    pub fn set_text_color(&mut self, color: impl Into<Color>) {
        self.text_color = color.into();
    }

    pub fn set_fill_color(&mut self, color: impl Into<Color>) {
        self.fill_color = color.into();
    }

    pub fn set_draw_color(&mut self, color: impl Into<Color>) {
        self.draw_color = color.into();
    }

    pub fn set_line_width(&mut self, width_mm: f64) {
        self.line_width = width_mm;
    }

    /// Moves the left margin; the cursor follows if it was left of it.
    pub fn set_left_margin(&mut self, margin: f64) {
        self.l_margin = margin;
        if self.x < margin {
            self.x = margin;
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    /// Sets `y` and returns `x` to the left margin.
    pub fn set_y(&mut self, y: f64) {
        self.y = y;
        self.x = self.l_margin;
    }

    pub fn set_xy(&mut self, x: f64, y: f64) {
        self.y = y;
        self.x = x;
    }

    /// Line break: back to the left margin, `h` millimetres down.
    pub fn ln(&mut self, h: f64) {
        self.x = self.l_margin;
        self.y += h;
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Width of `text` in the current font, in millimetres.
    pub fn string_width(&self, text: &str) -> f64 {
        self.font.text_units(text) as f64 * self.font_size / 1000.0 / K
    }

    fn content_width(&self) -> f64 {
        PAGE_WIDTH - self.r_margin - self.x
    }

    fn break_trigger(&self) -> f64 {
        PAGE_HEIGHT - BOTTOM_MARGIN
    }

    fn add_page(&mut self) {
        self.pages.push(Vec::new());
        self.y = self.t_margin;
        self.x = self.l_margin;
    }

    fn push(&mut self, ops: Vec<Operation>) {
        if let Some(page) = self.pages.last_mut() {
            page.extend(ops);
        }
    }

    // -------------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------------

    /// Prints one cell. A zero width extends the cell to the right margin.
    /// Breaks to a new page when the cell would cross the bottom margin.
    #[allow(clippy::too_many_arguments)]
    pub fn cell(&mut self, w: f64, h: f64, text: &str, border: Border, next: Next, align: Align, fill: bool) {
        if self.y + h > self.break_trigger() {
            let x = self.x;
            self.add_page();
            self.x = x;
        }
        let w = if w == 0.0 { self.content_width() } else { w };
        let (x, y) = (self.x, self.y);

        match (fill, border) {
            (true, Border::All) => self.rect_op(x, y, w, h, "B"),
            (true, _) => self.rect_op(x, y, w, h, "f"),
            (false, Border::All) => self.rect_op(x, y, w, h, "S"),
            (false, _) => {}
        }
        if border == Border::Bottom {
            self.line(x, y + h, x + w, y + h);
        }

        // One line only; multi_cell handles explicit newlines.
        let flat;
        let text = if text.contains('\n') {
            flat = text.replace('\n', " ");
            flat.as_str()
        } else {
            text
        };

        if !text.is_empty() {
            let dx = match align {
                Align::Left => CELL_MARGIN,
                Align::Center => (w - self.string_width(text)) / 2.0,
                Align::Right => w - CELL_MARGIN - self.string_width(text),
            };
            let baseline = y + 0.5 * h + 0.3 * self.font_size / K;
            let ops = self.text_ops(x + dx, baseline, text);
            self.push(ops);
        }

        match next {
            Next::Right => self.x += w,
            Next::NewLine => {
                self.y += h;
                self.x = self.l_margin;
            }
            Next::Below => self.y += h,
        }
    }

    /// Prints `text` wrapped to `w`, one `h`-high line per row. Explicit
    /// newlines are kept. Leaves the cursor at the left margin below the
    /// block.
    pub fn multi_cell(&mut self, w: f64, h: f64, text: &str, align: Align) {
        let w = if w == 0.0 { self.content_width() } else { w };
        let max = w - 2.0 * CELL_MARGIN;
        for line in self.wrap(text, max) {
            self.cell(w, h, &line, Border::None, Next::Below, align, false);
        }
        self.x = self.l_margin;
    }

    fn wrap(&self, text: &str, max: f64) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut current = String::new();
            for word in paragraph.split(' ') {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", current, word)
                };
                if self.string_width(&candidate) <= max {
                    current = candidate;
                    continue;
                }
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                // A single word wider than the cell is split by character.
                for c in word.chars() {
                    current.push(c);
                    if self.string_width(&current) > max && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    }
                }
            }
            lines.push(current);
        }
        lines
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: Paint) {
        let op = match paint {
            Paint::Fill => "f",
            Paint::Stroke => "S",
        };
        self.rect_op(x, y, w, h, op);
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let mut ops = vec![Operation::new("q", vec![])];
        ops.push(Operation::new("RG", self.draw_color.operands()));
        ops.push(Operation::new("w", vec![pt(self.line_width)]));
        ops.push(Operation::new("m", vec![pt(x1), pt(PAGE_HEIGHT - y1)]));
        ops.push(Operation::new("l", vec![pt(x2), pt(PAGE_HEIGHT - y2)]));
        ops.push(Operation::new("S", vec![]));
        ops.push(Operation::new("Q", vec![]));
        self.push(ops);
    }

    /// Places a logo at (`x`, `y`) scaled to width `w`; returns the drawn
    /// height. The cursor does not move.
    pub fn image(&mut self, logo: &Logo, x: f64, y: f64, w: f64) -> f64 {
        let h = logo.scaled_height(w);
        let name = match self.images.iter().position(|l| l == logo) {
            Some(i) => image_name(i),
            None => {
                self.images.push(logo.clone());
                image_name(self.images.len() - 1)
            }
        };
        self.push(vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![pt(w), Object::Integer(0), Object::Integer(0), pt(h), pt(x), pt(PAGE_HEIGHT - y - h)],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
        h
    }

    fn rect_op(&mut self, x: f64, y: f64, w: f64, h: f64, op: &str) {
        let ops = vec![
            Operation::new("q", vec![]),
            Operation::new("rg", self.fill_color.operands()),
            Operation::new("RG", self.draw_color.operands()),
            Operation::new("w", vec![pt(self.line_width)]),
            Operation::new("re", vec![pt(x), pt(PAGE_HEIGHT - y), pt(w), pt(-h)]),
            Operation::new(op, vec![]),
            Operation::new("Q", vec![]),
        ];
        self.push(ops);
    }

    fn text_ops(&mut self, x: f64, baseline: f64, text: &str) -> Vec<Operation> {
        self.fonts_used.insert(self.font);
        vec![
            Operation::new("q", vec![]),
            Operation::new("rg", self.text_color.operands()),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(self.font.resource_name().into_bytes()),
                    Object::Real(self.font_size as f32),
                ],
            ),
            Operation::new("Td", vec![pt(x), pt(PAGE_HEIGHT - baseline)]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ]
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    /// Serializes the canvas to PDF bytes.
    pub fn finish(self) -> RenderResult<Vec<u8>> {
        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in &self.fonts_used {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_name(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }

        let mut xobjects = Dictionary::new();
        for (i, logo) in self.images.iter().enumerate() {
            let image = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => logo.width as i64,
                    "Height" => logo.height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8_i64,
                    "Filter" => "DCTDecode",
                },
                logo.jpeg.clone(),
            )
            .with_compression(false);
            let image_id = doc.add_object(image);
            xobjects.set(image_name(i), image_id);
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
            "XObject" => xobjects,
        });

        let mut kids = Vec::with_capacity(self.pages.len());
        let page_count = self.pages.len();
        for operations in self.pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                pt(PAGE_WIDTH),
                pt(PAGE_HEIGHT),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        debug!(pages = page_count, bytes = bytes.len(), "Assembled PDF");
        Ok(bytes)
    }
}

#[cfg(test)]
impl PdfCanvas {
    /// Every string drawn so far, in drawing order across pages.
    pub(crate) fn text_runs(&self) -> Vec<String> {
        self.pages
            .iter()
            .flatten()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
                _ => None,
            })
            .collect()
    }
}

/// Millimetres to a PDF point operand.
fn pt(mm: f64) -> Object {
    Object::Real((mm * K) as f32)
}

fn image_name(index: usize) -> String {
    format!("Im{}", index + 1)
}
