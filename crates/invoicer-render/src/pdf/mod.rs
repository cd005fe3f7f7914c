//! # PDF Rendering
//!
//! ## Layout Strategies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InvoiceView ──► layout_for(style) ──► LayoutStrategy::draw(canvas)    │
//! │                                                                         │
//! │   Modern      brand-coloured header band, zebra rows                    │
//! │   Classic     serif, brand bar across the top, ruled rows               │
//! │   Industrial  monospace, boxed frame, gridded table                     │
//! │   Minimalist  brand strip on the left, light separators                 │
//! │                                                                         │
//! │  PdfCanvas::finish() ──► bytes                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Layouts differ only in placement. Every one of them prints the same
//! fields: business and client blocks (present fields only), invoice id and
//! dates, the due/pending marker, one row per item, subtotal, discount, tax,
//! grand total, then watermark and notes.

pub mod canvas;
pub mod metrics;

mod classic;
mod industrial;
mod minimalist;
mod modern;

pub use canvas::{Align, Border, Color, Next, Paint, PdfCanvas};
pub use classic::ClassicLayout;
pub use industrial::IndustrialLayout;
pub use metrics::{Family, Font, FontStyle};
pub use minimalist::MinimalistLayout;
pub use modern::ModernLayout;

use invoicer_core::PdfStyle;
use tracing::debug;

use crate::error::RenderResult;
use crate::view::InvoiceView;

/// One fixed PDF page design.
pub trait LayoutStrategy {
    fn style(&self) -> PdfStyle;

    /// Draws the whole invoice onto `canvas`, starting from a fresh page.
    fn draw(&self, canvas: &mut PdfCanvas, view: &InvoiceView);
}

/// The layout implementing `style`.
pub fn layout_for(style: PdfStyle) -> Box<dyn LayoutStrategy> {
    match style {
        PdfStyle::Modern => Box::new(ModernLayout),
        PdfStyle::Classic => Box::new(ClassicLayout),
        PdfStyle::Industrial => Box::new(IndustrialLayout),
        PdfStyle::Minimalist => Box::new(MinimalistLayout),
    }
}

/// Draws `view` with `layout` and serializes the result.
pub fn render_pdf(view: &InvoiceView, layout: &dyn LayoutStrategy) -> RenderResult<Vec<u8>> {
    let mut canvas = PdfCanvas::new();
    layout.draw(&mut canvas, view);
    debug!(style = %layout.style(), pages = canvas.page_count(), "Drew PDF layout");
    canvas.finish()
}

// =============================================================================
// Shared blocks
// =============================================================================

/// Right-aligned `Due: <date>` row and a separate red `PENDING` marker,
/// each only when present.
pub(crate) fn due_rows(canvas: &mut PdfCanvas, view: &InvoiceView, family: Family, size: f64, h: f64) {
    if let Some(due) = &view.due_date {
        canvas.cell(0.0, h, &format!("Due: {}", due), Border::None, Next::NewLine, Align::Right, false);
    }
    if view.pending {
        canvas.set_font(family, FontStyle::Bold, size);
        canvas.set_text_color(Color::RED);
        canvas.cell(0.0, h, "PENDING", Border::None, Next::NewLine, Align::Right, false);
        canvas.set_font(family, FontStyle::Regular, size);
    }
}

/// Watermark line then notes, below everything else.
pub(crate) fn footer(canvas: &mut PdfCanvas, view: &InvoiceView, family: Family) {
    if view.business.watermark.is_none() && view.notes.is_none() {
        return;
    }
    canvas.ln(10.0);

    if let Some(notes) = &view.notes {
        canvas.set_font(family, FontStyle::Regular, 9.0);
        canvas.set_text_color(Color::gray(80));
        canvas.multi_cell(0.0, 5.0, &format!("Notes: {}", notes), Align::Left);
        canvas.ln(2.0);
    }
    if let Some(watermark) = &view.business.watermark {
        canvas.set_font(family, FontStyle::Italic, 10.0);
        canvas.set_text_color(Color::gray(150));
        canvas.multi_cell(0.0, 5.0, watermark, Align::Center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_line_watermark_wraps() {
        let mut view = crate::test_support::sample_view();
        view.notes = None;
        view.business.watermark = Some("Thank you\nSee you again".to_string());
        let mut canvas = PdfCanvas::new();
        footer(&mut canvas, &view, Family::Helvetica);
        assert_eq!(canvas.text_runs(), ["Thank you", "See you again"]);
    }

    #[test]
    fn test_layout_for_each_style() {
        for style in PdfStyle::ALL {
            assert_eq!(layout_for(style).style(), style);
        }
    }
}
