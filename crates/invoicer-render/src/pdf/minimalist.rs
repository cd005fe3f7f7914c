//! Minimalist: a thin brand-coloured strip down the left edge, lower-case
//! title, grey type and hairline separators between items.

use invoicer_core::PdfStyle;

use super::canvas::{Align, Border, Color, Next, Paint, PdfCanvas, PAGE_HEIGHT};
use super::metrics::{Family, FontStyle};
use super::{due_rows, footer, LayoutStrategy};
use crate::view::InvoiceView;

const FONT: Family = Family::Helvetica;
const LEFT: f64 = 20.0;
const RIGHT: f64 = 190.0;

pub struct MinimalistLayout;

impl LayoutStrategy for MinimalistLayout {
    fn style(&self) -> PdfStyle {
        PdfStyle::Minimalist
    }

    fn draw(&self, canvas: &mut PdfCanvas, view: &InvoiceView) {
        canvas.set_fill_color(Color::from(view.business.brand));
        canvas.rect(0.0, 0.0, 10.0, PAGE_HEIGHT, Paint::Fill);
        canvas.set_left_margin(LEFT);
        canvas.set_y(20.0);

        if let Some(logo) = &view.logo {
            let h = canvas.image(logo, LEFT, 15.0, 25.0);
            canvas.set_y((15.0 + h + 5.0).max(30.0));
        }

        canvas.set_font(FONT, FontStyle::Regular, 35.0);
        canvas.set_text_color(Color::gray(50));
        canvas.cell(0.0, 15.0, "invoice.", Border::None, Next::NewLine, Align::Left, false);

        // Business and invoice details, right-aligned
        canvas.set_font(FONT, FontStyle::Regular, 9.0);
        canvas.set_text_color(Color::gray(100));
        let mut details = view.business_lines();
        if let Some(gst) = &view.business.gst_number {
            details.push(format!("GST No: {}", gst));
        }
        details.push(format!("Invoice #{}", view.invoice_id));
        details.push(format!("Date: {}", view.issue_date));
        for line in &details {
            canvas.cell(0.0, 4.0, line, Border::None, Next::NewLine, Align::Right, false);
        }
        due_rows(canvas, view, FONT, 9.0, 4.0);
        canvas.ln(5.0);

        // Client
        canvas.set_font(FONT, FontStyle::Regular, 10.0);
        canvas.set_text_color(Color::gray(50));
        for line in view.client_lines() {
            canvas.cell(0.0, 5.0, &line, Border::None, Next::NewLine, Align::Left, false);
        }
        canvas.ln(15.0);

        // Items
        let (desc_w, qty_w, amount_w) = if view.show_quantity {
            (90.0, 40.0, 40.0)
        } else {
            (130.0, 0.0, 40.0)
        };
        canvas.set_draw_color(Color::gray(240));
        for row in &view.rows {
            canvas.set_font(FONT, FontStyle::Bold, 12.0);
            canvas.cell(desc_w, 8.0, &row.description, Border::None, Next::Right, Align::Left, false);
            if view.show_quantity {
                canvas.set_font(FONT, FontStyle::Regular, 10.0);
                let quantity = row.quantity.as_deref().unwrap_or("");
                canvas.cell(qty_w, 8.0, quantity, Border::None, Next::Right, Align::Center, false);
            }
            canvas.set_font(FONT, FontStyle::Regular, 12.0);
            canvas.cell(amount_w, 8.0, &view.money(&row.amount), Border::None, Next::NewLine, Align::Right, false);
            let y = canvas.y();
            canvas.line(LEFT, y, RIGHT, y);
            canvas.ln(2.0);
        }
        canvas.ln(5.0);

        // Totals
        let label_w = desc_w + qty_w;
        canvas.set_font(FONT, FontStyle::Regular, 10.0);
        for line in [&view.subtotal, &view.discount, &view.tax] {
            canvas.cell(label_w, 8.0, &line.label, Border::None, Next::Right, Align::Left, false);
            canvas.cell(amount_w, 8.0, &view.money(&line.amount), Border::None, Next::NewLine, Align::Right, false);
        }
        canvas.ln(5.0);
        canvas.set_font(FONT, FontStyle::Bold, 20.0);
        canvas.cell(label_w, 10.0, "Total", Border::None, Next::Right, Align::Left, false);
        let total = view.money(&view.grand_total.amount);
        canvas.cell(amount_w, 10.0, &total, Border::None, Next::NewLine, Align::Right, false);

        footer(canvas, view, FONT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_view;

    #[test]
    fn test_minimalist_prints_every_field() {
        let view = sample_view();
        let mut canvas = PdfCanvas::new();
        MinimalistLayout.draw(&mut canvas, &view);
        let text = canvas.text_runs();

        for expected in [
            "invoice.",
            "Tech Solutions Inc.",
            "Invoice #1000",
            "Due: 15-02-2026",
            "PENDING",
            "Acme",
            "Phone: 5551234567",
            "1/4 Kg",
            "Subtotal",
            "Total",
            "Rs. 2.36",
            "Thank you for your business",
        ] {
            assert!(text.iter().any(|t| t.contains(expected)), "missing {expected}: {text:?}");
        }
    }

    #[test]
    fn test_minimalist_not_pending_prints_no_marker() {
        let mut view = sample_view();
        view.pending = false;
        view.due_date = None;
        let mut canvas = PdfCanvas::new();
        MinimalistLayout.draw(&mut canvas, &view);
        let text = canvas.text_runs();
        assert!(!text.iter().any(|t| t == "PENDING" || t.starts_with("Due:")));
    }
}
