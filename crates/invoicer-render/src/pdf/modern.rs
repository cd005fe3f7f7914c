//! Modern: large brand-coloured `INVOICE` title, FROM/TO columns and a
//! table with a filled header and zebra rows.

use invoicer_core::PdfStyle;

use super::canvas::{Align, Border, Color, Next, PdfCanvas};
use super::metrics::{Family, FontStyle};
use super::{due_rows, footer, LayoutStrategy};
use crate::view::InvoiceView;

const FONT: Family = Family::Helvetica;

pub struct ModernLayout;

impl LayoutStrategy for ModernLayout {
    fn style(&self) -> PdfStyle {
        PdfStyle::Modern
    }

    fn draw(&self, canvas: &mut PdfCanvas, view: &InvoiceView) {
        let brand = Color::from(view.business.brand);

        // Header
        if let Some(logo) = &view.logo {
            canvas.image(logo, 10.0, 8.0, 40.0);
        }
        canvas.set_font(FONT, FontStyle::Bold, 24.0);
        canvas.set_text_color(brand);
        canvas.cell(0.0, 15.0, "INVOICE", Border::None, Next::NewLine, Align::Right, false);

        canvas.set_font(FONT, FontStyle::Regular, 10.0);
        canvas.set_text_color(Color::gray(100));
        let mut details = Vec::new();
        if let Some(gst) = &view.business.gst_number {
            details.push(format!("GST No: {}", gst));
        }
        details.push(format!("#{}", view.invoice_id));
        details.push(format!("Date: {}", view.issue_date));
        for line in &details {
            canvas.cell(0.0, 5.0, line, Border::None, Next::NewLine, Align::Right, false);
        }
        due_rows(canvas, view, FONT, 10.0, 5.0);
        canvas.ln(10.0);

        // FROM / TO
        canvas.set_font(FONT, FontStyle::Bold, 12.0);
        canvas.set_text_color(Color::BLACK);
        canvas.cell(95.0, 7.0, "FROM:", Border::None, Next::Right, Align::Left, false);
        canvas.cell(95.0, 7.0, "TO:", Border::None, Next::NewLine, Align::Left, false);

        canvas.set_font(FONT, FontStyle::Regular, 10.0);
        let (x, y) = (canvas.x(), canvas.y());
        canvas.multi_cell(90.0, 5.0, &view.business_lines().join("\n"), Align::Left);
        let left_bottom = canvas.y();
        canvas.set_xy(x + 95.0, y);
        canvas.multi_cell(90.0, 5.0, &view.client_lines().join("\n"), Align::Left);
        canvas.set_y(left_bottom.max(canvas.y()));
        canvas.ln(10.0);

        // Items
        let (desc_w, qty_w, amount_w) = if view.show_quantity {
            (90.0, 50.0, 50.0)
        } else {
            (140.0, 0.0, 50.0)
        };
        canvas.set_fill_color(brand);
        canvas.set_text_color(Color::WHITE);
        canvas.set_font(FONT, FontStyle::Bold, 12.0);
        canvas.cell(desc_w, 10.0, " Description", Border::None, Next::Right, Align::Left, true);
        if view.show_quantity {
            canvas.cell(qty_w, 10.0, "Quantity", Border::None, Next::Right, Align::Center, true);
        }
        let price_header = format!("Price ({}) ", view.currency);
        canvas.cell(amount_w, 10.0, &price_header, Border::None, Next::NewLine, Align::Right, true);

        canvas.set_text_color(Color::BLACK);
        canvas.set_font(FONT, FontStyle::Regular, 10.0);
        canvas.set_fill_color(Color::gray(245));
        for (i, row) in view.rows.iter().enumerate() {
            let zebra = i % 2 == 1;
            canvas.cell(desc_w, 10.0, &format!(" {}", row.description), Border::None, Next::Right, Align::Left, zebra);
            if view.show_quantity {
                let quantity = row.quantity.as_deref().unwrap_or("");
                canvas.cell(qty_w, 10.0, quantity, Border::None, Next::Right, Align::Center, zebra);
            }
            let amount = format!("{} ", view.money(&row.amount));
            canvas.cell(amount_w, 10.0, &amount, Border::None, Next::NewLine, Align::Right, zebra);
        }
        canvas.ln(5.0);

        // Totals
        for line in [&view.subtotal, &view.discount, &view.tax] {
            canvas.cell(140.0, 7.0, &line.label, Border::None, Next::Right, Align::Right, false);
            canvas.cell(50.0, 7.0, &view.money(&line.amount), Border::None, Next::NewLine, Align::Right, false);
        }
        canvas.set_font(FONT, FontStyle::Bold, 14.0);
        canvas.set_text_color(brand);
        canvas.cell(140.0, 10.0, "GRAND TOTAL", Border::None, Next::Right, Align::Right, false);
        let total = view.money(&view.grand_total.amount);
        canvas.cell(50.0, 10.0, &total, Border::None, Next::NewLine, Align::Right, false);

        footer(canvas, view, FONT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_view;

    #[test]
    fn test_modern_prints_every_field() {
        let view = sample_view();
        let mut canvas = PdfCanvas::new();
        ModernLayout.draw(&mut canvas, &view);
        let text = canvas.text_runs();

        for expected in [
            "INVOICE",
            "#1000",
            "Date: 01-02-2026",
            "Due: 15-02-2026",
            "PENDING",
            "Quantity",
            "1/4 Kg",
            "Subtotal",
            "Discount (10%)",
            "Tax(GST) (5%)",
            "GRAND TOTAL",
            "Rs. 2.36",
            "Thank you",
        ] {
            assert!(text.iter().any(|t| t.contains(expected)), "missing {expected}: {text:?}");
        }
    }
}
