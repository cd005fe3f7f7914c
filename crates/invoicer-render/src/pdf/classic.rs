//! Classic: serif letterhead centred under a brand-coloured bar, labelled
//! client lines and a table ruled with bottom borders.

use invoicer_core::PdfStyle;

use super::canvas::{Align, Border, Color, Next, Paint, PdfCanvas, PAGE_WIDTH};
use super::metrics::{Family, FontStyle};
use super::{due_rows, footer, LayoutStrategy};
use crate::view::InvoiceView;

const FONT: Family = Family::Times;

pub struct ClassicLayout;

impl LayoutStrategy for ClassicLayout {
    fn style(&self) -> PdfStyle {
        PdfStyle::Classic
    }

    fn draw(&self, canvas: &mut PdfCanvas, view: &InvoiceView) {
        let brand = Color::from(view.business.brand);

        // Letterhead
        canvas.set_fill_color(brand);
        canvas.rect(0.0, 0.0, PAGE_WIDTH, 40.0, Paint::Fill);
        if let Some(logo) = &view.logo {
            canvas.image(logo, 15.0, 5.0, 35.0);
        }

        canvas.set_y(45.0);
        canvas.set_text_color(Color::BLACK);
        canvas.set_font(FONT, FontStyle::Bold, 20.0);
        canvas.cell(0.0, 10.0, &view.business.name, Border::None, Next::NewLine, Align::Center, false);
        canvas.set_font(FONT, FontStyle::Italic, 10.0);
        let contact: Vec<&str> = [&view.business.address, &view.business.email, &view.business.phone]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .collect();
        if !contact.is_empty() {
            canvas.cell(0.0, 5.0, &contact.join("  |  "), Border::None, Next::NewLine, Align::Center, false);
        }

        canvas.ln(5.0);
        canvas.set_draw_color(Color::BLACK);
        let y = canvas.y();
        canvas.line(20.0, y, 190.0, y);
        canvas.ln(10.0);

        // Client and invoice details
        canvas.set_font(FONT, FontStyle::Regular, 12.0);
        let client = &view.client;
        let mut lines = vec![format!("Billed To: {}", client.name)];
        if let Some(address) = &client.address {
            lines.push(format!("Address: {}", address));
        }
        if let Some(email) = &client.email {
            lines.push(format!("Email: {}", email));
        }
        if let Some(phone) = &client.phone {
            lines.push(format!("Phone: {}", phone));
        }
        for line in &lines {
            canvas.cell(0.0, 6.0, line, Border::None, Next::NewLine, Align::Left, false);
        }

        let mut details = Vec::new();
        if let Some(gst) = &view.business.gst_number {
            details.push(format!("GST No: {}", gst));
        }
        details.push(format!("Invoice: #{}", view.invoice_id));
        details.push(format!("Date: {}", view.issue_date));
        for line in &details {
            canvas.cell(0.0, 6.0, line, Border::None, Next::NewLine, Align::Right, false);
        }
        due_rows(canvas, view, FONT, 12.0, 6.0);
        canvas.set_text_color(Color::BLACK);
        canvas.ln(10.0);

        // Items
        let (desc_w, qty_w, amount_w) = if view.show_quantity {
            (90.0, 40.0, 60.0)
        } else {
            (150.0, 0.0, 40.0)
        };
        canvas.set_font(FONT, FontStyle::Bold, 12.0);
        canvas.cell(desc_w, 10.0, "Item", Border::Bottom, Next::Right, Align::Left, false);
        if view.show_quantity {
            canvas.cell(qty_w, 10.0, "Quantity", Border::Bottom, Next::Right, Align::Center, false);
        }
        let cost_header = format!("Cost ({})", view.currency);
        canvas.cell(amount_w, 10.0, &cost_header, Border::Bottom, Next::NewLine, Align::Right, false);

        canvas.set_font(FONT, FontStyle::Regular, 12.0);
        for row in &view.rows {
            canvas.cell(desc_w, 8.0, &row.description, Border::Bottom, Next::Right, Align::Left, false);
            if view.show_quantity {
                let quantity = row.quantity.as_deref().unwrap_or("");
                canvas.cell(qty_w, 8.0, quantity, Border::Bottom, Next::Right, Align::Center, false);
            }
            canvas.cell(amount_w, 8.0, &view.money(&row.amount), Border::Bottom, Next::NewLine, Align::Right, false);
        }
        canvas.ln(5.0);

        // Totals
        for line in [&view.subtotal, &view.discount, &view.tax] {
            canvas.cell(150.0, 6.0, &line.label, Border::None, Next::Right, Align::Right, false);
            canvas.cell(40.0, 6.0, &view.money(&line.amount), Border::None, Next::NewLine, Align::Right, false);
        }
        canvas.ln(5.0);
        canvas.set_font(FONT, FontStyle::Bold, 16.0);
        let total = format!("{}: {}", view.grand_total.label, view.money(&view.grand_total.amount));
        canvas.cell(0.0, 10.0, &total, Border::None, Next::NewLine, Align::Right, false);

        footer(canvas, view, FONT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_view;

    #[test]
    fn test_classic_prints_every_field() {
        let view = sample_view();
        let mut canvas = PdfCanvas::new();
        ClassicLayout.draw(&mut canvas, &view);
        let text = canvas.text_runs();

        for expected in [
            "Tech Solutions Inc.",
            "Billed To: Acme",
            "Phone: 5551234567",
            "GST No: 22AAAAA0000A1Z5",
            "Invoice: #1000",
            "Due: 15-02-2026",
            "PENDING",
            "Cost (Rs.)",
            "Subtotal",
            "Grand Total: Rs. 2.36",
            "Notes: Pay by bank transfer",
        ] {
            assert!(text.iter().any(|t| t.contains(expected)), "missing {expected}: {text:?}");
        }
    }

    #[test]
    fn test_classic_without_quantities_has_no_column() {
        let mut view = sample_view();
        view.show_quantity = false;
        view.rows.iter_mut().for_each(|r| r.quantity = None);
        let mut canvas = PdfCanvas::new();
        ClassicLayout.draw(&mut canvas, &view);
        assert!(!canvas.text_runs().iter().any(|t| t == "Quantity"));
    }
}
