//! Industrial: monospace type inside a boxed page frame, upper-case labels
//! and a fully gridded table.

use invoicer_core::PdfStyle;

use super::canvas::{Align, Border, Color, Next, Paint, PdfCanvas};
use super::metrics::{Family, FontStyle};
use super::{footer, LayoutStrategy};
use crate::view::InvoiceView;

const FONT: Family = Family::Courier;
const TABLE_TOP: f64 = 95.0;

pub struct IndustrialLayout;

impl LayoutStrategy for IndustrialLayout {
    fn style(&self) -> PdfStyle {
        PdfStyle::Industrial
    }

    fn draw(&self, canvas: &mut PdfCanvas, view: &InvoiceView) {
        // Frame and header box
        canvas.set_line_width(0.5);
        canvas.set_draw_color(Color::BLACK);
        canvas.rect(5.0, 5.0, 200.0, 287.0, Paint::Stroke);
        canvas.rect(5.0, 5.0, 200.0, 50.0, Paint::Stroke);
        if let Some(logo) = &view.logo {
            canvas.image(logo, 10.0, 10.0, 30.0);
        }

        canvas.set_text_color(Color::BLACK);
        canvas.set_xy(40.0, 10.0);
        canvas.set_font(FONT, FontStyle::Bold, 22.0);
        canvas.cell(100.0, 10.0, &view.business.name.to_uppercase(), Border::None, Next::Right, Align::Left, false);

        let contact: Vec<&str> = [&view.business.address, &view.business.email, &view.business.phone]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .collect();
        canvas.set_xy(40.0, 20.0);
        canvas.set_font(FONT, FontStyle::Regular, 10.0);
        canvas.multi_cell(120.0, 4.0, &contact.join("\n"), Align::Left);

        // Bill-to on the left, details on the right
        canvas.set_xy(10.0, 58.0);
        canvas.set_font(FONT, FontStyle::Bold, 12.0);
        canvas.cell(60.0, 5.0, "BILL TO:", Border::None, Next::NewLine, Align::Left, false);
        canvas.set_font(FONT, FontStyle::Regular, 10.0);
        let client = &view.client;
        let bill_to: Vec<String> = std::iter::once(client.name.clone())
            .chain(client.address.clone())
            .chain(client.email.clone())
            .chain(client.phone.as_ref().map(|p| format!("Phone: {}", p)))
            .collect();
        canvas.multi_cell(90.0, 4.0, &bill_to.join("\n"), Align::Left);
        let left_bottom = canvas.y();

        let mut details = vec!["DETAILS:".to_string()];
        if let Some(gst) = &view.business.gst_number {
            details.push(format!("GST No: {}", gst));
        }
        details.push(format!("ID: {}", view.invoice_id));
        details.push(format!("Date: {}", view.issue_date));
        if let Some(due) = &view.due_date {
            details.push(format!("Due: {}", due));
        }
        canvas.set_xy(107.0, 58.0);
        canvas.multi_cell(90.0, 5.0, &details.join("\n"), Align::Left);
        if view.pending {
            canvas.set_x(107.0);
            canvas.set_font(FONT, FontStyle::Bold, 10.0);
            canvas.set_text_color(Color::RED);
            canvas.cell(90.0, 5.0, "PENDING", Border::None, Next::NewLine, Align::Left, false);
            canvas.set_text_color(Color::BLACK);
        }
        canvas.set_y(TABLE_TOP.max(left_bottom.max(canvas.y()) + 5.0));

        // Items
        let (desc_w, qty_w, amount_w) = if view.show_quantity {
            (100.0, 40.0, 50.0)
        } else {
            (150.0, 0.0, 40.0)
        };
        canvas.set_fill_color(Color::gray(220));
        canvas.set_line_width(0.3);
        canvas.set_font(FONT, FontStyle::Bold, 10.0);
        canvas.cell(desc_w, 10.0, "DESCRIPTION", Border::All, Next::Right, Align::Left, true);
        if view.show_quantity {
            canvas.cell(qty_w, 10.0, "QUANTITY", Border::All, Next::Right, Align::Center, true);
        }
        let amount_header = format!("AMOUNT ({})", view.currency.to_uppercase());
        canvas.cell(amount_w, 10.0, &amount_header, Border::All, Next::NewLine, Align::Center, true);

        canvas.set_font(FONT, FontStyle::Regular, 10.0);
        for row in &view.rows {
            canvas.cell(desc_w, 10.0, &row.description, Border::All, Next::Right, Align::Left, false);
            if view.show_quantity {
                let quantity = row.quantity.as_deref().unwrap_or("");
                canvas.cell(qty_w, 10.0, quantity, Border::All, Next::Right, Align::Center, false);
            }
            canvas.cell(amount_w, 10.0, &row.amount, Border::All, Next::NewLine, Align::Right, false);
        }

        // Totals share the table grid
        let label_w = desc_w + qty_w;
        for line in [&view.subtotal, &view.discount, &view.tax] {
            canvas.cell(label_w, 10.0, &line.label.to_uppercase(), Border::All, Next::Right, Align::Right, false);
            canvas.cell(amount_w, 10.0, &line.amount, Border::All, Next::NewLine, Align::Right, false);
        }
        canvas.set_font(FONT, FontStyle::Bold, 12.0);
        canvas.cell(label_w, 10.0, "TOTAL DUE", Border::All, Next::Right, Align::Right, true);
        let total = view.money(&view.grand_total.amount);
        canvas.cell(amount_w, 10.0, &total, Border::All, Next::NewLine, Align::Right, true);

        footer(canvas, view, FONT);
    }
}
