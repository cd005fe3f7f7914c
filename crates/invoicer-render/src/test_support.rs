//! Fixtures shared by the layout and renderer tests.

use invoicer_core::quantity::parse_quantity;
use invoicer_core::{
    default_profiles, BusinessProfile, Calculator, ClientInfo, InvoiceRecord, LineItem, Quantity,
    Unit,
};
use invoicer_core::money::CURRENCY_ASCII;

use crate::sanitize::TextPolicy;
use crate::view::InvoiceView;

/// Tech Solutions with a GST number and watermark.
pub fn sample_profile() -> BusinessProfile {
    let mut profile = default_profiles().remove(0);
    profile.gst_number = Some("22AAAAA0000A1Z5".to_string());
    profile.watermark_text = Some("Thank you for your business".to_string());
    profile
}

/// Acme, 1/4 Kg widget at 10 plus a flat setup fee, 10% off, 5% tax,
/// due date set and pending.
pub fn sample_record() -> InvoiceRecord {
    let widget = LineItem::with_quantity(
        "Widget",
        10.0,
        Quantity::new(parse_quantity("1/4").unwrap(), Unit::Kg),
    );
    let items = vec![widget, LineItem::flat("Setup", 5.0)];
    let totals = Calculator::default().compute(&items, 10.0, 5.0);
    InvoiceRecord {
        id: "1000".to_string(),
        issue_date: "01-02-2026".to_string(),
        due_date: Some("15-02-2026".to_string()),
        pending: true,
        client: ClientInfo {
            name: "Acme".to_string(),
            email: Some("buyer@acme.com".to_string()),
            phone: Some("5551234567".to_string()),
            address: Some("1 Market Road".to_string()),
        },
        notes: Some("Pay by bank transfer".to_string()),
        items,
        discount_rate: 10.0,
        tax_rate: 5.0,
        totals,
    }
}

/// Single-item version of [`sample_record`] matching the worked example
/// (grand total 2.3625).
pub fn widget_record() -> InvoiceRecord {
    let mut record = sample_record();
    record.items.truncate(1);
    record.totals = Calculator::default().compute(&record.items, 10.0, 5.0);
    record
}

pub fn sample_view() -> InvoiceView {
    InvoiceView::build(&widget_record(), &sample_profile(), TextPolicy::PdfAscii, CURRENCY_ASCII)
}
