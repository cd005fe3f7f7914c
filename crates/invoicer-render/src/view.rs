//! # Invoice View
//!
//! The shared half of every renderer. An [`InvoiceView`] is built once per
//! render from the record and its profile:
//!
//! ```text
//! InvoiceRecord + BusinessProfile
//!        │
//!        ├── text fields ──► TextPolicy (ASCII for PDF, XML-safe for Word)
//!        ├── blank optionals ──► None (never printed as empty lines)
//!        ├── totals ──► "Rs. 2.36" (two decimals, currency label)
//!        └── logo path ──► Logo (JPEG) or None
//! ```
//!
//! Layouts only place strings; they never format numbers or decide which
//! optional fields exist.

use invoicer_core::money::{format_amount, format_rate, format_with_label};
use invoicer_core::{BusinessProfile, DueStatus, InvoiceRecord};

use crate::logo::{load_logo, Logo};
use crate::sanitize::TextPolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct BusinessView {
    pub name: String,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gst_number: Option<String>,
    pub watermark: Option<String>,
    pub brand: (u8, u8, u8),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientView {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// One table row. `quantity` is `None` for flat-priced items.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub description: String,
    pub quantity: Option<String>,
    /// Two-decimal amount without the currency label.
    pub amount: String,
}

/// A labelled totals line, e.g. `("Discount (10%)", "0.25")`.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalLine {
    pub label: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceView {
    pub business: BusinessView,
    pub client: ClientView,
    pub invoice_id: String,
    pub issue_date: String,
    /// Present only when the record has a non-blank due date.
    pub due_date: Option<String>,
    pub pending: bool,
    pub rows: Vec<RowView>,
    /// False when no item has a quantity: the column is left out entirely.
    pub show_quantity: bool,
    pub subtotal: TotalLine,
    pub discount: TotalLine,
    pub tax: TotalLine,
    pub grand_total: TotalLine,
    pub notes: Option<String>,
    pub currency: String,
    pub logo: Option<Logo>,
}

impl InvoiceView {
    pub fn build(
        record: &InvoiceRecord,
        profile: &BusinessProfile,
        policy: TextPolicy,
        currency: &str,
    ) -> Self {
        let text = |s: &str| policy.apply(s);
        let optional = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| policy.apply(s))
        };

        let (due_date, pending) = match record.due_status() {
            DueStatus::None => (None, false),
            DueStatus::DateOnly => (optional(record.due_date.as_deref()), false),
            DueStatus::PendingOnly => (None, true),
            DueStatus::DateThenPending => (optional(record.due_date.as_deref()), true),
        };

        let rows = record
            .items
            .iter()
            .map(|item| RowView {
                description: text(&item.description),
                quantity: item.quantity.as_ref().map(|q| text(&q.label())),
                amount: format_amount(item.total_price()),
            })
            .collect();

        let totals = &record.totals;

        InvoiceView {
            business: BusinessView {
                name: text(&profile.name),
                address: optional(Some(&profile.address)),
                email: optional(Some(&profile.email)),
                phone: optional(Some(&profile.phone)),
                gst_number: optional(profile.gst_number.as_deref()),
                watermark: optional(profile.watermark_text.as_deref()),
                brand: profile.brand_rgb(),
            },
            client: ClientView {
                name: text(&record.client.name),
                email: optional(record.client.email.as_deref()),
                phone: optional(record.client.phone.as_deref()),
                address: optional(record.client.address.as_deref()),
            },
            invoice_id: text(&record.id),
            issue_date: text(&record.issue_date),
            due_date,
            pending,
            rows,
            show_quantity: record.has_quantities(),
            subtotal: TotalLine {
                label: "Subtotal".to_string(),
                amount: format_amount(totals.subtotal),
            },
            discount: TotalLine {
                label: format!("Discount ({}%)", format_rate(record.discount_rate)),
                amount: format_amount(totals.discount_amount),
            },
            tax: TotalLine {
                label: format!("Tax(GST) ({}%)", format_rate(record.tax_rate)),
                amount: format_amount(totals.tax_amount),
            },
            grand_total: TotalLine {
                label: "Grand Total".to_string(),
                amount: format_amount(totals.grand_total),
            },
            notes: optional(record.notes.as_deref()),
            currency: currency.to_string(),
            logo: load_logo(profile.logo_path.as_deref()),
        }
    }

    /// `Rs. 2.36`
    pub fn money(&self, amount: &str) -> String {
        format!("{} {}", self.currency, amount)
    }

    /// Formats a raw value with this view's currency label.
    pub fn money_value(&self, value: f64) -> String {
        format_with_label(&self.currency, value)
    }

    /// Business contact block, one present field per line.
    pub fn business_lines(&self) -> Vec<String> {
        let b = &self.business;
        std::iter::once(b.name.clone())
            .chain(b.address.clone())
            .chain(b.email.clone())
            .chain(b.phone.clone())
            .collect()
    }

    /// Client block: name, email, `Phone: ...`, address (present fields only).
    pub fn client_lines(&self) -> Vec<String> {
        let c = &self.client;
        std::iter::once(c.name.clone())
            .chain(c.email.clone())
            .chain(c.phone.as_ref().map(|p| format!("Phone: {}", p)))
            .chain(c.address.clone())
            .collect()
    }
}
