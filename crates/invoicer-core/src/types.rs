//! # Domain Types
//!
//! The canonical data model every other crate consumes.
//!
//! ```text
//! ┌──────────────────┐        ┌───────────────────────────────────────────┐
//! │ BusinessProfile  │        │ InvoiceRecord                             │
//! │  id, branding,   │        │  id, dates, pending, client, notes        │
//! │  lastInvoiceNo.  │        │  items: [LineItem]  rates  totals         │
//! └────────┬─────────┘        └──────────────────┬────────────────────────┘
//!          │ profileId                           │ snapshot
//!          └──────────────►  HistoryRecord  ◄────┘
//! ```
//!
//! Field names serialize in camelCase. Optional fields are written as
//! `null` rather than skipped so the JSON files always show every key.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::calc::Totals;
use crate::quantity::{Quantity, Unit};

// =============================================================================
// PDF Style
// =============================================================================

/// One of the four fixed PDF layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PdfStyle {
    /// Brand-colored header band and table, right-aligned details.
    #[default]
    Modern,
    /// Serif, centered letterhead with a colored top bar.
    Classic,
    /// Monospace, boxed grid with a page border.
    Industrial,
    /// Colored edge strip, borderless rows.
    Minimalist,
}

impl PdfStyle {
    pub const ALL: [PdfStyle; 4] = [
        PdfStyle::Modern,
        PdfStyle::Classic,
        PdfStyle::Industrial,
        PdfStyle::Minimalist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PdfStyle::Modern => "modern",
            PdfStyle::Classic => "classic",
            PdfStyle::Industrial => "industrial",
            PdfStyle::Minimalist => "minimalist",
        }
    }
}

impl fmt::Display for PdfStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PdfStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "modern" => Ok(PdfStyle::Modern),
            "classic" => Ok(PdfStyle::Classic),
            "industrial" => Ok(PdfStyle::Industrial),
            "minimalist" => Ok(PdfStyle::Minimalist),
            other => Err(format!(
                "unknown style '{}' (expected modern, classic, industrial or minimalist)",
                other
            )),
        }
    }
}

// =============================================================================
// Business Profile
// =============================================================================

/// One business identity the user invoices as.
///
/// `style_name` is a cosmetic tag kept for display; documents use the
/// renderer's configured style unless one is chosen explicitly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessProfile {
    pub id: String,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,

    /// Exactly 15 characters when present.
    pub gst_number: Option<String>,

    /// Printed small and centered at the bottom of every page.
    pub watermark_text: Option<String>,

    /// `#RRGGBB`
    pub color_hex: String,

    pub style_name: String,

    /// Path of the copy owned by the data directory.
    pub logo_path: Option<String>,

    pub saved_notes_template: Option<String>,

    /// Last number used on a saved document. Only ever increases.
    #[ts(type = "number")]
    pub last_invoice_number: u64,
}

impl BusinessProfile {
    /// Number the next invoice would get. Does not reserve it.
    pub fn next_invoice_number(&self) -> u64 {
        self.last_invoice_number + 1
    }

    /// Brand color as RGB, black when the stored hex is malformed.
    pub fn brand_rgb(&self) -> (u8, u8, u8) {
        crate::validation::parse_hex_color(&self.color_hex).unwrap_or((0, 0, 0))
    }
}

// =============================================================================
// Client
// =============================================================================

/// Who the invoice is addressed to. Only the name is mandatory.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct ClientInfo {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of the invoice table.
///
/// `description` is the item's key within an invoice (case-insensitive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LineItemRepr", into = "LineItemRepr")]
pub struct LineItem {
    pub description: String,
    pub price_per_unit: f64,
    pub quantity: Option<Quantity>,
}

impl LineItem {
    /// An item billed as a flat amount.
    pub fn flat(description: impl Into<String>, price: f64) -> Self {
        Self {
            description: description.into(),
            price_per_unit: price,
            quantity: None,
        }
    }

    /// An item billed per unit.
    pub fn with_quantity(description: impl Into<String>, price_per_unit: f64, quantity: Quantity) -> Self {
        Self {
            description: description.into(),
            price_per_unit,
            quantity: Some(quantity),
        }
    }

    /// `quantity * pricePerUnit`, or the price itself when there is no quantity.
    pub fn total_price(&self) -> f64 {
        match &self.quantity {
            Some(q) => q.value * self.price_per_unit,
            None => self.price_per_unit,
        }
    }

    pub fn matches(&self, description: &str) -> bool {
        self.description.trim().to_lowercase() == description.trim().to_lowercase()
    }
}

/// On-disk shape of a line item. `totalPrice` is written for readers of the
/// JSON file but recomputed on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemRepr {
    description: String,
    price_per_unit: f64,
    #[serde(default)]
    quantity_value: Option<f64>,
    #[serde(default)]
    quantity_display: Option<String>,
    #[serde(default)]
    unit: Option<Unit>,
    #[serde(default)]
    total_price: f64,
}

impl From<LineItemRepr> for LineItem {
    fn from(repr: LineItemRepr) -> Self {
        let quantity = repr.quantity_value.map(|value| Quantity {
            value,
            display: repr.quantity_display.unwrap_or_else(|| value.to_string()),
            unit: repr.unit.unwrap_or_default(),
        });
        LineItem {
            description: repr.description,
            price_per_unit: repr.price_per_unit,
            quantity,
        }
    }
}

impl From<LineItem> for LineItemRepr {
    fn from(item: LineItem) -> Self {
        let total_price = item.total_price();
        let (quantity_value, quantity_display, unit) = match item.quantity {
            Some(q) => (Some(q.value), Some(q.display), Some(q.unit)),
            None => (None, None, None),
        };
        LineItemRepr {
            description: item.description,
            price_per_unit: item.price_per_unit,
            quantity_value,
            quantity_display,
            unit,
            total_price,
        }
    }
}

// =============================================================================
// Invoice Record
// =============================================================================

/// How the due-date area of a document reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    /// Neither a due date nor pending: nothing is printed.
    None,
    /// `Due: <date>`
    DateOnly,
    /// `PENDING` marker only.
    PendingOnly,
    /// `Due: <date>` followed by a separate `PENDING` marker.
    DateThenPending,
}

/// A finalized invoice: the single input of every renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub id: String,

    /// `dd-mm-YYYY`
    pub issue_date: String,

    #[serde(default)]
    pub due_date: Option<String>,

    #[serde(default)]
    pub pending: bool,

    pub client: ClientInfo,

    #[serde(default)]
    pub notes: Option<String>,

    pub items: Vec<LineItem>,

    #[serde(default)]
    pub discount_rate: f64,

    #[serde(default)]
    pub tax_rate: f64,

    pub totals: Totals,
}

impl InvoiceRecord {
    pub fn due_status(&self) -> DueStatus {
        let has_due = self
            .due_date
            .as_deref()
            .map(|d| !d.trim().is_empty())
            .unwrap_or(false);
        match (has_due, self.pending) {
            (true, true) => DueStatus::DateThenPending,
            (false, true) => DueStatus::PendingOnly,
            (true, false) => DueStatus::DateOnly,
            (false, false) => DueStatus::None,
        }
    }

    /// True when at least one item carries a quantity.
    pub fn has_quantities(&self) -> bool {
        self.items.iter().any(|item| item.quantity.is_some())
    }
}

// =============================================================================
// History Record
// =============================================================================

/// A saved invoice, owned by one profile. Never edited after it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub profile_id: String,

    /// Profile name at the time of saving.
    #[serde(default)]
    pub business_name: String,

    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub invoice: InvoiceRecord,
}

impl HistoryRecord {
    pub fn new(profile: &BusinessProfile, invoice: InvoiceRecord, saved_at: DateTime<Utc>) -> Self {
        Self {
            profile_id: profile.id.clone(),
            business_name: profile.name.clone(),
            saved_at: Some(saved_at),
            invoice,
        }
    }

    /// Case-insensitive substring match on invoice id or client name.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.invoice.id.to_lowercase().contains(&term)
            || self.invoice.client.name.to_lowercase().contains(&term)
    }
}

// =============================================================================
// Built-in Profiles
// =============================================================================

/// Ids of the four profiles every installation starts with.
pub const DEFAULT_PROFILE_IDS: [&str; 4] = ["biz_1", "biz_2", "biz_3", "biz_4"];

/// The four built-in profiles, in id order.
pub fn default_profiles() -> Vec<BusinessProfile> {
    let seed = |id: &str,
                name: &str,
                address: &str,
                email: &str,
                phone: &str,
                color: &str,
                style: &str,
                last: u64| BusinessProfile {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        gst_number: None,
        watermark_text: None,
        color_hex: color.to_string(),
        style_name: style.to_string(),
        logo_path: None,
        saved_notes_template: None,
        last_invoice_number: last,
    };

    vec![
        seed(
            "biz_1",
            "Tech Solutions Inc.",
            "123 Silicon Valley, CA",
            "contact@techsolutions.com",
            "+1 (555) 123-4567",
            "#1e40af",
            "Modern",
            1000,
        ),
        seed(
            "biz_2",
            "Green Earth Gardens",
            "45 Nature Way, Oregon",
            "info@greenearth.com",
            "+1 (555) 987-6543",
            "#059669",
            "Classic",
            2000,
        ),
        seed(
            "biz_3",
            "Express Logistics",
            "88 Cargo Blvd, NY",
            "ops@expresslogistics.com",
            "+1 (555) 456-7890",
            "#ec4899",
            "Industrial",
            3000,
        ),
        seed(
            "biz_4",
            "Creative Studio",
            "99 Design Ave, London",
            "hello@creativestudio.uk",
            "+44 20 7123 4567",
            "#7c3aed",
            "Minimalist",
            4000,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::compute;
    use crate::quantity::parse_quantity;

    fn test_record(due: Option<&str>, pending: bool) -> InvoiceRecord {
        let items = vec![LineItem::flat("Labor", 100.0)];
        InvoiceRecord {
            id: "1001".to_string(),
            issue_date: "01-02-2026".to_string(),
            due_date: due.map(str::to_string),
            pending,
            client: ClientInfo {
                name: "Acme".to_string(),
                ..ClientInfo::default()
            },
            notes: None,
            totals: compute(&items, 0.0, 0.0),
            items,
            discount_rate: 0.0,
            tax_rate: 0.0,
        }
    }

    #[test]
    fn test_due_status_tri_state() {
        assert_eq!(test_record(Some("10-02-2026"), true).due_status(), DueStatus::DateThenPending);
        assert_eq!(test_record(None, true).due_status(), DueStatus::PendingOnly);
        assert_eq!(test_record(Some("10-02-2026"), false).due_status(), DueStatus::DateOnly);
        assert_eq!(test_record(None, false).due_status(), DueStatus::None);
        assert_eq!(test_record(Some("  "), false).due_status(), DueStatus::None);
    }

    #[test]
    fn test_line_item_total() {
        let flat = LineItem::flat("Setup", 50.0);
        assert_eq!(flat.total_price(), 50.0);

        let q = Quantity::new(parse_quantity("1/4").unwrap(), Unit::Kg);
        let item = LineItem::with_quantity("Widget", 10.0, q);
        assert_eq!(item.total_price(), 2.5);
    }

    #[test]
    fn test_line_item_json_shape() {
        let q = Quantity::new(parse_quantity("1/2").unwrap(), Unit::Kg);
        let item = LineItem::with_quantity("Rice", 80.0, q);
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["description"], "Rice");
        assert_eq!(json["pricePerUnit"], 80.0);
        assert_eq!(json["quantityValue"], 0.5);
        assert_eq!(json["quantityDisplay"], "1/2");
        assert_eq!(json["unit"], "Kg");
        assert_eq!(json["totalPrice"], 40.0);

        let back: LineItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_line_item_total_recomputed_on_load() {
        let json = serde_json::json!({
            "description": "Labor",
            "pricePerUnit": 100.0,
            "totalPrice": 9999.0
        });
        let item: LineItem = serde_json::from_value(json).unwrap();
        assert!(item.quantity.is_none());
        assert_eq!(item.total_price(), 100.0);
    }

    #[test]
    fn test_profile_optional_fields_serialize_as_null() {
        let profile = &default_profiles()[0];
        let json = serde_json::to_value(profile).unwrap();
        assert!(json["watermarkText"].is_null());
        assert!(json.get("gstNumber").is_some());
        assert_eq!(json["lastInvoiceNumber"], 1000);
    }

    #[test]
    fn test_default_profiles() {
        let profiles = default_profiles();
        let ids: Vec<_> = profiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, DEFAULT_PROFILE_IDS);
        assert_eq!(profiles[2].brand_rgb(), (0xec, 0x48, 0x99));
        assert_eq!(profiles[3].next_invoice_number(), 4001);
    }

    #[test]
    fn test_history_record_flattens_invoice() {
        let profile = &default_profiles()[1];
        let saved = HistoryRecord::new(profile, test_record(None, true), Utc::now());
        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["profileId"], "biz_2");
        assert_eq!(json["id"], "1001");
        assert_eq!(json["pending"], true);

        let back: HistoryRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, saved);
    }

    #[test]
    fn test_history_matches() {
        let saved = HistoryRecord::new(&default_profiles()[0], test_record(None, false), Utc::now());
        assert!(saved.matches(""));
        assert!(saved.matches("acm"));
        assert!(saved.matches("100"));
        assert!(!saved.matches("globex"));
    }

    #[test]
    fn test_pdf_style_parse() {
        assert_eq!("Classic".parse::<PdfStyle>(), Ok(PdfStyle::Classic));
        assert!("fancy".parse::<PdfStyle>().is_err());
        assert_eq!(PdfStyle::default(), PdfStyle::Modern);
    }
}
