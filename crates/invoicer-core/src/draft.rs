//! # Invoice Draft
//!
//! The editable state behind the "new invoice" screen: client details, line
//! items and the rate text exactly as typed. A draft becomes an immutable
//! [`InvoiceRecord`] through [`InvoiceDraft::finalize`].
//!
//! ## Item Workflow
//! ```text
//! add_item("Labor", 100)  ──► [Labor 100]
//! add_item("LABOR", 120)  ──► [Labor 120]          same key, updated in place
//! add_item("Paint", 40)   ──► [Labor 120, Paint 40]
//! remove_item("labor")    ──► [Paint 40]
//! finalize(id, today)     ──► InvoiceRecord { items, totals, ... }
//! ```

use chrono::NaiveDate;
use serde::Deserialize;

use crate::calc::{parse_rate, Calculator, Totals};
use crate::error::{CoreError, CoreResult, ValidationError, ValidationResult};
use crate::money::format_rate;
use crate::quantity::{parse_quantity, Quantity, Unit};
use crate::types::{ClientInfo, InvoiceRecord, LineItem};
use crate::validation::{non_blank, parse_price, require, validate_email, validate_phone};
use crate::{DATE_FORMAT, LEGACY_PENDING_MARKER};

// =============================================================================
// Inputs
// =============================================================================

/// A number that may arrive as JSON text or as a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberText {
    Number(f64),
    Text(String),
}

impl NumberText {
    pub fn as_text(&self) -> String {
        match self {
            NumberText::Number(n) => n.to_string(),
            NumberText::Text(s) => s.clone(),
        }
    }
}

impl Default for NumberText {
    fn default() -> Self {
        NumberText::Text(String::new())
    }
}

/// One line item as typed into the editor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemInput {
    pub description: String,
    pub price: NumberText,
    /// Blank or absent means "flat amount".
    pub quantity: Option<NumberText>,
    pub unit: Option<String>,
}

impl ItemInput {
    pub fn flat(description: &str, price: &str) -> Self {
        Self {
            description: description.to_string(),
            price: NumberText::Text(price.to_string()),
            quantity: None,
            unit: None,
        }
    }

    pub fn measured(description: &str, price: &str, quantity: &str, unit: &str) -> Self {
        Self {
            description: description.to_string(),
            price: NumberText::Text(price.to_string()),
            quantity: Some(NumberText::Text(quantity.to_string())),
            unit: Some(unit.to_string()),
        }
    }

    /// Validates the input and builds the line item.
    pub fn to_line_item(&self) -> ValidationResult<LineItem> {
        require("description", &self.description)?;
        let price = parse_price(&self.price.as_text())?;

        let quantity_text = self.quantity.as_ref().map(NumberText::as_text);
        let quantity = match non_blank(quantity_text.as_deref()) {
            Some(token) => {
                let parsed = parse_quantity(token)?;
                let unit = Unit::parse(self.unit.as_deref().unwrap_or_default());
                Some(Quantity::new(parsed, unit))
            }
            None => None,
        };

        Ok(LineItem {
            description: self.description.trim().to_string(),
            price_per_unit: price,
            quantity,
        })
    }
}

/// A whole draft as read from a JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftInput {
    pub client: ClientInfo,
    pub items: Vec<ItemInput>,
    pub discount_rate: NumberText,
    pub tax_rate: NumberText,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub pending: bool,
    pub notes: Option<String>,
}

// =============================================================================
// Draft
// =============================================================================

/// Whether [`InvoiceDraft::add_item`] inserted or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemChange {
    Added,
    Updated,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceDraft {
    pub client: ClientInfo,
    pub items: Vec<LineItem>,
    /// Rate text as typed. Unparseable text counts as 0.
    pub discount_rate: String,
    pub tax_rate: String,
    /// `dd-mm-YYYY`; blank means "today" at finalization.
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub pending: bool,
    pub notes: Option<String>,
}

impl InvoiceDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a draft from file input, applying every item in order.
    /// Later items with a repeated description replace earlier ones.
    pub fn from_input(input: DraftInput) -> ValidationResult<Self> {
        let mut draft = InvoiceDraft {
            client: input.client,
            items: Vec::with_capacity(input.items.len()),
            discount_rate: input.discount_rate.as_text(),
            tax_rate: input.tax_rate.as_text(),
            issue_date: input.issue_date,
            due_date: input.due_date,
            pending: input.pending,
            notes: input.notes,
        };
        for item in &input.items {
            draft.add_item(item)?;
        }
        Ok(draft)
    }

    /// Reopens a saved invoice for re-issue.
    pub fn from_record(record: &InvoiceRecord) -> Self {
        let (due_date, pending) = match record.due_date.as_deref() {
            Some(LEGACY_PENDING_MARKER) => (None, true),
            other => (other.map(str::to_string), record.pending),
        };
        InvoiceDraft {
            client: record.client.clone(),
            items: record.items.clone(),
            discount_rate: format_rate(record.discount_rate),
            tax_rate: format_rate(record.tax_rate),
            issue_date: Some(record.issue_date.clone()),
            due_date,
            pending,
            notes: record.notes.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Item editing
    // -------------------------------------------------------------------------

    /// Adds an item, or updates the price and quantity of the one with the
    /// same description (case-insensitive). The first spelling of the
    /// description is kept. A validation failure leaves the draft untouched.
    pub fn add_item(&mut self, input: &ItemInput) -> ValidationResult<ItemChange> {
        let item = input.to_line_item()?;
        match self.items.iter_mut().find(|i| i.matches(&item.description)) {
            Some(existing) => {
                existing.price_per_unit = item.price_per_unit;
                existing.quantity = item.quantity;
                Ok(ItemChange::Updated)
            }
            None => {
                self.items.push(item);
                Ok(ItemChange::Added)
            }
        }
    }

    pub fn remove_item(&mut self, description: &str) -> CoreResult<LineItem> {
        let index = self
            .items
            .iter()
            .position(|i| i.matches(description))
            .ok_or_else(|| CoreError::ItemNotFound(description.to_string()))?;
        Ok(self.items.remove(index))
    }

    /// Looks up an item for editing.
    pub fn item(&self, description: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.matches(description))
    }

    pub fn clear_items(&mut self) {
        self.items.clear();
    }

    /// Running totals for display while editing.
    pub fn preview_totals(&self, calculator: &Calculator) -> Totals {
        calculator.compute(
            &self.items,
            parse_rate(&self.discount_rate),
            parse_rate(&self.tax_rate),
        )
    }

    // -------------------------------------------------------------------------
    // Finalization
    // -------------------------------------------------------------------------

    /// Validates the draft and freezes it into a record.
    ///
    /// ## Rules
    /// - at least one item
    /// - client name present
    /// - client email / phone, when given, must be valid
    /// - blank issue date becomes `today`
    pub fn finalize(
        &self,
        invoice_id: impl Into<String>,
        today: NaiveDate,
        calculator: &Calculator,
    ) -> CoreResult<InvoiceRecord> {
        if self.items.is_empty() {
            return Err(ValidationError::EmptyInvoice.into());
        }
        require("client name", &self.client.name)?;

        let email = non_blank(self.client.email.as_deref());
        if let Some(email) = email {
            validate_email("client email", email)?;
        }
        let phone = non_blank(self.client.phone.as_deref());
        if let Some(phone) = phone {
            validate_phone("client phone", phone)?;
        }

        let (discount_rate, tax_rate) =
            calculator.effective_rates(parse_rate(&self.discount_rate), parse_rate(&self.tax_rate));
        let totals = calculator.compute(&self.items, discount_rate, tax_rate);

        let issue_date = non_blank(self.issue_date.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| today.format(DATE_FORMAT).to_string());

        Ok(InvoiceRecord {
            id: invoice_id.into(),
            issue_date,
            due_date: non_blank(self.due_date.as_deref()).map(str::to_string),
            pending: self.pending,
            client: ClientInfo {
                name: self.client.name.trim().to_string(),
                email: email.map(str::to_string),
                phone: phone.map(str::to_string),
                address: non_blank(self.client.address.as_deref()).map(str::to_string),
            },
            notes: non_blank(self.notes.as_deref()).map(str::to_string),
            items: self.items.clone(),
            discount_rate,
            tax_rate,
            totals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::RatePolicy;
    use crate::money::format_amount;

    fn test_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    fn test_draft() -> InvoiceDraft {
        let mut draft = InvoiceDraft::new();
        draft.client.name = "Acme".to_string();
        draft
            .add_item(&ItemInput::measured("Widget", "10", "1/4", "Kg"))
            .unwrap();
        draft.discount_rate = "10".to_string();
        draft.tax_rate = "5".to_string();
        draft
    }

    #[test]
    fn test_readding_item_updates_single_entry() {
        let mut draft = InvoiceDraft::new();
        assert_eq!(draft.add_item(&ItemInput::flat("Labor", "100")), Ok(ItemChange::Added));
        assert_eq!(draft.add_item(&ItemInput::flat("LABOR", "120")), Ok(ItemChange::Updated));
        assert_eq!(draft.add_item(&ItemInput::flat(" labor ", "150")), Ok(ItemChange::Updated));

        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].price_per_unit, 150.0);
        assert_eq!(draft.items[0].description, "Labor");
    }

    #[test]
    fn test_readding_item_replaces_quantity() {
        let mut draft = InvoiceDraft::new();
        draft.add_item(&ItemInput::measured("Rice", "40", "2", "Kg")).unwrap();
        draft.add_item(&ItemInput::flat("RICE", "90")).unwrap();

        let item = draft.item("rice").unwrap();
        assert_eq!(item.description, "Rice");
        assert_eq!(item.price_per_unit, 90.0);
        assert!(item.quantity.is_none());
    }

    #[test]
    fn test_add_item_validation_leaves_draft_untouched() {
        let mut draft = test_draft();
        let before = draft.clone();

        assert!(matches!(
            draft.add_item(&ItemInput::flat("Labor", "ten")),
            Err(ValidationError::NonNumericPrice { .. })
        ));
        assert!(matches!(
            draft.add_item(&ItemInput::measured("Labor", "10", "1/0", "Kg")),
            Err(ValidationError::InvalidQuantity { .. })
        ));
        assert!(draft.add_item(&ItemInput::flat("  ", "10")).is_err());
        assert_eq!(draft, before);
    }

    #[test]
    fn test_blank_quantity_is_flat() {
        let mut draft = InvoiceDraft::new();
        draft
            .add_item(&ItemInput::measured("Setup", "75", "  ", "Kg"))
            .unwrap();
        assert!(draft.items[0].quantity.is_none());
        assert_eq!(draft.items[0].total_price(), 75.0);
    }

    #[test]
    fn test_custom_unit_fallback() {
        let mut draft = InvoiceDraft::new();
        draft.add_item(&ItemInput::measured("Bags", "5", "3", "")).unwrap();
        assert_eq!(draft.items[0].quantity.as_ref().unwrap().label(), "3 units");
    }

    #[test]
    fn test_remove_and_lookup() {
        let mut draft = test_draft();
        assert!(draft.item("widget").is_some());

        let removed = draft.remove_item("WIDGET").unwrap();
        assert_eq!(removed.description, "Widget");
        assert!(draft.items.is_empty());

        assert!(matches!(
            draft.remove_item("Widget"),
            Err(CoreError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_clear_items() {
        let mut draft = test_draft();
        draft.clear_items();
        assert!(draft.items.is_empty());
    }

    #[test]
    fn test_finalize_widget_scenario() {
        let record = test_draft()
            .finalize("1001", test_today(), &Calculator::default())
            .unwrap();

        assert_eq!(record.id, "1001");
        assert_eq!(record.issue_date, "09-03-2026");
        assert_eq!(record.client.name, "Acme");
        assert_eq!(record.totals.subtotal, 2.5);
        assert_eq!(record.totals.taxable_base, 2.25);
        assert_eq!(format_amount(record.totals.grand_total), "2.36");
        assert_eq!(record.items[0].quantity.as_ref().unwrap().label(), "1/4 Kg");
    }

    #[test]
    fn test_finalize_requires_items_and_client() {
        let calc = Calculator::default();

        let empty = InvoiceDraft::new();
        assert!(matches!(
            empty.finalize("1", test_today(), &calc),
            Err(CoreError::Validation(ValidationError::EmptyInvoice))
        ));

        let mut no_client = test_draft();
        no_client.client.name = " ".to_string();
        assert!(matches!(
            no_client.finalize("1", test_today(), &calc),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[test]
    fn test_finalize_validates_client_contact() {
        let calc = Calculator::default();

        let mut draft = test_draft();
        draft.client.email = Some("nope".to_string());
        assert!(draft.finalize("1", test_today(), &calc).is_err());

        let mut draft = test_draft();
        draft.client.phone = Some("123".to_string());
        assert!(draft.finalize("1", test_today(), &calc).is_err());

        let mut draft = test_draft();
        draft.client.email = Some("   ".to_string());
        draft.client.phone = Some("98765 43210".to_string());
        let record = draft.finalize("1", test_today(), &calc).unwrap();
        assert_eq!(record.client.email, None);
        assert_eq!(record.client.phone.as_deref(), Some("98765 43210"));
    }

    #[test]
    fn test_finalize_unparseable_rates_are_zero() {
        let mut draft = test_draft();
        draft.discount_rate = "lots".to_string();
        draft.tax_rate = String::new();
        let record = draft
            .finalize("1", test_today(), &Calculator::default())
            .unwrap();
        assert_eq!(record.discount_rate, 0.0);
        assert_eq!(record.totals.grand_total, 2.5);
    }

    #[test]
    fn test_finalize_stores_clamped_rates() {
        let mut draft = test_draft();
        draft.discount_rate = "140".to_string();
        let record = draft
            .finalize("1", test_today(), &Calculator::new(RatePolicy::Clamp))
            .unwrap();
        assert_eq!(record.discount_rate, 100.0);
        assert_eq!(record.totals.grand_total, 0.0);
    }

    #[test]
    fn test_from_record_round_trip() {
        let mut draft = test_draft();
        draft.due_date = Some("30-03-2026".to_string());
        draft.pending = true;
        let record = draft
            .finalize("1001", test_today(), &Calculator::default())
            .unwrap();

        let reopened = InvoiceDraft::from_record(&record);
        assert_eq!(reopened.discount_rate, "10");
        assert_eq!(reopened.tax_rate, "5");
        assert_eq!(reopened.items, record.items);
        assert!(reopened.pending);
        assert_eq!(reopened.due_date.as_deref(), Some("30-03-2026"));
    }

    #[test]
    fn test_from_record_legacy_pending_marker() {
        let mut record = test_draft()
            .finalize("7", test_today(), &Calculator::default())
            .unwrap();
        record.due_date = Some("PENDING".to_string());
        record.pending = false;

        let reopened = InvoiceDraft::from_record(&record);
        assert!(reopened.pending);
        assert_eq!(reopened.due_date, None);
    }

    #[test]
    fn test_from_input_json() {
        let input: DraftInput = serde_json::from_value(serde_json::json!({
            "client": { "name": "Acme", "email": "buyer@acme.com" },
            "items": [
                { "description": "Widget", "price": "10", "quantity": "1/4", "unit": "Kg" },
                { "description": "Labor", "price": 100 },
                { "description": "labor", "price": "120" }
            ],
            "discountRate": "10",
            "taxRate": 5,
            "pending": true
        }))
        .unwrap();

        let draft = InvoiceDraft::from_input(input).unwrap();
        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.items[1].price_per_unit, 120.0);
        assert_eq!(draft.items[1].description, "Labor");
        assert_eq!(draft.tax_rate, "5");
        assert!(draft.pending);
    }
}
