//! # Legacy Format Migration
//!
//! Files written by older desktop releases use snake_case keys,
//! flat client fields and a `"PENDING"` sentinel in the due date. This module
//! rewrites those JSON values into the current shape *before* typed
//! deserialization, so the domain types only ever see one format.
//!
//! ## History Record
//! ```text
//! legacy                          current
//! ──────────────────────────────  ──────────────────────────────────────
//! id: 1001                        id: "1001"
//! client / client_email / ...     client: { name, email, phone, address }
//! date                            issueDate
//! due_date: "PENDING"             dueDate: null, pending: true
//! subtotal / discount_amt /       totals: { subtotal, discountAmount,
//!   tax_amt / total                         taxableBase, taxAmount,
//!                                           grandTotal }
//! business / biz_id               businessName / profileId
//! items[].desc / price / ...      items[].description / pricePerUnit / ...
//! ```

use serde_json::{json, Map, Value};

use invoicer_core::LEGACY_PENDING_MARKER;

/// Profile key renames, legacy → current.
const PROFILE_KEYS: [(&str, &str); 6] = [
    ("gst_no", "gstNumber"),
    ("watermark", "watermarkText"),
    ("color", "colorHex"),
    ("style", "styleName"),
    ("logo", "logoPath"),
    ("last_invoice_num", "lastInvoiceNumber"),
];

/// Optional profile fields where an empty string means "not set".
const PROFILE_OPTIONAL: [&str; 4] = ["gstNumber", "watermarkText", "logoPath", "savedNotesTemplate"];

// =============================================================================
// Profiles
// =============================================================================

/// Rewrites one profile object in place. Returns true when anything changed.
pub fn normalize_profile(id: &str, value: &mut Value) -> bool {
    let Some(obj) = value.as_object_mut() else {
        return false;
    };
    let mut changed = false;

    for (legacy, current) in PROFILE_KEYS {
        if let Some(old) = obj.remove(legacy) {
            if !obj.contains_key(current) {
                obj.insert(current.to_string(), old);
            }
            changed = true;
        }
    }
    if obj.remove("icon").is_some() {
        changed = true;
    }
    if !obj.contains_key("id") {
        obj.insert("id".to_string(), Value::String(id.to_string()));
        changed = true;
    }
    for key in PROFILE_OPTIONAL {
        if obj.get(key).and_then(Value::as_str).is_some_and(|s| s.trim().is_empty()) {
            obj.insert(key.to_string(), Value::Null);
            changed = true;
        }
    }
    changed
}

// =============================================================================
// History
// =============================================================================

/// Current records always carry `issueDate`.
pub fn is_legacy_record(value: &Value) -> bool {
    value.is_object() && value.get("issueDate").is_none()
}

/// Profile id a record claims, current key first.
pub fn record_profile_id(value: &Value) -> Option<&str> {
    value
        .get("profileId")
        .or_else(|| value.get("biz_id"))
        .and_then(Value::as_str)
}

/// Converts a legacy history record to the current shape.
pub fn migrate_record(value: &Value, fallback_profile: &str) -> Value {
    let Some(obj) = value.as_object() else {
        return value.clone();
    };

    let profile_id = record_profile_id(value).unwrap_or(fallback_profile);

    let (due_date, pending_marker) = match obj.get("due_date").and_then(Value::as_str) {
        Some(LEGACY_PENDING_MARKER) => (Value::Null, true),
        Some(d) if !d.trim().is_empty() => (Value::String(d.to_string()), false),
        _ => (Value::Null, false),
    };
    let pending = obj
        .get("pending")
        .and_then(Value::as_bool)
        .unwrap_or(false)
        || pending_marker;

    let items: Vec<Value> = obj
        .get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(migrate_item).collect())
        .unwrap_or_default();

    let discount_rate = number(obj.get("discount_rate")).unwrap_or(0.0);
    let tax_rate = number(obj.get("tax_rate")).unwrap_or(0.0);

    let subtotal = number(obj.get("subtotal")).unwrap_or_else(|| {
        items
            .iter()
            .filter_map(|item| number(item.get("totalPrice")))
            .sum()
    });
    let discount_amount =
        number(obj.get("discount_amt")).unwrap_or(subtotal * (discount_rate / 100.0));
    let taxable_base = subtotal - discount_amount;
    let tax_amount = number(obj.get("tax_amt")).unwrap_or(taxable_base * (tax_rate / 100.0));
    let grand_total = number(obj.get("total")).unwrap_or(taxable_base + tax_amount);

    json!({
        "profileId": profile_id,
        "businessName": text(obj.get("business")).unwrap_or_default(),
        "savedAt": null,
        "id": text(obj.get("id")).unwrap_or_default(),
        "issueDate": text(obj.get("date")).unwrap_or_default(),
        "dueDate": due_date,
        "pending": pending,
        "client": {
            "name": text(obj.get("client")).unwrap_or_default(),
            "email": optional_text(obj.get("client_email")),
            "phone": optional_text(obj.get("client_phone")),
            "address": optional_text(obj.get("client_address")),
        },
        "notes": null,
        "items": items,
        "discountRate": discount_rate,
        "taxRate": tax_rate,
        "totals": {
            "subtotal": subtotal,
            "discountAmount": discount_amount,
            "taxableBase": taxable_base,
            "taxAmount": tax_amount,
            "grandTotal": grand_total,
        },
    })
}

/// Converts a legacy line item (`desc`, `price`, `price_per_unit`,
/// `quantity`, `quantity_display`, `unit`). Current items pass through.
pub fn migrate_item(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return value.clone();
    };
    if obj.contains_key("description") {
        return value.clone();
    }

    let total = number(obj.get("price")).unwrap_or(0.0);
    let quantity = number(obj.get("quantity"));
    let price_per_unit = number(obj.get("price_per_unit")).unwrap_or(match quantity {
        Some(q) if q != 0.0 => total / q,
        _ => total,
    });

    let mut item = Map::new();
    item.insert(
        "description".to_string(),
        Value::String(text(obj.get("desc")).unwrap_or_default()),
    );
    item.insert("pricePerUnit".to_string(), json!(price_per_unit));
    if let Some(q) = quantity {
        let display = text(obj.get("quantity_display")).unwrap_or_else(|| q.to_string());
        item.insert("quantityValue".to_string(), json!(q));
        item.insert("quantityDisplay".to_string(), Value::String(display));
        item.insert("unit".to_string(), json!(text(obj.get("unit")).unwrap_or_default()));
    }
    item.insert("totalPrice".to_string(), json!(total));
    Value::Object(item)
}

// =============================================================================
// Value helpers
// =============================================================================

/// Numbers may have been saved as numbers or as numeric text.
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn optional_text(value: Option<&Value>) -> Value {
    match text(value) {
        Some(s) if !s.trim().is_empty() => Value::String(s),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicer_core::HistoryRecord;

    fn test_legacy_record() -> Value {
        json!({
            "id": 2001,
            "client": "Acme",
            "client_email": "buyer@acme.com",
            "client_phone": "",
            "client_address": "1 Road",
            "total": 2.3625,
            "business": "Green Earth Gardens",
            "items": [
                { "desc": "Widget", "price": 2.5, "price_per_unit": 10.0,
                  "quantity": 0.25, "quantity_display": "1/4", "unit": "Kg" },
                { "desc": "Setup", "price": 5.0, "quantity": null }
            ],
            "subtotal": 7.5,
            "discount_rate": "10",
            "discount_amt": 0.75,
            "tax_rate": 5,
            "tax_amt": 0.3375,
            "date": "01-02-2025",
            "due_date": "PENDING",
            "biz_id": "biz_2"
        })
    }

    #[test]
    fn test_migrate_record_to_current_shape() {
        let migrated = migrate_record(&test_legacy_record(), "biz_1");
        let record: HistoryRecord = serde_json::from_value(migrated).unwrap();

        assert_eq!(record.profile_id, "biz_2");
        assert_eq!(record.business_name, "Green Earth Gardens");
        assert_eq!(record.invoice.id, "2001");
        assert_eq!(record.invoice.issue_date, "01-02-2025");
        assert_eq!(record.invoice.due_date, None);
        assert!(record.invoice.pending);
        assert_eq!(record.invoice.client.name, "Acme");
        assert_eq!(record.invoice.client.phone, None);
        assert_eq!(record.invoice.discount_rate, 10.0);
        assert_eq!(record.invoice.totals.taxable_base, 6.75);
        assert_eq!(record.invoice.totals.grand_total, 2.3625);

        let widget = &record.invoice.items[0];
        assert_eq!(widget.price_per_unit, 10.0);
        assert_eq!(widget.quantity.as_ref().unwrap().label(), "1/4 Kg");
        let setup = &record.invoice.items[1];
        assert!(setup.quantity.is_none());
        assert_eq!(setup.total_price(), 5.0);
    }

    #[test]
    fn test_migrate_record_defaults_profile() {
        let mut legacy = test_legacy_record();
        legacy.as_object_mut().unwrap().remove("biz_id");
        let migrated = migrate_record(&legacy, "biz_1");
        assert_eq!(migrated["profileId"], "biz_1");
    }

    #[test]
    fn test_migrate_record_real_due_date() {
        let mut legacy = test_legacy_record();
        legacy["due_date"] = json!("15-02-2025");
        let migrated = migrate_record(&legacy, "biz_1");
        assert_eq!(migrated["dueDate"], "15-02-2025");
        assert_eq!(migrated["pending"], false);
    }

    #[test]
    fn test_price_per_unit_derived_from_total() {
        let item = migrate_item(&json!({ "desc": "Rice", "price": 40.0, "quantity": 0.5 }));
        assert_eq!(item["pricePerUnit"], 80.0);
        assert_eq!(item["quantityDisplay"], "0.5");
    }

    #[test]
    fn test_current_shapes_untouched() {
        let item = json!({ "description": "Labor", "pricePerUnit": 100.0 });
        assert_eq!(migrate_item(&item), item);
        assert!(!is_legacy_record(&json!({ "issueDate": "01-01-2026" })));
        assert!(is_legacy_record(&test_legacy_record()));
    }

    #[test]
    fn test_normalize_profile() {
        let mut profile = json!({
            "name": "Tech Solutions Inc.",
            "color": "#1e40af",
            "icon": "",
            "style": "Modern",
            "logo": null,
            "gst_no": "",
            "watermark": "Thanks",
            "last_invoice_num": 1042
        });
        assert!(normalize_profile("biz_1", &mut profile));

        assert_eq!(profile["id"], "biz_1");
        assert_eq!(profile["colorHex"], "#1e40af");
        assert_eq!(profile["styleName"], "Modern");
        assert_eq!(profile["watermarkText"], "Thanks");
        assert!(profile["gstNumber"].is_null());
        assert_eq!(profile["lastInvoiceNumber"], 1042);
        assert!(profile.get("icon").is_none());
        assert!(profile.get("color").is_none());

        assert!(!normalize_profile("biz_1", &mut profile));
    }
}
