//! # Invoice Calculator
//!
//! Turns line items plus discount and tax rates into the five derived totals.
//!
//! ## Order of Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal       = Σ item.totalPrice                                     │
//! │  discountAmount = subtotal × discountRate / 100                         │
//! │  taxableBase    = subtotal − discountAmount     ◄── discount FIRST      │
//! │  taxAmount      = taxableBase × taxRate / 100   ◄── tax on the rest     │
//! │  grandTotal     = taxableBase + taxAmount                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is rounded here. See [`crate::money`] for display rounding.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::LineItem;

// =============================================================================
// Totals
// =============================================================================

/// Derived amounts of an invoice, at full float precision.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: f64,
    pub discount_amount: f64,
    pub taxable_base: f64,
    pub tax_amount: f64,
    pub grand_total: f64,
}

/// Computes the totals with rates taken as given.
///
/// ## Example
/// ```rust
/// use invoicer_core::calc::compute;
/// use invoicer_core::types::LineItem;
///
/// let totals = compute(&[LineItem::flat("Labor", 200.0)], 10.0, 5.0);
/// assert_eq!(totals.discount_amount, 20.0);
/// assert_eq!(totals.taxable_base, 180.0);
/// assert_eq!(totals.tax_amount, 9.0);
/// assert_eq!(totals.grand_total, 189.0);
/// ```
pub fn compute(items: &[LineItem], discount_rate: f64, tax_rate: f64) -> Totals {
    let discount_rate = finite_or_zero(discount_rate);
    let tax_rate = finite_or_zero(tax_rate);

    let subtotal: f64 = items.iter().map(LineItem::total_price).sum();
    let discount_amount = subtotal * (discount_rate / 100.0);
    let taxable_base = subtotal - discount_amount;
    let tax_amount = taxable_base * (tax_rate / 100.0);
    let grand_total = taxable_base + tax_amount;

    Totals {
        subtotal,
        discount_amount,
        taxable_base,
        tax_amount,
        grand_total,
    }
}

/// Parses a rate typed as text. Anything unparseable counts as `0`.
pub fn parse_rate(input: &str) -> f64 {
    input
        .trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .map(finite_or_zero)
        .unwrap_or(0.0)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

// =============================================================================
// Rate Policy
// =============================================================================

/// What to do with rates outside `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatePolicy {
    /// Use rates as typed. A negative discount acts as a surcharge.
    #[default]
    Permissive,
    /// Bound both rates to `0..=100` before computing.
    Clamp,
}

impl RatePolicy {
    pub fn apply(&self, rate: f64) -> f64 {
        let rate = finite_or_zero(rate);
        match self {
            RatePolicy::Permissive => rate,
            RatePolicy::Clamp => rate.clamp(0.0, 100.0),
        }
    }
}

impl std::str::FromStr for RatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(RatePolicy::Permissive),
            "clamp" => Ok(RatePolicy::Clamp),
            other => Err(format!("unknown rate policy '{}'", other)),
        }
    }
}

/// Calculator bound to a rate policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator {
    pub policy: RatePolicy,
}

impl Calculator {
    pub fn new(policy: RatePolicy) -> Self {
        Self { policy }
    }

    /// Rates after the policy is applied, as they will be stored.
    pub fn effective_rates(&self, discount_rate: f64, tax_rate: f64) -> (f64, f64) {
        (self.policy.apply(discount_rate), self.policy.apply(tax_rate))
    }

    pub fn compute(&self, items: &[LineItem], discount_rate: f64, tax_rate: f64) -> Totals {
        let (discount_rate, tax_rate) = self.effective_rates(discount_rate, tax_rate);
        compute(items, discount_rate, tax_rate)
    }
}
