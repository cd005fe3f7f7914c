//! # Money Formatting
//!
//! Amounts stay `f64` at full precision through the whole calculation and
//! are rounded only here, at display time.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  compute() ──► 2.3625 (stored in history as-is)                         │
//! │                  │                                                      │
//! │                  └──► format_amount() ──► "2.36" (PDF / Word / CLI)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rounding is whatever `{:.2}` does to the binary value, so the same record
//! always renders to the same text.

/// Currency label used where output is restricted to ASCII (PDF).
pub const CURRENCY_ASCII: &str = "Rs.";

/// Currency label used where Unicode is available (Word).
pub const CURRENCY_UNICODE: &str = "₹";

/// Formats an amount with exactly two decimals.
///
/// ## Example
/// ```rust
/// use invoicer_core::money::format_amount;
///
/// assert_eq!(format_amount(2.3625), "2.36");
/// assert_eq!(format_amount(10.0), "10.00");
/// ```
pub fn format_amount(value: f64) -> String {
    let text = format!("{:.2}", value);
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}

/// Formats a percentage rate without trailing zeros (`10`, `12.5`).
pub fn format_rate(rate: f64) -> String {
    if rate == 0.0 {
        return "0".to_string();
    }
    format!("{}", rate)
}

/// Formats an amount prefixed by a currency label: `Rs. 2.36`.
pub fn format_with_label(label: &str, value: f64) -> String {
    format!("{} {}", label, format_amount(value))
}
