//! # Quantity Parsing
//!
//! A quantity is typed by the user as text. It can be a plain decimal
//! (`15.5`) or a simple fraction (`1/2`). The text the user typed is kept as
//! the *display form* and printed on the document; the parsed number is the
//! *value* used for arithmetic.
//!
//! ```text
//!   "1/2"  ──► ParsedQuantity { display: "1/2",  value: 0.5  }  → "1/2 Kg"
//!   "15.5" ──► ParsedQuantity { display: "15.5", value: 15.5 }  → "15.5 Litre"
//!   "1/0"  ──► InvalidQuantity
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// Parsed Quantity
// =============================================================================

/// Output of [`parse_quantity`]: what to print and what to multiply by.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuantity {
    pub display: String,
    pub value: f64,
}

/// Parses a quantity token.
///
/// Whitespace around the token is ignored. An empty token is an error here;
/// callers that allow "no quantity" check for emptiness first.
///
/// ## Rules
/// 1. Exactly one `/` with a numeric numerator and a non-zero numeric
///    denominator → fraction, display form is the trimmed token.
/// 2. Anything else (including malformed fractions) → decimal parse.
/// 3. Decimal parse failure, or a non-finite value → `InvalidQuantity`.
///
/// ## Example
/// ```rust
/// use invoicer_core::quantity::parse_quantity;
///
/// let q = parse_quantity("1/2").unwrap();
/// assert_eq!(q.display, "1/2");
/// assert_eq!(q.value, 0.5);
///
/// assert!(parse_quantity("1/0").is_err());
/// ```
pub fn parse_quantity(token: &str) -> ValidationResult<ParsedQuantity> {
    let token = token.trim();

    if let Some(value) = parse_fraction(token) {
        return Ok(ParsedQuantity {
            display: token.to_string(),
            value,
        });
    }

    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(ParsedQuantity {
            display: token.to_string(),
            value,
        }),
        _ => Err(ValidationError::InvalidQuantity {
            token: token.to_string(),
        }),
    }
}

fn parse_fraction(token: &str) -> Option<f64> {
    let mut parts = token.split('/');
    let (numerator, denominator) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let numerator: f64 = numerator.trim().parse().ok()?;
    let denominator: f64 = denominator.trim().parse().ok()?;
    if denominator == 0.0 {
        return None;
    }

    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

// =============================================================================
// Unit
// =============================================================================

/// Unit of measure printed after the quantity.
///
/// The fixed list mirrors what the item editor offers; anything else is a
/// free-text custom unit. An empty custom unit prints as `units`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    Gm,
    Kg,
    Litre,
    Rounds,
    Trips,
    Piece,
    Custom(String),
}

impl Unit {
    /// Fallback label for a blank custom unit.
    pub const DEFAULT_CUSTOM: &'static str = "units";

    /// Labels of the fixed units, in editor order.
    pub const FIXED: [&'static str; 6] = ["gm", "Kg", "Litre", "Rounds", "Trips", "Piece"];

    /// Resolves a label to a unit. Fixed units match case-insensitively.
    pub fn parse(label: &str) -> Unit {
        let label = label.trim();
        match label.to_ascii_lowercase().as_str() {
            "gm" => Unit::Gm,
            "kg" => Unit::Kg,
            "litre" => Unit::Litre,
            "rounds" => Unit::Rounds,
            "trips" => Unit::Trips,
            "piece" => Unit::Piece,
            "" => Unit::Custom(Self::DEFAULT_CUSTOM.to_string()),
            _ => Unit::Custom(label.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Unit::Gm => "gm",
            Unit::Kg => "Kg",
            Unit::Litre => "Litre",
            Unit::Rounds => "Rounds",
            Unit::Trips => "Trips",
            Unit::Piece => "Piece",
            Unit::Custom(label) => label,
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Unit::Custom(Self::DEFAULT_CUSTOM.to_string())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Unit {
    fn from(label: String) -> Self {
        Unit::parse(&label)
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.label().to_string()
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// A parsed quantity attached to a line item.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub display: String,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(parsed: ParsedQuantity, unit: Unit) -> Self {
        Self {
            value: parsed.value,
            display: parsed.display,
            unit,
        }
    }

    /// Text shown in the quantity column: `1/4 Kg`.
    pub fn label(&self) -> String {
        format!("{} {}", self.display, self.unit)
    }
}
