//! # Validation Module
//!
//! Field checks shared by the profile editor and the invoice draft.
//!
//! ```text
//! ┌────────────┬──────────────────────────────────────────────────────────┐
//! │ Field      │ Rule                                                     │
//! ├────────────┼──────────────────────────────────────────────────────────┤
//! │ email      │ local@domain.tld                                         │
//! │ phone      │ exactly 10 digits once every non-digit is stripped       │
//! │ GST        │ exactly 15 characters                                    │
//! │ color      │ #RRGGBB                                                  │
//! │ price      │ finite decimal number                                    │
//! └────────────┴──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check runs before state changes, so a failure leaves profiles,
//! drafts and history exactly as they were.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ValidationError, ValidationResult};

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Required number of digits in a phone number.
pub const PHONE_DIGITS: usize = 10;

/// Required length of a GST number.
pub const GST_LENGTH: usize = 15;

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

// =============================================================================
// Contact Validators
// =============================================================================

/// Checks that `value` looks like an email address.
///
/// ## Example
/// ```rust
/// use invoicer_core::validation::validate_email;
///
/// assert!(validate_email("email", "ops@expresslogistics.com").is_ok());
/// assert!(validate_email("email", "ops@localhost").is_err());
/// ```
pub fn validate_email(field: &str, value: &str) -> ValidationResult<()> {
    let ok = email_regex()
        .map(|re| re.is_match(value.trim()))
        .unwrap_or(false);
    if ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail {
            field: field.to_string(),
        })
    }
}

/// Checks that `value` carries exactly ten digits. Spaces, dashes and
/// brackets are ignored.
pub fn validate_phone(field: &str, value: &str) -> ValidationResult<()> {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    if digits == PHONE_DIGITS {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone {
            field: field.to_string(),
        })
    }
}

/// Checks that a GST number is exactly 15 characters, surrounding
/// whitespace excluded.
pub fn validate_gst(value: &str) -> ValidationResult<()> {
    let length = value.trim().chars().count();
    if length == GST_LENGTH {
        Ok(())
    } else {
        Err(ValidationError::InvalidGst { length })
    }
}

// =============================================================================
// Value Validators
// =============================================================================

/// Parses `#RRGGBB` (leading `#` optional) into its components.
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub fn validate_color(value: &str) -> ValidationResult<()> {
    parse_hex_color(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::InvalidColor {
            value: value.to_string(),
        })
}

/// Parses price text into a finite number.
pub fn parse_price(input: &str) -> ValidationResult<f64> {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::NonNumericPrice {
            input: input.to_string(),
        }),
    }
}

/// Fails with `Required` when `value` is blank.
pub fn require(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        Err(ValidationError::required(field))
    } else {
        Ok(())
    }
}

/// Treats blank text as absent.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
