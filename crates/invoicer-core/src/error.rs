//! # Error Types
//!
//! Domain-specific error types for invoicer-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  invoicer-core (this file)                                             │
//! │  ├── CoreError        - Domain failures (unknown profile, bad key)     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  invoicer-store       StoreError   - File persistence failures         │
//! │  invoicer-render      RenderError  - Document generation failures      │
//! │                                                                         │
//! │  invoicer CLI         AppError     - code + message shown to the user  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError/RenderError → AppError │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `ValidationError` never touches persisted state: every check runs
//! before anything is written.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Profile id is not known to the profile store.
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// No line item with this description exists in the draft.
    ///
    /// ## When This Occurs
    /// - Removing or editing an item that was never added
    /// - The description was changed since it was listed
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// License key does not match the expected key for the account type.
    #[error("Invalid license key for {account_type} account")]
    InvalidLicenseKey { account_type: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the draft and profile editors before any state changes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Email does not look like `local@domain.tld`.
    #[error("{field} is not a valid email address")]
    InvalidEmail { field: String },

    /// Phone does not have exactly 10 digits.
    #[error("{field} must contain exactly 10 digits")]
    InvalidPhone { field: String },

    /// GST number is not exactly 15 characters.
    #[error("GST number must be exactly 15 characters (got {length})")]
    InvalidGst { length: usize },

    /// Quantity token is neither a fraction nor a decimal.
    ///
    /// ## When This Occurs
    /// - `"abc"`
    /// - `"1/0"` (zero denominator falls through to decimal parsing, which fails)
    /// - `"inf"` / `"NaN"`
    #[error("Invalid quantity: '{token}'")]
    InvalidQuantity { token: String },

    /// Price text is not a number.
    #[error("Price must be a valid number (got '{input}')")]
    NonNumericPrice { input: String },

    /// Brand color is not `#RRGGBB`.
    #[error("Color must be #RRGGBB (got '{value}')")]
    InvalidColor { value: String },

    /// Generation was requested with no line items.
    #[error("Invoice must have at least one item")]
    EmptyInvoice,
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type alias for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl ValidationError {
    /// Creates a Required error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Name of the offending field, for UIs that highlight inputs.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::InvalidEmail { field }
            | ValidationError::InvalidPhone { field } => field,
            ValidationError::InvalidGst { .. } => "gstNumber",
            ValidationError::InvalidQuantity { .. } => "quantity",
            ValidationError::NonNumericPrice { .. } => "price",
            ValidationError::InvalidColor { .. } => "colorHex",
            ValidationError::EmptyInvoice => "items",
        }
    }
}
