//! # invoicer-core: Pure Invoice Logic
//!
//! Everything that decides what an invoice *says* lives here: quantity
//! parsing, the totals calculation, line-item editing, field validation and
//! the license rules. No function in this crate touches the file system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Invoicer Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    invoicer CLI                                 │   │
//! │  │   profiles ──► generate ──► history ──► license                 │   │
//! │  └───────────┬───────────────────────┬─────────────────────────────┘   │
//! │              │                       │                                  │
//! │  ┌───────────▼──────────┐  ┌─────────▼────────────┐                    │
//! │  │   invoicer-store     │  │   invoicer-render    │                    │
//! │  │ profiles / history   │  │  4 PDF layouts, Word │                    │
//! │  └───────────┬──────────┘  └─────────┬────────────┘                    │
//! │              │                       │                                  │
//! │  ┌───────────▼───────────────────────▼─────────────────────────────┐   │
//! │  │               ★ invoicer-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌────────┐ ┌────────┐ ┌────────────┐ ┌───────┐  │   │
//! │  │   │ quantity │ │  calc  │ │ draft  │ │ validation │ │license│  │   │
//! │  │   └──────────┘ └────────┘ └────────┘ └────────────┘ └───────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • PURE FUNCTIONS                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Profiles, line items, invoice and history records
//! - [`quantity`] - `"1/2"` / `"15.5"` quantity tokens and units
//! - [`calc`] - Subtotal → discount → taxable base → tax → grand total
//! - [`draft`] - Line-item editing and record assembly
//! - [`profile`] - Validated profile edits
//! - [`validation`] - Email, phone, GST, color and price checks
//! - [`license`] - Year-scoped keys and expiry status
//! - [`money`] - Two-decimal display of float amounts
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use invoicer_core::calc::compute;
//! use invoicer_core::quantity::{parse_quantity, Quantity, Unit};
//! use invoicer_core::types::LineItem;
//!
//! let qty = parse_quantity("1/4").unwrap();
//! let item = LineItem::with_quantity("Widget", 10.0, Quantity::new(qty, Unit::Kg));
//!
//! let totals = compute(&[item], 10.0, 5.0);
//! assert_eq!(invoicer_core::money::format_amount(totals.grand_total), "2.36");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calc;
pub mod draft;
pub mod error;
pub mod license;
pub mod money;
pub mod profile;
pub mod quantity;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calc::{compute, Calculator, RatePolicy, Totals};
pub use draft::{DraftInput, InvoiceDraft, ItemInput};
pub use error::{CoreError, CoreResult, ValidationError, ValidationResult};
pub use license::{AccountType, LicenseKeys, LicenseRecord, LicenseStatus};
pub use profile::ProfileUpdate;
pub use quantity::{parse_quantity, ParsedQuantity, Quantity, Unit};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Issue dates are stored the way the desktop application always wrote them.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Legacy marker some history records carry in their due-date slot.
pub const LEGACY_PENDING_MARKER: &str = "PENDING";
