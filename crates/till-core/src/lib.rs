//! # till-core: Pure Business Logic for Till POS
//!
//! This crate is the **heart** of Till POS. It contains the domain types and
//! rules for sales and reporting with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    sales-api (axum)                             │   │
//! │  │    POST /sales    GET /sales/summary/:period    /chartData      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  period   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Period   │  │   rules   │  │   │
//! │  │   │   Sale    │  │           │  │  Window   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    till-db (Database Layer)                     │   │
//! │  │          sale transaction, summary queries, migrations          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Summary, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`period`] - Reporting periods and their date windows
//! - [`clock`] - Injectable source of "now"
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::money::Money;
//!
//! let subtotal = Money::from_cents(4000);
//! let total = subtotal - Money::from_cents(500) + Money::from_cents(750);
//! assert_eq!(total.cents(), 4250);
//! assert_eq!(total.to_string(), "$42.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod error;
pub mod money;
pub mod period;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use period::{Period, ReportWindow};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single sale.
///
/// ## Business Reason
/// Keeps the unit of work short: every line holds a product row inside the
/// sale transaction.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum amount in cents for any single price or sale amount ($1,000,000,000).
///
/// ## Business Reason
/// Keeps `price × quantity` and `subtotal - discount + tax` far inside `i64`,
/// so no request can overflow the total check.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;
