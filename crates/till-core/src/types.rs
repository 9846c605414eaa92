//! # Domain Types
//!
//! Core domain types used throughout Till POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SaleLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──┤  invoice_number │──►│  product (FK)   │       │
//! │  │  sku (business) │   │  date           │   │  quantity       │       │
//! │  │  price_cents    │   │  total_cents    │   │  price_cents    │       │
//! │  │  stock          │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  Derived, never stored:                                                 │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    Summary      │   │   ChartPoint    │                             │
//! │  │  count + 4 sums │   │  date, total    │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::period::{Period, ReportWindow};

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Long-lived and shared by many sales; only the sale transaction mutates
/// `stock`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Current list price in cents.
    pub price_cents: i64,

    /// Quantity on hand. Never negative.
    pub stock: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether `quantity` units can be taken from stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock - quantity >= 0
    }
}

// =============================================================================
// Sale Input
// =============================================================================

/// One requested line of a new sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSaleLine {
    /// ID of the product being sold.
    pub product: String,

    /// Units sold. Must be positive.
    pub quantity: i64,

    /// Unit price in cents at the time of sale.
    pub price_cents: i64,
}

impl NewSaleLine {
    /// Returns `price × quantity`.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.price_cents).multiply_quantity(self.quantity)
    }
}

/// Input for the atomic sale-creation workflow.
///
/// Amounts are supplied by the caller; only the
/// `total = subtotal - discount + tax` identity is checked server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub invoice_number: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Ordered line items. Stock is checked in this order.
    pub products: Vec<NewSaleLine>,
    pub subtotal_cents: i64,
    #[serde(default)]
    pub discount_amount_cents: i64,
    #[serde(default)]
    pub tax_amount_cents: i64,
    pub total_cents: i64,
}

impl NewSale {
    /// Sum of `price × quantity` over every line.
    pub fn lines_total(&self) -> Money {
        self.products.iter().map(NewSaleLine::line_total).sum()
    }

    /// Total implied by the caller's subtotal, discount and tax.
    ///
    /// `None` if the amounts overflow.
    pub fn expected_total(&self) -> Option<Money> {
        Money::sale_total(
            Money::from_cents(self.subtotal_cents),
            Money::from_cents(self.discount_amount_cents),
            Money::from_cents(self.tax_amount_cents),
        )
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A persisted sale. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub invoice_number: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub products: Vec<SaleLine>,
    pub subtotal_cents: i64,
    pub discount_amount_cents: i64,
    pub tax_amount_cents: i64,
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item of a persisted sale.
/// Price is a snapshot taken at sale time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleLine {
    pub id: String,
    /// ID of the product sold.
    pub product: String,
    /// Zero-based position within the sale.
    pub position: i64,
    pub quantity: i64,
    pub price_cents: i64,
}

impl SaleLine {
    /// Returns `price × quantity`.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.price_cents).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Reporting
// =============================================================================

/// Raw aggregate row: count and sums of sales inside a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleTotals {
    pub count: i64,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

/// Sales summary for one reporting period.
///
/// ## JSON Shape
/// ```json
/// {
///   "period": "month",
///   "startDate": "2026-03-01T00:00:00.000Z",
///   "endDate": "2026-03-18T14:30:00.000Z",
///   "count": 3,
///   "totalSalesCents": 12000,
///   "totalTaxCents": 960,
///   "totalDiscountCents": 0,
///   "totalRevenueCents": 12960
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Summary {
    pub period: String,
    pub start_date: String,
    pub end_date: String,
    pub count: i64,
    pub total_sales_cents: i64,
    pub total_tax_cents: i64,
    pub total_discount_cents: i64,
    pub total_revenue_cents: i64,
}

impl Summary {
    /// Builds a summary from the window it covers and the aggregate row.
    pub fn new(period: Period, window: &ReportWindow, totals: SaleTotals) -> Self {
        Summary {
            period: period.as_str().to_string(),
            start_date: iso_millis(&window.start),
            end_date: iso_millis(&window.end),
            count: totals.count,
            total_sales_cents: totals.subtotal_cents,
            total_tax_cents: totals.tax_cents,
            total_discount_cents: totals.discount_cents,
            total_revenue_cents: totals.total_cents,
        }
    }
}

/// One point of the monthly sales chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChartPoint {
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub total_cents: i64,
}

/// Formats a timestamp as ISO-8601 UTC with millisecond precision.
pub fn iso_millis(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// Unit Tests
// =============================================================================
