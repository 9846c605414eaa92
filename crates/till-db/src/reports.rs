//! # Sales Reports
//!
//! Summaries over the four reporting periods, and the monthly chart series.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_summary("week")                                                    │
//! │       │                                                                 │
//! │       ├── parse label ──► InvalidPeriod (no query issued)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Period::Week.window(clock.now())   (till-core, pure)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleRepository::totals_between(window)   COUNT + COALESCE(SUM)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Summary { period, startDate, endDate, count, sums... }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Summaries are read-only and take no locks. `get_all_summaries` runs one
//! aggregate per period with no transaction spanning them.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::DbResult;
use crate::repository::sale::SaleRepository;
use till_core::{ChartPoint, Clock, Period, ReportWindow, Summary};

/// Read-only reporting over the sales table.
#[derive(Debug, Clone)]
pub struct SalesReports {
    sales: SaleRepository,
    clock: Arc<dyn Clock>,
}

impl SalesReports {
    /// Creates a reporting service reading "now" from `clock`.
    pub fn new(sales: SaleRepository, clock: Arc<dyn Clock>) -> Self {
        SalesReports { sales, clock }
    }

    /// Summary for one period label (`week`, `two-weeks`, `month`, `last-month`).
    ///
    /// ## Errors
    /// * `DbError::Domain(CoreError::InvalidPeriod)` for any other label
    /// * storage errors from the aggregate query
    pub async fn get_summary(&self, period: &str) -> DbResult<Summary> {
        let period: Period = period.parse().map_err(|e| {
            warn!(period = %period, "Unknown reporting period");
            e
        })?;

        self.summary_for(period).await
    }

    /// Summary for an already-parsed period.
    pub async fn summary_for(&self, period: Period) -> DbResult<Summary> {
        let window = period.window(&self.clock.now());
        self.summarize(period, &window).await
    }

    /// Summaries for every period, keyed by label.
    ///
    /// The map always holds exactly `month`, `last-month`, `two-weeks` and
    /// `week`. All four windows are computed from a single clock reading.
    pub async fn get_all_summaries(&self) -> DbResult<BTreeMap<String, Summary>> {
        let now = self.clock.now();
        let mut summaries = BTreeMap::new();

        for period in Period::ALL {
            let window = period.window(&now);
            let summary = self.summarize(period, &window).await?;
            summaries.insert(period.as_str().to_string(), summary);
        }

        Ok(summaries)
    }

    /// Every sale's date and total in the current calendar month, oldest first.
    pub async fn get_chart_series(&self) -> DbResult<Vec<ChartPoint>> {
        let window = ReportWindow::current_month(&self.clock.now());
        let points = self.sales.chart_series(&window).await?;

        debug!(points = points.len(), "Built chart series");
        Ok(points)
    }

    async fn summarize(&self, period: Period, window: &ReportWindow) -> DbResult<Summary> {
        debug!(period = %period, "Computing summary");

        let totals = self.sales.totals_between(window).await?;
        Ok(Summary::new(period, window, totals))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::new_product;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use till_core::{CoreError, FixedClock, NewSale, NewSaleLine};

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).earliest().unwrap()
    }

    /// 18 March 2026, 14:00 local time.
    fn now() -> DateTime<Local> {
        local(2026, 3, 18, 14)
    }

    async fn setup() -> (Database, SalesReports, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .insert(&new_product("SKU-A", "Widget", 100, 1000))
            .await
            .unwrap();
        let reports = db.reports(Arc::new(FixedClock::new(now())));
        (db, reports, product.id)
    }

    async fn record_sale(db: &Database, product: &str, date: DateTime<Local>, total_cents: i64) {
        let sale = NewSale {
            customer_name: "Walk-in".to_string(),
            customer_email: None,
            customer_phone: None,
            invoice_number: format!("INV-{}", date.timestamp()),
            date: date.with_timezone(&Utc),
            notes: None,
            products: vec![NewSaleLine {
                product: product.to_string(),
                quantity: 1,
                price_cents: total_cents,
            }],
            subtotal_cents: total_cents,
            discount_amount_cents: 0,
            tax_amount_cents: 0,
            total_cents,
        };
        db.sales().create_sale(&sale).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_store_yields_zero_summaries() {
        let (_db, reports, _) = setup().await;

        for period in ["week", "two-weeks", "month", "last-month"] {
            let summary = reports.get_summary(period).await.unwrap();
            assert_eq!(summary.period, period);
            assert_eq!(summary.count, 0);
            assert_eq!(summary.total_sales_cents, 0);
            assert_eq!(summary.total_tax_cents, 0);
            assert_eq!(summary.total_discount_cents, 0);
            assert_eq!(summary.total_revenue_cents, 0);
        }
    }

    #[tokio::test]
    async fn test_unknown_period_issues_no_query() {
        let (db, reports, _) = setup().await;
        db.close().await;

        let err = reports.get_summary("bogus").await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidPeriod(ref label)) if label == "bogus"
        ));

        // A valid label does reach the (closed) pool.
        assert!(reports.get_summary("week").await.is_err());
    }

    #[tokio::test]
    async fn test_single_sale_sums_exactly() {
        let (db, reports, product) = setup().await;
        record_sale(&db, &product, local(2026, 3, 17, 10), 4250).await;

        let summary = reports.get_summary("week").await.unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.total_revenue_cents, 4250);
    }

    #[tokio::test]
    async fn test_periods_select_their_windows() {
        let (db, reports, product) = setup().await;
        record_sale(&db, &product, local(2026, 3, 17, 10), 100).await; // week
        record_sale(&db, &product, local(2026, 3, 5, 10), 200).await; // two-weeks
        record_sale(&db, &product, local(2026, 3, 1, 10), 400).await; // month
        record_sale(&db, &product, local(2026, 2, 14, 10), 800).await; // last-month
        record_sale(&db, &product, local(2026, 1, 20, 10), 1600).await; // none

        let all = reports.get_all_summaries().await.unwrap();
        let keys: Vec<&str> = all.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["last-month", "month", "two-weeks", "week"]);

        assert_eq!(all["week"].total_revenue_cents, 100);
        assert_eq!(all["two-weeks"].total_revenue_cents, 300);
        assert_eq!(all["month"].total_revenue_cents, 700);
        assert_eq!(all["last-month"].total_revenue_cents, 800);
        assert_eq!(all["month"].count, 3);
    }

    #[tokio::test]
    async fn test_chart_series_is_ordered_and_limited_to_month() {
        let (db, reports, product) = setup().await;
        record_sale(&db, &product, local(2026, 3, 12, 9), 300).await;
        record_sale(&db, &product, local(2026, 3, 2, 9), 100).await;
        record_sale(&db, &product, local(2026, 2, 27, 9), 999).await;
        // Later this month, past "now": still part of the calendar month.
        record_sale(&db, &product, local(2026, 3, 25, 9), 500).await;

        let series = reports.get_chart_series().await.unwrap();
        let totals: Vec<i64> = series.iter().map(|p| p.total_cents).collect();

        assert_eq!(totals, vec![100, 300, 500]);
        assert!(series.windows(2).all(|w| w[0].date <= w[1].date));
    }
}
