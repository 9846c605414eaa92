//! # Sale Repository
//!
//! Database operations for sales and sale items.
//!
//! ## Creating a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  create_sale: one unit of work                          │
//! │                                                                         │
//! │  validate_new_sale()          ← rejects bad input, no transaction yet  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │  INSERT INTO sales            ← first statement takes the write lock   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each line, in order:                                              │
//! │    SELECT stock               ← missing? ProductNotFound               │
//! │    stock - quantity < 0?      ← InsufficientStock                      │
//! │    UPDATE ... WHERE stock >= quantity                                  │
//! │    INSERT INTO sale_items                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT                       ← any error before this: rollback        │
//! │                                                                         │
//! │  The whole block is bounded by the transaction timeout.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales are immutable once created: there is no update or delete path.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use till_core::validation::validate_new_sale;
use till_core::{ChartPoint, CoreError, NewSale, ReportWindow, Sale, SaleLine, SaleTotals};

/// Default bound on one sale unit of work.
const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Sale header row as stored in `sales`.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    customer_name: String,
    customer_email: Option<String>,
    customer_phone: Option<String>,
    invoice_number: String,
    date: DateTime<Utc>,
    notes: Option<String>,
    subtotal_cents: i64,
    discount_amount_cents: i64,
    tax_amount_cents: i64,
    total_cents: i64,
    created_at: DateTime<Utc>,
}

impl SaleRow {
    fn into_sale(self, products: Vec<SaleLine>) -> Sale {
        Sale {
            id: self.id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            invoice_number: self.invoice_number,
            date: self.date,
            notes: self.notes,
            products,
            subtotal_cents: self.subtotal_cents,
            discount_amount_cents: self.discount_amount_cents,
            tax_amount_cents: self.tax_amount_cents,
            total_cents: self.total_cents,
            created_at: self.created_at,
        }
    }
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
    transaction_timeout: Duration,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository {
            pool,
            transaction_timeout: DEFAULT_TRANSACTION_TIMEOUT,
        }
    }

    /// Sets the bound applied to [`create_sale`](Self::create_sale).
    pub fn with_transaction_timeout(mut self, timeout: Duration) -> Self {
        self.transaction_timeout = timeout;
        self
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates a sale and decrements stock for every line, atomically.
    ///
    /// ## Returns
    /// * `Ok(Sale)` - committed sale with its lines in input order
    /// * `Err(DbError::Domain(CoreError::Validation | InvalidTotal))` - bad
    ///   input, nothing was opened
    /// * `Err(DbError::Domain(CoreError::ProductNotFound))` - rolled back
    /// * `Err(DbError::Domain(CoreError::InsufficientStock))` - rolled back
    /// * `Err(DbError::Timeout)` - the unit of work ran out of time, rolled back
    /// * any other `DbError` - storage failure, rolled back
    ///
    /// On error no sale row exists and every product's stock is unchanged.
    pub async fn create_sale(&self, new_sale: &NewSale) -> DbResult<Sale> {
        if let Err(e) = validate_new_sale(new_sale) {
            warn!(invoice_number = %new_sale.invoice_number, error = %e, "Rejected sale input");
            return Err(e.into());
        }

        debug!(
            invoice_number = %new_sale.invoice_number,
            lines = new_sale.products.len(),
            "Creating sale"
        );

        let result =
            tokio::time::timeout(self.transaction_timeout, self.create_sale_tx(new_sale)).await;

        match result {
            Ok(Ok(sale)) => {
                info!(
                    id = %sale.id,
                    invoice_number = %sale.invoice_number,
                    total_cents = sale.total_cents,
                    "Sale created"
                );
                Ok(sale)
            }
            Ok(Err(e)) => {
                warn!(invoice_number = %new_sale.invoice_number, error = %e, "Sale rolled back");
                Err(e)
            }
            Err(_) => {
                warn!(
                    invoice_number = %new_sale.invoice_number,
                    timeout = ?self.transaction_timeout,
                    "Sale transaction timed out"
                );
                Err(DbError::Timeout(self.transaction_timeout))
            }
        }
    }

    /// The unit of work itself. Returning early drops `tx`, which rolls back.
    async fn create_sale_tx(&self, new_sale: &NewSale) -> DbResult<Sale> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, customer_name, customer_email, customer_phone,
                invoice_number, date, date_ms, notes,
                subtotal_cents, discount_amount_cents, tax_amount_cents, total_cents,
                created_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8,
                ?9, ?10, ?11, ?12,
                ?13
            )
            "#,
        )
        .bind(&id)
        .bind(&new_sale.customer_name)
        .bind(&new_sale.customer_email)
        .bind(&new_sale.customer_phone)
        .bind(&new_sale.invoice_number)
        .bind(new_sale.date)
        .bind(new_sale.date.timestamp_millis())
        .bind(&new_sale.notes)
        .bind(new_sale.subtotal_cents)
        .bind(new_sale.discount_amount_cents)
        .bind(new_sale.tax_amount_cents)
        .bind(new_sale.total_cents)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let mut lines = Vec::with_capacity(new_sale.products.len());

        for (position, line) in new_sale.products.iter().enumerate() {
            decrement_stock(&mut tx, &line.product, line.quantity).await?;

            let line_id = Uuid::new_v4().to_string();
            let position = position as i64;

            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, product_id, position, quantity, price_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&line_id)
            .bind(&id)
            .bind(&line.product)
            .bind(position)
            .bind(line.quantity)
            .bind(line.price_cents)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            lines.push(SaleLine {
                id: line_id,
                product: line.product.clone(),
                position,
                quantity: line.quantity,
                price_cents: line.price_cents,
            });
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(Sale {
            id,
            customer_name: new_sale.customer_name.clone(),
            customer_email: new_sale.customer_email.clone(),
            customer_phone: new_sale.customer_phone.clone(),
            invoice_number: new_sale.invoice_number.clone(),
            date: new_sale.date,
            notes: new_sale.notes.clone(),
            products: lines,
            subtotal_cents: new_sale.subtotal_cents,
            discount_amount_cents: new_sale.discount_amount_cents,
            tax_amount_cents: new_sale.tax_amount_cents,
            total_cents: new_sale.total_cents,
            created_at: now,
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a sale by ID, with its lines in their original order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT
                id, customer_name, customer_email, customer_phone,
                invoice_number, date, notes,
                subtotal_cents, discount_amount_cents, tax_amount_cents, total_cents,
                created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, product_id AS product, position, quantity, price_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(row.into_sale(lines)))
    }

    /// Counts all sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Count and sums of every sale dated inside `window` (bounds inclusive).
    ///
    /// An empty window yields all zeros.
    pub async fn totals_between(&self, window: &ReportWindow) -> DbResult<SaleTotals> {
        debug!(
            start = window.start_millis(),
            end = window.end_millis(),
            "Aggregating sales"
        );

        let totals = sqlx::query_as::<_, SaleTotals>(
            r#"
            SELECT
                COUNT(*)                                  AS count,
                COALESCE(SUM(subtotal_cents), 0)          AS subtotal_cents,
                COALESCE(SUM(tax_amount_cents), 0)        AS tax_cents,
                COALESCE(SUM(discount_amount_cents), 0)   AS discount_cents,
                COALESCE(SUM(total_cents), 0)             AS total_cents
            FROM sales
            WHERE date_ms BETWEEN ?1 AND ?2
            "#,
        )
        .bind(window.start_millis())
        .bind(window.end_millis())
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }

    /// Date and total of every sale inside `window`, oldest first.
    pub async fn chart_series(&self, window: &ReportWindow) -> DbResult<Vec<ChartPoint>> {
        let rows: Vec<(DateTime<Utc>, i64)> = sqlx::query_as(
            r#"
            SELECT date, total_cents
            FROM sales
            WHERE date_ms BETWEEN ?1 AND ?2
            ORDER BY date_ms ASC, created_at ASC
            "#,
        )
        .bind(window.start_millis())
        .bind(window.end_millis())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(date, total_cents)| ChartPoint { date, total_cents })
            .collect())
    }
}

/// Takes `quantity` units of `product_id` inside the open transaction.
///
/// The guarded `UPDATE` refuses to go below zero even if another writer
/// slipped in between the read and the write.
async fn decrement_stock(
    tx: &mut Transaction<'_, Sqlite>,
    product_id: &str,
    quantity: i64,
) -> DbResult<()> {
    let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
        .bind(product_id)
        .fetch_optional(&mut **tx)
        .await?;

    let Some(available) = stock else {
        return Err(CoreError::ProductNotFound(product_id.to_string()).into());
    };

    let insufficient = || -> DbError {
        CoreError::InsufficientStock {
            product_id: product_id.to_string(),
            available,
            requested: quantity,
        }
        .into()
    };

    if available - quantity < 0 {
        return Err(insufficient());
    }

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?2, updated_at = ?3
        WHERE id = ?1 AND stock >= ?2
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(insufficient());
    }

    debug!(product_id = %product_id, quantity, remaining = available - quantity, "Stock decremented");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
