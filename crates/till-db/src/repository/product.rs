//! # Product Repository
//!
//! Database operations for products.
//!
//! Stock is decremented only inside the sale unit of work
//! (see [`SaleRepository::create_sale`](super::sale::SaleRepository::create_sale));
//! this repository covers lookups and the insert path used by the seed tool.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use till_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.get_by_sku("COKE-330").await?;
/// let on_hand = repo.stock_of(&product.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        debug!(id = %id, "Getting product by ID");

        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, price_cents, stock, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        debug!(sku = %sku, "Getting product by SKU");

        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, price_cents, stock, created_at, updated_at
            FROM products
            WHERE sku = ?1
            "#,
        )
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// The inserted product. A duplicate SKU fails with
    /// [`DbError::UniqueViolation`] carrying the SKU.
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, sku = %product.sku, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, sku, name, price_cents, stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.ends_with("sku") => {
                DbError::duplicate("sku", product.sku.clone())
            }
            other => other,
        })?;

        Ok(product.clone())
    }

    /// Returns the quantity on hand for a product.
    pub async fn stock_of(&self, id: &str) -> DbResult<i64> {
        let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        stock.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

/// Builds a product with a fresh ID and timestamps.
///
/// ## Usage
/// ```rust,ignore
/// let product = new_product("COKE-330", "Coca-Cola 330ml", 199, 24);
/// db.products().insert(&product).await?;
/// ```
pub fn new_product(sku: &str, name: &str, price_cents: i64, stock: i64) -> Product {
    let now = Utc::now();

    Product {
        id: generate_product_id(),
        sku: sku.to_string(),
        name: name.to_string(),
        price_cents,
        stock,
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
