//! # Till Sales API
//!
//! HTTP server for sale creation and sales reporting.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Sales API Routes                                │
//! │                                                                         │
//! │  POST /sales                  ──► SaleRepository::create_sale          │
//! │  GET  /sales/summary          ──► SalesReports::get_all_summaries      │
//! │  GET  /sales/summary/:period  ──► SalesReports::get_summary            │
//! │  GET  /sales/chartData        ──► SalesReports::get_chart_series       │
//! │  GET  /health                 ──► Database::health_check               │
//! │                                                                         │
//! │  GET routes and POST /sales also answer with a trailing slash.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ApiConfig`]; every setting comes from the environment.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use till_core::Clock;
use till_db::{Database, SalesReports};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};

/// Shared application state.
///
/// Holds handles only; there is no in-process mutable state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub reports: SalesReports,
}

impl AppState {
    /// Builds the state, with reports reading "now" from `clock`.
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        let reports = db.reports(clock);
        AppState { db, reports }
    }
}

/// The route table.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/sales", post(routes::create_sale))
        .route("/sales/", post(routes::create_sale))
        .route("/sales/summary", get(routes::get_all_summaries))
        .route("/sales/summary/", get(routes::get_all_summaries))
        .route("/sales/summary/:period", get(routes::get_summary))
        .route("/sales/summary/:period/", get(routes::get_summary))
        .route("/sales/chartData", get(routes::get_chart_data))
        .route("/sales/chartData/", get(routes::get_chart_data))
        .with_state(state)
}

/// The route table with request tracing and a per-request timeout.
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    router(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

// =============================================================================
// Router Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{Local, Utc};
    use serde_json::{json, Value};
    use till_core::FixedClock;
    use till_db::repository::product::new_product;
    use till_db::DbConfig;
    use tower::ServiceExt;

    async fn test_state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(db, Arc::new(FixedClock::new(Local::now())))
    }

    async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    async fn get(state: &AppState, uri: &str) -> (StatusCode, Value) {
        send(state, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_sale(state: &AppState, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/sales")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(state, request).await
    }

    fn sale_body(product: &str, quantity: i64) -> Value {
        json!({
            "data": {
                "customer_name": "Ada Lovelace",
                "invoice_number": "INV-0042",
                "date": Utc::now().to_rfc3339(),
                "products": [{ "product": product, "quantity": quantity, "price_cents": 1000 }],
                "subtotal_cents": 1000 * quantity,
                "discount_amount_cents": 0,
                "tax_amount_cents": 0,
                "total_cents": 1000 * quantity
            }
        })
    }

    async fn stocked(state: &AppState, stock: i64) -> String {
        state
            .db
            .products()
            .insert(&new_product("SKU-A", "Widget", 1000, stock))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_summary_for_period() {
        let state = test_state().await;

        let (status, body) = get(&state, "/sales/summary/week").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["period"], "week");
        assert_eq!(body["data"]["count"], 0);
        assert_eq!(body["data"]["totalRevenueCents"], 0);

        let (status, _) = get(&state, "/sales/summary/last-month/").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_period_is_bad_request() {
        let state = test_state().await;

        let (status, body) = get(&state, "/sales/summary/bogus").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_undecodable_period_is_bad_request() {
        let state = test_state().await;

        let (status, body) = get(&state, "/sales/summary/%FF").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_all_summaries_have_four_keys() {
        let state = test_state().await;

        for uri in ["/sales/summary", "/sales/summary/"] {
            let (status, body) = get(&state, uri).await;
            assert_eq!(status, StatusCode::OK);

            let data = body["data"].as_object().unwrap();
            let mut keys: Vec<&str> = data.keys().map(String::as_str).collect();
            keys.sort_unstable();
            assert_eq!(keys, vec!["last-month", "month", "two-weeks", "week"]);
        }
    }

    #[tokio::test]
    async fn test_create_sale_and_chart() {
        let state = test_state().await;
        let product = stocked(&state, 10).await;

        let (status, body) = post_sale(&state, sale_body(&product, 4)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["meta"]["success"], true);
        assert_eq!(body["data"]["invoice_number"], "INV-0042");
        assert_eq!(body["data"]["products"][0]["quantity"], 4);
        assert_eq!(state.db.products().stock_of(&product).await.unwrap(), 6);

        let (status, body) = get(&state, "/sales/chartData").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["total_cents"], 4000);
    }

    #[tokio::test]
    async fn test_insufficient_stock_is_conflict() {
        let state = test_state().await;
        let product = stocked(&state, 2).await;

        let (status, body) = post_sale(&state, sale_body(&product, 5)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "INSUFFICIENT_STOCK");
        assert_eq!(state.db.products().stock_of(&product).await.unwrap(), 2);
        assert_eq!(state.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let state = test_state().await;

        let (status, body) = post_sale(&state, sale_body("missing", 1)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let state = test_state().await;

        let (status, body) = post_sale(&state, json!({ "data": { "customer_name": 7 } })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let mut invalid = sale_body("p", 1);
        invalid["data"]["total_cents"] = json!(1);
        let (status, _) = post_sale(&state, invalid).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_overflowing_amounts_are_bad_request() {
        let state = test_state().await;
        let product = stocked(&state, 10).await;

        let mut huge = sale_body(&product, 1);
        huge["data"]["subtotal_cents"] = json!(i64::MAX);
        huge["data"]["tax_amount_cents"] = json!(1);
        huge["data"]["total_cents"] = json!(0);

        let (status, body) = post_sale(&state, huge).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(state.db.products().stock_of(&product).await.unwrap(), 10);
        assert_eq!(state.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_schema_is_not_found() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        let state = AppState::new(db, Arc::new(FixedClock::new(Local::now())));

        let (status, body) = get(&state, "/sales/summary/month").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_storage_failure_is_generic() {
        let state = test_state().await;
        state.db.close().await;

        let (status, body) = get(&state, "/sales/summary/month").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert_eq!(body["message"], "Database operation failed");
    }

    #[tokio::test]
    async fn test_health() {
        let state = test_state().await;

        let response = app(state, Duration::from_secs(5))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["migrations"]["applied"], body["migrations"]["total"]);
    }
}
