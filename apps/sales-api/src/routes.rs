//! HTTP handlers.
//!
//! Each handler does one thing: extract, call till-db, wrap the result.
//! Errors become [`ApiError`] through `?`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use till_core::{ChartPoint, NewSale, Sale, Summary};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::AppState;

// =============================================================================
// Envelopes
// =============================================================================

/// `{ "data": ... }` wrapper used by request and response bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Body of a successful `POST /sales`.
#[derive(Debug, Clone, Serialize)]
pub struct SaleCreated {
    pub data: Sale,
    pub meta: Meta,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub success: bool,
}

// =============================================================================
// Summaries
// =============================================================================

/// `GET /sales/summary/:period`
pub async fn get_summary(
    State(state): State<AppState>,
    period: Result<Path<String>, PathRejection>,
) -> Result<Json<DataEnvelope<Summary>>, ApiError> {
    let Path(period) = period.map_err(|rejection| {
        warn!(error = %rejection, "Malformed period segment");
        ApiError::from(rejection)
    })?;
    debug!(period = %period, "GET summary");

    let summary = state.reports.get_summary(&period).await?;
    Ok(Json(DataEnvelope { data: summary }))
}

/// `GET /sales/summary`
pub async fn get_all_summaries(
    State(state): State<AppState>,
) -> Result<Json<DataEnvelope<BTreeMap<String, Summary>>>, ApiError> {
    debug!("GET all summaries");

    let summaries = state.reports.get_all_summaries().await?;
    Ok(Json(DataEnvelope { data: summaries }))
}

/// `GET /sales/chartData`, a bare array.
pub async fn get_chart_data(
    State(state): State<AppState>,
) -> Result<Json<Vec<ChartPoint>>, ApiError> {
    let points = state.reports.get_chart_series().await?;
    Ok(Json(points))
}

// =============================================================================
// Sales
// =============================================================================

/// `POST /sales`
pub async fn create_sale(
    State(state): State<AppState>,
    payload: Result<Json<DataEnvelope<NewSale>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(DataEnvelope { data: new_sale }) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Malformed sale body");
        ApiError::from(rejection)
    })?;

    let sale = state.db.sales().create_sale(&new_sale).await?;

    info!(id = %sale.id, lines = sale.products.len(), "POST sale");
    Ok((
        StatusCode::CREATED,
        Json(SaleCreated {
            data: sale,
            meta: Meta { success: true },
        }),
    ))
}

// =============================================================================
// Health
// =============================================================================

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if !state.db.health_check().await {
        warn!("Health check failed: database unavailable");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        );
    }

    match state.db.migration_status().await {
        Ok(migrations) => {
            let status = if migrations.is_current() { "ok" } else { "degraded" };
            (
                StatusCode::OK,
                Json(json!({ "status": status, "migrations": migrations })),
            )
        }
        Err(e) => {
            warn!(error = %e, "Could not read migration status");
            (StatusCode::OK, Json(json!({ "status": "degraded" })))
        }
    }
}
