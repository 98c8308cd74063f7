//! Invoice endpoints

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use nfeasy_common::models::Invoice;
use nfeasy_common::Error;
use serde::Deserialize;

use super::response::{required, ApiError, ApiResponse, ApiResult};
use crate::query::{self, InvoiceFilter};
use crate::AppState;

/// Body of `PATCH /api/invoices/:id/status`
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

/// GET /api/invoices?status=&supplier=&validationStatus=
pub async fn list_invoices(
    State(state): State<AppState>,
    filter: Result<Query<InvoiceFilter>, QueryRejection>,
) -> ApiResult<Vec<Invoice>> {
    let Query(filter) = filter?;
    let invoices = query::list_invoices(state.store.as_ref(), &filter).await?;
    let total = invoices.len();
    Ok(Json(ApiResponse::ok(invoices).with_total(total)))
}

/// GET /api/invoices/:id
pub async fn get_invoice(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Invoice> {
    let invoice = query::get_invoice(state.store.as_ref(), &id).await?;
    Ok(Json(ApiResponse::ok(invoice)))
}

/// POST /api/invoices/:id/validate
///
/// Runs the validation transition in its own task so it completes even if
/// the client goes away during the simulated delay.
pub async fn validate_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Invoice> {
    let engine = Arc::clone(&state.engine);
    let invoice = tokio::spawn(async move { engine.validate_invoice(&id).await })
        .await
        .map_err(|e| ApiError(Error::Internal(format!("validation task failed: {}", e))))??;

    Ok(Json(
        ApiResponse::ok(invoice).with_message("Invoice validation completed"),
    ))
}

/// PATCH /api/invoices/:id/status
pub async fn update_invoice_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> ApiResult<Invoice> {
    let Json(request) = payload?;
    let status = required(request.status, "status")?;

    let invoice = state.engine.update_invoice_status(&id, &status).await?;
    Ok(Json(ApiResponse::ok(invoice).with_message("Invoice status updated")))
}
