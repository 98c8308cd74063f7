//! EDAP simulator endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use nfeasy_common::models::EdapResponse;
use nfeasy_common::time::now;
use serde::Serialize;

use super::response::{ApiError, ApiResponse, ApiResult};
use crate::connectors::edap::{
    EdapConnectionDetails, EdapReceipt, EdapSendRequest, EdapSubmission, ManifestationReceipt,
    ManifestationRequest,
};
use crate::query::{self, EdapFilter};
use crate::AppState;

/// Body returned with HTTP 400 when the gateway rejects a submission
#[derive(Debug, Serialize)]
pub struct EdapRejectionBody {
    pub success: bool,
    pub message: String,
    pub errors: Vec<String>,
    pub data: EdapReceipt,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/edap/test-connection
pub async fn test_connection(State(state): State<AppState>) -> ApiResult<EdapConnectionDetails> {
    let probe = state.edap.test_connection().await?;
    Ok(Json(ApiResponse::ok(probe.details).with_message(probe.message)))
}

/// POST /api/edap/send
pub async fn send(
    State(state): State<AppState>,
    payload: Result<Json<EdapSendRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;

    let response = match state.edap.send(request).await? {
        EdapSubmission::Accepted(receipt) => Json(
            ApiResponse::ok(receipt).with_message("Data successfully sent to EDAP"),
        )
        .into_response(),
        EdapSubmission::Rejected { receipt, errors } => (
            StatusCode::BAD_REQUEST,
            Json(EdapRejectionBody {
                success: false,
                message: "EDAP processing failed".to_string(),
                errors,
                data: receipt,
                timestamp: now(),
            }),
        )
            .into_response(),
    };
    Ok(response)
}

/// GET /api/edap/status/:invoice_id
pub async fn get_status(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> ApiResult<EdapResponse> {
    let response = query::get_edap_status(state.store.as_ref(), &invoice_id).await?;
    Ok(Json(ApiResponse::ok(response)))
}

/// GET /api/edap/responses?status=&limit=
pub async fn list_responses(
    State(state): State<AppState>,
    filter: Result<Query<EdapFilter>, QueryRejection>,
) -> ApiResult<Vec<EdapResponse>> {
    let Query(filter) = filter?;
    let page = query::list_edap_responses(state.store.as_ref(), &filter).await?;
    Ok(Json(ApiResponse::ok(page.items).with_total(page.total)))
}

/// POST /api/edap/manifestation
pub async fn manifestation(
    State(state): State<AppState>,
    payload: Result<Json<ManifestationRequest>, JsonRejection>,
) -> ApiResult<ManifestationReceipt> {
    let Json(request) = payload?;
    let receipt = state.edap.manifestation(request).await?;
    let message = format!(
        "Manifestation {} processed successfully",
        receipt.manifestation_type
    );
    Ok(Json(ApiResponse::ok(receipt).with_message(message)))
}
