//! EBS simulator endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use nfeasy_common::models::EbsRecord;

use super::response::{ApiResponse, ApiResult};
use crate::connectors::ebs::{EbsConnectionDetails, EbsPostAck, EbsPostRequest};
use crate::query::{self, EbsFilter};
use crate::AppState;

/// GET /api/ebs/test-connection
pub async fn test_connection(State(state): State<AppState>) -> ApiResult<EbsConnectionDetails> {
    let probe = state.ebs.test_connection().await;
    Ok(Json(ApiResponse::ok(probe.details).with_message(probe.message)))
}

/// GET /api/ebs/data?status=&supplier=
pub async fn list_data(
    State(state): State<AppState>,
    filter: Result<Query<EbsFilter>, QueryRejection>,
) -> ApiResult<Vec<EbsRecord>> {
    let Query(filter) = filter?;
    let records = query::list_ebs_records(state.store.as_ref(), &filter).await?;
    let total = records.len();
    Ok(Json(ApiResponse::ok(records).with_total(total)))
}

/// GET /api/ebs/data/:id
pub async fn get_data(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<EbsRecord> {
    let record = query::get_ebs_record(state.store.as_ref(), &id).await?;
    Ok(Json(ApiResponse::ok(record)))
}

/// POST /api/ebs/post-data
pub async fn post_data(
    State(state): State<AppState>,
    payload: Result<Json<EbsPostRequest>, JsonRejection>,
) -> ApiResult<EbsPostAck> {
    let Json(request) = payload?;
    let (message, ack) = state.ebs.post_data(request).await;
    Ok(Json(ApiResponse::ok(ack).with_message(message)))
}
