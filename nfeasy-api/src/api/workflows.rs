//! Workflow endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use nfeasy_common::models::Workflow;
use serde::Deserialize;

use super::response::{required, ApiResponse, ApiResult};
use crate::query::{self, WorkflowFilter};
use crate::stats::{self, WorkflowOverview};
use crate::AppState;

/// Body of `POST /api/workflows/:id/resolve`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub divergence_id: Option<String>,
    pub resolution: Option<String>,
}

/// GET /api/workflows?status=&supplier=
pub async fn list_workflows(
    State(state): State<AppState>,
    filter: Result<Query<WorkflowFilter>, QueryRejection>,
) -> ApiResult<Vec<Workflow>> {
    let Query(filter) = filter?;
    let workflows = query::list_workflows(state.store.as_ref(), &filter).await?;
    let total = workflows.len();
    Ok(Json(ApiResponse::ok(workflows).with_total(total)))
}

/// GET /api/workflows/:id
pub async fn get_workflow(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Workflow> {
    let workflow = query::get_workflow(state.store.as_ref(), &id).await?;
    Ok(Json(ApiResponse::ok(workflow)))
}

/// POST /api/workflows/:id/resolve
pub async fn resolve_divergence(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ResolveRequest>, JsonRejection>,
) -> ApiResult<Workflow> {
    let Json(request) = payload?;
    let divergence_id = required(request.divergence_id, "divergenceId")?;
    let resolution = required(request.resolution, "resolution")?;

    let workflow = state
        .engine
        .resolve_divergence(&id, &divergence_id, &resolution)
        .await?;
    Ok(Json(
        ApiResponse::ok(workflow).with_message("Divergence resolved successfully"),
    ))
}

/// PATCH /api/workflows/:id/mark-resolved
pub async fn mark_resolved(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Workflow> {
    let workflow = state.engine.force_resolve_workflow(&id).await?;
    Ok(Json(ApiResponse::ok(workflow).with_message("Workflow marked as resolved")))
}

/// GET /api/workflows/stats/overview
pub async fn get_overview(State(state): State<AppState>) -> ApiResult<WorkflowOverview> {
    let overview = stats::workflow_overview(state.store.as_ref()).await?;
    Ok(Json(ApiResponse::ok(overview)))
}
