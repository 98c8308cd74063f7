//! HTTP API handlers for nfeasy-api

pub mod buildinfo;
pub mod ebs;
pub mod edap;
pub mod health;
pub mod invoices;
pub mod response;
pub mod ui;
pub mod workflows;

pub use buildinfo::get_build_info;
pub use health::health_check;
pub use response::{ApiError, ApiResponse};
pub use ui::{serve_app_js, serve_index};

use axum::routing::{get, patch, post};
use axum::Router;

use crate::AppState;

/// Routes mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/buildinfo", get(get_build_info))
        // Invoices
        .route("/invoices", get(invoices::list_invoices))
        .route("/invoices/:id", get(invoices::get_invoice))
        .route("/invoices/:id/validate", post(invoices::validate_invoice))
        .route("/invoices/:id/status", patch(invoices::update_invoice_status))
        // Workflows
        .route("/workflows", get(workflows::list_workflows))
        .route("/workflows/stats/overview", get(workflows::get_overview))
        .route("/workflows/:id", get(workflows::get_workflow))
        .route("/workflows/:id/resolve", post(workflows::resolve_divergence))
        .route("/workflows/:id/mark-resolved", patch(workflows::mark_resolved))
        // EBS simulator
        .route("/ebs/test-connection", get(ebs::test_connection))
        .route("/ebs/data", get(ebs::list_data))
        .route("/ebs/data/:id", get(ebs::get_data))
        .route("/ebs/post-data", post(ebs::post_data))
        // EDAP simulator
        .route("/edap/test-connection", get(edap::test_connection))
        .route("/edap/send", post(edap::send))
        .route("/edap/status/:invoice_id", get(edap::get_status))
        .route("/edap/responses", get(edap::list_responses))
        .route("/edap/manifestation", post(edap::manifestation))
}
