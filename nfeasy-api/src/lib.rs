//! nfeasy-api library - NF-e workflow tracking service
//!
//! Tracks fiscal invoices and their divergence-resolution workflows between
//! the EBS ERP, the EDAP gateway and SEFAZ. Records live in an in-memory
//! store seeded from fixtures; connectors are simulators.

use std::sync::Arc;

use axum::Router;
use nfeasy_common::config::ServiceConfig;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod connectors;
pub mod engine;
pub mod outcome;
pub mod query;
pub mod stats;
pub mod store;

use connectors::{EbsConnector, EdapConnector};
use engine::TransitionEngine;
use outcome::{OutcomePolicy, RandomOutcome};
use store::RecordStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record store (read path for queries and statistics)
    pub store: Arc<dyn RecordStore>,
    /// Write path for every status transition
    pub engine: Arc<TransitionEngine>,
    pub ebs: Arc<EbsConnector>,
    pub edap: Arc<EdapConnector>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        store: Arc<dyn RecordStore>,
        engine: Arc<TransitionEngine>,
        ebs: Arc<EbsConnector>,
        edap: Arc<EdapConnector>,
    ) -> Self {
        Self {
            store,
            engine,
            ebs,
            edap,
        }
    }

    /// Wire every component from configuration, using random outcomes at
    /// the configured rates
    pub fn from_config(config: &ServiceConfig, store: Arc<dyn RecordStore>) -> Self {
        let validation: Arc<dyn OutcomePolicy> =
            Arc::new(RandomOutcome::with_failure_rate(config.validation.failure_rate));
        Self::with_validation_outcome(config, store, validation)
    }

    /// Like [`AppState::from_config`] but with an explicit validation outcome
    pub fn with_validation_outcome(
        config: &ServiceConfig,
        store: Arc<dyn RecordStore>,
        validation: Arc<dyn OutcomePolicy>,
    ) -> Self {
        let engine = TransitionEngine::new(Arc::clone(&store), validation, config.validation.delay());
        Self::new(
            store,
            Arc::new(engine),
            Arc::new(EbsConnector::from_config(&config.ebs)),
            Arc::new(EdapConnector::from_config(&config.edap)),
        )
    }

    /// Replace the EDAP connector (e.g. one with a fixed outcome)
    pub fn with_edap(mut self, edap: EdapConnector) -> Self {
        self.edap = Arc::new(edap);
        self
    }
}

/// Build application router
///
/// Dashboard page at `/`, JSON API under `/api`.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .nest("/api", api::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
