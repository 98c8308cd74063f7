//! Workflow statistics aggregation

use nfeasy_common::models::{Workflow, WorkflowStatus};
use nfeasy_common::Result;
use serde::Serialize;

use crate::store::RecordStore;

/// Workflow overview counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowOverview {
    pub total_workflows: usize,
    pub pending_validation: usize,
    pub divergence_detected: usize,
    pub resolved: usize,
    pub total_divergences: usize,
    pub resolved_divergences: usize,
    /// Percentage of resolved divergences with one decimal place, or `"0"`
    /// when there are no divergences at all
    pub resolution_rate: String,
}

/// Aggregate counts over a workflow set
pub fn compute_overview(workflows: &[Workflow]) -> WorkflowOverview {
    let count_status = |status: WorkflowStatus| workflows.iter().filter(|w| w.status == status).count();

    let total_divergences: usize = workflows.iter().map(|w| w.divergences.len()).sum();
    let resolved_divergences: usize = workflows
        .iter()
        .map(|w| w.divergences.iter().filter(|d| d.is_resolved()).count())
        .sum();

    WorkflowOverview {
        total_workflows: workflows.len(),
        pending_validation: count_status(WorkflowStatus::PendingValidation),
        divergence_detected: count_status(WorkflowStatus::DivergenceDetected),
        resolved: count_status(WorkflowStatus::Resolved),
        total_divergences,
        resolved_divergences,
        resolution_rate: resolution_rate(resolved_divergences, total_divergences),
    }
}

fn resolution_rate(resolved: usize, total: usize) -> String {
    if total == 0 {
        return "0".to_string();
    }
    // Ties round away from zero; `{:.1}` alone rounds them to even
    let pct = resolved as f64 / total as f64 * 100.0;
    format!("{:.1}", (pct * 10.0).round() / 10.0)
}

/// Overview over every workflow currently in the store
pub async fn workflow_overview(store: &dyn RecordStore) -> Result<WorkflowOverview> {
    Ok(compute_overview(&store.list_workflows().await?))
}
