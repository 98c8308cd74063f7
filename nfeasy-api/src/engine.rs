//! Status transition engine
//!
//! Applies validate / resolve / force-resolve / set-status transitions to
//! invoices and workflows.
//!
//! Every write is a read-modify-write against the [`RecordStore`], so each
//! collection has a write gate held across the cycle. The simulated validation
//! delay runs before the gate is taken.

use std::sync::Arc;
use std::time::Duration;

use nfeasy_common::models::{
    Divergence, DivergenceStatus, Invoice, InvoiceStatus, ValidationStatus, Workflow,
    WorkflowStatus,
};
use nfeasy_common::time::{now, stamped_id};
use nfeasy_common::{Error, Result};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::outcome::OutcomePolicy;
use crate::query;
use crate::store::RecordStore;

/// Divergence type recorded when a validation run fails
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

pub struct TransitionEngine {
    store: Arc<dyn RecordStore>,
    outcome: Arc<dyn OutcomePolicy>,
    validation_delay: Duration,
    invoice_gate: Mutex<()>,
    workflow_gate: Mutex<()>,
}

impl TransitionEngine {
    pub fn new(
        store: Arc<dyn RecordStore>,
        outcome: Arc<dyn OutcomePolicy>,
        validation_delay: Duration,
    ) -> Self {
        Self {
            store,
            outcome,
            validation_delay,
            invoice_gate: Mutex::new(()),
            workflow_gate: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Run the simulated validation pipeline on an invoice
    ///
    /// Fails with `InvoiceNotFound` before waiting if the invoice is unknown.
    /// A failed validation is not an error: the returned invoice is in the
    /// ERROR state with a single fresh divergence.
    pub async fn validate_invoice(&self, id: &str) -> Result<Invoice> {
        query::get_invoice(self.store.as_ref(), id).await?;

        if !self.validation_delay.is_zero() {
            tokio::time::sleep(self.validation_delay).await;
        }
        let passed = self.outcome.succeeds();

        let _gate = self.invoice_gate.lock().await;
        let mut invoice = query::get_invoice(self.store.as_ref(), id).await?;
        let at = now();

        invoice.validation_status = ValidationStatus::Ready;
        if passed {
            invoice.status = InvoiceStatus::Validated;
            invoice.divergences.clear();
            info!(invoice = %id, "Invoice validated");
        } else {
            invoice.status = InvoiceStatus::Error;
            invoice.divergences = vec![Divergence::pending(
                stamped_id("DIV"),
                VALIDATION_ERROR,
                "Invoice validation failed",
                at,
            )];
            warn!(invoice = %id, "Invoice validation failed");
        }
        invoice.updated_at = Some(at);

        self.store.put_invoice(invoice.clone()).await?;
        Ok(invoice)
    }

    /// Overwrite an invoice's status
    ///
    /// `status` is parsed against the closed set first; an unknown value is
    /// `InvalidStatus` even when the invoice does not exist.
    pub async fn update_invoice_status(&self, id: &str, status: &str) -> Result<Invoice> {
        let status: InvoiceStatus = status.parse()?;

        let _gate = self.invoice_gate.lock().await;
        let mut invoice = query::get_invoice(self.store.as_ref(), id).await?;
        let previous = invoice.status;
        invoice.status = status;
        invoice.updated_at = Some(now());

        self.store.put_invoice(invoice.clone()).await?;
        info!(invoice = %id, from = %previous, to = %status, "Invoice status updated");
        Ok(invoice)
    }

    /// Resolve one divergence inside a workflow
    ///
    /// When this leaves every divergence with a `resolved_at`, the workflow
    /// itself becomes RESOLVED.
    pub async fn resolve_divergence(
        &self,
        workflow_id: &str,
        divergence_id: &str,
        resolution: &str,
    ) -> Result<Workflow> {
        let _gate = self.workflow_gate.lock().await;
        let mut workflow = query::get_workflow(self.store.as_ref(), workflow_id).await?;
        let at = now();

        let divergence = workflow.divergence_mut(divergence_id).ok_or_else(|| {
            Error::DivergenceNotFound {
                workflow_id: workflow_id.to_string(),
                divergence_id: divergence_id.to_string(),
            }
        })?;
        divergence.resolved_at = Some(at);
        divergence.resolution = Some(resolution.to_string());
        divergence.status = DivergenceStatus::Resolved;
        info!(workflow = %workflow_id, divergence = %divergence_id, "Divergence resolved");

        if workflow.all_divergences_resolved() {
            workflow.status = WorkflowStatus::Resolved;
            workflow.resolved_at = Some(at);
            info!(workflow = %workflow_id, "All divergences resolved, workflow resolved");
        }

        self.store.put_workflow(workflow.clone()).await?;
        Ok(workflow)
    }

    /// Mark a workflow RESOLVED regardless of its divergences
    ///
    /// This can leave a RESOLVED workflow holding unresolved divergences.
    pub async fn force_resolve_workflow(&self, workflow_id: &str) -> Result<Workflow> {
        let _gate = self.workflow_gate.lock().await;
        let mut workflow = query::get_workflow(self.store.as_ref(), workflow_id).await?;

        let open = workflow.divergences.iter().filter(|d| !d.is_resolved()).count();
        if open > 0 {
            warn!(workflow = %workflow_id, open, "Force-resolving workflow with open divergences");
        }

        workflow.status = WorkflowStatus::Resolved;
        workflow.resolved_at = Some(now());

        self.store.put_workflow(workflow.clone()).await?;
        info!(workflow = %workflow_id, "Workflow marked as resolved");
        Ok(workflow)
    }
}
