//! Filter/query layer
//!
//! Pure predicates over store contents. Filters are conjunctive, an empty
//! value counts as absent, and status filters compare wire names, so an
//! unknown status simply matches nothing.

use nfeasy_common::models::{EbsRecord, EdapResponse, Invoice, Workflow};
use nfeasy_common::{Error, Result};
use serde::Deserialize;
use tracing::debug;

use crate::store::RecordStore;

/// Default page size for EDAP response listings
pub const DEFAULT_EDAP_LIMIT: usize = 10;

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Query parameters for invoice listings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilter {
    pub status: Option<String>,
    pub supplier: Option<String>,
    pub validation_status: Option<String>,
}

impl InvoiceFilter {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        present(&self.status).map_or(true, |s| invoice.status.as_str() == s)
            && present(&self.supplier).map_or(true, |s| contains_ignore_case(&invoice.supplier, s))
            && present(&self.validation_status)
                .map_or(true, |s| invoice.validation_status.as_str() == s)
    }
}

/// Query parameters for workflow listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowFilter {
    pub status: Option<String>,
    pub supplier: Option<String>,
}

impl WorkflowFilter {
    pub fn matches(&self, workflow: &Workflow) -> bool {
        present(&self.status).map_or(true, |s| workflow.status.as_str() == s)
            && present(&self.supplier).map_or(true, |s| contains_ignore_case(&workflow.supplier, s))
    }
}

/// Query parameters for EBS source listings; both fields are substring
/// matches since EBS labels are free text
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EbsFilter {
    pub status: Option<String>,
    pub supplier: Option<String>,
}

impl EbsFilter {
    pub fn matches(&self, record: &EbsRecord) -> bool {
        present(&self.status).map_or(true, |s| contains_ignore_case(&record.status, s))
            && present(&self.supplier).map_or(true, |s| contains_ignore_case(&record.supplier, s))
    }
}

/// Query parameters for EDAP response listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdapFilter {
    pub status: Option<String>,
    pub limit: Option<usize>,
}

impl EdapFilter {
    pub fn matches(&self, response: &EdapResponse) -> bool {
        present(&self.status).map_or(true, |s| response.status.as_str().eq_ignore_ascii_case(s))
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_EDAP_LIMIT)
    }
}

/// A filtered page: `total` counts every match, `items` may be truncated
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

pub async fn list_invoices(store: &dyn RecordStore, filter: &InvoiceFilter) -> Result<Vec<Invoice>> {
    let invoices: Vec<Invoice> = store
        .list_invoices()
        .await?
        .into_iter()
        .filter(|i| filter.matches(i))
        .collect();
    debug!(?filter, matched = invoices.len(), "invoice query");
    Ok(invoices)
}

pub async fn get_invoice(store: &dyn RecordStore, id: &str) -> Result<Invoice> {
    store
        .get_invoice(id)
        .await?
        .ok_or_else(|| Error::InvoiceNotFound(id.to_string()))
}

pub async fn list_workflows(store: &dyn RecordStore, filter: &WorkflowFilter) -> Result<Vec<Workflow>> {
    let workflows: Vec<Workflow> = store
        .list_workflows()
        .await?
        .into_iter()
        .filter(|w| filter.matches(w))
        .collect();
    debug!(?filter, matched = workflows.len(), "workflow query");
    Ok(workflows)
}

pub async fn get_workflow(store: &dyn RecordStore, id: &str) -> Result<Workflow> {
    store
        .get_workflow(id)
        .await?
        .ok_or_else(|| Error::WorkflowNotFound(id.to_string()))
}

pub async fn list_ebs_records(store: &dyn RecordStore, filter: &EbsFilter) -> Result<Vec<EbsRecord>> {
    Ok(store
        .list_ebs_records()
        .await?
        .into_iter()
        .filter(|r| filter.matches(r))
        .collect())
}

/// EBS ids are integers; any id that does not parse is simply not found
pub async fn get_ebs_record(store: &dyn RecordStore, id: &str) -> Result<EbsRecord> {
    let record = match id.parse::<u32>() {
        Ok(numeric) => store.get_ebs_record(numeric).await?,
        Err(_) => None,
    };
    record.ok_or_else(|| Error::EbsRecordNotFound(id.to_string()))
}

pub async fn list_edap_responses(
    store: &dyn RecordStore,
    filter: &EdapFilter,
) -> Result<Page<EdapResponse>> {
    let matched: Vec<EdapResponse> = store
        .list_edap_responses()
        .await?
        .into_iter()
        .filter(|r| filter.matches(r))
        .collect();
    let total = matched.len();
    let items = matched.into_iter().take(filter.limit()).collect();
    Ok(Page { items, total })
}

/// First EDAP response recorded for an invoice reference
pub async fn get_edap_status(store: &dyn RecordStore, invoice_id: &str) -> Result<EdapResponse> {
    store
        .list_edap_responses()
        .await?
        .into_iter()
        .find(|r| r.invoice_id == invoice_id)
        .ok_or_else(|| Error::EdapRecordNotFound(invoice_id.to_string()))
}
