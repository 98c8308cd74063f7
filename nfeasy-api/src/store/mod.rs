//! Record store
//!
//! The transition engine, query layer and statistics read and write records
//! only through [`RecordStore`], so the in-memory backend can be replaced by a
//! persistent one without touching them.

mod fixtures;
mod memory;

pub use fixtures::seed_records;
pub use memory::MemoryStore;

use async_trait::async_trait;
use nfeasy_common::models::{EbsRecord, EdapResponse, Invoice, Workflow};
use nfeasy_common::Result;

/// Repository over the four record kinds
///
/// `list_*` return records in ascending id order. `get_*` return `Ok(None)`
/// for an unknown id; turning that into a not-found error is the caller's
/// decision. `put_*` inserts or replaces by id.
///
/// Implementations must be `Send + Sync + 'static` to live in axum state.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    async fn list_invoices(&self) -> Result<Vec<Invoice>>;
    async fn get_invoice(&self, id: &str) -> Result<Option<Invoice>>;
    async fn put_invoice(&self, invoice: Invoice) -> Result<()>;

    async fn list_workflows(&self) -> Result<Vec<Workflow>>;
    async fn get_workflow(&self, id: &str) -> Result<Option<Workflow>>;
    async fn put_workflow(&self, workflow: Workflow) -> Result<()>;

    async fn list_ebs_records(&self) -> Result<Vec<EbsRecord>>;
    async fn get_ebs_record(&self, id: u32) -> Result<Option<EbsRecord>>;

    async fn list_edap_responses(&self) -> Result<Vec<EdapResponse>>;
}

/// Seed data for every collection
#[derive(Debug, Clone, Default)]
pub struct SeedRecords {
    pub invoices: Vec<Invoice>,
    pub workflows: Vec<Workflow>,
    pub ebs_records: Vec<EbsRecord>,
    pub edap_responses: Vec<EdapResponse>,
}
