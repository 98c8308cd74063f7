//! Process-lifetime in-memory store

use std::collections::BTreeMap;

use async_trait::async_trait;
use nfeasy_common::models::{EbsRecord, EdapResponse, Invoice, Workflow};
use nfeasy_common::Result;
use tokio::sync::RwLock;

use super::{seed_records, RecordStore, SeedRecords};

/// One `RwLock` per collection; readers of one kind never wait on writers
/// of another.
#[derive(Debug, Default)]
pub struct MemoryStore {
    invoices: RwLock<BTreeMap<String, Invoice>>,
    workflows: RwLock<BTreeMap<String, Workflow>>,
    ebs_records: RwLock<BTreeMap<u32, EbsRecord>>,
    edap_responses: RwLock<BTreeMap<String, EdapResponse>>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store populated with the given records
    pub fn from_seed(seed: SeedRecords) -> Self {
        Self {
            invoices: RwLock::new(seed.invoices.into_iter().map(|r| (r.id.clone(), r)).collect()),
            workflows: RwLock::new(seed.workflows.into_iter().map(|r| (r.id.clone(), r)).collect()),
            ebs_records: RwLock::new(seed.ebs_records.into_iter().map(|r| (r.id, r)).collect()),
            edap_responses: RwLock::new(
                seed.edap_responses.into_iter().map(|r| (r.id.clone(), r)).collect(),
            ),
        }
    }

    /// Store populated with the built-in demonstration fixtures
    pub fn seeded() -> Result<Self> {
        Ok(Self::from_seed(seed_records()?))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_invoices(&self) -> Result<Vec<Invoice>> {
        Ok(self.invoices.read().await.values().cloned().collect())
    }

    async fn get_invoice(&self, id: &str) -> Result<Option<Invoice>> {
        Ok(self.invoices.read().await.get(id).cloned())
    }

    async fn put_invoice(&self, invoice: Invoice) -> Result<()> {
        self.invoices.write().await.insert(invoice.id.clone(), invoice);
        Ok(())
    }

    async fn list_workflows(&self) -> Result<Vec<Workflow>> {
        Ok(self.workflows.read().await.values().cloned().collect())
    }

    async fn get_workflow(&self, id: &str) -> Result<Option<Workflow>> {
        Ok(self.workflows.read().await.get(id).cloned())
    }

    async fn put_workflow(&self, workflow: Workflow) -> Result<()> {
        self.workflows.write().await.insert(workflow.id.clone(), workflow);
        Ok(())
    }

    async fn list_ebs_records(&self) -> Result<Vec<EbsRecord>> {
        Ok(self.ebs_records.read().await.values().cloned().collect())
    }

    async fn get_ebs_record(&self, id: u32) -> Result<Option<EbsRecord>> {
        Ok(self.ebs_records.read().await.get(&id).cloned())
    }

    async fn list_edap_responses(&self) -> Result<Vec<EdapResponse>> {
        Ok(self.edap_responses.read().await.values().cloned().collect())
    }
}
