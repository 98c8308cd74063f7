//! Common error types for NF-easy

use thiserror::Error;

/// Common result type for NF-easy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across NF-easy services
///
/// Every not-found case has its own variant so callers can tell a missing
/// workflow from a missing divergence inside an existing workflow.
#[derive(Error, Debug)]
pub enum Error {
    /// No invoice with the given id
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    /// No workflow with the given id
    #[error("Workflow not found: {0}")]
    WorkflowNotFound(String),

    /// Workflow exists but holds no divergence with the given id
    #[error("Divergence not found: {divergence_id} (workflow {workflow_id})")]
    DivergenceNotFound {
        workflow_id: String,
        divergence_id: String,
    },

    /// No EBS source record with the given id
    #[error("EBS record not found: {0}")]
    EbsRecordNotFound(String),

    /// Invoice id unknown to the EDAP gateway
    #[error("Invoice not found in EDAP system: {0}")]
    EdapRecordNotFound(String),

    /// Status value outside the closed set for the record kind
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record store backend error
    #[error("Store error: {0}")]
    Store(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable kind, reported alongside the message
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Error::WorkflowNotFound(_) => "WORKFLOW_NOT_FOUND",
            Error::DivergenceNotFound { .. } => "DIVERGENCE_NOT_FOUND",
            Error::EbsRecordNotFound(_) => "EBS_RECORD_NOT_FOUND",
            Error::EdapRecordNotFound(_) => "EDAP_RECORD_NOT_FOUND",
            Error::InvalidStatus(_) => "INVALID_STATUS",
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Store(_) => "STORE_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True for every "record or nested entity absent" variant
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::InvoiceNotFound(_)
                | Error::WorkflowNotFound(_)
                | Error::DivergenceNotFound { .. }
                | Error::EbsRecordNotFound(_)
                | Error::EdapRecordNotFound(_)
        )
    }
}
