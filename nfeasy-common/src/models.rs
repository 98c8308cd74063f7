//! Record models shared by the NF-easy services
//!
//! JSON field names are camelCase and status values are SCREAMING_SNAKE_CASE
//! so payloads match what the dashboard client expects.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Implements `as_str`, `Display` and `FromStr` for a status enum using its
/// wire names. `FromStr` rejects anything outside the closed set.
macro_rules! wire_enum {
    ($ty:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// All variants, in declaration order
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Wire name of the variant
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($ty::$variant),)+
                    other => Err(Error::InvalidStatus(format!(
                        "'{}' is not a valid {} (expected one of: {})",
                        other,
                        stringify!($ty),
                        [$($wire),+].join(", ")
                    ))),
                }
            }
        }
    };
}

// ============================================================================
// Status enumerations
// ============================================================================

/// Coarse invoice lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    PendingValidation,
    Validated,
    Processed,
    Error,
}

wire_enum!(InvoiceStatus {
    PendingValidation => "PENDING_VALIDATION",
    Validated => "VALIDATED",
    Processed => "PROCESSED",
    Error => "ERROR",
});

/// Validation pipeline sub-state, independent of [`InvoiceStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Reading,
    Validating,
    Ready,
}

wire_enum!(ValidationStatus {
    Reading => "READING",
    Validating => "VALIDATING",
    Ready => "READY",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DivergenceStatus {
    Pending,
    Resolved,
    Ignored,
}

wire_enum!(DivergenceStatus {
    Pending => "PENDING",
    Resolved => "RESOLVED",
    Ignored => "IGNORED",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

wire_enum!(Severity {
    Low => "LOW",
    Medium => "MEDIUM",
    High => "HIGH",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStatus {
    PendingValidation,
    DivergenceDetected,
    Resolved,
}

wire_enum!(WorkflowStatus {
    PendingValidation => "PENDING_VALIDATION",
    DivergenceDetected => "DIVERGENCE_DETECTED",
    Resolved => "RESOLVED",
});

/// Outcome of an EDAP submission as reported by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdapStatus {
    Success,
    Pending,
    Error,
}

wire_enum!(EdapStatus {
    Success => "SUCCESS",
    Pending => "PENDING",
    Error => "ERROR",
});

// ============================================================================
// Records
// ============================================================================

/// A detected inconsistency blocking an invoice or workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Divergence {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub status: DivergenceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl Divergence {
    /// New pending divergence
    pub fn pending(
        id: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            message: message.into(),
            status: DivergenceStatus::Pending,
            severity: None,
            created_at,
            resolved_at: None,
            resolution: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}

/// Normalized invoice tracked through validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub invoice_id: String,
    pub supplier: String,
    pub total: f64,
    pub status: InvoiceStatus,
    pub validation_status: ValidationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xml_data: Option<String>,
    pub divergences: Vec<Divergence>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Resolution process for one invoice's divergences
///
/// `invoice_id` refers to [`Invoice::invoice_id`] by value only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    pub invoice_id: String,
    pub supplier: String,
    pub total: f64,
    pub status: WorkflowStatus,
    pub divergences: Vec<Divergence>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Workflow {
    /// True when every divergence carries a resolution timestamp.
    /// Vacuously true for a workflow without divergences.
    pub fn all_divergences_resolved(&self) -> bool {
        self.divergences.iter().all(Divergence::is_resolved)
    }

    pub fn divergence_mut(&mut self, divergence_id: &str) -> Option<&mut Divergence> {
        self.divergences.iter_mut().find(|d| d.id == divergence_id)
    }
}

/// Source invoice as held by the EBS ERP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbsRecord {
    pub id: u32,
    pub invoice_id: String,
    pub supplier: String,
    pub total: f64,
    /// Free-form EBS label such as "Pending Validation"
    pub status: String,
    pub date: NaiveDate,
    pub xml_data: String,
    pub json_data: serde_json::Value,
}

/// Submission response recorded by the EDAP gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdapResponse {
    pub id: String,
    pub status: EdapStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub invoice_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}
