//! EDAP fiscal gateway simulator

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use nfeasy_common::config::EdapConfig;
use nfeasy_common::models::EdapStatus;
use nfeasy_common::time::{now, parse_rfc3339, stamped_id};
use nfeasy_common::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{simulate_latency, ConnectionProbe, CONNECTED};
use crate::outcome::{OutcomePolicy, RandomOutcome};

/// Errors reported for every rejected submission
pub const REJECTION_ERRORS: [&str; 2] = ["Invalid XML format", "Missing required fields"];

const LAST_SYNC: &str = "2024-01-15T10:00:00Z";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdapConnectionDetails {
    pub endpoint: String,
    pub version: String,
    pub status: String,
    pub last_sync: DateTime<Utc>,
}

/// Body of `POST /api/edap/send`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdapSendRequest {
    #[serde(default)]
    pub invoice_data: serde_json::Value,
    pub action: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdapReceipt {
    pub id: String,
    pub status: EdapStatus,
    pub invoice_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sefaz_protocol: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum EdapSubmission {
    Accepted(EdapReceipt),
    Rejected {
        receipt: EdapReceipt,
        errors: Vec<String>,
    },
}

/// Body of `POST /api/edap/manifestation`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestationRequest {
    pub invoice_id: Option<String>,
    pub manifestation_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestationReceipt {
    pub invoice_id: String,
    pub manifestation_type: String,
    pub protocol: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

pub struct EdapConnector {
    probe_delay: Duration,
    send_delay: Duration,
    manifestation_delay: Duration,
    outcome: Arc<dyn OutcomePolicy>,
}

impl EdapConnector {
    pub fn new(
        probe_delay: Duration,
        send_delay: Duration,
        manifestation_delay: Duration,
        outcome: Arc<dyn OutcomePolicy>,
    ) -> Self {
        Self {
            probe_delay,
            send_delay,
            manifestation_delay,
            outcome,
        }
    }

    /// Connector using a random outcome at the configured success rate
    pub fn from_config(config: &EdapConfig) -> Self {
        Self::new(
            Duration::from_millis(config.probe_delay_ms),
            Duration::from_millis(config.send_delay_ms),
            Duration::from_millis(config.manifestation_delay_ms),
            Arc::new(RandomOutcome::with_success_rate(config.success_rate)),
        )
    }

    pub fn with_outcome(mut self, outcome: Arc<dyn OutcomePolicy>) -> Self {
        self.outcome = outcome;
        self
    }

    pub async fn test_connection(&self) -> Result<ConnectionProbe<EdapConnectionDetails>> {
        simulate_latency(self.probe_delay).await;
        Ok(ConnectionProbe {
            message: "EDAP connection successful (mock)".to_string(),
            details: EdapConnectionDetails {
                endpoint: "https://edap.sefaz.ma.gov.br/api".to_string(),
                version: "v2.1".to_string(),
                status: CONNECTED.to_string(),
                last_sync: parse_rfc3339(LAST_SYNC)?,
            },
        })
    }

    /// Submit an invoice to the gateway
    ///
    /// `invoiceData.invoiceId` is required; its absence is rejected before the
    /// delay. A rejection by the gateway is a normal return value.
    pub async fn send(&self, request: EdapSendRequest) -> Result<EdapSubmission> {
        let invoice_id = request
            .invoice_data
            .get("invoiceId")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidInput("invoiceData.invoiceId is required".to_string()))?;

        simulate_latency(self.send_delay).await;

        let receipt_id = stamped_id("EDAP");
        if self.outcome.succeeds() {
            info!(invoice = %invoice_id, receipt = %receipt_id, "EDAP accepted submission");
            Ok(EdapSubmission::Accepted(EdapReceipt {
                id: receipt_id,
                status: EdapStatus::Success,
                invoice_id,
                sefaz_protocol: Some(stamped_id("SEFAZ-")),
                timestamp: now(),
            }))
        } else {
            warn!(invoice = %invoice_id, receipt = %receipt_id, "EDAP rejected submission");
            Ok(EdapSubmission::Rejected {
                receipt: EdapReceipt {
                    id: receipt_id,
                    status: EdapStatus::Error,
                    invoice_id,
                    sefaz_protocol: None,
                    timestamp: now(),
                },
                errors: REJECTION_ERRORS.iter().map(|e| e.to_string()).collect(),
            })
        }
    }

    /// Register a recipient manifestation with SEFAZ
    pub async fn manifestation(&self, request: ManifestationRequest) -> Result<ManifestationReceipt> {
        let invoice_id = request
            .invoice_id
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::InvalidInput("invoiceId is required".to_string()))?;
        let manifestation_type = request
            .manifestation_type
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::InvalidInput("manifestationType is required".to_string()))?;

        simulate_latency(self.manifestation_delay).await;

        let receipt = ManifestationReceipt {
            invoice_id,
            manifestation_type,
            protocol: stamped_id("SEFAZ-MAN-"),
            status: "PROCESSED".to_string(),
            timestamp: now(),
        };
        info!(invoice = %receipt.invoice_id, kind = %receipt.manifestation_type, "Manifestation processed");
        Ok(receipt)
    }
}
