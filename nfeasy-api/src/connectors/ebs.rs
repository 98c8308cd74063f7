//! EBS ERP simulator

use std::time::Duration;

use nfeasy_common::config::EbsConfig;
use nfeasy_common::time::stamped_id;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{simulate_latency, ConnectionProbe, CONNECTED};

#[derive(Debug, Clone, Serialize)]
pub struct EbsConnectionDetails {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub status: String,
}

/// Body of `POST /api/ebs/post-data`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbsPostRequest {
    pub invoice_id: Option<String>,
    pub action: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EbsPostAck {
    pub transaction_id: String,
    pub status: String,
    pub invoice_id: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EbsConnector {
    probe_delay: Duration,
    post_delay: Duration,
}

impl EbsConnector {
    pub fn new(probe_delay: Duration, post_delay: Duration) -> Self {
        Self {
            probe_delay,
            post_delay,
        }
    }

    pub fn from_config(config: &EbsConfig) -> Self {
        Self::new(
            Duration::from_millis(config.probe_delay_ms),
            Duration::from_millis(config.post_delay_ms),
        )
    }

    /// Always succeeds after the probe delay
    pub async fn test_connection(&self) -> ConnectionProbe<EbsConnectionDetails> {
        simulate_latency(self.probe_delay).await;
        ConnectionProbe {
            message: "EBS connection successful (mock)".to_string(),
            details: EbsConnectionDetails {
                host: "ebs.alumar.local".to_string(),
                port: 8080,
                database: "EBS_PROD".to_string(),
                status: CONNECTED.to_string(),
            },
        }
    }

    /// Acknowledge data posted back to EBS
    pub async fn post_data(&self, request: EbsPostRequest) -> (String, EbsPostAck) {
        simulate_latency(self.post_delay).await;

        let invoice = request.invoice_id.as_deref().unwrap_or("unknown");
        let ack = EbsPostAck {
            transaction_id: stamped_id("TXN-"),
            status: "COMPLETED".to_string(),
            invoice_id: request.invoice_id.clone(),
            action: request.action.clone(),
        };
        info!(invoice, transaction = %ack.transaction_id, "Posted data to EBS");

        (
            format!("Data successfully posted to EBS for invoice {}", invoice),
            ack,
        )
    }
}
