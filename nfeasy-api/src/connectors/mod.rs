//! Connector simulators
//!
//! Stand-ins for the EBS ERP and the EDAP fiscal gateway. They hold no state:
//! each call waits a configured delay and returns a canned or randomly chosen
//! response. Record lookups (EBS data, EDAP status) go through the query
//! layer instead.

pub mod ebs;
pub mod edap;

pub use ebs::EbsConnector;
pub use edap::EdapConnector;

use std::time::Duration;

use serde::Serialize;

/// Reported by every connectivity probe
pub const CONNECTED: &str = "CONNECTED";

async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Result of a connectivity probe
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionProbe<T> {
    pub message: String,
    pub details: T,
}
