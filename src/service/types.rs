//! Wire types and errors for the service control backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned by the logs endpoint whenever real logs cannot be fetched.
pub const NO_LOGS_SENTINEL: &str = "No logs available";

/// Backend user id used when no wallet is connected.
pub const DEFAULT_USER_ID: &str = "default";

/// Last counters reported by `GET /api/status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatusSnapshot {
    pub successful_buys: u64,
    pub total_fees_sent: Decimal,
    /// Fee collection wallet as reported by the backend
    #[serde(default)]
    pub fee_wallet: Option<String>,
}

/// Body of `POST /api/run-bot` responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunBotResponse {
    pub logs: String,
}

/// Body of `POST /api/burn` responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnResponse {
    pub reclaimed: Decimal,
}

/// Request body for lifecycle actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub user_id: String,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_snapshot_from_backend_json() {
        let body = r#"{"successful_buys": 7, "total_fees_sent": 0.000125, "fee_wallet": "9tzPdS72tm7vE8669BkghpsFaiR3Z1VS9K8rdEDeFQRD"}"#;
        let snapshot: ServiceStatusSnapshot = serde_json::from_str(body).unwrap();

        assert_eq!(snapshot.successful_buys, 7);
        assert_eq!(snapshot.total_fees_sent, Decimal::new(125, 6));
        assert_eq!(
            snapshot.fee_wallet.as_deref(),
            Some("9tzPdS72tm7vE8669BkghpsFaiR3Z1VS9K8rdEDeFQRD")
        );
    }

    #[test]
    fn test_status_snapshot_without_fee_wallet() {
        let body = r#"{"successful_buys": 0, "total_fees_sent": 0}"#;
        let snapshot: ServiceStatusSnapshot = serde_json::from_str(body).unwrap();

        assert_eq!(snapshot, ServiceStatusSnapshot::default());
    }

    #[test]
    fn test_burn_response_decimal() {
        let response: BurnResponse = serde_json::from_str(r#"{"reclaimed": 0.25}"#).unwrap();
        assert_eq!(response.reclaimed.to_string(), "0.25");
    }
}
