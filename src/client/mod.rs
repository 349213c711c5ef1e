//! Client side of the verification call: reads nothing but a live cached
//! token, attaches the contract headers, and posts a well-formed
//! `serviceAccessDataDetails` body.

use anyhow::{anyhow, Result};
use chrono::Utc;
use http::header::AUTHORIZATION;
use rand::Rng;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::info;

use crate::config::settings::ClientConfig;
use crate::utils::constants::REGISTER_TYPE_VERIFIED_IDENTITY;

#[derive(Debug, Clone)]
pub struct VerificationClient {
    cfg: ClientConfig,
    client: Client,
}

impl VerificationClient {
    pub fn new(cfg: ClientConfig) -> Self {
        Self {
            cfg,
            client: Client::new(),
        }
    }

    /// Canonical request body for the verified-identity register.
    pub fn access_payload(&self, subject_register_id: &str) -> Value {
        let mut rng = rand::thread_rng();
        json!({
            "serviceAccessDataDetails": {
                "clientName": self.cfg.client_name,
                "globalTransactionId": format!("txn-{:06}", rng.gen_range(0..1_000_000u32)),
                "recordRestricted": false,
                "registerAccessed": true,
                "requestId": format!("req-{:06}", rng.gen_range(0..1_000_000u32)),
                "requestReason": "Verification",
                "requestTimestamp": Utc::now().to_rfc3339(),
                "requesterType": "internal",
                "subjectRegisterId": subject_register_id,
            }
        })
    }

    /// POST the verification request and return the parsed response body.
    pub async fn send(&self, token: &str, ars_id: &str) -> Result<Value> {
        let url = format!(
            "{}/register/{}/{}",
            self.cfg.base_url.trim_end_matches('/'),
            REGISTER_TYPE_VERIFIED_IDENTITY,
            ars_id
        );
        let correlation_id = format!("corr-{:08x}", rand::thread_rng().gen::<u32>());

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header("CorrelationId", &correlation_id)
            .header("ClientName", &self.cfg.client_name)
            .json(&self.access_payload(&format!("subject-{}", ars_id)))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(anyhow!("verification request failed: {} {}", status, body));
        }

        info!(%correlation_id, "verification response received");
        serde_json::from_str(&body).map_err(|e| anyhow!("invalid response JSON: {}", e))
    }
}
