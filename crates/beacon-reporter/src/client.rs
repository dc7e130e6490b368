//! Report client
//!
//! Performs a single authenticated write against a beacon endpoint. No
//! retries happen here; the reporter loop tries again on its next tick.

use std::time::Duration;

use beacon_core::{Acknowledgement, Error, Result, SharedSecret};
use reqwest::StatusCode;
use serde::Serialize;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct ReportBody<'a> {
    key: &'a str,
    ip: &'a str,
}

/// Client for `POST /update`
#[derive(Debug, Clone)]
pub struct ReportClient {
    update_url: String,
    secret: SharedSecret,
    client: reqwest::Client,
}

impl ReportClient {
    /// Create a client for the endpoint at `endpoint` (base URL)
    pub fn new(endpoint: &str, secret: SharedSecret) -> Self {
        Self {
            update_url: format!("{}/update", endpoint.trim_end_matches('/')),
            secret,
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Report an address
    ///
    /// # Returns
    ///
    /// - `Ok(Acknowledgement)`: the server stored the address
    /// - `Err(Error::Unauthorized)`: the server rejected the secret
    /// - `Err(Error::BadRequest)`: the server rejected the address
    /// - `Err(Error::Http)`: transport failure or unexpected status
    pub async fn report(&self, ip: &str) -> Result<Acknowledgement> {
        let body = ReportBody {
            key: self.secret.expose(),
            ip,
        };

        let response = self
            .client
            .post(&self.update_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::http(format!("Report request failed: {}", e)))?;

        match response.status() {
            StatusCode::OK => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| Error::http(format!("Failed to read report response: {}", e)))?;
                Ok(serde_json::from_slice(&bytes)?)
            }
            StatusCode::UNAUTHORIZED => Err(Error::Unauthorized),
            StatusCode::BAD_REQUEST => {
                let message = response.text().await.unwrap_or_default();
                Err(Error::bad_request(message))
            }
            status => Err(Error::http(format!("Unexpected status from endpoint: {}", status))),
        }
    }
}
