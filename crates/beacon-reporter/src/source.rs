//! HTTP IP source
//!
//! Fetches the current public address from an external echo service
//! (e.g. api.ipify.org, ifconfig.me/ip, icanhazip.com). The service must
//! answer with the bare address as plain text.

use std::net::IpAddr;
use std::time::Duration;

use beacon_core::{Error, Result};

use crate::config::IpVersion;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// Address family filter
    version: IpVersion,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch IP from (e.g., "https://api.ipify.org")
    /// - `version`: address family to accept
    pub fn new(url: impl Into<String>, version: IpVersion) -> Self {
        Self {
            url: url.into(),
            version,
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// The URL being queried
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch current IP from the echo service
    pub async fn current(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::http(format!("IP source request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::http(format!(
                "IP source returned {}",
                response.status()
            )));
        }

        let ip_text = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read IP source response: {}", e)))?;
        let ip_text = ip_text.trim();

        let ip: IpAddr = ip_text
            .parse()
            .map_err(|_| Error::http(format!("Invalid IP address from source: {}", ip_text)))?;

        if !self.version.accepts(&ip) {
            return Err(Error::http(format!(
                "Expected {:?} address, got: {}",
                self.version, ip
            )));
        }

        Ok(ip)
    }
}
