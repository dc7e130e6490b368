//! Reporter configuration
//!
//! ## Variables
//!
//! - `BEACON_ENDPOINT`: base URL of the beacon server (required)
//! - `UPDATE_SECRET`: shared secret (required)
//! - `BEACON_IP_SOURCE_URL`: public IP echo service (default `https://api.ipify.org`)
//! - `BEACON_IP_VERSION`: v4, v6 or both (default both)
//! - `BEACON_INTERVAL_SECS`: poll interval, 5..=86400 (default 60)
//! - `BEACON_RESEND_SECS`: resend an unchanged address after this long (default 600)
//! - `BEACON_LOG_LEVEL`: trace, debug, info, warn, error (default info)

use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use beacon_core::config::{LOG_LEVEL_ENV, SECRET_ENV};
use beacon_core::{Error, LogLevel, Result, SharedSecret};
use serde::{Deserialize, Serialize};

/// Environment variable holding the endpoint base URL
pub const ENDPOINT_ENV: &str = "BEACON_ENDPOINT";
/// Environment variable holding the IP echo service URL
pub const IP_SOURCE_URL_ENV: &str = "BEACON_IP_SOURCE_URL";
/// Environment variable holding the IP version filter
pub const IP_VERSION_ENV: &str = "BEACON_IP_VERSION";
/// Environment variable holding the poll interval
pub const INTERVAL_ENV: &str = "BEACON_INTERVAL_SECS";
/// Environment variable holding the resend interval
pub const RESEND_ENV: &str = "BEACON_RESEND_SECS";

/// Default IP echo service; returns the caller's address as plain text
pub const DEFAULT_IP_SOURCE_URL: &str = "https://api.ipify.org";

const DEFAULT_INTERVAL_SECS: u64 = 60;
const DEFAULT_RESEND_SECS: u64 = 600;

/// IP version to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    /// IPv4 only
    V4,
    /// IPv6 only
    V6,
    /// Either
    #[default]
    Both,
}

impl IpVersion {
    /// Whether an address is acceptable under this filter
    pub fn accepts(&self, ip: &IpAddr) -> bool {
        match self {
            IpVersion::V4 => ip.is_ipv4(),
            IpVersion::V6 => ip.is_ipv6(),
            IpVersion::Both => true,
        }
    }
}

impl FromStr for IpVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "v4" => Ok(Self::V4),
            "v6" => Ok(Self::V6),
            "both" => Ok(Self::Both),
            _ => Err(Error::config(format!(
                "{IP_VERSION_ENV} '{s}' is not supported. Supported: v4, v6, both"
            ))),
        }
    }
}

/// Reporter configuration
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Base URL of the beacon server, without a trailing slash
    pub endpoint: String,
    /// Credential sent with each report
    pub secret: SharedSecret,
    /// Public IP echo service
    pub ip_source_url: String,
    /// Address family filter
    pub ip_version: IpVersion,
    /// Poll interval
    pub interval: Duration,
    /// Resend an unchanged address after this long
    pub resend_after: Duration,
    /// Log verbosity
    pub log_level: LogLevel,
}

impl ReporterConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(ENDPOINT_ENV)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::config(format!(
                    "{ENDPOINT_ENV} is required. Set it via: export {ENDPOINT_ENV}=https://beacon.example.com"
                ))
            })?;

        let secret = lookup(SECRET_ENV).ok_or_else(|| {
            Error::config(format!(
                "{SECRET_ENV} is required. Set it via: export {SECRET_ENV}=your_secret"
            ))
        })?;

        let ip_version = match lookup(IP_VERSION_ENV) {
            Some(raw) => raw.parse()?,
            None => IpVersion::default(),
        };

        let log_level = match lookup(LOG_LEVEL_ENV) {
            Some(raw) => raw.parse()?,
            None => LogLevel::default(),
        };

        let config = Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            secret: SharedSecret::new(secret)?,
            ip_source_url: lookup(IP_SOURCE_URL_ENV)
                .unwrap_or_else(|| DEFAULT_IP_SOURCE_URL.to_string()),
            ip_version,
            interval: Duration::from_secs(parse_secs(
                &lookup,
                INTERVAL_ENV,
                DEFAULT_INTERVAL_SECS,
            )?),
            resend_after: Duration::from_secs(parse_secs(
                &lookup,
                RESEND_ENV,
                DEFAULT_RESEND_SECS,
            )?),
            log_level,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            (ENDPOINT_ENV, &self.endpoint),
            (IP_SOURCE_URL_ENV, &self.ip_source_url),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(Error::config(format!(
                    "{name} must use HTTP or HTTPS scheme. Got: {url}"
                )));
            }
        }

        let interval = self.interval.as_secs();
        if !(5..=86_400).contains(&interval) {
            return Err(Error::config(format!(
                "{INTERVAL_ENV} must be between 5 and 86400 seconds. Got: {interval}"
            )));
        }

        if self.resend_after < self.interval {
            return Err(Error::config(format!(
                "{RESEND_ENV} must be at least {INTERVAL_ENV}. Got: {} < {}",
                self.resend_after.as_secs(),
                interval
            )));
        }

        Ok(())
    }
}

fn parse_secs<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::config(format!("{key} must be a number of seconds. Got: {raw}"))),
        None => Ok(default),
    }
}
