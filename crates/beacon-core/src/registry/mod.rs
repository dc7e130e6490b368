//! Address registry
//!
//! The registry owns the address cell and enforces the two access paths:
//!
//! - **report**: guarded by the shared secret, replaces the stored address
//! - **fetch**: open to anyone, returns the stored address
//!
//! ## Usage
//!
//! ```rust
//! use beacon_core::{AddressRegistry, Error, SharedSecret};
//!
//! # #[tokio::main]
//! # async fn main() -> beacon_core::Result<()> {
//! let registry = AddressRegistry::new(SharedSecret::new("s3cr3t")?);
//!
//! assert!(matches!(registry.fetch().await, Err(Error::NotFound(_))));
//!
//! registry.report(Some("s3cr3t"), Some("203.0.113.5")).await?;
//! assert_eq!(registry.fetch().await?.ip, "203.0.113.5");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SharedSecret;
use crate::error::{Error, Result};
use crate::state::MemoryAddressStore;
use crate::traits::{AddressStore, StoredAddress};

/// Message carried by `BadRequest` when the address is missing
pub const NO_IP_MESSAGE: &str = "no ip";

/// Message carried by `NotFound` before the first report
pub const NOT_SET_MESSAGE: &str = "IP not set";

/// Confirmation returned to the reporter
///
/// Serializes as `{"status":"ok","ip":"<ip>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    /// Always `"ok"` for an accepted report
    pub status: String,
    /// The address that was stored
    pub ip: String,
}

impl Acknowledgement {
    /// Acknowledge an accepted address
    pub fn ok(ip: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            ip: ip.into(),
        }
    }
}

/// Fields pulled out of a report body
///
/// Non-string values are treated as absent.
#[derive(Debug, Default, PartialEq, Eq)]
struct ReportFields {
    key: Option<String>,
    ip: Option<String>,
}

impl ReportFields {
    /// Parse a JSON object body; anything else yields `None`
    fn parse(body: &[u8]) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_slice(body).ok()?;
        let object = value.as_object()?;
        let text = |field: &str| {
            object
                .get(field)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };

        Some(Self {
            key: text("key"),
            ip: text("ip"),
        })
    }
}

/// Registry holding the most recently reported address
///
/// Each instance owns its own cell, so several registries can live in one
/// process without interfering. Cloning shares the cell.
#[derive(Clone)]
pub struct AddressRegistry {
    secret: SharedSecret,
    store: Arc<dyn AddressStore>,
}

impl AddressRegistry {
    /// Create a registry backed by a fresh in-memory store
    pub fn new(secret: SharedSecret) -> Self {
        Self::with_store(secret, Arc::new(MemoryAddressStore::new()))
    }

    /// Create a registry over an existing store
    pub fn with_store(secret: SharedSecret, store: Arc<dyn AddressStore>) -> Self {
        Self { secret, store }
    }

    /// Report an address
    ///
    /// Checks run in order and the first failure decides the outcome:
    ///
    /// 1. key absent or not equal to the secret → [`Error::Unauthorized`]
    /// 2. address absent or empty → [`Error::BadRequest`] (`"no ip"`)
    /// 3. otherwise the stored address is replaced
    ///
    /// The address is stored verbatim. Concurrent reports are last-write-wins.
    pub async fn report(&self, key: Option<&str>, ip: Option<&str>) -> Result<Acknowledgement> {
        if !key.is_some_and(|k| self.secret.matches(k)) {
            warn!("Rejected address report: unauthorized");
            return Err(Error::Unauthorized);
        }

        let ip = match ip {
            Some(ip) if !ip.is_empty() => ip,
            _ => {
                warn!("Rejected address report: {}", NO_IP_MESSAGE);
                return Err(Error::bad_request(NO_IP_MESSAGE));
            }
        };

        self.store.replace(StoredAddress::new(ip)).await;
        info!(ip = %ip, "Address updated");

        Ok(Acknowledgement::ok(ip))
    }

    /// Report an address from a raw JSON body
    ///
    /// A missing body, invalid JSON or a non-object payload is indistinguishable
    /// from a wrong key: all yield [`Error::Unauthorized`].
    pub async fn report_body(&self, body: &[u8]) -> Result<Acknowledgement> {
        let Some(fields) = ReportFields::parse(body) else {
            debug!(len = body.len(), "Report body is not a JSON object");
            warn!("Rejected address report: unauthorized");
            return Err(Error::Unauthorized);
        };

        self.report(fields.key.as_deref(), fields.ip.as_deref()).await
    }

    /// Fetch the most recently reported address
    ///
    /// Returns [`Error::NotFound`] (`"IP not set"`) until the first accepted report.
    pub async fn fetch(&self) -> Result<StoredAddress> {
        self.store
            .load()
            .await
            .ok_or_else(|| Error::not_found(NOT_SET_MESSAGE))
    }

    /// Whether an address has been reported yet
    pub async fn is_set(&self) -> bool {
        self.store.load().await.is_some()
    }
}

impl std::fmt::Debug for AddressRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressRegistry")
            .field("secret", &self.secret)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn registry() -> AddressRegistry {
        AddressRegistry::new(SharedSecret::new("s3cr3t").unwrap())
    }

    #[test]
    fn test_parse_fields() {
        let fields = ReportFields::parse(br#"{"key":"k","ip":"1.2.3.4"}"#).unwrap();
        assert_eq!(fields.key.as_deref(), Some("k"));
        assert_eq!(fields.ip.as_deref(), Some("1.2.3.4"));

        let partial = ReportFields::parse(br#"{"key":"k"}"#).unwrap();
        assert_eq!(partial.ip, None);

        let non_string = ReportFields::parse(br#"{"key":42,"ip":["1.2.3.4"]}"#).unwrap();
        assert_eq!(non_string, ReportFields::default());
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(ReportFields::parse(b"").is_none());
        assert!(ReportFields::parse(b"not json").is_none());
        assert!(ReportFields::parse(b"[1, 2]").is_none());
        assert!(ReportFields::parse(b"null").is_none());
        assert!(ReportFields::parse(br#""s3cr3t""#).is_none());
    }

    #[test]
    fn test_acknowledgement_wire_format() {
        let ack = Acknowledgement::ok("203.0.113.5");
        let json = serde_json::to_string(&ack).unwrap();

        assert_eq!(json, r#"{"status":"ok","ip":"203.0.113.5"}"#);
    }

    #[tokio::test]
    async fn test_report_then_fetch() {
        let registry = registry();

        let ack = assert_ok!(registry.report(Some("s3cr3t"), Some("203.0.113.5")).await);
        assert_eq!(ack, Acknowledgement::ok("203.0.113.5"));

        let stored = assert_ok!(registry.fetch().await);
        assert_eq!(stored.ip, "203.0.113.5");
    }

    #[tokio::test]
    async fn test_check_order_key_before_ip() {
        let registry = registry();

        // Wrong key and missing ip: the key check decides
        let err = assert_err!(registry.report(Some("wrong"), None).await);
        assert!(matches!(err, Error::Unauthorized));

        let err = assert_err!(registry.report(None, Some("")).await);
        assert!(matches!(err, Error::Unauthorized));
    }

    #[tokio::test]
    async fn test_missing_or_empty_ip() {
        let registry = registry();

        for ip in [None, Some("")] {
            let err = assert_err!(registry.report(Some("s3cr3t"), ip).await);
            assert!(matches!(err, Error::BadRequest(ref msg) if msg == NO_IP_MESSAGE));
        }
        assert!(!registry.is_set().await);
    }

    #[tokio::test]
    async fn test_address_stored_verbatim() {
        let registry = registry();

        assert_ok!(registry.report(Some("s3cr3t"), Some(" not-an-ip ")).await);
        assert_eq!(registry.fetch().await.unwrap().ip, " not-an-ip ");
    }

    #[tokio::test]
    async fn test_report_body() {
        let registry = registry();

        let ack = assert_ok!(
            registry
                .report_body(br#"{"key":"s3cr3t","ip":"198.51.100.7"}"#)
                .await
        );
        assert_eq!(ack.ip, "198.51.100.7");

        let err = assert_err!(registry.report_body(b"{not json").await);
        assert!(matches!(err, Error::Unauthorized));

        let err = assert_err!(registry.report_body(br#"{"key":"s3cr3t","ip":7}"#).await);
        assert!(matches!(err, Error::BadRequest(_)));

        assert_eq!(registry.fetch().await.unwrap().ip, "198.51.100.7");
    }

    #[tokio::test]
    async fn test_fetch_before_report() {
        let registry = registry();

        let err = assert_err!(registry.fetch().await);
        assert!(matches!(err, Error::NotFound(ref msg) if msg == NOT_SET_MESSAGE));
    }

    #[tokio::test]
    async fn test_instances_are_isolated() {
        let a = registry();
        let b = registry();

        assert_ok!(a.report(Some("s3cr3t"), Some("1.1.1.1")).await);

        assert!(a.is_set().await);
        assert!(!b.is_set().await);
    }
}
