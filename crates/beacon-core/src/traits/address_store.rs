// # Address Store Trait
//
// Defines the interface for the cell holding the current address.
//
// ## Purpose
//
// The store holds at most one value. It is either absent (nothing reported
// yet) or the last accepted address, replaced whole by each write.
//
// ## Implementations
//
// - Memory: lock-guarded `Option`, lost on restart
//
// ## Usage
//
// ```rust
// use beacon_core::{AddressStore, MemoryAddressStore, StoredAddress};
//
// #[tokio::main]
// async fn main() {
//     let store = MemoryAddressStore::new();
//     assert!(store.load().await.is_none());
//
//     store.replace(StoredAddress::new("203.0.113.5")).await;
//     assert_eq!(store.load().await.unwrap().ip, "203.0.113.5");
// }
// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The stored address and when it was accepted
///
/// `ip` is kept verbatim; no syntax validation is applied. `updated_at` is
/// informational and never used to order writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAddress {
    /// Address exactly as reported
    pub ip: String,
    /// Time the report was accepted
    pub updated_at: DateTime<Utc>,
}

impl StoredAddress {
    /// Stamp an address with the current time
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            updated_at: Utc::now(),
        }
    }
}

/// Trait for address store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently. `replace` must be atomic
/// with respect to `load`: a reader observes either the previous value or
/// the new one, never a mix.
///
/// Implementations must not hold locks across I/O and must not apply any
/// ordering between writers; the last replacement wins.
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Snapshot of the current value, if any
    async fn load(&self) -> Option<StoredAddress>;

    /// Replace the current value whole
    async fn replace(&self, address: StoredAddress);
}
