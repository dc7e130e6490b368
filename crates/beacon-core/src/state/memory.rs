// # Memory Address Store
//
// In-memory implementation of AddressStore.
//
// ## Crash Behavior
//
// - The stored address is lost on restart/crash
// - Reads return nothing until the reporter writes again
// - No recovery possible (state is in-memory only)

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::traits::address_store::{AddressStore, StoredAddress};

/// In-memory address store
///
/// Holds an `Option<StoredAddress>` behind a RwLock. Writers swap the whole
/// value under the write guard, so readers never see a partial update.
/// Clones share the same cell.
///
/// # Example
///
/// ```rust,no_run
/// use beacon_core::state::MemoryAddressStore;
/// use beacon_core::traits::{AddressStore, StoredAddress};
///
/// #[tokio::main]
/// async fn main() {
///     let store = MemoryAddressStore::new();
///
///     store.replace(StoredAddress::new("1.2.3.4")).await;
///
///     let current = store.load().await;
///     assert_eq!(current.map(|a| a.ip), Some("1.2.3.4".to_string()));
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAddressStore {
    inner: Arc<RwLock<Option<StoredAddress>>>,
}

impl MemoryAddressStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AddressStore for MemoryAddressStore {
    async fn load(&self) -> Option<StoredAddress> {
        self.inner.read().await.clone()
    }

    async fn replace(&self, address: StoredAddress) {
        let mut guard = self.inner.write().await;
        *guard = Some(address);
    }
}
