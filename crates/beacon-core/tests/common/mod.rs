//! Test doubles and common utilities for registry contract tests

#![allow(dead_code)]

use beacon_core::traits::{AddressStore, StoredAddress};
use beacon_core::{AddressRegistry, MemoryAddressStore, SharedSecret};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Secret used across contract tests
pub const SECRET: &str = "s3cr3t";

/// A store that counts calls and delegates to a memory store
pub struct CountingStore {
    inner: MemoryAddressStore,
    load_call_count: AtomicUsize,
    replace_call_count: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryAddressStore::new(),
            load_call_count: AtomicUsize::new(0),
            replace_call_count: AtomicUsize::new(0),
        }
    }

    /// Get the number of times load() was called
    pub fn load_call_count(&self) -> usize {
        self.load_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times replace() was called
    pub fn replace_call_count(&self) -> usize {
        self.replace_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AddressStore for CountingStore {
    async fn load(&self) -> Option<StoredAddress> {
        self.load_call_count.fetch_add(1, Ordering::SeqCst);
        self.inner.load().await
    }

    async fn replace(&self, address: StoredAddress) {
        self.replace_call_count.fetch_add(1, Ordering::SeqCst);
        self.inner.replace(address).await;
    }
}

/// Registry over a fresh memory store, keyed with [`SECRET`]
pub fn registry() -> AddressRegistry {
    AddressRegistry::new(SharedSecret::new(SECRET).expect("secret is non-empty"))
}

/// Registry over a counting store the test can inspect
pub fn counting_registry() -> (AddressRegistry, Arc<CountingStore>) {
    let store = Arc::new(CountingStore::new());
    let registry = AddressRegistry::with_store(
        SharedSecret::new(SECRET).expect("secret is non-empty"),
        store.clone(),
    );
    (registry, store)
}

/// Current address as a plain string, or `None` when unset
pub async fn current(registry: &AddressRegistry) -> Option<String> {
    registry.fetch().await.ok().map(|stored| stored.ip)
}
