//! App state shared by all handlers.

use beacon_core::AddressRegistry;

/// State handed to every request.
#[derive(Debug)]
pub struct AppState {
    /// The address cell and its access rules
    pub registry: AddressRegistry,
}

impl AppState {
    /// Wraps a registry.
    pub fn new(registry: AddressRegistry) -> Self {
        Self { registry }
    }
}
