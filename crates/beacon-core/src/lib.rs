// # beacon-core
//
// Core library for the beacon address endpoint.
//
// A reporting client writes its current public address with a shared
// secret; anyone may read the most recently reported address back.
//
// ## Architecture Overview
//
// - **AddressRegistry**: enforces the report/fetch contracts over a single cell
// - **AddressStore**: trait for the cell holding the current address
// - **MemoryAddressStore**: volatile, lock-guarded implementation of the cell
// - **SharedSecret**: the write credential, compared in constant time
// - **ServerConfig**: environment-driven configuration for the daemon
//
// ## Design Principles
//
// 1. **Library-First**: the HTTP binding and daemon are thin layers over this crate
// 2. **Instance-Owned State**: no process globals, each registry owns its cell
// 3. **Last-Write-Wins**: accepted reports replace the stored value whole

pub mod config;
pub mod error;
pub mod registry;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::{LogLevel, ServerConfig, SharedSecret};
pub use error::{Error, Result};
pub use registry::{Acknowledgement, AddressRegistry};
pub use state::MemoryAddressStore;
pub use traits::{AddressStore, StoredAddress};
