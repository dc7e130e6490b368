//! Core traits for the beacon system
//!
//! - [`AddressStore`]: the single cell holding the current address

pub mod address_store;

pub use address_store::{AddressStore, StoredAddress};
