// # Address Store Implementations
//
// Only a volatile in-memory cell is provided; the endpoint keeps no state
// across restarts.

pub mod memory;

pub use memory::MemoryAddressStore;
