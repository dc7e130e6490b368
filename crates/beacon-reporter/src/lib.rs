// # beacon-reporter
//
// Client side of the beacon system: discovers this host's public address
// and writes it to a beacon endpoint.
//
// ## Architecture
//
// ```text
// HttpIpSource ── IpAddr ──▶ Reporter ── {"key","ip"} ──▶ ReportClient ──▶ POST /update
// ```
//
// - **HttpIpSource**: fetches the public address from an external echo
//   service (e.g. api.ipify.org) and parses it
// - **ReportClient**: one authenticated write against `/update`
// - **Reporter**: ticks on an interval and reports when the address changed
//   or the last acknowledgement has aged out
//
// The endpoint keeps its value in memory only, so the reporter resends
// periodically even when nothing changed.

pub mod client;
pub mod config;
pub mod reporter;
pub mod source;

pub use client::ReportClient;
pub use config::{IpVersion, ReporterConfig};
pub use reporter::{Reporter, TickOutcome};
pub use source::HttpIpSource;
