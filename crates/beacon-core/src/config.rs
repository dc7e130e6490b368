//! Configuration types for the beacon system
//!
//! All configuration comes from environment variables, read once at startup.
//!
//! ## Server variables
//!
//! - `UPDATE_SECRET`: shared secret for `POST /update` (required)
//! - `BEACON_BIND_HOST`: listen address (default `0.0.0.0`)
//! - `PORT`: listen port (default `8080`)
//! - `BEACON_MAX_BODY_BYTES`: request body limit (default `4096`)
//! - `BEACON_LOG_LEVEL`: trace, debug, info, warn or error (default `info`)

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

/// Environment variable holding the shared secret
pub const SECRET_ENV: &str = "UPDATE_SECRET";
/// Environment variable holding the listen address
pub const BIND_HOST_ENV: &str = "BEACON_BIND_HOST";
/// Environment variable holding the listen port
pub const PORT_ENV: &str = "PORT";
/// Environment variable holding the request body limit
pub const MAX_BODY_BYTES_ENV: &str = "BEACON_MAX_BODY_BYTES";
/// Environment variable holding the log level
pub const LOG_LEVEL_ENV: &str = "BEACON_LOG_LEVEL";

const DEFAULT_BIND_HOST: IpAddr = IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_BODY_BYTES: usize = 4096;
const BODY_BYTES_RANGE: std::ops::RangeInclusive<usize> = 64..=1024 * 1024;

/// Static write credential
///
/// Immutable once constructed. `Debug` never prints the value.
#[derive(Clone)]
pub struct SharedSecret(String);

impl SharedSecret {
    /// Create a secret, rejecting the empty string
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(Error::config(format!("{SECRET_ENV} cannot be empty")));
        }
        Ok(Self(secret))
    }

    /// Exact, constant-time equality against a presented key
    ///
    /// Both sides are padded to the longer length with different filler
    /// bytes so a length mismatch can never compare equal.
    pub fn matches(&self, candidate: &str) -> bool {
        let expected = self.0.as_bytes();
        let presented = candidate.as_bytes();
        let len = expected.len().max(presented.len());

        let mut a = vec![0u8; len];
        let mut b = vec![0xFFu8; len];
        a[..expected.len()].copy_from_slice(expected);
        b[..presented.len()].copy_from_slice(presented);

        let same_len = expected.len().ct_eq(&presented.len());
        (same_len & a.ct_eq(&b)).into()
    }

    /// The raw secret, for clients that must send it
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything
    Trace,
    /// Debug and above
    Debug,
    /// Info and above
    #[default]
    Info,
    /// Warnings and errors
    Warn,
    /// Errors only
    Error,
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(Error::config(format!(
                "{LOG_LEVEL_ENV} '{s}' is not valid. Valid levels: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Server configuration
///
/// Populated once at startup and handed to the server constructor.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Credential required by `POST /update`
    pub secret: SharedSecret,

    /// Address the listener binds to
    pub bind_addr: SocketAddr,

    /// Largest accepted request body
    pub max_body_bytes: usize,

    /// Log verbosity for the daemon
    pub log_level: LogLevel,
}

impl ServerConfig {
    /// Create a configuration with defaults for everything but the secret
    pub fn new(secret: SharedSecret) -> Self {
        Self {
            secret,
            bind_addr: SocketAddr::new(DEFAULT_BIND_HOST, DEFAULT_PORT),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_level: LogLevel::default(),
        }
    }

    /// Set the listen address
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    /// Set the request body limit
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Fails fast when the secret is absent; there is no partially
    /// configured state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(SECRET_ENV).ok_or_else(|| {
            Error::config(format!(
                "{SECRET_ENV} is required. Set it via: export {SECRET_ENV}=your_secret"
            ))
        })?;
        let secret = SharedSecret::new(secret)?;

        let host = match lookup(BIND_HOST_ENV) {
            Some(raw) => raw.trim().parse::<IpAddr>().map_err(|_| {
                Error::config(format!("{BIND_HOST_ENV} must be an IP address. Got: {raw}"))
            })?,
            None => DEFAULT_BIND_HOST,
        };

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                Error::config(format!("{PORT_ENV} must be a port number. Got: {raw}"))
            })?,
            None => DEFAULT_PORT,
        };

        let max_body_bytes = match lookup(MAX_BODY_BYTES_ENV) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                Error::config(format!("{MAX_BODY_BYTES_ENV} must be a number. Got: {raw}"))
            })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        let log_level = match lookup(LOG_LEVEL_ENV) {
            Some(raw) => raw.parse()?,
            None => LogLevel::default(),
        };

        let config = Self {
            secret,
            bind_addr: SocketAddr::new(host, port),
            max_body_bytes,
            log_level,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !BODY_BYTES_RANGE.contains(&self.max_body_bytes) {
            return Err(Error::config(format!(
                "{MAX_BODY_BYTES_ENV} must be between {} and {}. Got: {}",
                BODY_BYTES_RANGE.start(),
                BODY_BYTES_RANGE.end(),
                self.max_body_bytes
            )));
        }
        Ok(())
    }
}
