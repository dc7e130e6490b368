//! Periodic reporter
//!
//! ## Event Flow
//!
//! 1. Interval tick
//! 2. Resolve the public address via `HttpIpSource`
//! 3. If it differs from the last acknowledged address, or the last
//!    acknowledgement is older than `resend_after`, report it
//! 4. On success remember the address and the time
//!
//! Failures never stop the loop; the next tick tries again.

use std::time::Duration;

use beacon_core::{Acknowledgement, Error, Result};
use tokio::sync::oneshot;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;
use tracing::{debug, error, info, warn};

use crate::client::ReportClient;
use crate::config::ReporterConfig;
use crate::source::HttpIpSource;

/// Result of a single reporter step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The address was written and acknowledged
    Reported(Acknowledgement),
    /// The address matched a recent acknowledgement; nothing was sent
    Unchanged(String),
}

/// Periodic public-address reporter
pub struct Reporter {
    source: HttpIpSource,
    client: ReportClient,
    interval: Duration,
    resend_after: Duration,
    last_acknowledged: Option<(String, Instant)>,
}

impl Reporter {
    /// Create a reporter from its parts
    pub fn new(
        source: HttpIpSource,
        client: ReportClient,
        interval: Duration,
        resend_after: Duration,
    ) -> Self {
        Self {
            source,
            client,
            interval,
            resend_after,
            last_acknowledged: None,
        }
    }

    /// Create a reporter from configuration
    pub fn from_config(config: &ReporterConfig) -> Self {
        Self::new(
            HttpIpSource::new(config.ip_source_url.clone(), config.ip_version),
            ReportClient::new(&config.endpoint, config.secret.clone()),
            config.interval,
            config.resend_after,
        )
    }

    /// The last address the endpoint acknowledged, if any
    pub fn last_acknowledged(&self) -> Option<&str> {
        self.last_acknowledged.as_ref().map(|(ip, _)| ip.as_str())
    }

    fn is_due(&self, ip: &str, now: Instant) -> bool {
        match &self.last_acknowledged {
            Some((last, at)) => last != ip || now.duration_since(*at) >= self.resend_after,
            None => true,
        }
    }

    /// Run one step: resolve the address and report it if due
    pub async fn tick(&mut self) -> Result<TickOutcome> {
        let ip = self.source.current().await?.to_string();

        if !self.is_due(&ip, Instant::now()) {
            debug!(ip = %ip, "Address unchanged, skipping report");
            return Ok(TickOutcome::Unchanged(ip));
        }

        let previous = self.last_acknowledged().map(str::to_string);
        let ack = self.client.report(&ip).await?;

        if previous.as_deref() != Some(ack.ip.as_str()) {
            info!("Address reported: {:?} -> {}", previous, ack.ip);
        } else {
            debug!(ip = %ack.ip, "Address re-sent");
        }
        self.last_acknowledged = Some((ack.ip.clone(), Instant::now()));

        Ok(TickOutcome::Reported(ack))
    }

    /// Run until `shutdown_rx` fires (or its sender is dropped)
    pub async fn run_with_shutdown(mut self, mut shutdown_rx: oneshot::Receiver<()>) -> Result<()> {
        info!(
            "Starting reporter (source={}, interval={:?}, resend_after={:?})",
            self.source.url(),
            self.interval,
            self.resend_after
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(interval);

        loop {
            tokio::select! {
                Some(_) = ticks.next() => {
                    match self.tick().await {
                        Ok(_) => {}
                        Err(Error::Unauthorized) => {
                            error!("Endpoint rejected the shared secret; check UPDATE_SECRET");
                        }
                        Err(e) => warn!("Report failed: {}", e),
                    }
                }

                _ = &mut shutdown_rx => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!("Reporter stopped");
        Ok(())
    }
}
