// # beacon-report - reporting client
//
// Discovers this host's public address and keeps a beacon endpoint
// up to date. Configuration is via environment variables only; see
// `beacon_reporter::config` for the full list.
//
// ## Example
//
// ```bash
// export BEACON_ENDPOINT=https://beacon.example.com
// export UPDATE_SECRET=MyPhoneKey123
// export BEACON_INTERVAL_SECS=120
//
// beacon-report
// ```

use anyhow::Result;
use beacon_reporter::{Reporter, ReporterConfig};
use std::process::ExitCode;
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes, matching beacond
#[derive(Debug, Clone, Copy)]
enum ReportExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<ReportExitCode> for ExitCode {
    fn from(code: ReportExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let config = match ReporterConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            return ReportExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::from(config.log_level))
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ReportExitCode::ConfigError.into();
    }

    info!(endpoint = %config.endpoint, "Starting beacon-report");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ReportExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run(config).await {
            error!("Reporter error: {:#}", e);
            ReportExitCode::RuntimeError
        } else {
            ReportExitCode::CleanShutdown
        }
    });

    result.into()
}

async fn run(config: ReporterConfig) -> Result<()> {
    let reporter = Reporter::from_config(&config);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let handle = tokio::spawn(reporter.run_with_shutdown(shutdown_rx));

    let signal = wait_for_shutdown().await?;
    info!("Received shutdown signal: {}", signal);

    // The reporter may already have exited; nothing to do then
    let _ = shutdown_tx.send(());
    handle.await??;

    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
