//! tether CLI
//!
//! Drives the multi-cluster job adapter against a manager and a worker
//! cluster.

use clap::Parser;
use tether_common::telemetry::{init_telemetry, TelemetryConfig};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use tether_cli::{Cli, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_telemetry(TelemetryConfig {
        format: cli.cluster.log_format.into(),
        ..Default::default()
    })?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            return;
        }
        warn!("interrupted, cancelling in-flight requests");
        on_signal.cancel();
    });

    cli.run(cancel).await
}
