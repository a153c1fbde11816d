//! `notifly run`: both poll loops until SIGINT or SIGTERM.

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use notifly_config::Settings;
use notifly_core::Monitor;

use crate::commands::build_poller;
use crate::error::CliError;

pub async fn handle(settings: Settings) -> Result<(), CliError> {
    let poller = build_poller(&settings, Utc::now())?;
    let monitor = Monitor::start(&poller, CancellationToken::new());

    shutdown_signal().await;
    info!("shutting down, waiting for running checks to finish");
    monitor.shutdown().await;
    info!("stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C"),
        () = terminate => info!("received SIGTERM"),
    }
}
