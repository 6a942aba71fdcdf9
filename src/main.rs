//! arr-linker entry point
//!
//! Configuration comes entirely from the environment (a `.env` file is
//! honoured). Runs until SIGINT or SIGTERM.

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use arr_linker::app::{Clients, build_reconciler};
use arr_linker::config::Config;
use arr_linker::services::logging::{LogFormat, init_tracing};
use arr_linker::services::{DownloadWatcher, RetryPolicy};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(LogFormat::from_env());

    let config = Config::from_env()?;
    tracing::info!(
        watch_root = %config.watch_root.display(),
        movies = %config.radarr.category,
        series = %config.sonarr.category,
        "Configuration loaded"
    );

    let clients = Clients::from_config(&config);
    clients
        .jellyfin
        .authenticate()
        .await
        .context("Jellyfin authentication failed")?;

    let reconciler = build_reconciler(&config, &clients, RetryPolicy::default());
    let watcher = DownloadWatcher::start(&config.watch_root)
        .with_context(|| format!("Failed to watch {}", config.watch_root.display()))?;

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_on_signal(cancel.clone()));

    let handled = watcher.run(&reconciler, cancel).await;
    tracing::info!(events = handled, "Stopped");

    Ok(())
}

/// Cancel `token` on Ctrl-C or (unix) SIGTERM
async fn shutdown_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
    token.cancel();
}
