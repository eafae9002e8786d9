//! Comic Cache - An offline request-caching engine
//!
//! The binary hosts the engine behind a line-delimited JSON control channel:
//! commands arrive on stdin, replies (for the size query) go to stdout.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use comic_cache::{spawn_control_task, Config, ControlMessage, ControlRequest, Engine, HttpFetcher};

/// Main entry point for the offline caching engine host.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the engine with a reqwest-backed fetcher
/// 4. Run the install and activate lifecycle transitions
/// 5. Start the control channel task
/// 6. Serve control commands from stdin until EOF or shutdown signal
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comic_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Comic Cache engine");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        version = %config.version,
        max_bytes = config.image_cache_max_bytes,
        target_bytes = config.image_cache_target_bytes,
        "Configuration loaded"
    );

    // Create the engine with the production fetcher
    let engine = Engine::new(config, HttpFetcher::new());

    // Lifecycle: install pre-warms the shell store; a failed install leaves
    // the store empty and strategies fall back to the network.
    if let Err(err) = engine.install().await {
        warn!(%err, "install failed, continuing with empty shell store");
    }
    let deleted = engine.activate().await;
    info!(stale_stores = deleted.len(), "Engine activated");

    // Start the control channel task
    let (control_tx, control_rx) = mpsc::channel(16);
    let control_handle = spawn_control_task(engine, control_rx);
    info!("Control channel ready on stdin");

    // Serve stdin until EOF or shutdown signal
    tokio::select! {
        result = serve_stdin(control_tx) => {
            result.context("control channel host failed")?;
            info!("stdin closed, shutting down");
        }
        _ = shutdown_signal() => {}
    }

    control_handle.abort();
    info!("Engine shutdown complete");
    Ok(())
}

/// Reads one JSON control message per stdin line and dispatches it.
///
/// Malformed lines are logged and skipped. Replies to the size query are
/// written as single JSON lines on stdout.
async fn serve_stdin(control_tx: mpsc::Sender<ControlRequest>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let message: ControlMessage = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(err) => {
                warn!(%err, "ignoring malformed control message");
                continue;
            }
        };

        if matches!(message, ControlMessage::GetCacheSize) {
            let (request, reply_rx) = ControlRequest::with_reply(message);
            if control_tx.send(request).await.is_err() {
                break;
            }
            if let Ok(reply) = reply_rx.await {
                let mut encoded = serde_json::to_vec(&reply)?;
                encoded.push(b'\n');
                stdout.write_all(&encoded).await?;
                stdout.flush().await?;
            }
        } else if control_tx
            .send(ControlRequest::fire_and_forget(message))
            .await
            .is_err()
        {
            break;
        }
    }

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
