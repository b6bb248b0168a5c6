//! Reposcope daemon entry point.
//!
//! Loads configuration from the environment, wires adapters via
//! [`reposcope_infrastructure::bootstrap`], and serves the HTTP API until a
//! termination signal arrives.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use reposcope_infrastructure::config::ConfigLoader;
use reposcope_infrastructure::{bootstrap, logging};
use reposcope_server::AppState;
use tokio::net::TcpListener;
use tokio::signal;

/// Reposcope - ingests a remote git repository and serves its structure
/// and parsed metadata over HTTP.
#[derive(Parser, Debug)]
#[command(name = "reposcope")]
#[command(about = "Ingests a remote git repository and serves its structure and parsed metadata over HTTP")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Override the `PORT` environment variable.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(port) = cli.port {
        // SAFETY: no other thread has started yet; nothing else reads or
        // writes process env this early in `main`.
        #[allow(unsafe_code)]
        unsafe {
            std::env::set_var("PORT", port.to_string());
        }
    }

    let config = ConfigLoader::new().load()?;
    logging::init(config.node_env);

    let application = bootstrap(&config).await?;
    let job_queue = application.services.job_queue.clone();

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "reposcope listening");

    let state = AppState::new(application, config);
    let router = reposcope_server::build_router(state);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_with_deadline())
    .await?;

    job_queue.drain().await?;
    tracing::info!("queue drained, shutting down");
    Ok(())
}

/// Resolves as soon as a termination signal arrives, telling the listener
/// to stop accepting new connections. Spawns a 30 s watchdog (`spec.md`
/// §5) that force-exits if in-flight handlers haven't drained by then.
async fn shutdown_with_deadline() {
    wait_for_signal().await;
    tracing::info!("shutdown signal received, draining in-flight requests");
    tokio::spawn(async {
        tokio::time::sleep(Duration::from_secs(30)).await;
        tracing::warn!("graceful shutdown deadline elapsed, exiting forcefully");
        #[allow(clippy::exit)]
        std::process::exit(1);
    });
}

async fn wait_for_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
