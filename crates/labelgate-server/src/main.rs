//! Labelgate
//!
//! Classifies short comments (hate speech, offensive, spam, neutral) through
//! an in-process model or the hosted Hugging Face inference API, and serves a
//! chat-style page for trying it out.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing::{error, info, warn};

use labelgate_classifiers::build_provider;
use labelgate_server::{create_router, AppState, Cli, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting Labelgate");

    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded");
    info!("Mode: {}", config.provider.mode);
    info!("Model: {}", config.provider.model);

    let metrics_handle = init_metrics()?;

    // Loading never fails the process; an unusable provider answers 500
    let provider = build_provider(&config.provider, cli.token.clone()).await?;
    let state = AppState::new(provider).with_metrics(metrics_handle);

    let addr = config.socket_addr()?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("labelgate=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("labelgate=info,tower_http=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "labelgate_requests_total",
        "Total number of classification requests received"
    );
    metrics::describe_counter!(
        "labelgate_outcomes_total",
        "Classification outcomes by kind"
    );
    metrics::describe_counter!(
        "labelgate_classifications_total",
        "Successful classifications by label category"
    );
    metrics::describe_histogram!(
        "labelgate_provider_latency_us",
        metrics::Unit::Microseconds,
        "Provider call latency in microseconds"
    );
    metrics::describe_counter!("labelgate_errors_total", "Total number of errors by kind");

    info!("Metrics exporter initialized");
    Ok(handle)
}
