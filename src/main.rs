use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;

use linkup_proxy::api::{AppState, create_router};
use linkup_proxy::config::Config;
use linkup_proxy::orchestrator::SearchOrchestrator;
use linkup_proxy::upstream::LinkupClient;

/// Batch search adapter in front of the Linkup API.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    // reads .env before clap looks at BIND_ADDR
    let config = Arc::new(Config::from_env());
    let args = Args::parse();

    tracing::info!(
        "upstream: {}, depth: {}, output: {}, timeout: {}ms, cors: {}",
        config.upstream_url,
        config.default_depth.as_str(),
        config.default_output_type.as_str(),
        config.request_timeout_ms,
        config.enable_cors
    );

    let upstream = Arc::new(LinkupClient::from_config(&config)?);
    let orchestrator = SearchOrchestrator::new(config, upstream);
    let app = create_router(AppState::new(orchestrator));

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
