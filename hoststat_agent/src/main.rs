//! Entry point for hoststat_agent: parse flags, load config, serve HTTP.

use anyhow::Context;
use hoststat_agent::cli::parse_args;
use hoststat_agent::config::AgentConfig;
use hoststat_agent::http::router;
use hoststat_agent::state::AppState;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = match parse_args(std::env::args()) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
    };

    let mut config = AgentConfig::load(args.config.as_deref())?;
    if let Some(p) = args.port {
        config.port = p;
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(
        "mounts={:?} snapshot={:?}",
        config.mount_points, config.snapshot
    );
    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("hoststat_agent listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await.context("http server")?;
    Ok(())
}
