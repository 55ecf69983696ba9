use detective_case_backend::{
    config::{get_config, init_config},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    init_config()?;
    let config = get_config();

    let app_state = AppState::new(config)?;
    let app = routes::router(app_state, config);

    let addr: SocketAddr = config.server_address.parse()?;
    info!(
        model = %config.replicate_model,
        poll_interval_ms = config.poll_interval_ms,
        poll_timeout_ms = config.poll_timeout_ms,
        "Server listening on {}",
        addr
    );
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
