use anyhow::{Context, Result};
use raahi_api::{build_app, ApiConfig};
use raahi_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("raahi_api");

    let config = ApiConfig::from_env()?;
    let bind = config.bind.clone();
    let backend = config.chat_backend_url.clone();

    let app = build_app(config).await?;

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(bind = %bind, chat_backend = %backend, "raahi api started");

    axum::serve(listener, app).await?;
    Ok(())
}
