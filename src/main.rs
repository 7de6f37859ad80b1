use anyhow::Context;
use tracing_subscriber::EnvFilter;

use movie_night::{
    api::{create_router, AppState},
    config::Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_night=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    if config.sheet_url.is_none() {
        tracing::warn!("SHEET_URL is not set; every request must carry remote_sheet_url");
    }

    // Initialize application state
    let state = AppState::from_config(&config).context("Failed to build sheet provider")?;

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Movie night server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
