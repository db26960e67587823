use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use movie_recommender::{
    config::Config,
    engine::Engine,
    routes::{create_router, AppState},
    services::metadata::gateway_from_config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_recommender=info,tower_http=info")),
        )
        .init();

    // Loading blocks until the whole store is ready; a load failure ends the process here
    let engine_config = config.clone();
    let engine = tokio::task::spawn_blocking(move || Engine::init(&engine_config)).await??;

    let state = Arc::new(AppState::new(
        Arc::new(engine),
        gateway_from_config(&config),
    ));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
