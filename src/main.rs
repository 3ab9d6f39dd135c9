use photo_gallery::{config::Config, errors::AppError, routes::create_router, startup};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "photo_gallery=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().map_err(|e| AppError::InitError(e.to_string()))?;
    tracing::info!(?config, "Configuration loaded");

    // Upload directory, database pool, schema, and shared state.
    let state = startup::build_state(&config).await?;
    let app = create_router(state, &config);

    tracing::info!("Server listening on http://{}", config.bind_address);

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .map_err(|e| {
            AppError::InitError(format!("Failed to bind {}: {}", config.bind_address, e))
        })?;
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Server error: {}", e)))?;

    Ok(())
}
