use crate::{
    config::Config,
    handlers, // Import handlers module
    AppState, // Shared state defined in lib.rs
};
use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Creates the Axum router and associates routes with handlers.
///
/// Anything no route matches falls through to the static file service over
/// the public directory (which is how uploaded images are served); paths
/// that are not files either get the plain-text 404.
pub fn create_router(state: Arc<AppState>, config: &Config) -> Router {
    let static_files =
        ServeDir::new(&config.public_dir).not_found_service(handlers::not_found.into_service());

    Router::new()
        .route("/", get(handlers::home))
        .route("/category/{category}", get(handlers::category_view))
        .route("/upload", get(handlers::upload_form).post(handlers::upload))
        .route("/admin", get(handlers::admin))
        .route("/delete/{id}", get(handlers::delete_photo))
        .fallback_service(static_files)
        // Middleware Layers
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(state) // Pass the application state
}
