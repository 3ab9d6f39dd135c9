use crate::{
    config::Config,
    domain::AllowAll,
    errors::AppError,
    repositories::SqlitePhotoRepository,
    storage::DiskFileStorage,
    AppState,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing;

/// Creates the upload directory (with parents) if it is missing. One-time,
/// idempotent; runs before the server accepts requests.
async fn ensure_upload_dir(config: &Config) -> Result<(), AppError> {
    let dir = config.upload_dir();
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::InitError(format!("Failed to create upload dir '{}': {}", dir.display(), e)))?;
    tracing::info!("Startup: Upload directory ready at '{}'", dir.display());
    Ok(())
}

/// Opens the SQLite pool, creating the database file on first run.
async fn connect_pool(path: &Path) -> Result<Pool<Sqlite>, AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::InitError(format!("Failed to create db dir: {}", e)))?;
        }
    }

    let opts = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    // SQLite permits limited write concurrency; a single connection avoids
    // "database is locked" failures under concurrent requests.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .map_err(|e| {
            AppError::InitError(format!("Failed to open database '{}': {}", path.display(), e))
        })?;

    tracing::info!("Startup: SQLite database open at '{}'", path.display());
    Ok(pool)
}

/// Initializes every process-wide resource and wires the shared state:
/// upload directory, database pool, schema, repository, file storage, and
/// the (allow-all) admin gate.
pub async fn build_state(config: &Config) -> Result<Arc<AppState>, AppError> {
    ensure_upload_dir(config).await?;

    let pool = connect_pool(&config.database_path).await?;
    let photo_repo = SqlitePhotoRepository::new(pool);
    photo_repo.migrate().await?;

    let file_storage = DiskFileStorage::new(config.public_dir.clone());

    Ok(Arc::new(AppState {
        photo_repo: Arc::new(photo_repo),
        file_storage: Arc::new(file_storage),
        admin_gate: Arc::new(AllowAll),
        allowed_image_types: config.allowed_image_types.clone(),
    }))
}
