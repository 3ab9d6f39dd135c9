pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod startup;
pub mod storage;
pub mod views;

use domain::{AdminGate, FileStorage, PhotoRepository};
use std::sync::Arc;

/// AppState holds shared resources for the web server. Everything behind a
/// trait object so tests can substitute fakes.
pub struct AppState {
    pub photo_repo: Arc<dyn PhotoRepository>,
    pub file_storage: Arc<dyn FileStorage>,
    pub admin_gate: Arc<dyn AdminGate>,
    /// Content types accepted for uploads; empty means unrestricted.
    pub allowed_image_types: Vec<String>,
}
