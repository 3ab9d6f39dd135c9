use std::{env, net::SocketAddr, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
    #[error(transparent)]
    DotEnvError(#[from] dotenvy::Error),
}

#[derive(Clone, Debug)] // Clone needed if passed around, Debug for logging
pub struct Config {
    pub bind_address: SocketAddr,
    /// Static root served as-is; uploads live in its `uploads/` subdirectory.
    pub public_dir: PathBuf,
    pub database_path: PathBuf,
    /// Request body limit applied to the whole router.
    pub max_upload_bytes: usize,
    /// Content types accepted for uploads. Empty means no restriction.
    pub allowed_image_types: Vec<String>,
}

pub const UPLOADS_SUBDIR: &str = "uploads";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024; // 10 MiB
const DEFAULT_ALLOWED_TYPES: &str = "image/png,image/jpeg,image/gif,image/webp";

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidVar("PORT".into(), e.to_string()))?,
            Err(_) => DEFAULT_PORT,
        };
        let bind_address = SocketAddr::from(([0, 0, 0, 0], port));

        let public_dir = env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./public"));

        let database_path = env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./database.sqlite"));

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidVar("MAX_UPLOAD_BYTES".into(), e.to_string()))?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let allowed_image_types = parse_type_list(
            &env::var("ALLOWED_IMAGE_TYPES").unwrap_or_else(|_| DEFAULT_ALLOWED_TYPES.to_string()),
        );

        Ok(Config {
            bind_address,
            public_dir,
            database_path,
            max_upload_bytes,
            allowed_image_types,
        })
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.public_dir.join(UPLOADS_SUBDIR)
    }
}

fn parse_type_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_list_splits_and_trims() {
        let types = parse_type_list("image/png, image/jpeg ,image/gif");
        assert_eq!(types, vec!["image/png", "image/jpeg", "image/gif"]);
    }

    #[test]
    fn empty_type_list_means_unrestricted() {
        assert!(parse_type_list("").is_empty());
        assert!(parse_type_list(" , ").is_empty());
    }
}
