use crate::{config::UPLOADS_SUBDIR, domain::FileStorage, errors::StorageError};
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing;

/// Stores uploaded bytes as files under `<public>/uploads`, addressable by
/// clients as `/uploads/<name>` via the static file service.
#[derive(Debug, Clone)]
pub struct DiskFileStorage {
    public_dir: PathBuf,
}

impl DiskFileStorage {
    pub fn new(public_dir: PathBuf) -> Self {
        Self { public_dir }
    }

    fn upload_dir(&self) -> PathBuf {
        self.public_dir.join(UPLOADS_SUBDIR)
    }

    /// Resolves a stored `/uploads/<name>` path back to its file on disk.
    fn resolve(&self, url_path: &str) -> Result<PathBuf, StorageError> {
        let relative = url_path.trim_start_matches('/');
        if relative.split('/').any(|seg| seg == "..") {
            return Err(StorageError::BackendError(anyhow::anyhow!(
                "Refusing to resolve path containing '..': {}",
                url_path
            )));
        }
        Ok(self.public_dir.join(relative))
    }
}

/// Builds the generated filename: form field, millisecond timestamp, random
/// suffix, then the original name. Timestamp-first keeps directory listings
/// in chronological order.
fn generate_filename(field_name: &str, original_filename: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::random();
    // Keep only the final path component of the client-supplied name.
    let original = Path::new(original_filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    format!("{}-{}-{}-{}", field_name, millis, suffix, original)
}

#[async_trait]
impl FileStorage for DiskFileStorage {
    async fn save(
        &self,
        field_name: &str,
        original_filename: &str,
        data: Vec<u8>,
    ) -> Result<String, StorageError> {
        let filename = generate_filename(field_name, original_filename);
        let path = self.upload_dir().join(&filename);
        tracing::debug!(file = %path.display(), bytes = data.len(), "Disk: Writing uploaded file");

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(file = %path.display(), "Disk: Write successful");
        Ok(format!("/{}/{}", UPLOADS_SUBDIR, filename))
    }

    async fn delete(&self, url_path: &str) -> Result<(), StorageError> {
        let path = self.resolve(url_path)?;

        // Existence check first so a file already gone is a no-op.
        match tokio::fs::metadata(&path).await {
            Ok(_) => {
                tokio::fs::remove_file(&path)
                    .await
                    .context(format!("Disk: Failed to remove file '{}'", path.display()))
                    .map_err(StorageError::BackendError)?;
                tracing::debug!(file = %path.display(), "Disk: Removed file");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(file = %path.display(), "Disk: File already absent during delete");
            }
            Err(e) => {
                return Err(StorageError::BackendError(
                    anyhow::Error::new(e)
                        .context(format!("Disk: Failed to stat file '{}'", path.display())),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, DiskFileStorage) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(UPLOADS_SUBDIR)).unwrap();
        let storage = DiskFileStorage::new(dir.path().to_path_buf());
        (dir, storage)
    }

    #[test]
    fn filename_embeds_field_and_original_name() {
        let name = generate_filename("image", "cat.png");
        assert!(name.starts_with("image-"));
        assert!(name.ends_with("-cat.png"));
        // field, millis, random, original
        assert!(name.split('-').count() >= 4);
    }

    #[test]
    fn filename_strips_directories_from_original_name() {
        let name = generate_filename("image", "../../etc/passwd");
        assert!(!name.contains('/'));
        assert!(name.ends_with("-passwd"));
    }

    #[tokio::test]
    async fn save_writes_bytes_and_returns_web_path() {
        let (dir, storage) = storage();
        let url = storage.save("image", "cat.png", b"png bytes".to_vec()).await.unwrap();

        assert!(url.starts_with("/uploads/image-"));
        let on_disk = dir.path().join(url.trim_start_matches('/'));
        assert_eq!(std::fs::read(on_disk).unwrap(), b"png bytes");
    }

    #[tokio::test]
    async fn delete_removes_file_and_tolerates_missing() {
        let (dir, storage) = storage();
        let url = storage.save("image", "cat.png", vec![1, 2, 3]).await.unwrap();
        let on_disk = dir.path().join(url.trim_start_matches('/'));

        storage.delete(&url).await.unwrap();
        assert!(!on_disk.exists());

        // Second delete is a no-op, not an error.
        storage.delete(&url).await.unwrap();
    }

    #[tokio::test]
    async fn delete_rejects_traversal_paths() {
        let (_dir, storage) = storage();
        assert!(storage.delete("/uploads/../secret").await.is_err());
    }
}
