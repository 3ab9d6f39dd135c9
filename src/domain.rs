use crate::errors::{RepoError, StorageError};
use crate::models::{NewPhoto, Photo};
use async_trait::async_trait;

/// Trait defining operations for storing and retrieving Photo records.
#[async_trait]
pub trait PhotoRepository: Send + Sync + 'static { // Send+Sync+'static required for Arc<dyn>
    /// Inserts a new photo, assigning its id and creation timestamp.
    /// Returns the full stored record.
    async fn create(&self, photo: &NewPhoto) -> Result<Photo, RepoError>;

    /// Photos whose category matches exactly, newest first, optionally
    /// truncated to `limit` entries. No matches is an empty vec, not an error.
    async fn list_by_category(
        &self,
        category: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Photo>, RepoError>;

    /// All photos, newest first.
    async fn list_all(&self) -> Result<Vec<Photo>, RepoError>;

    /// Returns Ok(None) if the photo is not found.
    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>, RepoError>;

    /// Removes the row. Returns false when no such id existed.
    async fn delete(&self, id: i64) -> Result<bool, RepoError>;
}

/// Trait defining operations for storing and removing uploaded file bytes.
#[async_trait]
pub trait FileStorage: Send + Sync + 'static {
    /// Writes the bytes under a freshly generated filename and returns the
    /// web-accessible relative path (e.g. `/uploads/<name>`).
    async fn save(
        &self,
        field_name: &str,
        original_filename: &str,
        data: Vec<u8>,
    ) -> Result<String, StorageError>;

    /// Removes the file a previous `save` returned the path for.
    /// Deleting a path whose file is already gone is a no-op.
    async fn delete(&self, url_path: &str) -> Result<(), StorageError>;
}

/// Gate consulted before the admin list and delete operations run.
///
/// The reference behavior is "always allow"; deployments that need access
/// control swap in their own implementation here.
pub trait AdminGate: Send + Sync + 'static {
    fn allow(&self) -> bool;
}

/// The shipped policy: no authentication, everything allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AdminGate for AllowAll {
    fn allow(&self) -> bool {
        true
    }
}
