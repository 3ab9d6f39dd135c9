use crate::{
    domain::PhotoRepository,
    errors::RepoError,
    models::{NewPhoto, Photo},
};
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Sqlite};
use tracing::{self, info};

/// SQLite-backed photo store. One table, no joins.
#[derive(Debug, Clone)]
pub struct SqlitePhotoRepository {
    pool: Pool<Sqlite>,
}

impl SqlitePhotoRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        info!("Initializing SqlitePhotoRepository");
        Self { pool }
    }

    /// Creates the `photos` table if it does not exist. Idempotent; run once
    /// at startup before the server accepts requests.
    ///
    /// AUTOINCREMENT keeps deleted ids from being reused.
    pub async fn migrate(&self) -> Result<(), RepoError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS photos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT,
                description TEXT,
                url TEXT NOT NULL,
                category TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .context("SQLite: Failed to create photos table")
        .map_err(RepoError::BackendError)?;
        Ok(())
    }
}

#[async_trait]
impl PhotoRepository for SqlitePhotoRepository {
    async fn create(&self, photo: &NewPhoto) -> Result<Photo, RepoError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO photos (title, description, url, category, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&photo.title)
        .bind(&photo.description)
        .bind(&photo.url)
        .bind(&photo.category)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .context("SQLite: Failed to insert photo")
        .map_err(RepoError::BackendError)?;

        let id = result.last_insert_rowid();
        tracing::debug!(photo_id = id, category = %photo.category, "SQLite: Inserted photo");

        Ok(Photo {
            id,
            title: photo.title.clone(),
            description: photo.description.clone(),
            url: photo.url.clone(),
            category: photo.category.clone(),
            created_at,
        })
    }

    async fn list_by_category(
        &self,
        category: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Photo>, RepoError> {
        // Ties on created_at fall back to id so newest-first stays stable.
        let photos = match limit {
            Some(n) => {
                sqlx::query_as::<_, Photo>(
                    "SELECT id, title, description, url, category, created_at
                     FROM photos WHERE category = ?
                     ORDER BY created_at DESC, id DESC LIMIT ?",
                )
                .bind(category)
                .bind(n)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Photo>(
                    "SELECT id, title, description, url, category, created_at
                     FROM photos WHERE category = ?
                     ORDER BY created_at DESC, id DESC",
                )
                .bind(category)
                .fetch_all(&self.pool)
                .await
            }
        }
        .context(format!("SQLite: Failed to list photos in category '{}'", category))
        .map_err(RepoError::BackendError)?;

        tracing::debug!(category = %category, count = photos.len(), "SQLite: Listed photos by category");
        Ok(photos)
    }

    async fn list_all(&self) -> Result<Vec<Photo>, RepoError> {
        let photos = sqlx::query_as::<_, Photo>(
            "SELECT id, title, description, url, category, created_at
             FROM photos ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .context("SQLite: Failed to list all photos")
        .map_err(RepoError::BackendError)?;

        tracing::debug!(count = photos.len(), "SQLite: Listed all photos");
        Ok(photos)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>, RepoError> {
        let photo = sqlx::query_as::<_, Photo>(
            "SELECT id, title, description, url, category, created_at
             FROM photos WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context(format!("SQLite: Failed to fetch photo (id: {})", id))
        .map_err(RepoError::BackendError)?;

        Ok(photo) // Not found is Ok(None), not an error
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context(format!("SQLite: Failed to delete photo (id: {})", id))
            .map_err(RepoError::BackendError)?;

        let deleted = result.rows_affected() > 0;
        tracing::debug!(photo_id = id, deleted, "SQLite: Delete executed");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn test_repo() -> SqlitePhotoRepository {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        // A single connection keeps the in-memory database alive and shared.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .unwrap();
        let repo = SqlitePhotoRepository::new(pool);
        repo.migrate().await.unwrap();
        repo
    }

    fn new_photo(title: &str, category: &str) -> NewPhoto {
        NewPhoto {
            title: Some(title.to_string()),
            description: Some(format!("about {}", title)),
            url: format!("/uploads/{}.png", title),
            category: category.to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let repo = test_repo().await;
        let photo = repo.create(&new_photo("a", "Faces")).await.unwrap();
        assert!(photo.id > 0);
        assert_eq!(photo.title.as_deref(), Some("a"));

        let fetched = repo.find_by_id(photo.id).await.unwrap().unwrap();
        assert_eq!(fetched.url, photo.url);
        assert_eq!(fetched.category, "Faces");
    }

    #[tokio::test]
    async fn list_by_category_filters_orders_and_limits() {
        let repo = test_repo().await;
        for i in 0..5 {
            repo.create(&new_photo(&format!("f{}", i), "Faces")).await.unwrap();
        }
        repo.create(&new_photo("p0", "Places")).await.unwrap();

        let faces = repo.list_by_category("Faces", None).await.unwrap();
        assert_eq!(faces.len(), 5);
        assert!(faces.iter().all(|p| p.category == "Faces"));
        // Newest first: ids strictly descending.
        assert!(faces.windows(2).all(|w| w[0].id > w[1].id));

        let limited = repo.list_by_category("Faces", Some(3)).await.unwrap();
        assert_eq!(limited.len(), 3);
        assert_eq!(limited[0].id, faces[0].id);

        assert!(repo.list_by_category("Things", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn category_match_is_case_sensitive() {
        let repo = test_repo().await;
        repo.create(&new_photo("a", "Faces")).await.unwrap();
        assert!(repo.list_by_category("faces", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_all_returns_every_row_newest_first() {
        let repo = test_repo().await;
        repo.create(&new_photo("a", "Faces")).await.unwrap();
        repo.create(&new_photo("b", "Places")).await.unwrap();
        repo.create(&new_photo("c", "Things")).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].title.as_deref(), Some("c"));
        assert_eq!(all[2].title.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_existed() {
        let repo = test_repo().await;
        let photo = repo.create(&new_photo("a", "Faces")).await.unwrap();

        assert!(repo.delete(photo.id).await.unwrap());
        assert!(repo.find_by_id(photo.id).await.unwrap().is_none());
        // Second delete of the same id is a clean no-op.
        assert!(!repo.delete(photo.id).await.unwrap());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = test_repo().await;
        let first = repo.create(&new_photo("a", "Faces")).await.unwrap();
        repo.delete(first.id).await.unwrap();
        let second = repo.create(&new_photo("b", "Faces")).await.unwrap();
        assert!(second.id > first.id);
    }
}
