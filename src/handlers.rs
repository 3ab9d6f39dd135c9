use crate::{
    errors::AppError,
    models::{Category, NewPhoto},
    views::{self, AdminView, CategorySection, CategoryView, HomeView, UploadView},
    AppState,
};
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing;

/// Home page shows this many recent photos per category.
const HOME_RECENT_LIMIT: u32 = 3;
/// Multipart field name carrying the uploaded file.
const IMAGE_FIELD: &str = "image";

/// Plain 302 Found redirect.
fn redirect_found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// GET / — the three categories, three most recent photos each.
pub async fn home(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let mut sections = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        let photos = state
            .photo_repo
            .list_by_category(category.as_str(), Some(HOME_RECENT_LIMIT))
            .await?;
        sections.push(CategorySection { category, photos });
    }
    views::render(HomeView { sections })
}

/// GET /category/{category} — everything in one category, newest first.
/// Unrecognized categories 404 rather than rendering an empty page.
pub async fn category_view(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Html<String>, AppError> {
    let category: Category = category.parse()?;
    let photos = state
        .photo_repo
        .list_by_category(category.as_str(), None)
        .await?;
    views::render(CategoryView { category, photos })
}

/// GET /upload — the static upload form.
pub async fn upload_form() -> Result<Html<String>, AppError> {
    views::render(UploadView { categories: Category::ALL })
}

/// POST /upload — store the file, then the record, then bounce home.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut title = None;
    let mut description = None;
    let mut category = None;
    let mut image_data: Option<Vec<u8>> = None;
    let mut image_filename: Option<String> = None;
    let mut image_content_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        match field_name.as_str() {
            "title" => title = Some(field.text().await?),
            "description" => description = Some(field.text().await?),
            "category" => category = Some(field.text().await?),
            IMAGE_FIELD => {
                image_filename = field.file_name().map(|s| s.to_string());
                image_content_type = field.content_type().map(|m| m.to_string());
                image_data = Some(field.bytes().await?.to_vec());
            }
            _ => tracing::debug!("Ignoring unknown multipart field: {}", field_name),
        }
    }

    // The file is required; reject before any state is touched.
    let image_data = image_data.ok_or_else(|| AppError::MissingFormField(IMAGE_FIELD.to_string()))?;
    if image_data.is_empty() {
        return Err(AppError::InvalidInput("image data cannot be empty".to_string()));
    }

    // Category is validated at the boundary even though storage keeps text.
    let category = category
        .ok_or_else(|| AppError::MissingFormField("category".to_string()))?
        .parse::<Category>()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let image_filename = image_filename.unwrap_or_else(|| "upload".to_string());

    // Enforce the configured content-type allow-list, guessing from the
    // filename when the part carries no type of its own.
    if !state.allowed_image_types.is_empty() {
        let content_type = image_content_type
            .or_else(|| mime_guess::from_path(&image_filename).first_raw().map(|s| s.to_string()))
            .unwrap_or_else(|| "application/octet-stream".to_string());
        if !state.allowed_image_types.iter().any(|t| t == &content_type) {
            return Err(AppError::InvalidInput(format!(
                "Unsupported upload content type: {}",
                content_type
            )));
        }
    }

    // File first, record second, so a stored url always points at a real file.
    let url = state
        .file_storage
        .save(IMAGE_FIELD, &image_filename, image_data)
        .await?;

    let photo = state
        .photo_repo
        .create(&NewPhoto {
            title: title.filter(|s| !s.is_empty()),
            description: description.filter(|s| !s.is_empty()),
            url,
            category: category.as_str().to_string(),
        })
        .await?;

    tracing::info!(photo_id = photo.id, category = %photo.category, "Photo uploaded");
    Ok(redirect_found("/"))
}

/// GET /admin — full listing with per-item delete links.
pub async fn admin(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    if !state.admin_gate.allow() {
        return Err(AppError::Forbidden);
    }
    let photos = state.photo_repo.list_all().await?;
    views::render(AdminView { photos })
}

/// GET /delete/{id} — remove file then record; unknown or malformed ids are
/// silent no-ops. Always redirects back to the admin listing.
pub async fn delete_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    if !state.admin_gate.allow() {
        return Err(AppError::Forbidden);
    }

    let Ok(id) = id.parse::<i64>() else {
        tracing::warn!(raw_id = %id, "Delete requested with non-numeric id");
        return Ok(redirect_found("/admin"));
    };

    match state.photo_repo.find_by_id(id).await? {
        Some(photo) => {
            state.file_storage.delete(&photo.url).await?;
            let deleted = state.photo_repo.delete(id).await?;
            tracing::info!(photo_id = id, deleted, url = %photo.url, "Photo deleted");
        }
        None => {
            tracing::debug!(photo_id = id, "Delete requested for unknown photo, ignoring");
        }
    }

    Ok(redirect_found("/admin"))
}

/// Fallback for any path no route or static file matched.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 - Not Found")
}
