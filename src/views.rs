use crate::errors::AppError;
use crate::models::{Category, Photo};
use askama::Template;
use axum::response::Html;

/// Renders a view into an HTML response, surfacing template failures as a
/// generic server error.
pub fn render<T: Template>(view: T) -> Result<Html<String>, AppError> {
    Ok(Html(view.render()?))
}

pub struct CategorySection {
    pub category: Category,
    pub photos: Vec<Photo>,
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeView {
    pub sections: Vec<CategorySection>,
}

#[derive(Template)]
#[template(path = "category.html")]
pub struct CategoryView {
    pub category: Category,
    pub photos: Vec<Photo>,
}

#[derive(Template)]
#[template(path = "upload.html")]
pub struct UploadView {
    pub categories: [Category; 3],
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminView {
    pub photos: Vec<Photo>,
}
