use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// One row of the `photos` table. `id` and `created_at` are assigned by the
/// store on insert; `url` is the web path to the stored file, never
/// user-supplied directly.
#[derive(FromRow, Debug, Clone)]
pub struct Photo {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Field values for a photo that has not been inserted yet.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub category: String,
}

/// The closed set of browsing categories. Storage keeps category as plain
/// text; this enum is the boundary validation for route params and uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Faces,
    Places,
    Things,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Faces, Category::Places, Category::Things];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Faces => "Faces",
            Category::Places => "Places",
            Category::Things => "Things",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-sensitive, matching the exact-equality filter the store uses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Faces" => Ok(Category::Faces),
            "Places" => Ok(Category::Places),
            "Things" => Ok(Category::Things),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);
