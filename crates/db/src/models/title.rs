//! Title model, DTOs and the nested read representation.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use yamdb_core::types::DbId;
use yamdb_core::validation::MAX_NAME_LENGTH;

use crate::models::category::Category;
use crate::models::genre::Genre;

/// A title row with its category and computed rating joined in.
///
/// `rating` is the floored mean of review scores, `None` when unreviewed.
#[derive(Debug, Clone, FromRow)]
pub struct Title {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub rating: Option<i32>,
}

/// Wire form of a title: nested genres and category.
#[derive(Debug, Clone, Serialize)]
pub struct TitleResponse {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub rating: Option<i32>,
    pub description: Option<String>,
    pub genre: Vec<Genre>,
    pub category: Option<Category>,
}

impl TitleResponse {
    pub fn new(title: Title, genre: Vec<Genre>) -> Self {
        let category = match (title.category_id, title.category_name, title.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(Category { id, name, slug }),
            _ => None,
        };
        Self {
            id: title.id,
            name: title.name,
            year: title.year,
            rating: title.rating,
            description: title.description,
            genre,
            category,
        }
    }
}

/// DTO for creating (or fully replacing) a title. Genres and category are
/// referenced by slug.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTitle {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
    pub category: Option<String>,
}

/// DTO for partially updating a title. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTitle {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: Option<String>,
    pub year: Option<i32>,
    /// `null` clears the description.
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub description: Option<Option<String>>,
    pub genre: Option<Vec<String>>,
    /// `null` detaches the category.
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub category: Option<Option<String>>,
}

/// A title write with slug references already resolved to ids.
#[derive(Debug, Clone)]
pub struct TitleRecord {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub genre_ids: Vec<DbId>,
}

/// Query parameters for the title list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleFilter {
    /// Case-insensitive substring of the title name.
    pub name: Option<String>,
    pub year: Option<i32>,
    /// Category slug.
    pub category: Option<String>,
    /// Genre slug.
    pub genre: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
