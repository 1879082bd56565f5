//! Genre model and DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use yamdb_core::types::DbId;
use yamdb_core::validation::{MAX_NAME_LENGTH, MAX_SLUG_LENGTH};

/// A genre row. Serialized as `{name, slug}`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Genre {
    #[serde(skip)]
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGenre {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,
    #[validate(length(min = 1, max = MAX_SLUG_LENGTH))]
    pub slug: String,
}

/// A genre joined to one of its titles, used to batch-load title genres.
#[derive(Debug, Clone, FromRow)]
pub struct TitleGenre {
    pub title_id: DbId,
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

impl From<TitleGenre> for Genre {
    fn from(row: TitleGenre) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
        }
    }
}
