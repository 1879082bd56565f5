//! Category model and DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use yamdb_core::types::DbId;
use yamdb_core::validation::{MAX_NAME_LENGTH, MAX_SLUG_LENGTH};

/// A category row. Serialized as `{name, slug}`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    #[serde(skip)]
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,
    #[validate(length(min = 1, max = MAX_SLUG_LENGTH))]
    pub slug: String,
}
