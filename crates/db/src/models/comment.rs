//! Comment model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use yamdb_core::types::{DbId, Timestamp};

/// A comment row joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub text: String,
    pub pub_date: Timestamp,
    /// Author username.
    pub author: String,
    /// Parent review id.
    pub review: DbId,
    #[serde(skip)]
    pub author_id: DbId,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    #[validate(length(min = 1))]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateComment {
    #[validate(length(min = 1))]
    pub text: Option<String>,
}
