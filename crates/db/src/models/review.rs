//! Review model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use yamdb_core::types::{DbId, Timestamp};

/// A review row joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    #[serde(skip)]
    pub title_id: DbId,
    #[serde(skip)]
    pub author_id: DbId,
    pub text: String,
    /// Author username.
    pub author: String,
    pub score: i32,
    pub pub_date: Timestamp,
}

/// DTO for creating (or fully replacing) a review.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReview {
    #[validate(length(min = 1))]
    pub text: String,
    pub score: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateReview {
    #[validate(length(min = 1))]
    pub text: Option<String>,
    pub score: Option<i32>,
}
