//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row (and its wire form)
//! - A `Deserialize` create DTO for inserts, validated with `validator`
//! - A `Deserialize` update DTO (all `Option` fields) for patches

use serde::{Deserialize, Deserializer};

pub mod category;
pub mod comment;
pub mod genre;
pub mod page;
pub mod review;
pub mod title;
pub mod user;

/// Serde helper for PATCH on nullable fields.
///
/// * field absent  => `None`          (keep)
/// * field = null  => `Some(None)`    (clear)
/// * field = value => `Some(Some(v))` (set)
///
/// Pair with `#[serde(default)]` so an absent field stays `None`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}
