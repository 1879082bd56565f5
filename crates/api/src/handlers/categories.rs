//! Handlers for the `/categories` resource.
//!
//! Anyone may list; only admins may create or delete. Categories are
//! addressed by slug and cannot be edited in place.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::AdminOrReadOnly;
use yamdb_core::validation::{validate_slug, RuleViolation};
use yamdb_db::models::category::{Category, CreateCategory};
use yamdb_db::models::page::{ListParams, Page};
use yamdb_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::Authorized;
use crate::query::page_bounds;
use crate::state::AppState;

/// GET /api/v1/categories
///
/// List categories by name. `?search=` matches a name substring.
pub async fn list_categories(
    _access: Authorized<AdminOrReadOnly>,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Page<Category>>> {
    let (limit, offset) = page_bounds(params.limit, params.offset);
    let page = CategoryRepo::list(&state.pool, params.search.as_deref(), limit, offset).await?;
    Ok(Json(page))
}

/// POST /api/v1/categories
pub async fn create_category(
    access: Authorized<AdminOrReadOnly>,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    validate_slug(&input.slug)?;
    if CategoryRepo::find_by_slug(&state.pool, &input.slug)
        .await?
        .is_some()
    {
        return Err(RuleViolation::DuplicateSlug(input.slug).into());
    }

    let category = CategoryRepo::create(&state.pool, &input).await?;

    tracing::info!(
        slug = %category.slug,
        user_id = access.require_user()?.user_id,
        "Category created",
    );

    Ok((StatusCode::CREATED, Json(category)))
}

/// DELETE /api/v1/categories/{slug}
///
/// Titles in the category are kept with no category.
pub async fn delete_category(
    access: Authorized<AdminOrReadOnly>,
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> AppResult<StatusCode> {
    if !CategoryRepo::delete_by_slug(&state.pool, &slug).await? {
        return Err(AppError::Core(CoreError::not_found("Category", slug)));
    }

    tracing::info!(%slug, user_id = access.require_user()?.user_id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}
