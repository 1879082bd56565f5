//! Handlers for the `/genres` resource.
//!
//! Anyone may list; only admins may create or delete. Genres are
//! addressed by slug and cannot be edited in place.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::AdminOrReadOnly;
use yamdb_core::validation::{validate_slug, RuleViolation};
use yamdb_db::models::genre::{CreateGenre, Genre};
use yamdb_db::models::page::{ListParams, Page};
use yamdb_db::repositories::GenreRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::Authorized;
use crate::query::page_bounds;
use crate::state::AppState;

/// GET /api/v1/genres
///
/// List genres by name. `?search=` matches a name substring.
pub async fn list_genres(
    _access: Authorized<AdminOrReadOnly>,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Page<Genre>>> {
    let (limit, offset) = page_bounds(params.limit, params.offset);
    let page = GenreRepo::list(&state.pool, params.search.as_deref(), limit, offset).await?;
    Ok(Json(page))
}

/// POST /api/v1/genres
pub async fn create_genre(
    access: Authorized<AdminOrReadOnly>,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateGenre>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    validate_slug(&input.slug)?;
    if GenreRepo::find_by_slug(&state.pool, &input.slug)
        .await?
        .is_some()
    {
        return Err(RuleViolation::DuplicateSlug(input.slug).into());
    }

    let genre = GenreRepo::create(&state.pool, &input).await?;

    tracing::info!(
        slug = %genre.slug,
        user_id = access.require_user()?.user_id,
        "Genre created",
    );

    Ok((StatusCode::CREATED, Json(genre)))
}

/// DELETE /api/v1/genres/{slug}
///
/// Titles lose the genre but are otherwise untouched.
pub async fn delete_genre(
    access: Authorized<AdminOrReadOnly>,
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> AppResult<StatusCode> {
    if !GenreRepo::delete_by_slug(&state.pool, &slug).await? {
        return Err(AppError::Core(CoreError::not_found("Genre", slug)));
    }

    tracing::info!(%slug, user_id = access.require_user()?.user_id, "Genre deleted");

    Ok(StatusCode::NO_CONTENT)
}
