//! Handlers for `/titles/{title_id}/reviews`.
//!
//! Reads are public. Any authenticated user may post one review per title;
//! edits and deletes are limited to the author, moderators and admins.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::AuthorOrStaffOrReadOnly;
use yamdb_core::types::DbId;
use yamdb_core::validation::{validate_score, validate_single_review};
use yamdb_db::models::page::Page;
use yamdb_db::models::review::{CreateReview, Review, UpdateReview};
use yamdb_db::repositories::{ReviewRepo, TitleRepo};
use yamdb_db::DbPool;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::Authorized;
use crate::query::PaginationParams;
use crate::state::AppState;

type Access = Authorized<AuthorOrStaffOrReadOnly>;

async fn ensure_title(pool: &DbPool, title_id: DbId) -> AppResult<()> {
    if TitleRepo::exists(pool, title_id).await? {
        Ok(())
    } else {
        Err(CoreError::not_found("Title", title_id).into())
    }
}

async fn load_review(pool: &DbPool, title_id: DbId, review_id: DbId) -> AppResult<Review> {
    ensure_title(pool, title_id).await?;
    Ok(ReviewRepo::find(pool, title_id, review_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Review", review_id))?)
}

/// GET /api/v1/titles/{title_id}/reviews
pub async fn list_reviews(
    _access: Access,
    State(state): State<AppState>,
    AppPath(title_id): AppPath<DbId>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Page<Review>>> {
    ensure_title(&state.pool, title_id).await?;
    let (limit, offset) = params.bounds();
    let page = ReviewRepo::list_for_title(&state.pool, title_id, limit, offset).await?;
    Ok(Json(page))
}

/// POST /api/v1/titles/{title_id}/reviews
///
/// The caller becomes the author. A second review of the same title by the
/// same author is rejected.
pub async fn create_review(
    access: Access,
    State(state): State<AppState>,
    AppPath(title_id): AppPath<DbId>,
    AppJson(input): AppJson<CreateReview>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let author = access.require_user()?;
    ensure_title(&state.pool, title_id).await?;
    validate_score(input.score)?;
    validate_single_review(
        ReviewRepo::exists_for_author(&state.pool, title_id, author.user_id).await?,
    )?;

    let review = ReviewRepo::create(&state.pool, title_id, author.user_id, &input).await?;

    tracing::info!(
        title_id,
        review_id = review.id,
        user_id = author.user_id,
        "Review created",
    );

    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn get_review(
    _access: Access,
    State(state): State<AppState>,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
) -> AppResult<Json<Review>> {
    Ok(Json(load_review(&state.pool, title_id, review_id).await?))
}

/// PUT /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn replace_review(
    access: Access,
    State(state): State<AppState>,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
    AppJson(input): AppJson<CreateReview>,
) -> AppResult<Json<Review>> {
    let update = UpdateReview {
        text: Some(input.text),
        score: Some(input.score),
    };
    apply_update(access, state, title_id, review_id, update).await
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn update_review(
    access: Access,
    State(state): State<AppState>,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
    AppJson(input): AppJson<UpdateReview>,
) -> AppResult<Json<Review>> {
    apply_update(access, state, title_id, review_id, input).await
}

async fn apply_update(
    access: Access,
    state: AppState,
    title_id: DbId,
    review_id: DbId,
    input: UpdateReview,
) -> AppResult<Json<Review>> {
    let review = load_review(&state.pool, title_id, review_id).await?;
    access.check_author(review.author_id)?;
    if let Some(score) = input.score {
        validate_score(score)?;
    }

    let updated = ReviewRepo::update(&state.pool, review_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Review", review_id))?;

    tracing::info!(
        title_id,
        review_id,
        user_id = access.require_user()?.user_id,
        "Review updated",
    );

    Ok(Json(updated))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}
///
/// Comments on the review are removed with it.
pub async fn delete_review(
    access: Access,
    State(state): State<AppState>,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let review = load_review(&state.pool, title_id, review_id).await?;
    access.check_author(review.author_id)?;

    ReviewRepo::delete(&state.pool, review_id).await?;

    tracing::info!(
        title_id,
        review_id,
        user_id = access.require_user()?.user_id,
        "Review deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
