//! Handlers for `/titles/{title_id}/reviews/{review_id}/comments`.
//!
//! The review must belong to the title in the path. Same access rules as
//! reviews.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::AuthorOrStaffOrReadOnly;
use yamdb_core::types::DbId;
use yamdb_db::models::comment::{Comment, CreateComment, UpdateComment};
use yamdb_db::models::page::Page;
use yamdb_db::repositories::{CommentRepo, ReviewRepo, TitleRepo};
use yamdb_db::DbPool;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::Authorized;
use crate::query::PaginationParams;
use crate::state::AppState;

type Access = Authorized<AuthorOrStaffOrReadOnly>;

/// 404 unless the title exists and owns the review.
async fn ensure_review(pool: &DbPool, title_id: DbId, review_id: DbId) -> AppResult<()> {
    if !TitleRepo::exists(pool, title_id).await? {
        return Err(CoreError::not_found("Title", title_id).into());
    }
    if ReviewRepo::find(pool, title_id, review_id).await?.is_none() {
        return Err(CoreError::not_found("Review", review_id).into());
    }
    Ok(())
}

async fn load_comment(
    pool: &DbPool,
    title_id: DbId,
    review_id: DbId,
    comment_id: DbId,
) -> AppResult<Comment> {
    ensure_review(pool, title_id, review_id).await?;
    Ok(CommentRepo::find(pool, review_id, comment_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Comment", comment_id))?)
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn list_comments(
    _access: Access,
    State(state): State<AppState>,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Page<Comment>>> {
    ensure_review(&state.pool, title_id, review_id).await?;
    let (limit, offset) = params.bounds();
    let page = CommentRepo::list_for_review(&state.pool, review_id, limit, offset).await?;
    Ok(Json(page))
}

/// POST /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn create_comment(
    access: Access,
    State(state): State<AppState>,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
    AppJson(input): AppJson<CreateComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let author = access.require_user()?;
    ensure_review(&state.pool, title_id, review_id).await?;

    let comment = CommentRepo::create(&state.pool, review_id, author.user_id, &input).await?;

    tracing::info!(
        review_id,
        comment_id = comment.id,
        user_id = author.user_id,
        "Comment created",
    );

    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn get_comment(
    _access: Access,
    State(state): State<AppState>,
    AppPath((title_id, review_id, comment_id)): AppPath<(DbId, DbId, DbId)>,
) -> AppResult<Json<Comment>> {
    Ok(Json(
        load_comment(&state.pool, title_id, review_id, comment_id).await?,
    ))
}

/// PUT /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn replace_comment(
    access: Access,
    State(state): State<AppState>,
    AppPath((title_id, review_id, comment_id)): AppPath<(DbId, DbId, DbId)>,
    AppJson(input): AppJson<CreateComment>,
) -> AppResult<Json<Comment>> {
    let update = UpdateComment {
        text: Some(input.text),
    };
    apply_update(access, state, (title_id, review_id, comment_id), update).await
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn update_comment(
    access: Access,
    State(state): State<AppState>,
    AppPath(ids): AppPath<(DbId, DbId, DbId)>,
    AppJson(input): AppJson<UpdateComment>,
) -> AppResult<Json<Comment>> {
    apply_update(access, state, ids, input).await
}

async fn apply_update(
    access: Access,
    state: AppState,
    (title_id, review_id, comment_id): (DbId, DbId, DbId),
    input: UpdateComment,
) -> AppResult<Json<Comment>> {
    let comment = load_comment(&state.pool, title_id, review_id, comment_id).await?;
    access.check_author(comment.author_id)?;

    let updated = CommentRepo::update(&state.pool, comment_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Comment", comment_id))?;

    tracing::info!(
        review_id,
        comment_id,
        user_id = access.require_user()?.user_id,
        "Comment updated",
    );

    Ok(Json(updated))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn delete_comment(
    access: Access,
    State(state): State<AppState>,
    AppPath((title_id, review_id, comment_id)): AppPath<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    let comment = load_comment(&state.pool, title_id, review_id, comment_id).await?;
    access.check_author(comment.author_id)?;

    CommentRepo::delete(&state.pool, comment_id).await?;

    tracing::info!(
        review_id,
        comment_id,
        user_id = access.require_user()?.user_id,
        "Comment deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
