//! Handlers for the `/users` resource.
//!
//! `/users` and `/users/{username}` are admin only. `/users/me` lets any
//! authenticated user read and edit their own profile, except the role.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::error::CoreError;
use yamdb_core::types::DbId;
use yamdb_core::validation::{validate_username, RuleViolation};
use yamdb_db::models::page::{ListParams, Page};
use yamdb_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use yamdb_db::repositories::UserRepo;
use yamdb_db::DbPool;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::page_bounds;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_user(pool: &DbPool, username: &str) -> AppResult<User> {
    Ok(UserRepo::find_by_username(pool, username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", username))?)
}

/// Reject a username or email already held by an account other than `own_id`.
async fn ensure_available(
    pool: &DbPool,
    own_id: Option<DbId>,
    username: Option<&str>,
    email: Option<&str>,
) -> AppResult<()> {
    if let Some(username) = username {
        validate_username(username)?;
        if let Some(holder) = UserRepo::find_by_username(pool, username).await? {
            if Some(holder.id) != own_id {
                return Err(RuleViolation::DuplicateUsername.into());
            }
        }
    }
    if let Some(email) = email {
        if let Some(holder) = UserRepo::find_by_email(pool, email).await? {
            if Some(holder.id) != own_id {
                return Err(RuleViolation::DuplicateEmail.into());
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Admin user management
// ---------------------------------------------------------------------------

/// GET /api/v1/users
///
/// `?search=` matches a username substring.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    let (limit, offset) = page_bounds(params.limit, params.offset);
    let page = UserRepo::list(&state.pool, params.search.as_deref(), limit, offset).await?;
    Ok(Json(page.map(UserResponse::from)))
}

/// POST /api/v1/users
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateUser>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    ensure_available(
        &state.pool,
        None,
        Some(&input.username),
        Some(&input.email),
    )
    .await?;

    let user = UserRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        admin_id = admin.user_id,
        "User created",
    );

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/users/{username}
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(find_user(&state.pool, &username).await?.into()))
}

/// PUT /api/v1/users/{username}
///
/// Full replacement: omitted profile fields are cleared and an omitted role
/// resets to `user`.
pub async fn replace_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
    AppJson(input): AppJson<CreateUser>,
) -> AppResult<Json<UserResponse>> {
    let user = find_user(&state.pool, &username).await?;
    ensure_available(
        &state.pool,
        Some(user.id),
        Some(&input.username),
        Some(&input.email),
    )
    .await?;

    let updated = UserRepo::replace(&state.pool, user.id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &username))?;

    tracing::info!(user_id = user.id, admin_id = admin.user_id, "User replaced");

    Ok(Json(updated.into()))
}

/// PATCH /api/v1/users/{username}
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
    AppJson(input): AppJson<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let user = find_user(&state.pool, &username).await?;
    ensure_available(
        &state.pool,
        Some(user.id),
        input.username.as_deref(),
        input.email.as_deref(),
    )
    .await?;

    let updated = UserRepo::update(&state.pool, user.id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &username))?;

    tracing::info!(user_id = user.id, admin_id = admin.user_id, "User updated");

    Ok(Json(updated.into()))
}

/// DELETE /api/v1/users/{username}
///
/// The user's reviews and comments are removed with the account.
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
) -> AppResult<StatusCode> {
    let user = find_user(&state.pool, &username).await?;
    UserRepo::delete(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, admin_id = admin.user_id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Self-service profile
// ---------------------------------------------------------------------------

/// GET /api/v1/users/me
pub async fn get_me(RequireAuth(auth): RequireAuth) -> AppResult<Json<UserResponse>> {
    Ok(Json(auth.user.into()))
}

/// PATCH /api/v1/users/me
///
/// A `role` in the body is ignored.
pub async fn update_me(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let input = UpdateUser {
        role: None,
        ..input
    };
    ensure_available(
        &state.pool,
        Some(auth.user_id),
        input.username.as_deref(),
        input.email.as_deref(),
    )
    .await?;

    let updated = UserRepo::update(&state.pool, auth.user_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user_id))?;

    tracing::info!(user_id = auth.user_id, "Profile updated");

    Ok(Json(updated.into()))
}
