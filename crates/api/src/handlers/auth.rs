//! Handlers for the `/auth` resource (signup, token exchange).
//!
//! Signup is get-or-create: an existing exact `(username, email)` pair gets a
//! fresh confirmation code instead of an error. Exchanging a code stamps the
//! user's `last_login_at`, which invalidates every code issued before it.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;
use yamdb_core::confirmation::CodeSubject;
use yamdb_core::error::CoreError;
use yamdb_core::validation::{
    validate_signup_uniqueness, validate_username, RuleViolation, MAX_EMAIL_LENGTH,
    MAX_USERNAME_LENGTH,
};
use yamdb_db::models::user::{CreateUser, User};
use yamdb_db::repositories::UserRepo;
use yamdb_mail::OutgoingEmail;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`. Echoed back on success.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH))]
    pub username: String,
    #[validate(email, length(max = MAX_EMAIL_LENGTH))]
    pub email: String,
}

/// Request body for `POST /auth/token`.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH))]
    pub username: String,
    #[validate(length(min = 1))]
    pub confirmation_code: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Create the account if needed and email it a confirmation code.
pub async fn signup(
    State(state): State<AppState>,
    AppJson(input): AppJson<SignupRequest>,
) -> AppResult<Json<SignupRequest>> {
    validate_username(&input.username)?;

    let by_username = UserRepo::find_by_username(&state.pool, &input.username).await?;
    let by_email = UserRepo::find_by_email(&state.pool, &input.email).await?;
    validate_signup_uniqueness(
        &input.username,
        &input.email,
        by_username.as_ref().map(|u| u.email.as_str()),
        by_email.as_ref().map(|u| u.username.as_str()),
    )?;

    let user = match by_username {
        Some(existing) => existing,
        None => {
            let created = UserRepo::create(
                &state.pool,
                &CreateUser {
                    username: input.username.clone(),
                    email: input.email.clone(),
                    ..Default::default()
                },
            )
            .await?;
            tracing::info!(user_id = created.id, username = %created.username, "User signed up");
            created
        }
    };

    let code = state.codes.make(&code_subject(&user), Utc::now());
    state
        .mailer
        .send(&OutgoingEmail::confirmation_code(
            &user.username,
            &user.email,
            &code,
        ))
        .await?;

    tracing::info!(user_id = user.id, "Confirmation code sent");

    Ok(Json(input))
}

/// POST /api/v1/auth/token
///
/// Exchange a confirmation code for an access token.
pub async fn token(
    State(state): State<AppState>,
    AppJson(input): AppJson<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    validate_username(&input.username)?;

    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &input.username))?;

    if !state
        .codes
        .check(&code_subject(&user), &input.confirmation_code, Utc::now())
    {
        tracing::warn!(user_id = user.id, "Rejected confirmation code");
        return Err(RuleViolation::InvalidCode.into());
    }

    // A concurrent exchange of the same code may have logged in first.
    if !UserRepo::record_login(&state.pool, user.id, user.last_login_at).await? {
        tracing::warn!(user_id = user.id, "Confirmation code already used");
        return Err(RuleViolation::InvalidCode.into());
    }

    let token = generate_access_token(user.id, user.role(), &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, "Access token issued");

    Ok(Json(TokenResponse { token }))
}

fn code_subject(user: &User) -> CodeSubject<'_> {
    CodeSubject {
        user_id: user.id,
        email: &user.email,
        last_login_at: user.last_login_at,
    }
}
