//! Role-based access control (RBAC) extractors.
//!
//! [`Authorized`] runs an [`AccessPolicy`] against the request method before
//! the handler body executes, and carries the method forward so handlers can
//! run the record-level check once the record is loaded. [`RequireAdmin`]
//! and [`RequireAuth`] are the fixed-policy shorthands.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Method;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{authorize, authorize_object, AccessPolicy, AdminOnly, Authenticated};
use yamdb_core::types::DbId;

use super::auth::{AuthUser, MaybeAuthUser};
use crate::error::AppError;
use crate::state::AppState;

/// A request that passed the endpoint-level check of policy `P`.
///
/// ```ignore
/// async fn update_review(
///     access: Authorized<AuthorOrStaffOrReadOnly>,
///     ...
/// ) -> AppResult<Json<Review>> {
///     let review = load(...).await?;
///     access.check_author(review.author_id)?;
///     ...
/// }
/// ```
pub struct Authorized<P> {
    /// The caller, or `None` for an anonymous (read-only) request.
    pub user: Option<AuthUser>,
    method: Method,
    policy: PhantomData<P>,
}

impl<P: AccessPolicy + Default> Authorized<P> {
    /// Record-level check against the author of the record being acted on.
    pub fn check_author(&self, author_id: DbId) -> Result<(), AppError> {
        let requester = self.user.as_ref().map(AuthUser::requester);
        authorize_object(
            &P::default(),
            self.method.as_str(),
            requester.as_ref(),
            author_id,
        )?;
        Ok(())
    }

    /// The authenticated caller. Write methods always have one once the
    /// endpoint check has passed.
    pub fn require_user(&self) -> Result<&AuthUser, AppError> {
        self.user.as_ref().ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Authentication credentials were not provided".into(),
            ))
        })
    }
}

impl<P> FromRequestParts<AppState> for Authorized<P>
where
    P: AccessPolicy + Default + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeAuthUser(user) = MaybeAuthUser::from_request_parts(parts, state).await?;
        let requester = user.as_ref().map(AuthUser::requester);
        authorize(&P::default(), parts.method.as_str(), requester.as_ref())?;
        Ok(Authorized {
            user,
            method: parts.method.clone(),
            policy: PhantomData,
        })
    }
}

/// Requires the `admin` role. Anonymous requests get 401, others 403.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let access = Authorized::<AdminOnly>::from_request_parts(parts, state).await?;
        Ok(RequireAdmin(access.require_user()?.clone()))
    }
}

/// Requires any authenticated user (any role).
///
/// ```ignore
/// async fn any_authed(RequireAuth(user): RequireAuth) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let access = Authorized::<Authenticated>::from_request_parts(parts, state).await?;
        Ok(RequireAuth(access.require_user()?.clone()))
    }
}
