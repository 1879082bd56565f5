use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use yamdb_core::error::CoreError;

use crate::error::AppError;

/// A `Path<T>` wrapper that answers an unparseable segment (`/titles/abc`)
/// with the JSON 404 used for unknown routes.
pub struct AppPath<T>(pub T);

impl<S, T> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(AppPath(value)),
            Err(PathRejection::FailedToDeserializePathParams(_)) => Err(AppError::Core(
                CoreError::not_found("Route", parts.uri.path()),
            )),
            Err(other) => Err(AppError::InternalError(other.body_text())),
        }
    }
}
