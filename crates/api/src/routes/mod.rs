pub mod auth;
pub mod categories;
pub mod genres;
pub mod health;
pub mod titles;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                     signup (public)
/// /auth/token                                      confirmation code -> token (public)
///
/// /users                                           list, create (admin only)
/// /users/me                                        get, patch (auth required)
/// /users/{username}                                get, put, patch, delete (admin only)
///
/// /categories                                      list, create
/// /categories/{slug}                               delete
/// /genres                                          list, create
/// /genres/{slug}                                   delete
///
/// /titles                                          list, create
/// /titles/{id}                                     get, put, patch, delete
/// /titles/{title_id}/reviews                       list, create
/// /titles/{title_id}/reviews/{id}                  get, put, patch, delete
/// /titles/{title_id}/reviews/{review_id}/comments       list, create
/// /titles/{title_id}/reviews/{review_id}/comments/{id}  get, put, patch, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Signup and token exchange.
        .nest("/auth", auth::router())
        // Account management and self-service profile.
        .nest("/users", users::router())
        // Flat taxonomies.
        .nest("/categories", categories::router())
        .nest("/genres", genres::router())
        // Titles with nested reviews and comments.
        .nest("/titles", titles::router())
}
