//! HTTP-level integration tests for admin user management and `/users/me`.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_user, delete_auth, get, get_auth, login_as,
    patch_json_auth, post_json_auth, put_json_auth, token_for,
};
use serde_json::json;
use sqlx::PgPool;
use yamdb_core::roles::Role;

// ---------------------------------------------------------------------------
// Admin management
// ---------------------------------------------------------------------------

/// Non-admins cannot reach `/users`, even moderators.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_users_admin_only(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let user = login_as(&pool, "bob", Role::User).await;
    let moderator = login_as(&pool, "mod", Role::Moderator).await;

    assert_eq!(get(app.clone(), "/api/v1/users").await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        get_auth(app.clone(), "/api/v1/users", &user).await.status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        get_auth(app, "/api/v1/users/bob", &moderator).await.status(),
        StatusCode::FORBIDDEN
    );
}

/// Admins list users with `?search=` on username.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_users_list_and_search(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;
    create_user(&pool, "alice", Role::User).await;
    create_user(&pool, "alicia", Role::Moderator).await;

    let json = body_json(get_auth(app.clone(), "/api/v1/users", &admin).await).await;
    assert_eq!(json["count"], 3);

    let json = body_json(get_auth(app, "/api/v1/users?search=ali", &admin).await).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["results"][0]["username"], "alice");
    assert_eq!(json["results"][1]["role"], "moderator");
    assert!(json["results"][0].get("id").is_none());
}

/// Admins create users with an explicit role; duplicates fail.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_users_create(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;
    let body = json!({
        "username": "critic",
        "email": "critic@x.com",
        "role": "moderator",
        "bio": "Watches everything",
    });

    let response = post_json_auth(app.clone(), "/api/v1/users", body.clone(), &admin).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["role"], "moderator");
    assert_eq!(json["bio"], "Watches everything");
    assert_eq!(json["first_name"], "");

    let response = post_json_auth(app.clone(), "/api/v1/users", body, &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "DUPLICATE_USERNAME");

    let response = post_json_auth(
        app.clone(),
        "/api/v1/users",
        json!({ "username": "me", "email": "me@x.com" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        "/api/v1/users",
        json!({ "username": "x", "email": "x@x.com", "role": "superuser" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Admin PATCH changes the role; PUT resets omitted profile fields.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_users_update_and_delete(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;
    create_user(&pool, "bob", Role::User).await;

    let response = patch_json_auth(
        app.clone(),
        "/api/v1/users/bob",
        json!({ "role": "moderator", "first_name": "Bob" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["role"], "moderator");
    assert_eq!(json["first_name"], "Bob");

    let response = put_json_auth(
        app.clone(),
        "/api/v1/users/bob",
        json!({ "username": "bob", "email": "bob@new.com" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["email"], "bob@new.com");
    assert_eq!(json["first_name"], "");
    assert_eq!(json["role"], "user");

    let response = delete_auth(app.clone(), "/api/v1/users/bob", &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, "/api/v1/users/bob", &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// A token for a deleted user stops working.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_user_token_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;
    let bob = create_user(&pool, "bob", Role::User).await;
    let token = token_for(&bob);

    delete_auth(app.clone(), "/api/v1/users/bob", &admin).await;

    let response = get_auth(app, "/api/v1/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Self-service
// ---------------------------------------------------------------------------

/// `/users/me` needs authentication.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_requires_auth(pool: PgPool) {
    let app = build_test_app(pool).await;

    let response = get(app, "/api/v1/users/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Users edit their own profile but cannot change their role.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_patch_ignores_role(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let token = login_as(&pool, "bob", Role::User).await;

    let response = patch_json_auth(
        app.clone(),
        "/api/v1/users/me",
        json!({ "bio": "Film buff", "role": "admin" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["bio"], "Film buff");
    assert_eq!(json["role"], "user");

    let json = body_json(get_auth(app, "/api/v1/users/me", &token).await).await;
    assert_eq!(json["bio"], "Film buff");
    assert_eq!(json["role"], "user");
}

/// Taking another user's email through `/users/me` fails.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_patch_rejects_taken_email(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    create_user(&pool, "alice", Role::User).await;
    let token = login_as(&pool, "bob", Role::User).await;

    let response = patch_json_auth(
        app,
        "/api/v1/users/me",
        json!({ "email": "ALICE@test.com" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "DUPLICATE_EMAIL");
}
