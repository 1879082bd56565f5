//! HTTP-level integration tests for categories, genres and titles.

mod common;

use axum::http::StatusCode;
use chrono::Datelike;
use common::{
    body_json, build_test_app, delete, delete_auth, get, login_as, patch_json_auth, post_json,
    post_json_auth, post_raw, put_json_auth,
};
use serde_json::json;
use sqlx::PgPool;
use yamdb_core::roles::Role;

/// Seed two categories and three genres as `admin_token`.
async fn seed_catalog(app: axum::Router, admin_token: &str) {
    for (name, slug) in [("Film", "film"), ("Book", "book")] {
        let response = post_json_auth(
            app.clone(),
            "/api/v1/categories",
            json!({ "name": name, "slug": slug }),
            admin_token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    for (name, slug) in [("Drama", "drama"), ("Comedy", "comedy"), ("Sci-Fi", "sci-fi")] {
        let response = post_json_auth(
            app.clone(),
            "/api/v1/genres",
            json!({ "name": name, "slug": slug }),
            admin_token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

async fn create_title(app: axum::Router, token: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(app, "/api/v1/titles", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Categories and genres
// ---------------------------------------------------------------------------

/// Anyone may list categories; the wire form is `{name, slug}`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_list_is_public(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;
    seed_catalog(app.clone(), &admin).await;

    let response = get(app, "/api/v1/categories?search=bo").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0], json!({ "name": "Book", "slug": "book" }));
}

/// Anonymous writes are 401, non-admin writes 403.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_create_requires_admin(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let user = login_as(&pool, "bob", Role::User).await;
    let moderator = login_as(&pool, "mod", Role::Moderator).await;
    let body = json!({ "name": "Film", "slug": "film" });

    let response = post_json(app.clone(), "/api/v1/categories", body.clone()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json_auth(app.clone(), "/api/v1/categories", body.clone(), &user).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(app, "/api/v1/categories", body, &moderator).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Slugs must match the pattern and be unique.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_slug_rules(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/categories",
        json!({ "name": "Film", "slug": "bad slug" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_SLUG");

    let body = json!({ "name": "Film", "slug": "film" });
    let response = post_json_auth(app.clone(), "/api/v1/categories", body.clone(), &admin).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(app, "/api/v1/categories", body, &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "DUPLICATE_SLUG");
}

/// Deleting a category keeps its titles but clears their category.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_delete_detaches_titles(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;
    seed_catalog(app.clone(), &admin).await;
    let title = create_title(
        app.clone(),
        &admin,
        json!({ "name": "Dune", "year": 1965, "category": "book" }),
    )
    .await;

    let response = delete_auth(app.clone(), "/api/v1/categories/book", &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app.clone(), "/api/v1/categories/book", &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, &format!("/api/v1/titles/{}", title["id"])).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["category"], serde_json::Value::Null);
}

/// Genres have no detail route and anonymous deletes are 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_genre_routes(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;
    seed_catalog(app.clone(), &admin).await;

    let response = get(app.clone(), "/api/v1/genres").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["count"], 3);

    let response = delete(app.clone(), "/api/v1/genres/drama").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(app, "/api/v1/genres/drama").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

/// Only admins create titles.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_create_requires_admin(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let user = login_as(&pool, "bob", Role::User).await;
    let body = json!({ "name": "Alien", "year": 1979 });

    let response = post_json(app.clone(), "/api/v1/titles", body.clone()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json_auth(app, "/api/v1/titles", body, &user).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Create by slugs, read back nested objects with a null rating.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_create_returns_nested_form(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;
    seed_catalog(app.clone(), &admin).await;

    let json = create_title(
        app.clone(),
        &admin,
        json!({
            "name": "Alien",
            "year": 1979,
            "description": "In space no one can hear you scream",
            "genre": ["sci-fi", "drama", "sci-fi"],
            "category": "film",
        }),
    )
    .await;

    assert!(json["id"].is_i64());
    assert_eq!(json["name"], "Alien");
    assert_eq!(json["year"], 1979);
    assert_eq!(json["rating"], serde_json::Value::Null);
    assert_eq!(json["category"], json!({ "name": "Film", "slug": "film" }));
    let genres = json["genre"].as_array().unwrap();
    assert_eq!(genres.len(), 2);
    assert!(genres.contains(&json!({ "name": "Sci-Fi", "slug": "sci-fi" })));

    let response = get(app, &format!("/api/v1/titles/{}", json["id"])).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json);
}

/// A release year in the future fails on `year`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_future_year_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;
    let next_year = chrono::Utc::now().year() + 1;

    let response = post_json_auth(
        app,
        "/api/v1/titles",
        json!({ "name": "Soon", "year": next_year }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FUTURE_YEAR");
    assert_eq!(json["field"], "year");
}

/// Unknown genre or category slugs are a 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_unknown_slug_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;
    seed_catalog(app.clone(), &admin).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/titles",
        json!({ "name": "X", "year": 2000, "genre": ["western"] }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "UNKNOWN_SLUG");

    let response = post_json_auth(
        app,
        "/api/v1/titles",
        json!({ "name": "X", "year": 2000, "category": "music" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Malformed JSON is a 400, not a 422.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_malformed_json(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;

    let response = post_raw(app, "/api/v1/titles", "{\"name\": ", &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

/// Non-numeric ids are a JSON 404 and malformed filters a JSON 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_bad_path_and_query_use_error_envelope(pool: PgPool) {
    let app = build_test_app(pool).await;

    let response = get(app.clone(), "/api/v1/titles/abc").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    let response = get(app.clone(), "/api/v1/titles/1/reviews/abc/comments").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    let response = get(app.clone(), "/api/v1/titles?year=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = get(app, "/api/v1/categories?limit=ten").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

/// Filters combine with AND and results are ordered by name.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_list_filters(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;
    seed_catalog(app.clone(), &admin).await;

    create_title(
        app.clone(),
        &admin,
        json!({ "name": "Alien", "year": 1979, "genre": ["sci-fi"], "category": "film" }),
    )
    .await;
    create_title(
        app.clone(),
        &admin,
        json!({ "name": "Aliens", "year": 1986, "genre": ["sci-fi", "drama"], "category": "film" }),
    )
    .await;
    create_title(
        app.clone(),
        &admin,
        json!({ "name": "Solaris", "year": 1961, "genre": ["sci-fi"], "category": "book" }),
    )
    .await;

    let response = get(app.clone(), "/api/v1/titles").await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 3);
    assert_eq!(json["results"][0]["name"], "Alien");
    assert_eq!(json["results"][2]["name"], "Solaris");

    let json = body_json(get(app.clone(), "/api/v1/titles?category=book").await).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0]["name"], "Solaris");

    let json = body_json(get(app.clone(), "/api/v1/titles?genre=drama").await).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0]["name"], "Aliens");

    let json = body_json(get(app.clone(), "/api/v1/titles?name=alien").await).await;
    assert_eq!(json["count"], 2);

    let json = body_json(get(app.clone(), "/api/v1/titles?name=alien&year=1979").await).await;
    assert_eq!(json["count"], 1);

    let json = body_json(get(app, "/api/v1/titles?limit=1&offset=1").await).await;
    assert_eq!(json["count"], 3);
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
    assert_eq!(json["results"][0]["name"], "Aliens");
}

/// PATCH keeps omitted relations, PUT clears them.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_patch_and_put(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;
    seed_catalog(app.clone(), &admin).await;
    let title = create_title(
        app.clone(),
        &admin,
        json!({ "name": "Alien", "year": 1979, "genre": ["sci-fi"], "category": "film" }),
    )
    .await;
    let uri = format!("/api/v1/titles/{}", title["id"]);

    let response =
        patch_json_auth(app.clone(), &uri, json!({ "genre": ["drama"] }), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Alien");
    assert_eq!(json["genre"], json!([{ "name": "Drama", "slug": "drama" }]));
    assert_eq!(json["category"]["slug"], "film");

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "name": "Alien (1979)", "year": 1979 }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Alien (1979)");
    assert_eq!(json["genre"], json!([]));
    assert_eq!(json["category"], serde_json::Value::Null);

    let response = patch_json_auth(app, "/api/v1/titles/999999", json!({ "year": 1 }), &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// PATCH with explicit nulls clears description and category.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_patch_null_clears_fields(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;
    seed_catalog(app.clone(), &admin).await;
    let title = create_title(
        app.clone(),
        &admin,
        json!({ "name": "Alien", "year": 1979, "description": "old", "category": "film" }),
    )
    .await;
    let uri = format!("/api/v1/titles/{}", title["id"]);

    let response = patch_json_auth(app.clone(), &uri, json!({ "year": 1980 }), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["description"], "old");
    assert_eq!(json["category"]["slug"], "film");

    let response = patch_json_auth(
        app,
        &uri,
        json!({ "description": null, "category": null }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["description"], serde_json::Value::Null);
    assert_eq!(json["category"], serde_json::Value::Null);
    assert_eq!(json["year"], 1980);
}

/// Deleting a title removes it and its reviews.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_delete_cascades(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&pool, "root", Role::Admin).await;
    let user = login_as(&pool, "bob", Role::User).await;
    let title = create_title(app.clone(), &admin, json!({ "name": "Alien", "year": 1979 })).await;
    let uri = format!("/api/v1/titles/{}", title["id"]);

    let response = post_json_auth(
        app.clone(),
        &format!("{uri}/reviews"),
        json!({ "text": "Great", "score": 9 }),
        &user,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = delete_auth(app.clone(), &uri, &user).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(get(app.clone(), &uri).await.status(), StatusCode::NOT_FOUND);
    let response = get(app, &format!("{uri}/reviews")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}
