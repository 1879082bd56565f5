//! Handlers for the `/titles` resource.
//!
//! Writes reference genres and the category by slug; every response
//! re-serializes the nested `{name, slug}` form together with the computed
//! `rating`.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::AdminOrReadOnly;
use yamdb_core::types::DbId;
use yamdb_core::validation::{validate_year_now, RuleViolation};
use yamdb_db::models::genre::Genre;
use yamdb_db::models::page::Page;
use yamdb_db::models::title::{
    CreateTitle, Title, TitleFilter, TitleRecord, TitleResponse, UpdateTitle,
};
use yamdb_db::repositories::{CategoryRepo, GenreRepo, TitleRepo};
use yamdb_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::Authorized;
use crate::query::page_bounds;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve a category slug to its id.
async fn resolve_category(pool: &DbPool, slug: Option<&str>) -> AppResult<Option<DbId>> {
    let Some(slug) = slug else {
        return Ok(None);
    };
    let category = CategoryRepo::find_by_slug(pool, slug)
        .await?
        .ok_or_else(|| RuleViolation::UnknownSlug(slug.to_string()))?;
    Ok(Some(category.id))
}

/// Resolve genre slugs to ids, failing on the first unknown slug.
async fn resolve_genres(pool: &DbPool, slugs: &[String]) -> AppResult<Vec<DbId>> {
    let found = GenreRepo::find_by_slugs(pool, slugs).await?;
    let by_slug: HashMap<&str, DbId> = found.iter().map(|g| (g.slug.as_str(), g.id)).collect();

    let mut ids = Vec::with_capacity(slugs.len());
    for slug in slugs {
        let id = by_slug
            .get(slug.as_str())
            .copied()
            .ok_or_else(|| RuleViolation::UnknownSlug(slug.clone()))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Attach genres to each title with one batched query.
async fn render(pool: &DbPool, titles: Vec<Title>) -> AppResult<Vec<TitleResponse>> {
    let ids: Vec<DbId> = titles.iter().map(|t| t.id).collect();
    let mut genres: HashMap<DbId, Vec<Genre>> = HashMap::new();
    for row in GenreRepo::list_for_titles(pool, &ids).await? {
        genres.entry(row.title_id).or_default().push(row.into());
    }

    Ok(titles
        .into_iter()
        .map(|title| {
            let genre = genres.remove(&title.id).unwrap_or_default();
            TitleResponse::new(title, genre)
        })
        .collect())
}

async fn render_one(pool: &DbPool, title: Title) -> AppResult<TitleResponse> {
    let mut rendered = render(pool, vec![title]).await?;
    rendered
        .pop()
        .ok_or_else(|| AppError::InternalError("rendered title went missing".into()))
}

async fn record_from_create(pool: &DbPool, input: &CreateTitle) -> AppResult<TitleRecord> {
    validate_year_now(input.year)?;
    Ok(TitleRecord {
        name: input.name.clone(),
        year: input.year,
        description: input.description.clone(),
        category_id: resolve_category(pool, input.category.as_deref()).await?,
        genre_ids: resolve_genres(pool, &input.genre).await?,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/titles
///
/// Filters: `?name=` (substring), `?year=`, `?category=` and `?genre=`
/// (slugs). Ordered by name.
pub async fn list_titles(
    _access: Authorized<AdminOrReadOnly>,
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<TitleFilter>,
) -> AppResult<Json<Page<TitleResponse>>> {
    let (limit, offset) = page_bounds(filter.limit, filter.offset);
    let page = TitleRepo::list(&state.pool, &filter, limit, offset).await?;
    let results = render(&state.pool, page.results).await?;
    Ok(Json(Page {
        count: page.count,
        results,
    }))
}

/// POST /api/v1/titles
pub async fn create_title(
    access: Authorized<AdminOrReadOnly>,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTitle>,
) -> AppResult<(StatusCode, Json<TitleResponse>)> {
    let record = record_from_create(&state.pool, &input).await?;
    let title = TitleRepo::create(&state.pool, &record).await?;

    tracing::info!(
        title_id = title.id,
        user_id = access.require_user()?.user_id,
        "Title created",
    );

    Ok((
        StatusCode::CREATED,
        Json(render_one(&state.pool, title).await?),
    ))
}

/// GET /api/v1/titles/{id}
pub async fn get_title(
    _access: Authorized<AdminOrReadOnly>,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<TitleResponse>> {
    let title = TitleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Title", id))?;
    Ok(Json(render_one(&state.pool, title).await?))
}

/// PUT /api/v1/titles/{id}
///
/// Full replacement: omitted `genre` clears the genres, omitted `category`
/// clears the category.
pub async fn replace_title(
    access: Authorized<AdminOrReadOnly>,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<CreateTitle>,
) -> AppResult<Json<TitleResponse>> {
    if !TitleRepo::exists(&state.pool, id).await? {
        return Err(CoreError::not_found("Title", id).into());
    }
    let record = record_from_create(&state.pool, &input).await?;
    let title = TitleRepo::update(&state.pool, id, &record)
        .await?
        .ok_or_else(|| CoreError::not_found("Title", id))?;

    tracing::info!(title_id = id, user_id = access.require_user()?.user_id, "Title replaced");

    Ok(Json(render_one(&state.pool, title).await?))
}

/// PATCH /api/v1/titles/{id}
///
/// Partial update: only the supplied fields change. An explicit `null`
/// clears `description` or `category`.
pub async fn update_title(
    access: Authorized<AdminOrReadOnly>,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateTitle>,
) -> AppResult<Json<TitleResponse>> {
    let existing = TitleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Title", id))?;

    if let Some(year) = input.year {
        validate_year_now(year)?;
    }
    let category_id = match input.category {
        Some(slug) => resolve_category(&state.pool, slug.as_deref()).await?,
        None => existing.category_id,
    };
    let genre_ids = match &input.genre {
        Some(slugs) => resolve_genres(&state.pool, slugs).await?,
        None => TitleRepo::genre_ids(&state.pool, id).await?,
    };

    let record = TitleRecord {
        name: input.name.unwrap_or(existing.name),
        year: input.year.unwrap_or(existing.year),
        description: input.description.unwrap_or(existing.description),
        category_id,
        genre_ids,
    };
    let title = TitleRepo::update(&state.pool, id, &record)
        .await?
        .ok_or_else(|| CoreError::not_found("Title", id))?;

    tracing::info!(title_id = id, user_id = access.require_user()?.user_id, "Title updated");

    Ok(Json(render_one(&state.pool, title).await?))
}

/// DELETE /api/v1/titles/{id}
///
/// Reviews and their comments are removed with the title.
pub async fn delete_title(
    access: Authorized<AdminOrReadOnly>,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if !TitleRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found("Title", id).into());
    }

    tracing::info!(title_id = id, user_id = access.require_user()?.user_id, "Title deleted");

    Ok(StatusCode::NO_CONTENT)
}
