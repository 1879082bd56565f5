//! Repository for the `genres` table and title/genre links.

use sqlx::PgPool;
use yamdb_core::types::DbId;

use crate::models::genre::{CreateGenre, Genre, TitleGenre};
use crate::models::page::Page;
use crate::repositories::contains_pattern;

const COLUMNS: &str = "id, name, slug";

pub struct GenreRepo;

impl GenreRepo {
    pub async fn create(pool: &PgPool, input: &CreateGenre) -> Result<Genre, sqlx::Error> {
        let query = format!("INSERT INTO genres (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Genre>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE slug = $1");
        sqlx::query_as::<_, Genre>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a set of slugs. Unknown slugs are simply absent from the result.
    pub async fn find_by_slugs(pool: &PgPool, slugs: &[String]) -> Result<Vec<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE slug = ANY($1)");
        sqlx::query_as::<_, Genre>(&query)
            .bind(slugs)
            .fetch_all(pool)
            .await
    }

    /// List genres ordered by name, optionally filtered by a
    /// case-insensitive name substring.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Page<Genre>, sqlx::Error> {
        let pattern = search.map(contains_pattern);

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM genres WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM genres
             WHERE ($1::text IS NULL OR name ILIKE $1)
             ORDER BY name, id
             LIMIT $2 OFFSET $3"
        );
        let results = sqlx::query_as::<_, Genre>(&query)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(Page { count, results })
    }

    /// Genres of every title in `title_ids`, ordered by name within a title.
    pub async fn list_for_titles(
        pool: &PgPool,
        title_ids: &[DbId],
    ) -> Result<Vec<TitleGenre>, sqlx::Error> {
        sqlx::query_as::<_, TitleGenre>(
            "SELECT tg.title_id, g.id, g.name, g.slug
             FROM title_genres tg
             JOIN genres g ON g.id = tg.genre_id
             WHERE tg.title_id = ANY($1)
             ORDER BY tg.title_id, g.name",
        )
        .bind(title_ids)
        .fetch_all(pool)
        .await
    }

    /// Delete a genre by slug. Only its title links go with it.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete_by_slug(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM genres WHERE slug = $1")
            .bind(slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
