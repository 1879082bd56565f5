//! Repository for the `titles` table and its `title_genres` links.

use sqlx::PgPool;
use yamdb_core::types::DbId;

use crate::models::page::Page;
use crate::models::title::{Title, TitleFilter, TitleRecord};
use crate::repositories::contains_pattern;

/// Title columns plus the joined category and the computed rating.
const SELECT: &str = "SELECT t.id, t.name, t.year, t.description, t.category_id, \
                      c.name AS category_name, c.slug AS category_slug, \
                      (SELECT FLOOR(AVG(r.score))::int FROM reviews r WHERE r.title_id = t.id) \
                      AS rating \
                      FROM titles t \
                      LEFT JOIN categories c ON c.id = t.category_id";

/// List filter over `$1` name pattern, `$2` year, `$3` category slug and
/// `$4` genre slug. A `NULL` parameter disables its condition.
const FILTER: &str = "WHERE ($1::text IS NULL OR t.name ILIKE $1) \
                      AND ($2::int IS NULL OR t.year = $2) \
                      AND ($3::text IS NULL OR c.slug = $3) \
                      AND ($4::text IS NULL OR EXISTS ( \
                          SELECT 1 FROM title_genres tg \
                          JOIN genres g ON g.id = tg.genre_id \
                          WHERE tg.title_id = t.id AND g.slug = $4))";

/// Provides CRUD operations for titles.
pub struct TitleRepo;

impl TitleRepo {
    /// Insert a title and its genre links in one transaction.
    pub async fn create(pool: &PgPool, input: &TitleRecord) -> Result<Title, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO titles (name, year, description, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::link_genres(&mut tx, id, &input.genre_ids).await?;
        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Title>, sqlx::Error> {
        let query = format!("{SELECT} WHERE t.id = $1");
        sqlx::query_as::<_, Title>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM titles WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List titles ordered by name, narrowed by `filter`.
    pub async fn list(
        pool: &PgPool,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Page<Title>, sqlx::Error> {
        let name = filter.name.as_deref().map(contains_pattern);

        let count_query = format!(
            "SELECT COUNT(*) FROM titles t \
             LEFT JOIN categories c ON c.id = t.category_id \
             {FILTER}"
        );
        let count: i64 = sqlx::query_scalar(&count_query)
            .bind(&name)
            .bind(filter.year)
            .bind(&filter.category)
            .bind(&filter.genre)
            .fetch_one(pool)
            .await?;

        let query = format!("{SELECT} {FILTER} ORDER BY t.name, t.id LIMIT $5 OFFSET $6");
        let results = sqlx::query_as::<_, Title>(&query)
            .bind(&name)
            .bind(filter.year)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(Page { count, results })
    }

    /// Ids of the genres linked to a title.
    pub async fn genre_ids(pool: &PgPool, id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT genre_id FROM title_genres WHERE title_id = $1")
            .bind(id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite a title and replace its genre links.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &TitleRecord,
    ) -> Result<Option<Title>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE titles SET name = $2, year = $3, description = $4, category_id = $5
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }

        sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::link_genres(&mut tx, id, &input.genre_ids).await?;
        tx.commit().await?;

        Self::find_by_id(pool, id).await
    }

    /// Delete a title. Reviews and their comments cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn link_genres(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        title_id: DbId,
        genre_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        if genre_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO title_genres (title_id, genre_id)
             SELECT $1, UNNEST($2::bigint[])
             ON CONFLICT DO NOTHING",
        )
        .bind(title_id)
        .bind(genre_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
