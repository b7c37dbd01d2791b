//! Authors repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Pool, Postgres};

use crate::{
    error::AppResult,
    models::author::{Author, NewAuthor},
};

const AUTHOR_COLUMNS: &str = "id, name, bio, created_at, updated_at";

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List every author
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors ORDER BY id",
            AUTHOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Case-insensitive substring match on name. An empty fragment matches every author.
    pub async fn search_by_name(&self, fragment: &str) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors WHERE position(lower($1) in lower(name)) > 0 ORDER BY id",
            AUTHOR_COLUMNS
        ))
        .bind(fragment)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> AppResult<Option<Author>>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors WHERE id = $1",
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn exists<'e, E>(&self, executor: E, id: i64) -> AppResult<bool>
    where
        E: PgExecutor<'e>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    /// Insert an author; both timestamps are set to `now`
    pub async fn insert<'e, E>(&self, executor: E, data: &NewAuthor, now: DateTime<Utc>) -> AppResult<Author>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as::<_, Author>(&format!(
            r#"
            INSERT INTO authors (name, bio, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(&data.name)
        .bind(&data.bio)
        .bind(now)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    /// Overwrite name and bio, refreshing `updated_at`. Returns `None` when the author does not exist.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        data: &NewAuthor,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Author>>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as::<_, Author>(&format!(
            r#"
            UPDATE authors SET name = $2, bio = $3, updated_at = $4
            WHERE id = $1
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.bio)
        .bind(now)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Delete an author. Its books go with it through `ON DELETE CASCADE`.
    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> AppResult<u64>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
