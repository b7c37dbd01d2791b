//! Books repository for database operations.
//!
//! Every read joins `authors` so a book and its author come back in one
//! statement; inserts and updates do the same through a data-modifying CTE.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Pool, Postgres};

use crate::{
    error::AppResult,
    models::book::{Book, NewBook},
};

/// Columns expected by `Book::from_row`, selected from `b` (books) joined with `a` (authors)
const BOOK_COLUMNS: &str = r#"
    b.id, b.title, b.isbn, b.year_published, b.created_at, b.updated_at,
    a.id AS author_id, a.name AS author_name, a.bio AS author_bio,
    a.created_at AS author_created_at, a.updated_at AS author_updated_at
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// All books with their authors
    pub async fn list_with_authors(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b JOIN authors a ON a.id = b.author_id ORDER BY b.id",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> AppResult<Option<Book>>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b JOIN authors a ON a.id = b.author_id WHERE b.id = $1",
            BOOK_COLUMNS
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
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    /// Books owned by an author. An unknown author id yields an empty list.
    pub async fn list_by_author(&self, author_id: i64) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b JOIN authors a ON a.id = b.author_id WHERE b.author_id = $1 ORDER BY b.id",
            BOOK_COLUMNS
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Case-insensitive substring match on title. An empty fragment matches every book.
    pub async fn search_by_title(&self, fragment: &str) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {} FROM books b JOIN authors a ON a.id = b.author_id
            WHERE position(lower($1) in lower(b.title)) > 0
            ORDER BY b.id
            "#,
            BOOK_COLUMNS
        ))
        .bind(fragment)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Books with `year_published >= year`
    pub async fn list_published_since(&self, year: i32) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {} FROM books b JOIN authors a ON a.id = b.author_id
            WHERE b.year_published >= $1
            ORDER BY b.year_published, b.id
            "#,
            BOOK_COLUMNS
        ))
        .bind(year)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Insert a book owned by `author_id`; both timestamps are set to `now`
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        data: &NewBook,
        author_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Book>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as::<_, Book>(&format!(
            r#"
            WITH b AS (
                INSERT INTO books (title, isbn, year_published, author_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $5)
                RETURNING *
            )
            SELECT {} FROM b JOIN authors a ON a.id = b.author_id
            "#,
            BOOK_COLUMNS
        ))
        .bind(&data.title)
        .bind(&data.isbn)
        .bind(data.year_published)
        .bind(author_id)
        .bind(now)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    /// Overwrite title, isbn and year, refreshing `updated_at`.
    /// The author is replaced only when `author_id` is `Some`.
    /// Returns `None` when the book does not exist.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        data: &NewBook,
        author_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Book>>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as::<_, Book>(&format!(
            r#"
            WITH b AS (
                UPDATE books
                SET title = $2, isbn = $3, year_published = $4,
                    author_id = COALESCE($5, author_id), updated_at = $6
                WHERE id = $1
                RETURNING *
            )
            SELECT {} FROM b JOIN authors a ON a.id = b.author_id
            "#,
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(&data.title)
        .bind(&data.isbn)
        .bind(data.year_published)
        .bind(author_id)
        .bind(now)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> AppResult<u64>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
