//! Book management service

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorReference, AuthorTarget},
        book::{BookDto, BookInput, NewBook},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<BookDto> {
        self.repository
            .books
            .find_by_id(&self.repository.pool, id)
            .await?
            .map(BookDto::from)
            .ok_or_else(|| AppError::book_not_found(id))
    }

    /// All books with their authors, loaded in a single query
    pub async fn list(&self) -> AppResult<Vec<BookDto>> {
        let books = self.repository.books.list_with_authors().await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }

    pub async fn list_by_author(&self, author_id: i64) -> AppResult<Vec<BookDto>> {
        let books = self.repository.books.list_by_author(author_id).await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }

    pub async fn search_by_title(&self, fragment: &str) -> AppResult<Vec<BookDto>> {
        let books = self.repository.books.search_by_title(fragment).await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }

    /// Books published during or after `year`
    pub async fn list_published_since(&self, year: i32) -> AppResult<Vec<BookDto>> {
        let books = self.repository.books.list_published_since(year).await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }

    /// Create a book, attaching an existing author or creating the one described
    /// in the request. Nothing is persisted if any step fails.
    pub async fn create(&self, input: BookInput) -> AppResult<BookDto> {
        tracing::info!("Attempting to create a new book with title: {}", input.title);
        let reference = input
            .author
            .as_ref()
            .ok_or_else(|| AppError::Validation("author: Author is required".to_string()))?;

        let now = Utc::now();
        let mut tx = self.repository.begin().await?;

        let author = self.resolve_author(&mut tx, reference, now).await?;
        let book = self
            .repository
            .books
            .insert(&mut *tx, &NewBook::from(&input), author.id, now)
            .await?;

        tx.commit().await?;
        tracing::info!("Successfully created book with ID: {}", book.id);
        Ok(book.into())
    }

    /// Overwrite title, isbn and year. The author is replaced only when the
    /// request carries one.
    pub async fn update(&self, id: i64, input: BookInput) -> AppResult<BookDto> {
        tracing::info!("Attempting to update book with ID: {}", id);
        let now = Utc::now();
        let mut tx = self.repository.begin().await?;

        if !self.repository.books.exists(&mut *tx, id).await? {
            return Err(AppError::book_not_found(id));
        }

        let author_id = match input.author.as_ref() {
            Some(reference) => Some(self.resolve_author(&mut tx, reference, now).await?.id),
            None => None,
        };

        let book = self
            .repository
            .books
            .update(&mut *tx, id, &NewBook::from(&input), author_id, now)
            .await?
            .ok_or_else(|| AppError::book_not_found(id))?;

        tx.commit().await?;
        tracing::info!("Successfully updated book with ID: {}", book.id);
        Ok(book.into())
    }

    /// Delete a book. Its author is left untouched.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        tracing::info!("Attempting to delete book with ID: {}", id);
        let mut tx = self.repository.begin().await?;

        if !self.repository.books.exists(&mut *tx, id).await? {
            tracing::error!("Failed to delete. Book not found with ID: {}", id);
            return Err(AppError::book_not_found(id));
        }
        self.repository.books.delete(&mut *tx, id).await?;

        tx.commit().await?;
        tracing::info!("Successfully deleted book with ID: {}", id);
        Ok(())
    }

    /// Turn a book's author reference into a persisted author.
    ///
    /// A positive id must name an existing author; it never creates one.
    /// Anything else creates a new author from the reference's name and bio.
    async fn resolve_author(
        &self,
        conn: &mut PgConnection,
        reference: &AuthorReference,
        now: DateTime<Utc>,
    ) -> AppResult<Author> {
        if let Some(id) = reference.id.filter(|id| *id <= 0) {
            tracing::warn!("Author reference carries non-positive id {}, creating a new author", id);
        }

        match reference.target() {
            Some(AuthorTarget::Existing(id)) => self
                .repository
                .authors
                .find_by_id(&mut *conn, id)
                .await?
                .ok_or_else(|| AppError::author_not_found(id)),
            Some(AuthorTarget::New(new_author)) => {
                tracing::info!("Creating new author: {}", new_author.name);
                self.repository.authors.insert(&mut *conn, &new_author, now).await
            }
            None => Err(AppError::Validation(
                "author: Author id or name is required".to_string(),
            )),
        }
    }
}
