//! Author management service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::author::{AuthorDto, AuthorInput, NewAuthor},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<AuthorDto>> {
        let authors = self.repository.authors.list().await?;
        Ok(authors.into_iter().map(AuthorDto::from).collect())
    }

    pub async fn create(&self, input: AuthorInput) -> AppResult<AuthorDto> {
        tracing::info!("Attempting to create new author: {}", input.name);
        let author = self
            .repository
            .authors
            .insert(&self.repository.pool, &NewAuthor::from(input), Utc::now())
            .await?;
        tracing::info!("Successfully created author with ID: {}", author.id);
        Ok(author.into())
    }

    pub async fn search_by_name(&self, fragment: &str) -> AppResult<Vec<AuthorDto>> {
        let authors = self.repository.authors.search_by_name(fragment).await?;
        Ok(authors.into_iter().map(AuthorDto::from).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<AuthorDto> {
        self.repository
            .authors
            .find_by_id(&self.repository.pool, id)
            .await?
            .map(AuthorDto::from)
            .ok_or_else(|| AppError::author_not_found(id))
    }

    /// Overwrite name and bio of an existing author
    pub async fn update(&self, id: i64, input: AuthorInput) -> AppResult<AuthorDto> {
        tracing::info!("Attempting to update author with ID: {}", id);
        let author = self
            .repository
            .authors
            .update(&self.repository.pool, id, &NewAuthor::from(input), Utc::now())
            .await?
            .ok_or_else(|| AppError::author_not_found(id))?;
        tracing::info!("Successfully updated author with ID: {}", author.id);
        Ok(author.into())
    }

    /// Delete an author together with all of its books
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        tracing::info!("Attempting to delete author with ID: {}", id);
        let mut tx = self.repository.begin().await?;

        if !self.repository.authors.exists(&mut *tx, id).await? {
            tracing::error!("Failed to delete. Author not found with ID: {}", id);
            return Err(AppError::author_not_found(id));
        }
        self.repository.authors.delete(&mut *tx, id).await?;

        tx.commit().await?;
        tracing::info!("Successfully deleted author with ID: {}", id);
        Ok(())
    }
}
