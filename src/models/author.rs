//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::not_blank;

/// Author row as stored in the `authors` table.
///
/// The books owned by an author are never loaded through this type; they are
/// fetched by author id from the books repository.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields written when inserting an author; id and timestamps are assigned on insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthor {
    pub name: String,
    pub bio: Option<String>,
}

/// Author as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create / update author request.
///
/// Any `id`, `createdAt` or `updatedAt` sent by the client is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AuthorInput {
    #[validate(
        custom(function = "not_blank", message = "Name is required"),
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters")
    )]
    pub name: String,
    #[validate(length(max = 1000, message = "Bio cannot exceed 1000 characters"))]
    pub bio: Option<String>,
}

/// Author attached to a book request: either an existing author by id or the
/// details of a new one.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_reference"))]
pub struct AuthorReference {
    pub id: Option<i64>,
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "Bio cannot exceed 1000 characters"))]
    pub bio: Option<String>,
}

/// What an [`AuthorReference`] asks for
#[derive(Debug, Clone, PartialEq)]
pub enum AuthorTarget {
    Existing(i64),
    New(NewAuthor),
}

impl AuthorReference {
    /// A positive id selects an existing author. A missing, zero or negative
    /// id means "create this author".
    pub fn existing_id(&self) -> Option<i64> {
        self.id.filter(|id| *id > 0)
    }

    pub fn target(&self) -> Option<AuthorTarget> {
        if let Some(id) = self.existing_id() {
            return Some(AuthorTarget::Existing(id));
        }
        let name = self.name.as_deref().filter(|n| !n.trim().is_empty())?;
        Some(AuthorTarget::New(NewAuthor {
            name: name.to_string(),
            bio: self.bio.clone(),
        }))
    }
}

fn validate_reference(reference: &AuthorReference) -> Result<(), ValidationError> {
    if reference.existing_id().is_some() {
        return Ok(());
    }
    match reference.name.as_deref() {
        Some(name) if !name.trim().is_empty() => Ok(()),
        _ => {
            let mut error = ValidationError::new("author_name_required");
            error.message = Some("Author id or name is required".into());
            Err(error)
        }
    }
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            bio: author.bio,
            created_at: author.created_at,
            updated_at: author.updated_at,
        }
    }
}

impl From<AuthorInput> for NewAuthor {
    fn from(input: AuthorInput) -> Self {
        Self {
            name: input.name,
            bio: input.bio,
        }
    }
}
