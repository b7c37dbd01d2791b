//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use utoipa::ToSchema;
use validator::Validate;

use super::{
    author::{Author, AuthorDto, AuthorReference},
    not_blank, ISBN_PATTERN,
};

/// Book row joined with its author.
///
/// Every query producing a `Book` selects the author columns with an
/// `author_` prefix so the author is loaded in the same round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub isbn: Option<String>,
    pub year_published: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: Author,
}

impl<'r> FromRow<'r, PgRow> for Book {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            isbn: row.try_get("isbn")?,
            year_published: row.try_get("year_published")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            author: Author {
                id: row.try_get("author_id")?,
                name: row.try_get("author_name")?,
                bio: row.try_get("author_bio")?,
                created_at: row.try_get("author_created_at")?,
                updated_at: row.try_get("author_updated_at")?,
            },
        })
    }
}

/// Fields written when inserting or overwriting a book
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub isbn: Option<String>,
    pub year_published: i32,
}

/// Book as exposed over the API, with its author embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: i64,
    pub title: String,
    pub isbn: Option<String>,
    pub year_published: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorDto,
}

/// Create / update book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    #[validate(
        custom(function = "not_blank", message = "Title is required"),
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters")
    )]
    pub title: String,
    #[validate(
        length(max = 20, message = "ISBN must be at most 20 characters"),
        regex(path = *ISBN_PATTERN, message = "Invalid ISBN format")
    )]
    pub isbn: Option<String>,
    /// A missing year deserializes to 0 and fails the range check
    #[serde(default)]
    #[validate(range(min = 1000, max = 2027, message = "Publication year must be between 1000 and 2027"))]
    pub year_published: i32,
    /// Required on create. On update, omitting it keeps the current author.
    #[validate(nested)]
    pub author: Option<AuthorReference>,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            isbn: book.isbn,
            year_published: book.year_published,
            created_at: book.created_at,
            updated_at: book.updated_at,
            author: book.author.into(),
        }
    }
}

impl From<&BookInput> for NewBook {
    fn from(input: &BookInput) -> Self {
        Self {
            title: input.title.clone(),
            isbn: input.isbn.clone(),
            year_published: input.year_published,
        }
    }
}
