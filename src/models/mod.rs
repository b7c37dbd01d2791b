//! Data models for the catalog

pub mod author;
pub mod book;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

// Re-export commonly used types
pub use author::{Author, AuthorDto, AuthorInput, AuthorReference, AuthorTarget, NewAuthor};
pub use book::{Book, BookDto, BookInput, NewBook};

/// ISBN-10 or ISBN-13 digits with an optional `-<digit or X>` suffix
pub static ISBN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10,13}(-[0-9X])?$").expect("ISBN pattern is valid"));

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
