//! Book API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::{AppError, AppResult},
    models::book::{BookDto, BookInput},
    AppState,
};

use super::ValidatedJson;

/// Title search parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TitleQuery {
    /// Case-insensitive fragment of the title; empty matches everything
    pub title: String,
}

/// Publication year threshold
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct YearQuery {
    /// Books published during or after this year are returned
    pub year: i32,
}

/// Create a book.
///
/// The `author` object either names an existing author by `id` or describes a
/// new author (`name`, `bio`) to be created along with the book.
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Referenced author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<BookInput>,
) -> AppResult<(StatusCode, Json<BookDto>)> {
    let book = state.services.books.create(input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = BookDto),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Book or author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    ValidatedJson(input): ValidatedJson<BookInput>,
) -> AppResult<Json<BookDto>> {
    let book = state.services.books.update(id, input).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<StatusCode> {
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDto),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<Json<BookDto>> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(Json(book))
}

/// List all books with their authors
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<BookDto>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<BookDto>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// List the books of an author
#[utoipa::path(
    get,
    path = "/books/author/{author_id}",
    tag = "books",
    params(("author_id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Books by the author, empty when there are none", body = Vec<BookDto>)
    )
)]
pub async fn list_books_by_author(
    State(state): State<AppState>,
    WithRejection(Path(author_id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<Json<Vec<BookDto>>> {
    let books = state.services.books.list_by_author(author_id).await?;
    Ok(Json(books))
}

/// Search books by title
#[utoipa::path(
    get,
    path = "/books/search/title",
    tag = "books",
    params(TitleQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<BookDto>)
    )
)]
pub async fn search_books_by_title(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<TitleQuery>, AppError>,
) -> AppResult<Json<Vec<BookDto>>> {
    let books = state.services.books.search_by_title(&query.title).await?;
    Ok(Json(books))
}

/// List books published during or after a year
#[utoipa::path(
    get,
    path = "/books/search/year",
    tag = "books",
    params(YearQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<BookDto>),
        (status = 400, description = "Missing or non-numeric year", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books_published_since(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<YearQuery>, AppError>,
) -> AppResult<Json<Vec<BookDto>>> {
    let books = state.services.books.list_published_since(query.year).await?;
    Ok(Json(books))
}
