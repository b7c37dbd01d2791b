//! Author API endpoints

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
    models::author::{AuthorDto, AuthorInput},
    AppState,
};

use super::ValidatedJson;

/// Author name search parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameQuery {
    /// Case-insensitive fragment of the author's name; empty matches everything
    pub name: String,
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = AuthorInput,
    responses(
        (status = 201, description = "Author created", body = AuthorDto),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<AuthorInput>,
) -> AppResult<(StatusCode, Json<AuthorDto>)> {
    let author = state.services.authors.create(input).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Update an author's name and bio
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    request_body = AuthorInput,
    responses(
        (status = 200, description = "Author updated", body = AuthorDto),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    ValidatedJson(input): ValidatedJson<AuthorInput>,
) -> AppResult<Json<AuthorDto>> {
    let author = state.services.authors.update(id, input).await?;
    Ok(Json(author))
}

/// Delete an author and all of its books
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<StatusCode> {
    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get an author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDto),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<Json<AuthorDto>> {
    let author = state.services.authors.get_by_id(id).await?;
    Ok(Json(author))
}

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "All authors", body = Vec<AuthorDto>)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<AuthorDto>>> {
    let authors = state.services.authors.list().await?;
    Ok(Json(authors))
}

/// Search authors by name
#[utoipa::path(
    get,
    path = "/authors/search/name",
    tag = "authors",
    params(NameQuery),
    responses(
        (status = 200, description = "Matching authors", body = Vec<AuthorDto>)
    )
)]
pub async fn search_authors_by_name(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<NameQuery>, AppError>,
) -> AppResult<Json<Vec<AuthorDto>>> {
    let authors = state.services.authors.search_by_name(&query.name).await?;
    Ok(Json(authors))
}
