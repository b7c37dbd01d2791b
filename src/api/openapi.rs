//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Catalog API",
        version = "0.1.0",
        description = "Authors and the books they own"
    ),
    servers(
        (url = "/api", description = "Catalog API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Authors
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        authors::get_author,
        authors::list_authors,
        authors::search_authors_by_name,
        // Books
        books::create_book,
        books::update_book,
        books::delete_book,
        books::get_book,
        books::list_books,
        books::list_books_by_author,
        books::search_books_by_title,
        books::list_books_published_since,
    ),
    components(
        schemas(
            // Authors
            crate::models::author::AuthorDto,
            crate::models::author::AuthorInput,
            crate::models::author::AuthorReference,
            // Books
            crate::models::book::BookDto,
            crate::models::book::BookInput,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book catalog")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
