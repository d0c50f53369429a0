//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, libraries};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Livraria API",
        version = "0.1.0",
        description = "Library catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Libraries
        libraries::create_library,
        libraries::replace_library,
        libraries::delete_library,
        libraries::get_library,
        libraries::list_libraries,
        // Books
        books::create_book,
        books::replace_book,
        books::delete_book,
        books::get_book,
        books::list_books,
    ),
    components(
        schemas(
            // Libraries
            crate::models::library::Library,
            crate::models::library::LibraryInput,
            crate::models::library::OwnedBookInput,
            crate::models::page::LibraryPage,
            // Books
            crate::models::book::Book,
            crate::models::book::BookInput,
            crate::models::book::LibraryRef,
            crate::models::page::BookPage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "biblioteca", description = "Library management"),
        (name = "livro", description = "Book management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
