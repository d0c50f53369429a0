//! API handlers for the catalog REST endpoints

pub mod books;
pub mod health;
pub mod libraries;
pub mod openapi;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Libraries
        .route("/api/biblioteca/create", post(libraries::create_library))
        .route("/api/biblioteca/replace/:id", put(libraries::replace_library))
        .route("/api/biblioteca/delete/:id", delete(libraries::delete_library))
        .route("/api/biblioteca/search/:id", get(libraries::get_library))
        .route("/api/biblioteca/all", get(libraries::list_libraries))
        // Books
        .route("/api/livro/create", post(books::create_book))
        .route("/api/livro/replace/:id", put(books::replace_book))
        .route("/api/livro/delete/:id", delete(books::delete_book))
        .route("/api/livro/search/:id", get(books::get_book))
        .route("/api/livro/all", get(books::list_books))
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
