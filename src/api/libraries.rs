//! Library (biblioteca) endpoints

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, StatusCode},
    Json,
};
use axum_extra::extract::Query;

use crate::{
    error::{AppResult, ErrorResponse},
    models::{Library, LibraryInput, LibraryPage, PageParams},
    AppState,
};

/// Create a library
#[utoipa::path(
    post,
    path = "/api/biblioteca/create",
    tag = "biblioteca",
    request_body = LibraryInput,
    responses(
        (status = 201, description = "Library created", body = Library,
            headers(("Location" = String, description = "Search URL of the new library"))),
        (status = 409, description = "A listed book name is already taken", body = ErrorResponse),
        (status = 422, description = "Missing name or unknown listed book", body = ErrorResponse)
    )
)]
pub async fn create_library(
    State(state): State<AppState>,
    Json(input): Json<LibraryInput>,
) -> AppResult<(StatusCode, [(HeaderName, String); 1], Json<Library>)> {
    let library = state.services.libraries.create(input).await?;
    let location = format!("/api/biblioteca/search/{}", library.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(library)))
}

/// Replace a library, keeping its id
#[utoipa::path(
    put,
    path = "/api/biblioteca/replace/{id}",
    tag = "biblioteca",
    params(("id" = i32, Path, description = "Library ID")),
    request_body = LibraryInput,
    responses(
        (status = 204, description = "Library replaced"),
        (status = 422, description = "Library not found", body = ErrorResponse)
    )
)]
pub async fn replace_library(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<LibraryInput>,
) -> AppResult<StatusCode> {
    state.services.libraries.replace(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a library and all of its books
#[utoipa::path(
    delete,
    path = "/api/biblioteca/delete/{id}",
    tag = "biblioteca",
    params(("id" = i32, Path, description = "Library ID")),
    responses(
        (status = 204, description = "Library deleted"),
        (status = 422, description = "Library not found", body = ErrorResponse)
    )
)]
pub async fn delete_library(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.libraries.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a library, with its books, by ID
#[utoipa::path(
    get,
    path = "/api/biblioteca/search/{id}",
    tag = "biblioteca",
    params(("id" = i32, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Library details", body = Library),
        (status = 422, description = "Library not found", body = ErrorResponse)
    )
)]
pub async fn get_library(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Library>> {
    let library = state.services.libraries.get_by_id(id).await?;
    Ok(Json(library))
}

/// List libraries, one page at a time
#[utoipa::path(
    get,
    path = "/api/biblioteca/all",
    tag = "biblioteca",
    params(PageParams),
    responses(
        (status = 200, description = "Page of libraries", body = LibraryPage),
        (status = 400, description = "Unknown sort property", body = ErrorResponse)
    )
)]
pub async fn list_libraries(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<LibraryPage>> {
    let request = params.resolve(&state.config.pagination)?;
    let page = state.services.libraries.list(&request).await?;
    Ok(Json(page))
}
