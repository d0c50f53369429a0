//! Book (livro) endpoints

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, StatusCode},
    Json,
};
use axum_extra::extract::Query;

use crate::{
    error::{AppResult, ErrorResponse},
    models::{Book, BookInput, BookPage, PageParams},
    AppState,
};

/// Create a book in an existing library
#[utoipa::path(
    post,
    path = "/api/livro/create",
    tag = "livro",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book,
            headers(("Location" = String, description = "Search URL of the new book"))),
        (status = 409, description = "Book name already taken", body = ErrorResponse),
        (status = 422, description = "Missing field or library not found", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(input): Json<BookInput>,
) -> AppResult<(StatusCode, [(HeaderName, String); 1], Json<Book>)> {
    let book = state.services.books.create(input).await?;
    let location = format!("/api/livro/search/{}", book.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(book)))
}

/// Replace a book, keeping its id
#[utoipa::path(
    put,
    path = "/api/livro/replace/{id}",
    tag = "livro",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 204, description = "Book replaced"),
        (status = 409, description = "Book name already taken", body = ErrorResponse),
        (status = 422, description = "Library or book not found", body = ErrorResponse)
    )
)]
pub async fn replace_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<BookInput>,
) -> AppResult<StatusCode> {
    state.services.books.replace(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/api/livro/delete/{id}",
    tag = "livro",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 422, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/api/livro/search/{id}",
    tag = "livro",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 422, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(Json(book))
}

/// List books, one page at a time
#[utoipa::path(
    get,
    path = "/api/livro/all",
    tag = "livro",
    params(PageParams),
    responses(
        (status = 200, description = "Page of books", body = BookPage),
        (status = 400, description = "Unknown sort property", body = ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<BookPage>> {
    let request = params.resolve(&state.config.pagination)?;
    let page = state.services.books.list(&request).await?;
    Ok(Json(page))
}
