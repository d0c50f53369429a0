//! Repository layer for catalog storage
//!
//! Each entity has one accessor trait. Every method is a single store
//! transaction: existence checks and the dependent write cannot be split by
//! a concurrent request.

pub mod books;
pub mod libraries;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookDraft, Library, LibraryDraft, PageRequest},
};

pub use books::PgBookRepository;
pub use libraries::PgLibraryRepository;
pub use memory::MemoryCatalog;

/// CRUD and paging over libraries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// Check that the store answers
    async fn ping(&self) -> AppResult<()>;

    /// Fetch one library with its books; `NotFound` if absent
    async fn get_by_id(&self, id: i32) -> AppResult<Library>;

    /// One page of libraries (books included) and the total row count
    async fn list(&self, page: &PageRequest) -> AppResult<(Vec<Library>, i64)>;

    /// Insert a library and attach / create the books it lists
    async fn create(&self, draft: &LibraryDraft) -> AppResult<Library>;

    /// Overwrite the library's name and attach the listed books; `NotFound` if absent
    async fn replace(&self, id: i32, draft: &LibraryDraft) -> AppResult<()>;

    /// Delete the library and every book referencing it. Returns the number
    /// of books removed.
    async fn delete(&self, id: i32) -> AppResult<u64>;
}

/// CRUD and paging over books
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Fetch one book; `NotFound` if absent
    async fn get_by_id(&self, id: i32) -> AppResult<Book>;

    /// One page of books and the total row count
    async fn list(&self, page: &PageRequest) -> AppResult<(Vec<Book>, i64)>;

    /// Insert a book owned by `draft.library_id`; `NotFound` if that library
    /// is absent, `Conflict` if the name is taken
    async fn create(&self, draft: &BookDraft) -> AppResult<Book>;

    /// Overwrite the book's name and owner; `NotFound` if either the library
    /// or the book is absent
    async fn replace(&self, id: i32, draft: &BookDraft) -> AppResult<()>;

    /// Delete one book; `NotFound` if absent
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Main repository struct holding one accessor per entity
#[derive(Clone)]
pub struct Repository {
    pub libraries: Arc<dyn LibraryRepository>,
    pub books: Arc<dyn BookRepository>,
}

impl Repository {
    pub fn new(libraries: Arc<dyn LibraryRepository>, books: Arc<dyn BookRepository>) -> Self {
        Self { libraries, books }
    }

    /// Repositories backed by PostgreSQL
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            libraries: Arc::new(PgLibraryRepository::new(pool.clone())),
            books: Arc::new(PgBookRepository::new(pool)),
        }
    }

    /// Repositories sharing one process-local catalog
    pub fn in_memory() -> Self {
        let catalog = Arc::new(MemoryCatalog::new());
        Self {
            libraries: catalog.clone(),
            books: catalog,
        }
    }
}

/// Translate constraint violations raised by a book write
pub(crate) fn map_book_write_error(err: sqlx::Error, name: &str, library_id: i32) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return AppError::Conflict(format!("A book named '{}' already exists", name));
        }
        if db.is_foreign_key_violation() {
            return AppError::NotFound(format!("Library {} not found", library_id));
        }
    }
    AppError::Database(err)
}
