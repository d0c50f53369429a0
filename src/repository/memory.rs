//! In-memory catalog backend for development and testing
//!
//! Both accessor traits are implemented on one [`MemoryCatalog`] so that a
//! single write lock covers a whole logical operation, the way a store
//! transaction does for the PostgreSQL backend.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookRepository, LibraryRepository};
use crate::{
    error::{AppError, AppResult},
    models::{
        page::{Direction, SortField},
        Book, BookDraft, Library, LibraryDraft, OwnedBook, PageRequest,
    },
};

/// Process-local catalog tables
pub struct MemoryCatalog {
    data: Arc<RwLock<CatalogTables>>,
}

#[derive(Default)]
struct CatalogTables {
    /// id -> name
    libraries: BTreeMap<i32, String>,
    /// id -> book row
    books: BTreeMap<i32, Book>,
    last_library_id: i32,
    last_book_id: i32,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(CatalogTables::default())),
        }
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogTables {
    fn library(&self, id: i32) -> Option<Library> {
        self.libraries.get(&id).map(|name| Library {
            id,
            name: name.clone(),
            books: self.books_of(id),
        })
    }

    fn books_of(&self, library_id: i32) -> Vec<Book> {
        self.books
            .values()
            .filter(|b| b.library_id == library_id)
            .cloned()
            .collect()
    }

    fn name_taken(&self, name: &str, except: Option<i32>) -> bool {
        self.books
            .values()
            .any(|b| b.name == name && Some(b.id) != except)
    }

    fn require_library(&self, id: i32) -> AppResult<()> {
        if self.libraries.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Library {} not found", id)))
        }
    }

    /// Validate a batch of owned-book writes before touching any row, so a
    /// failure leaves the tables as they were. Entries are applied in order
    /// to a scratch copy of the names, the way the SQL backend runs one
    /// statement per entry.
    fn check_owned_books(&self, books: &[OwnedBook]) -> AppResult<()> {
        let mut names: BTreeMap<i32, &str> = self
            .books
            .iter()
            .map(|(id, b)| (*id, b.name.as_str()))
            .collect();
        let mut next_id = self.last_book_id;

        for book in books {
            let id = match book.id {
                Some(id) if names.contains_key(&id) => id,
                Some(id) => return Err(AppError::NotFound(format!("Book {} not found", id))),
                None => {
                    next_id += 1;
                    next_id
                }
            };
            if names.iter().any(|(other, name)| *other != id && *name == book.name) {
                return Err(conflict(&book.name));
            }
            names.insert(id, book.name.as_str());
        }
        Ok(())
    }

    fn attach_owned_books(&mut self, library_id: i32, books: &[OwnedBook]) {
        for book in books {
            let id = match book.id {
                Some(id) => id,
                None => {
                    self.last_book_id += 1;
                    self.last_book_id
                }
            };
            self.books.insert(
                id,
                Book {
                    id,
                    name: book.name.clone(),
                    library_id,
                },
            );
        }
    }
}

fn conflict(name: &str) -> AppError {
    AppError::Conflict(format!("A book named '{}' already exists", name))
}

/// Order rows the way the SQL `ORDER BY` built from the same request would
fn compare(request: &PageRequest, a: (i32, &str), b: (i32, &str)) -> Ordering {
    for order in &request.sort {
        let ord = match order.field {
            SortField::Id => a.0.cmp(&b.0),
            SortField::Name => a.1.cmp(b.1),
        };
        let ord = match order.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.0.cmp(&b.0)
}

fn slice<T>(mut rows: Vec<T>, request: &PageRequest) -> Vec<T> {
    let offset = request.offset().max(0) as usize;
    if offset >= rows.len() {
        return Vec::new();
    }
    rows.drain(..offset);
    rows.truncate(request.limit().max(0) as usize);
    rows
}

#[async_trait]
impl LibraryRepository for MemoryCatalog {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Library> {
        let tables = self.data.read().await;
        tables
            .library(id)
            .ok_or_else(|| AppError::NotFound(format!("Library {} not found", id)))
    }

    async fn list(&self, page: &PageRequest) -> AppResult<(Vec<Library>, i64)> {
        let tables = self.data.read().await;

        let mut rows: Vec<(i32, &String)> = tables.libraries.iter().map(|(id, n)| (*id, n)).collect();
        rows.sort_by(|a, b| compare(page, (a.0, a.1.as_str()), (b.0, b.1.as_str())));
        let total = rows.len() as i64;

        let libraries = slice(rows, page)
            .into_iter()
            .filter_map(|(id, _)| tables.library(id))
            .collect();
        Ok((libraries, total))
    }

    async fn create(&self, draft: &LibraryDraft) -> AppResult<Library> {
        let mut tables = self.data.write().await;
        tables.check_owned_books(&draft.books)?;

        tables.last_library_id += 1;
        let id = tables.last_library_id;
        tables.libraries.insert(id, draft.name.clone());
        tables.attach_owned_books(id, &draft.books);

        tables
            .library(id)
            .ok_or_else(|| AppError::Internal(format!("Library {} vanished after insert", id)))
    }

    async fn replace(&self, id: i32, draft: &LibraryDraft) -> AppResult<()> {
        let mut tables = self.data.write().await;
        tables.require_library(id)?;
        tables.check_owned_books(&draft.books)?;

        tables.libraries.insert(id, draft.name.clone());
        tables.attach_owned_books(id, &draft.books);
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<u64> {
        let mut tables = self.data.write().await;
        tables.require_library(id)?;

        let before = tables.books.len();
        tables.books.retain(|_, b| b.library_id != id);
        let removed = (before - tables.books.len()) as u64;
        tables.libraries.remove(&id);
        Ok(removed)
    }
}

#[async_trait]
impl BookRepository for MemoryCatalog {
    async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let tables = self.data.read().await;
        tables
            .books
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn list(&self, page: &PageRequest) -> AppResult<(Vec<Book>, i64)> {
        let tables = self.data.read().await;

        let mut rows: Vec<&Book> = tables.books.values().collect();
        rows.sort_by(|a, b| compare(page, (a.id, a.name.as_str()), (b.id, b.name.as_str())));
        let total = rows.len() as i64;

        let books = slice(rows, page).into_iter().cloned().collect();
        Ok((books, total))
    }

    async fn create(&self, draft: &BookDraft) -> AppResult<Book> {
        let mut tables = self.data.write().await;
        tables.require_library(draft.library_id)?;
        if tables.name_taken(&draft.name, None) {
            return Err(conflict(&draft.name));
        }

        tables.last_book_id += 1;
        let book = Book {
            id: tables.last_book_id,
            name: draft.name.clone(),
            library_id: draft.library_id,
        };
        tables.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn replace(&self, id: i32, draft: &BookDraft) -> AppResult<()> {
        let mut tables = self.data.write().await;
        tables.require_library(draft.library_id)?;
        if !tables.books.contains_key(&id) {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        if tables.name_taken(&draft.name, Some(id)) {
            return Err(conflict(&draft.name));
        }

        tables.books.insert(
            id,
            Book {
                id,
                name: draft.name.clone(),
                library_id: draft.library_id,
            },
        );
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.data.write().await;
        tables
            .books
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }
}
