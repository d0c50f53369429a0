//! Business logic services

pub mod books;
pub mod libraries;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub libraries: libraries::LibraryService,
    pub books: books::BookService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            libraries: libraries::LibraryService::new(repository.clone()),
            books: books::BookService::new(repository),
        }
    }
}
