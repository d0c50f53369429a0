//! Data models for the catalog

pub mod book;
pub mod library;
pub mod page;

// Re-export commonly used types
pub use book::{Book, BookDraft, BookInput};
pub use library::{Library, LibraryDraft, LibraryInput, OwnedBook};
pub use page::{BookPage, LibraryPage, Page, PageParams, PageRequest};
