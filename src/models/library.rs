//! Library model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::Book;

/// Library record, with the books it currently owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Library {
    pub id: i32,
    #[serde(rename = "nome")]
    #[sqlx(rename = "nome")]
    pub name: String,
    /// Books referencing this library, ordered by id
    #[serde(rename = "livros")]
    #[sqlx(skip)]
    pub books: Vec<Book>,
}

/// Create / replace library request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct LibraryInput {
    #[serde(rename = "nome")]
    #[validate(required(message = "nome is required"))]
    pub name: Option<String>,
    /// Books to attach to the library: entries with an `id` re-attach an
    /// existing book, entries without one create a new book.
    #[serde(rename = "livros", default)]
    #[validate(nested)]
    pub books: Vec<OwnedBookInput>,
}

/// A book given inline in a library body
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct OwnedBookInput {
    pub id: Option<i32>,
    #[serde(rename = "nome")]
    #[validate(required(message = "nome is required"))]
    pub name: Option<String>,
}

/// Validated library write handed to the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryDraft {
    pub name: String,
    pub books: Vec<OwnedBook>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedBook {
    /// Existing book to re-attach, or `None` to create one
    pub id: Option<i32>,
    pub name: String,
}

impl LibraryInput {
    /// Check required fields and turn the body into a write model
    pub fn into_draft(self) -> Result<LibraryDraft, validator::ValidationErrors> {
        self.validate()?;
        Ok(LibraryDraft {
            name: self.name.unwrap_or_default(),
            books: self
                .books
                .into_iter()
                .map(|b| OwnedBook {
                    id: b.id,
                    name: b.name.unwrap_or_default(),
                })
                .collect(),
        })
    }
}

impl LibraryDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            books: Vec::new(),
        }
    }
}
