//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book record. The owning library is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    /// Unique across all books
    #[serde(rename = "nome")]
    #[sqlx(rename = "nome")]
    pub name: String,
    #[serde(skip)]
    #[sqlx(rename = "biblioteca_id")]
    pub library_id: i32,
}

/// Reference to the owning library; any field other than `id` is ignored
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LibraryRef {
    pub id: i32,
}

/// Create / replace book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[serde(rename = "nome")]
    #[validate(required(message = "nome is required"))]
    pub name: Option<String>,
    #[serde(rename = "biblioteca")]
    #[validate(required(message = "biblioteca is required"))]
    pub library: Option<LibraryRef>,
}

/// Validated book write handed to the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub name: String,
    pub library_id: i32,
}

impl BookInput {
    /// Check required fields and turn the body into a write model
    pub fn into_draft(self) -> Result<BookDraft, validator::ValidationErrors> {
        self.validate()?;
        Ok(BookDraft {
            name: self.name.unwrap_or_default(),
            library_id: self.library.map(|l| l.id).unwrap_or_default(),
        })
    }
}

impl BookDraft {
    pub fn new(name: impl Into<String>, library_id: i32) -> Self {
        Self {
            name: name.into(),
            library_id,
        }
    }
}
