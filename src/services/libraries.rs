//! Library service

use crate::{
    error::AppResult,
    models::{Library, LibraryInput, LibraryPage, Page, PageRequest},
    repository::Repository,
};

#[derive(Clone)]
pub struct LibraryService {
    repository: Repository,
}

impl LibraryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Library> {
        self.repository.libraries.get_by_id(id).await
    }

    pub async fn list(&self, request: &PageRequest) -> AppResult<LibraryPage> {
        let (libraries, total) = self.repository.libraries.list(request).await?;
        Ok(Page::new(libraries, total, request))
    }

    /// Create a library, along with any books listed in the body
    pub async fn create(&self, input: LibraryInput) -> AppResult<Library> {
        let draft = input.into_draft()?;
        let library = self.repository.libraries.create(&draft).await?;
        tracing::info!(
            "Created library id={} with {} book(s)",
            library.id,
            library.books.len()
        );
        Ok(library)
    }

    /// Overwrite a library's fields, keeping its id
    pub async fn replace(&self, id: i32, input: LibraryInput) -> AppResult<()> {
        let draft = input.into_draft()?;
        self.repository.libraries.replace(id, &draft).await?;
        tracing::info!("Replaced library id={}", id);
        Ok(())
    }

    /// Delete a library and, with it, all of its books
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let removed = self.repository.libraries.delete(id).await?;
        tracing::info!("Deleted library id={} and {} book(s)", id, removed);
        Ok(())
    }

    /// Readiness probe on the underlying store
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.libraries.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::{
        error::AppError,
        models::LibraryDraft,
        repository::{MockBookRepository, MockLibraryRepository},
    };

    fn service(libraries: MockLibraryRepository) -> LibraryService {
        LibraryService::new(Repository::new(
            Arc::new(libraries),
            Arc::new(MockBookRepository::new()),
        ))
    }

    #[tokio::test]
    async fn test_create_without_name_never_reaches_store() {
        let mut libraries = MockLibraryRepository::new();
        libraries.expect_create().never();

        let err = service(libraries)
            .create(LibraryInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_replace_passes_draft_through() {
        let mut libraries = MockLibraryRepository::new();
        libraries
            .expect_replace()
            .withf(|id, draft| *id == 3 && *draft == LibraryDraft::named("Norte"))
            .times(1)
            .returning(|_, _| Ok(()));

        let input = LibraryInput {
            name: Some("Norte".into()),
            books: vec![],
        };
        service(libraries).replace(3, input).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_wraps_page() {
        let mut libraries = MockLibraryRepository::new();
        libraries.expect_list().returning(|_| {
            Ok((
                vec![Library {
                    id: 1,
                    name: "Central".into(),
                    books: vec![],
                }],
                2,
            ))
        });

        let page = service(libraries).list(&PageRequest::new(0, 1)).await.unwrap();
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.number_of_elements, 1);
        assert!(page.has_next());
    }

    #[tokio::test]
    async fn test_delete_propagates_not_found() {
        let mut libraries = MockLibraryRepository::new();
        libraries
            .expect_delete()
            .returning(|id| Err(AppError::NotFound(format!("Library {} not found", id))));

        let err = service(libraries).delete(8).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
