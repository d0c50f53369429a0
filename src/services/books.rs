//! Book service

use crate::{
    error::AppResult,
    models::{Book, BookInput, BookPage, Page, PageRequest},
    repository::Repository,
};

#[derive(Clone)]
pub struct BookService {
    repository: Repository,
}

impl BookService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn list(&self, request: &PageRequest) -> AppResult<BookPage> {
        let (books, total) = self.repository.books.list(request).await?;
        Ok(Page::new(books, total, request))
    }

    /// Create a book in the library named by `biblioteca.id`
    pub async fn create(&self, input: BookInput) -> AppResult<Book> {
        let draft = input.into_draft()?;
        let book = self.repository.books.create(&draft).await?;
        tracing::info!("Created book id={} in library id={}", book.id, book.library_id);
        Ok(book)
    }

    /// Overwrite a book's name and owning library, keeping its id
    pub async fn replace(&self, id: i32, input: BookInput) -> AppResult<()> {
        let draft = input.into_draft()?;
        self.repository.books.replace(id, &draft).await?;
        tracing::info!("Replaced book id={} (library id={})", id, draft.library_id);
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book id={}", id);
        Ok(())
    }
}
