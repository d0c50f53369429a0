//! PostgreSQL library accessor

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};

use super::{map_book_write_error, LibraryRepository};
use crate::{
    error::{AppError, AppResult},
    models::{Book, Library, LibraryDraft, OwnedBook, PageRequest},
};

#[derive(Clone)]
pub struct PgLibraryRepository {
    pool: Pool<Postgres>,
}

impl PgLibraryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LibraryRepository for PgLibraryRepository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Library> {
        let mut tx = self.pool.begin().await?;

        let mut library = sqlx::query_as::<_, Library>("SELECT id, nome FROM biblioteca WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Library {} not found", id)))?;
        library.books = books_of(&mut tx, id).await?;

        tx.commit().await?;
        Ok(library)
    }

    async fn list(&self, page: &PageRequest) -> AppResult<(Vec<Library>, i64)> {
        let mut tx = self.pool.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM biblioteca")
            .fetch_one(&mut *tx)
            .await?;

        let select_q = format!(
            "SELECT id, nome FROM biblioteca ORDER BY {} LIMIT $1 OFFSET $2",
            page.order_by_clause()
        );
        let mut libraries = sqlx::query_as::<_, Library>(&select_q)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut *tx)
            .await?;

        let ids: Vec<i32> = libraries.iter().map(|l| l.id).collect();
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, nome, biblioteca_id FROM livros WHERE biblioteca_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        attach_books(&mut libraries, books);
        Ok((libraries, total))
    }

    async fn create(&self, draft: &LibraryDraft) -> AppResult<Library> {
        let mut tx = self.pool.begin().await?;

        let mut library = sqlx::query_as::<_, Library>(
            "INSERT INTO biblioteca (nome) VALUES ($1) RETURNING id, nome",
        )
        .bind(&draft.name)
        .fetch_one(&mut *tx)
        .await?;

        attach_owned_books(&mut tx, library.id, &draft.books).await?;
        library.books = books_of(&mut tx, library.id).await?;

        tx.commit().await?;
        Ok(library)
    }

    async fn replace(&self, id: i32, draft: &LibraryDraft) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE biblioteca SET nome = $1 WHERE id = $2")
            .bind(&draft.name)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Library {} not found", id)));
        }

        attach_owned_books(&mut tx, id, &draft.books).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        // Blocks concurrent book writes against this library until commit
        sqlx::query_scalar::<_, i32>("SELECT id FROM biblioteca WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Library {} not found", id)))?;

        let removed = sqlx::query("DELETE FROM livros WHERE biblioteca_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM biblioteca WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(removed)
    }
}

async fn books_of(conn: &mut PgConnection, library_id: i32) -> AppResult<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>(
        "SELECT id, nome, biblioteca_id FROM livros WHERE biblioteca_id = $1 ORDER BY id",
    )
    .bind(library_id)
    .fetch_all(conn)
    .await?;
    Ok(books)
}

/// Point every listed book at `library_id`, creating the ones without an id
async fn attach_owned_books(
    conn: &mut PgConnection,
    library_id: i32,
    books: &[OwnedBook],
) -> AppResult<()> {
    for book in books {
        match book.id {
            Some(book_id) => {
                let result = sqlx::query("UPDATE livros SET nome = $1, biblioteca_id = $2 WHERE id = $3")
                    .bind(&book.name)
                    .bind(library_id)
                    .bind(book_id)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| map_book_write_error(e, &book.name, library_id))?;
                if result.rows_affected() == 0 {
                    return Err(AppError::NotFound(format!("Book {} not found", book_id)));
                }
            }
            None => {
                sqlx::query("INSERT INTO livros (nome, biblioteca_id) VALUES ($1, $2)")
                    .bind(&book.name)
                    .bind(library_id)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| map_book_write_error(e, &book.name, library_id))?;
            }
        }
    }
    Ok(())
}

/// Distribute `books` (ordered by id) onto their libraries
pub(crate) fn attach_books(libraries: &mut [Library], books: Vec<Book>) {
    let mut by_library: HashMap<i32, Vec<Book>> = HashMap::new();
    for book in books {
        by_library.entry(book.library_id).or_default().push(book);
    }
    for library in libraries.iter_mut() {
        library.books = by_library.remove(&library.id).unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: i32, library_id: i32) -> Book {
        Book {
            id,
            name: format!("book-{}", id),
            library_id,
        }
    }

    #[test]
    fn test_attach_books() {
        let mut libraries = vec![
            Library { id: 1, name: "A".into(), books: vec![] },
            Library { id: 2, name: "B".into(), books: vec![] },
            Library { id: 3, name: "C".into(), books: vec![] },
        ];
        attach_books(&mut libraries, vec![book(1, 2), book(2, 1), book(5, 2)]);

        assert_eq!(libraries[0].books, vec![book(2, 1)]);
        assert_eq!(libraries[1].books, vec![book(1, 2), book(5, 2)]);
        assert!(libraries[2].books.is_empty());
    }
}
