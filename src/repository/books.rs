//! PostgreSQL book accessor

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};

use super::{map_book_write_error, BookRepository};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookDraft, PageRequest},
};

#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Share-lock the owning library so it cannot be deleted before commit
async fn lock_library(conn: &mut PgConnection, library_id: i32) -> AppResult<()> {
    sqlx::query_scalar::<_, i32>("SELECT id FROM biblioteca WHERE id = $1 FOR SHARE")
        .bind(library_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Library {} not found", library_id)))?;
    Ok(())
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT id, nome, biblioteca_id FROM livros WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn list(&self, page: &PageRequest) -> AppResult<(Vec<Book>, i64)> {
        let mut tx = self.pool.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM livros")
            .fetch_one(&mut *tx)
            .await?;

        let select_q = format!(
            "SELECT id, nome, biblioteca_id FROM livros ORDER BY {} LIMIT $1 OFFSET $2",
            page.order_by_clause()
        );
        let rows = sqlx::query_as::<_, Book>(&select_q)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((rows, total))
    }

    async fn create(&self, draft: &BookDraft) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;
        lock_library(&mut tx, draft.library_id).await?;

        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO livros (nome, biblioteca_id)
            VALUES ($1, $2)
            RETURNING id, nome, biblioteca_id
            "#,
        )
        .bind(&draft.name)
        .bind(draft.library_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_book_write_error(e, &draft.name, draft.library_id))?;

        tx.commit().await?;
        Ok(row)
    }

    async fn replace(&self, id: i32, draft: &BookDraft) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        lock_library(&mut tx, draft.library_id).await?;

        let result = sqlx::query("UPDATE livros SET nome = $1, biblioteca_id = $2 WHERE id = $3")
            .bind(&draft.name)
            .bind(draft.library_id)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_book_write_error(e, &draft.name, draft.library_id))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM livros WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}
