use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::error::StoreError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Book {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub description: Option<String>,
}

#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, StoreError>;
}

#[derive(Clone)]
pub struct PgBookStore {
    db: PgPool,
}

impl PgBookStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, created_at, updated_at, title, author, isbn, description
              FROM books
             WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(book)
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemBookStore {
    pub books: Vec<Book>,
}

#[cfg(test)]
#[async_trait]
impl BookStore for MemBookStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, StoreError> {
        Ok(self.books.iter().find(|b| b.id == id).cloned())
    }
}
