use async_trait::async_trait;
use sea_orm::{DatabaseConnection, TransactionTrait};

use models::book::{self, Book, BookInput};
use crate::errors::ServiceError;

/// Persistence operations for the `book` table.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert when `id` is absent, otherwise overwrite the row with that id.
    async fn save(&self, book: BookInput) -> Result<Book, ServiceError>;
    async fn save_all(&self, books: Vec<BookInput>) -> Result<Vec<Book>, ServiceError>;
    /// Overwrite an existing row in one atomic step; `None` when the id is unknown.
    /// Unlike `save`, this never inserts.
    async fn update(&self, id: i32, book: BookInput) -> Result<Option<Book>, ServiceError>;
    /// Primary-key order.
    async fn find_all(&self) -> Result<Vec<Book>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, ServiceError>;
    /// Returns whether a row was removed.
    async fn delete_by_id(&self, id: i32) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository. Every write runs in its own transaction.
#[derive(Clone)]
pub struct SeaOrmBookRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn save(&self, input: BookInput) -> Result<Book, ServiceError> {
        let txn = self.db.begin().await?;
        let saved = book::upsert(&txn, &input).await?;
        txn.commit().await?;
        Ok(saved)
    }

    async fn save_all(&self, inputs: Vec<BookInput>) -> Result<Vec<Book>, ServiceError> {
        let txn = self.db.begin().await?;
        let mut saved = Vec::with_capacity(inputs.len());
        for input in &inputs {
            saved.push(book::upsert(&txn, input).await?);
        }
        txn.commit().await?;
        Ok(saved)
    }

    async fn update(&self, id: i32, input: BookInput) -> Result<Option<Book>, ServiceError> {
        let txn = self.db.begin().await?;
        let updated = book::update_existing(&txn, id, &input).await?;
        txn.commit().await?;
        Ok(updated)
    }

    async fn find_all(&self) -> Result<Vec<Book>, ServiceError> {
        Ok(book::find_all(&self.db).await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, ServiceError> {
        Ok(book::find_by_id(&self.db, id).await?)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await?;
        let removed = book::delete_by_id(&txn, id).await?;
        txn.commit().await?;
        Ok(removed)
    }
}
