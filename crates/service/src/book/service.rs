use std::sync::Arc;
use tracing::{info, instrument};

use models::book::{Book, BookInput};
use crate::book::repository::BookRepository;
use crate::errors::ServiceError;

/// Body returned by a successful delete.
pub const DELETE_CONFIRMATION: &str = "ok";

/// Use-case layer over a `BookRepository`. Each call is independent.
pub struct BookService<R: BookRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: BookRepository + ?Sized> BookService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Persist a new book; any client-supplied id is discarded.
    #[instrument(skip(self, book), fields(title = %book.title))]
    pub async fn create(&self, book: BookInput) -> Result<Book, ServiceError> {
        let created = self.repo.save(BookInput { id: None, ..book }).await?;
        info!(id = created.id, "book_created");
        Ok(created)
    }

    pub async fn find_all(&self) -> Result<Vec<Book>, ServiceError> {
        self.repo.find_all().await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Book, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(&format!("book {id}")))
    }

    /// Overwrite title and author of an existing book. The path id wins over any id in the body.
    #[instrument(skip(self, book))]
    pub async fn update(&self, id: i32, book: BookInput) -> Result<Book, ServiceError> {
        let updated = self
            .repo
            .update(id, book)
            .await?
            .ok_or_else(|| ServiceError::not_found(&format!("book {id}")))?;
        info!(id, "book_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: i32) -> Result<&'static str, ServiceError> {
        if !self.repo.delete_by_id(id).await? {
            return Err(ServiceError::not_found(&format!("book {id}")));
        }
        info!(id, "book_deleted");
        Ok(DELETE_CONFIRMATION)
    }
}
