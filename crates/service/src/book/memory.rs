use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use models::book::{Book, BookInput};
use crate::book::repository::BookRepository;
use crate::errors::ServiceError;

/// In-process repository with the same id semantics as an auto-increment column:
/// the next generated id is one past the largest id ever stored.
#[derive(Default)]
pub struct InMemoryBookRepository {
    inner: RwLock<Table>,
}

#[derive(Default)]
struct Table {
    rows: BTreeMap<i32, Book>,
    last_id: i32,
}

impl Table {
    fn save(&mut self, input: BookInput) -> Book {
        let id = match input.id {
            Some(id) => id,
            None => self.last_id + 1,
        };
        self.last_id = self.last_id.max(id);
        let row = Book { id, title: input.title, author: input.author };
        self.rows.insert(id, row.clone());
        row
    }
}

impl InMemoryBookRepository {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn save(&self, book: BookInput) -> Result<Book, ServiceError> {
        Ok(self.inner.write().await.save(book))
    }

    async fn save_all(&self, books: Vec<BookInput>) -> Result<Vec<Book>, ServiceError> {
        let mut table = self.inner.write().await;
        Ok(books.into_iter().map(|b| table.save(b)).collect())
    }

    async fn update(&self, id: i32, book: BookInput) -> Result<Option<Book>, ServiceError> {
        let mut table = self.inner.write().await;
        Ok(table.rows.get_mut(&id).map(|row| {
            row.title = book.title;
            row.author = book.author;
            row.clone()
        }))
    }

    async fn find_all(&self) -> Result<Vec<Book>, ServiceError> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, ServiceError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }
}
