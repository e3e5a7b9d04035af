//! Service layer for books.
//! - `BookRepository` abstracts persistence; SeaORM and in-memory implementations are provided.
//! - `BookService` exposes one method per use case on top of a repository.

pub mod errors;
pub mod book;
#[cfg(test)]
pub mod test_support;

pub use book::{BookRepository, BookService, InMemoryBookRepository, SeaOrmBookRepository};
