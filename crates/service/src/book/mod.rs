pub mod memory;
pub mod repository;
pub mod service;

pub use memory::InMemoryBookRepository;
pub use repository::{BookRepository, SeaOrmBookRepository};
pub use service::{BookService, DELETE_CONFIRMATION};
