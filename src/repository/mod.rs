//! Store layer.
//!
//! Each entity gets a narrow store trait (the contract the workflows depend
//! on) and a Postgres implementation. Workflow tests substitute mocks for the
//! trait objects; nothing above this layer sees SQL.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use authors::AuthorsStore;
pub use book_instances::BookInstancesStore;
pub use books::BooksStore;
pub use genres::GenresStore;

/// Main repository struct bundling the per-entity stores
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorsStore>,
    pub books: Arc<dyn BooksStore>,
    pub genres: Arc<dyn GenresStore>,
    pub book_instances: Arc<dyn BookInstancesStore>,
}

impl Repository {
    /// Create a repository backed by the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::PgAuthorsRepository::new(pool.clone())),
            books: Arc::new(books::PgBooksRepository::new(pool.clone())),
            genres: Arc::new(genres::PgGenresRepository::new(pool.clone())),
            book_instances: Arc::new(book_instances::PgBookInstancesRepository::new(pool)),
        }
    }
}
