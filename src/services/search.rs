//! Search adapter.
//!
//! Despite the name this is an unfiltered fan-out: it loads the full book and
//! author collections for the search page and the JSON endpoint; the actual
//! matching happens client-side against the embedded collections.

use tokio::try_join;

use crate::{
    error::AppResult,
    models::{author::Author, book::Book},
    repository::Repository,
};

/// Both collections, fetched together.
#[derive(Debug)]
pub struct SearchData {
    pub books: Vec<Book>,
    pub authors: Vec<Author>,
}

#[derive(Clone)]
pub struct SearchService {
    repository: Repository,
}

impl SearchService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Load the full book and author collections concurrently.
    pub async fn collections(&self) -> AppResult<SearchData> {
        let (books, authors) = try_join!(
            self.repository.books.list_all(),
            self.repository.authors.list_by_family_name(),
        )?;

        Ok(SearchData { books, authors })
    }
}
