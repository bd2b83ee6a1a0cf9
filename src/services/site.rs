//! Home page counts

use serde::Serialize;
use tokio::try_join;

use crate::{error::AppResult, repository::Repository};

/// Collection sizes shown on the home page.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryCounts {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}

#[derive(Clone)]
pub struct SiteService {
    repository: Repository,
}

impl SiteService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Gather all five counts concurrently.
    pub async fn home(&self) -> AppResult<LibraryCounts> {
        let (
            book_count,
            book_instance_count,
            book_instance_available_count,
            author_count,
            genre_count,
        ) = try_join!(
            self.repository.books.count(),
            self.repository.book_instances.count(),
            self.repository.book_instances.count_available(),
            self.repository.authors.count(),
            self.repository.genres.count(),
        )?;

        Ok(LibraryCounts {
            book_count,
            book_instance_count,
            book_instance_available_count,
            author_count,
            genre_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repository::{
        authors::MockAuthorsStore, book_instances::MockBookInstancesStore, books::MockBooksStore,
        genres::MockGenresStore,
    };

    #[tokio::test]
    async fn home_maps_every_count() {
        let mut books = MockBooksStore::new();
        books.expect_count().returning(|| Ok(12));
        let mut instances = MockBookInstancesStore::new();
        instances.expect_count().returning(|| Ok(30));
        instances.expect_count_available().returning(|| Ok(21));
        let mut authors = MockAuthorsStore::new();
        authors.expect_count().returning(|| Ok(5));
        let mut genres = MockGenresStore::new();
        genres.expect_count().returning(|| Ok(7));

        let service = SiteService::new(Repository {
            authors: Arc::new(authors),
            books: Arc::new(books),
            genres: Arc::new(genres),
            book_instances: Arc::new(instances),
        });

        let counts = service.home().await.unwrap();
        assert_eq!(counts.book_count, 12);
        assert_eq!(counts.book_instance_count, 30);
        assert_eq!(counts.book_instance_available_count, 21);
        assert_eq!(counts.author_count, 5);
        assert_eq!(counts.genre_count, 7);
    }
}
