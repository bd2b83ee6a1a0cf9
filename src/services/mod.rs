//! Entity workflows.
//!
//! One service per entity type, each implementing the list / detail / create /
//! update / delete state machine over the store contracts. Services return
//! outcome values; mapping those onto renders and redirects is the HTTP
//! layer's job.

pub mod authors;
pub mod books;
pub mod genres;
pub mod search;
pub mod site;

use crate::{repository::Repository, uploads::UploadStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub genres: genres::GenresService,
    pub search: search::SearchService,
    pub site: site::SiteService,
}

impl Services {
    /// Create all services with the given repository and upload store
    pub fn new(repository: Repository, uploads: UploadStore) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone(), uploads),
            books: books::BooksService::new(repository.clone()),
            genres: genres::GenresService::new(repository.clone()),
            search: search::SearchService::new(repository.clone()),
            site: site::SiteService::new(repository),
        }
    }
}
