//! HTTP endpoints.
//!
//! Handlers translate workflow outcomes into renders and redirects; they hold
//! no business rules of their own.

pub mod authors;
pub mod books;
pub mod genres;
pub mod pages;
pub mod search;
