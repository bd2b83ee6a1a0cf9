//! Atheneum Library Catalog
//!
//! A server-rendered catalog of a library's holdings: authors, books, genres
//! and physical copies. Handlers produce view contexts and redirects; the
//! template set consuming the contexts lives outside this crate.

use std::sync::Arc;

use axum::response::Html;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod repository;
pub mod services;
pub mod uploads;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub renderer: Arc<dyn render::ViewRenderer>,
}

impl AppState {
    /// Render a named view with the given context through the configured
    /// presentation adapter.
    pub fn render(&self, view: &str, context: &serde_json::Value) -> AppResult<Html<String>> {
        Ok(Html(self.renderer.render(view, context)?))
    }
}
