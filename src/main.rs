//! Atheneum Server - Library Catalog
//!
//! Server-rendered catalog of authors, books, genres and physical copies.

use axum::{response::Redirect, routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atheneum_server::{
    api, config::AppConfig, render::ShellRenderer, repository::Repository, services::Services,
    uploads::UploadStore, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "atheneum_server={},tower_http=debug",
            config.logging.level
        )
        .into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Atheneum Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository, upload store and services
    let repository = Repository::new(pool);
    let uploads = UploadStore::new(&config.uploads);
    let services = Services::new(repository, uploads);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        renderer: Arc::new(ShellRenderer::new("Atheneum")),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let uploads_dir = state.config.uploads.dir.clone();
    let public_prefix = state.config.uploads.public_prefix.clone();

    let catalog = Router::new()
        // Home
        .route("/", get(api::pages::index))
        // Authors
        .route("/authors", get(api::authors::list))
        .route(
            "/authors/create",
            get(api::authors::create_form).post(api::authors::create),
        )
        .route("/authors/:id", get(api::authors::detail))
        .route(
            "/authors/:id/update",
            get(api::authors::update_form).post(api::authors::update),
        )
        .route(
            "/authors/:id/delete",
            get(api::authors::delete_form).post(api::authors::delete),
        )
        // Books
        .route("/books", get(api::books::list))
        .route(
            "/books/create",
            get(api::books::create_form).post(api::books::create),
        )
        .route("/books/:id", get(api::books::detail))
        .route(
            "/books/:id/update",
            get(api::books::update_form).post(api::books::update),
        )
        .route(
            "/books/:id/delete",
            get(api::books::delete_form).post(api::books::delete),
        )
        // Genres
        .route("/genres", get(api::genres::list))
        .route(
            "/genres/create",
            get(api::genres::create_form).post(api::genres::create),
        )
        .route("/genres/:id", get(api::genres::detail))
        .route(
            "/genres/:id/update",
            get(api::genres::update_form).post(api::genres::update),
        )
        .route(
            "/genres/:id/delete",
            get(api::genres::delete_form).post(api::genres::delete),
        )
        // Search
        .route("/search", get(api::search::page))
        .route(
            "/search/api",
            get(api::search::json).post(api::search::json),
        )
        .with_state(state);

    Router::new()
        .route("/", get(|| async { Redirect::permanent("/catalog") }))
        .nest("/catalog", catalog)
        .nest_service(&public_prefix, ServeDir::new(uploads_dir))
        .layer(TraceLayer::new_for_http())
}
