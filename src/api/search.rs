//! Search endpoints.
//!
//! Both endpoints ship the full book and author collections; filtering
//! happens client-side. The JSON endpoint answers with a structured error
//! payload on store failure instead of the generic error page.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    error::AppResult,
    models::{author::AuthorView, book::BookView},
    AppState,
};

/// Search page with both collections embedded and empty result placeholders.
pub async fn page(State(state): State<AppState>) -> AppResult<Response> {
    let data = state.services.search.collections().await?;

    let context = json!({
        "title": "Automatic Search",
        "search": null,
        "books": data.books.iter().map(BookView::from).collect::<Vec<_>>(),
        "authors": data.authors.iter().map(AuthorView::from).collect::<Vec<_>>(),
        "books_result": [],
        "authors_result": [],
    });
    Ok(state.render("search", &context)?.into_response())
}

/// JSON payload of both collections with virtual fields inlined.
pub async fn json(State(state): State<AppState>) -> Response {
    match state.services.search.collections().await {
        Ok(data) => Json(json!({
            "books": data.books.iter().map(BookView::from).collect::<Vec<_>>(),
            "authors": data.authors.iter().map(AuthorView::from).collect::<Vec<_>>(),
        }))
        .into_response(),
        Err(err) => {
            tracing::error!("Search fan-out failed: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Error fetching data" })),
            )
                .into_response()
        }
    }
}
