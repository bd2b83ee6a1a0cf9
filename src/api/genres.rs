//! Genre endpoints

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::book::BookSummaryView,
    models::genre::{GenreForm, GenreView},
    services::genres::{GenreDeleteOutcome, GenreFormOutcome},
    AppState,
};

/// List all genres
pub async fn list(State(state): State<AppState>) -> AppResult<Response> {
    let genres = state.services.genres.list().await?;

    let context = json!({
        "title": "Genre List",
        "genre_list": genres.iter().map(GenreView::from).collect::<Vec<_>>(),
    });
    Ok(state.render("genre_list", &context)?.into_response())
}

/// Genre detail page with the books in the genre
pub async fn detail(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Response> {
    let detail = state.services.genres.detail(id).await?;

    let context = json!({
        "title": "Genre Detail",
        "genre": GenreView::from(&detail.genre),
        "genre_books": detail.books.iter().map(BookSummaryView::from).collect::<Vec<_>>(),
    });
    Ok(state.render("genre_detail", &context)?.into_response())
}

/// Genre create form
pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    let context = json!({ "title": "Create Genre" });
    Ok(state.render("genre_form", &context)?.into_response())
}

/// Handle genre create submission. An existing genre with the same name is
/// reused: the response redirects to it instead of storing a duplicate.
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    match state.services.genres.create(form).await? {
        GenreFormOutcome::Saved(genre) => Ok(Redirect::to(&genre.url()).into_response()),
        GenreFormOutcome::Invalid { fields, errors } => {
            let context = json!({
                "title": "Create Genre",
                "genre": candidate_context(None, &fields),
                "errors": errors,
            });
            Ok(state.render("genre_form", &context)?.into_response())
        }
    }
}

/// Genre update form
pub async fn update_form(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Response> {
    let genre = state.services.genres.update_form(id).await?;

    let context = json!({
        "title": "Update Genre",
        "genre": GenreView::from(&genre),
    });
    Ok(state.render("genre_form", &context)?.into_response())
}

/// Handle genre update submission
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    match state.services.genres.update(id, form).await? {
        GenreFormOutcome::Saved(genre) => Ok(Redirect::to(&genre.url()).into_response()),
        GenreFormOutcome::Invalid { fields, errors } => {
            let context = json!({
                "title": "Update Genre",
                "genre": candidate_context(Some(id), &fields),
                "errors": errors,
            });
            Ok(state.render("genre_form", &context)?.into_response())
        }
    }
}

/// Genre delete confirmation page
pub async fn delete_form(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Response> {
    let Some(detail) = state.services.genres.delete_view(id).await? else {
        return Ok(Redirect::to("/catalog/genres").into_response());
    };

    let context = json!({
        "title": "Delete Genre",
        "genre": GenreView::from(&detail.genre),
        "genre_books": detail.books.iter().map(BookSummaryView::from).collect::<Vec<_>>(),
    });
    Ok(state.render("genre_delete", &context)?.into_response())
}

#[derive(Deserialize)]
pub struct GenreDeleteForm {
    pub genreid: Option<i32>,
}

/// Handle genre delete submission. Refused while books reference the genre.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(body): Form<GenreDeleteForm>,
) -> AppResult<Response> {
    match state.services.genres.delete(id, body.genreid).await? {
        GenreDeleteOutcome::Deleted => Ok(Redirect::to("/catalog/genres").into_response()),
        GenreDeleteOutcome::Blocked { genre, books } => {
            let context = json!({
                "title": "Delete Genre",
                "genre": GenreView::from(&genre),
                "genre_books": books.iter().map(BookSummaryView::from).collect::<Vec<_>>(),
            });
            Ok(state.render("genre_delete", &context)?.into_response())
        }
    }
}

/// The in-memory candidate echoed back on validation failure.
fn candidate_context(id: Option<i32>, form: &GenreForm) -> Value {
    json!({
        "id": id,
        "name": form.name,
    })
}
