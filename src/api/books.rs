//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::author::AuthorView,
    models::book::{BookForm, BookListEntryView, BookView},
    models::book_instance::BookInstanceView,
    models::genre::GenreView,
    services::books::BookFormOutcome,
    AppState,
};

/// List all books with their authors
pub async fn list(State(state): State<AppState>) -> AppResult<Response> {
    let books = state.services.books.list().await?;

    let context = json!({
        "title": "Book List",
        "book_list": books.iter().map(BookListEntryView::from).collect::<Vec<_>>(),
    });
    Ok(state.render("book_list", &context)?.into_response())
}

/// Book detail page with its physical copies
pub async fn detail(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Response> {
    let detail = state.services.books.detail(id).await?;

    let context = json!({
        "title": detail.book.title,
        "book": BookView::from(&detail.book),
        "book_instances": detail.instances.iter().map(BookInstanceView::from).collect::<Vec<_>>(),
    });
    Ok(state.render("book_detail", &context)?.into_response())
}

/// Book create form, offering every author and genre
pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    let refs = state.services.books.form_refs().await?;

    let context = json!({
        "title": "Create Book",
        "authors": refs.authors.iter().map(AuthorView::from).collect::<Vec<_>>(),
        "genres": refs.genres.iter().map(GenreView::from).collect::<Vec<_>>(),
    });
    Ok(state.render("book_form", &context)?.into_response())
}

/// Handle book create submission. The multi-value genre selector is accepted
/// as zero, one or many fields.
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    match state.services.books.create(form).await? {
        BookFormOutcome::Saved(book) => Ok(Redirect::to(&book.url()).into_response()),
        BookFormOutcome::Invalid {
            fields,
            selected,
            authors,
            genres,
            errors,
        } => {
            let context = json!({
                "title": "Create Book",
                "authors": authors.iter().map(AuthorView::from).collect::<Vec<_>>(),
                "genres": genres,
                "book": candidate_context(None, &fields, &selected),
                "errors": errors,
            });
            Ok(state.render("book_form", &context)?.into_response())
        }
    }
}

/// Book update form with the book's genres pre-checked
pub async fn update_form(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Response> {
    let form = state.services.books.update_form(id).await?;

    let context = json!({
        "title": "Update Book",
        "authors": form.authors.iter().map(AuthorView::from).collect::<Vec<_>>(),
        "genres": form.genres,
        "book": BookView::from(&form.book),
    });
    Ok(state.render("book_form", &context)?.into_response())
}

/// Handle book update submission
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    match state.services.books.update(id, form).await? {
        BookFormOutcome::Saved(book) => Ok(Redirect::to(&book.url()).into_response()),
        BookFormOutcome::Invalid {
            fields,
            selected,
            authors,
            genres,
            errors,
        } => {
            let context = json!({
                "title": "Update Book",
                "authors": authors.iter().map(AuthorView::from).collect::<Vec<_>>(),
                "genres": genres,
                "book": candidate_context(Some(id), &fields, &selected),
                "errors": errors,
            });
            Ok(state.render("book_form", &context)?.into_response())
        }
    }
}

/// Book deletion is not implemented yet; both routes answer 501 so the gap is
/// explicit rather than silent.
pub async fn delete_form() -> Response {
    (StatusCode::NOT_IMPLEMENTED, "Book delete is not implemented").into_response()
}

pub async fn delete() -> Response {
    (StatusCode::NOT_IMPLEMENTED, "Book delete is not implemented").into_response()
}

/// The in-memory candidate echoed back on validation failure: submitted
/// values as-is plus the normalized genre selection, carrying the original
/// identity on update.
fn candidate_context(id: Option<i32>, form: &BookForm, selected: &[i32]) -> Value {
    json!({
        "id": id,
        "title": form.title,
        "author": form.author,
        "summary": form.summary,
        "isbn": form.isbn,
        "genre": selected,
    })
}
