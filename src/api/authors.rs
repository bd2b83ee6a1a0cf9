//! Author endpoints

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::author::{AuthorForm, AuthorView},
    models::book::BookSummaryView,
    services::authors::{AuthorDeleteOutcome, AuthorFormOutcome},
    uploads::UploadedFile,
    AppState,
};

/// List all authors
pub async fn list(State(state): State<AppState>) -> AppResult<Response> {
    let authors = state.services.authors.list().await?;

    let context = json!({
        "title": "Author List",
        "author_list": authors.iter().map(AuthorView::from).collect::<Vec<_>>(),
    });
    Ok(state.render("author_list", &context)?.into_response())
}

/// Author detail page with the author's books
pub async fn detail(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Response> {
    let detail = state.services.authors.detail(id).await?;

    let context = json!({
        "title": "Author Detail",
        "author": AuthorView::from(&detail.author),
        "author_books": detail.books.iter().map(BookSummaryView::from).collect::<Vec<_>>(),
    });
    Ok(state.render("author_detail", &context)?.into_response())
}

/// Author create form
pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    let context = json!({ "title": "Create Author" });
    Ok(state.render("author_form", &context)?.into_response())
}

/// Handle author create submission (multipart: fields + portrait)
pub async fn create(State(state): State<AppState>, multipart: Multipart) -> AppResult<Response> {
    let (form, upload) = read_author_form(multipart).await?;

    match state.services.authors.create(form, upload).await? {
        AuthorFormOutcome::Saved(author) => Ok(Redirect::to(&author.url()).into_response()),
        AuthorFormOutcome::Invalid { fields, errors } => {
            let context = json!({
                "title": "Create Author",
                "author": candidate_context(None, &fields),
                "errors": errors,
            });
            Ok(state.render("author_form", &context)?.into_response())
        }
    }
}

/// Author update form
pub async fn update_form(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Response> {
    let author = state.services.authors.update_form(id).await?;

    let context = json!({
        "title": "Update Author",
        "author": AuthorView::from(&author),
    });
    Ok(state.render("author_form", &context)?.into_response())
}

/// Handle author update submission
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> AppResult<Response> {
    let (form, upload) = read_author_form(multipart).await?;

    match state.services.authors.update(id, form, upload).await? {
        AuthorFormOutcome::Saved(author) => Ok(Redirect::to(&author.url()).into_response()),
        AuthorFormOutcome::Invalid { fields, errors } => {
            let context = json!({
                "title": "Update Author",
                "author": candidate_context(Some(id), &fields),
                "errors": errors,
            });
            Ok(state.render("author_form", &context)?.into_response())
        }
    }
}

/// Author delete confirmation page
pub async fn delete_form(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Response> {
    let Some(detail) = state.services.authors.delete_view(id).await? else {
        return Ok(Redirect::to("/catalog/authors").into_response());
    };

    let context = json!({
        "title": "Delete Author",
        "author": AuthorView::from(&detail.author),
        "author_books": detail.books.iter().map(BookSummaryView::from).collect::<Vec<_>>(),
    });
    Ok(state.render("author_delete", &context)?.into_response())
}

#[derive(Deserialize)]
pub struct AuthorDeleteForm {
    pub authorid: Option<i32>,
}

/// Handle author delete submission. Refused while books reference the author.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(body): Form<AuthorDeleteForm>,
) -> AppResult<Response> {
    match state.services.authors.delete(id, body.authorid).await? {
        AuthorDeleteOutcome::Deleted => Ok(Redirect::to("/catalog/authors").into_response()),
        AuthorDeleteOutcome::Blocked { author, books } => {
            let context = json!({
                "title": "Delete Author",
                "author": AuthorView::from(&author),
                "author_books": books.iter().map(BookSummaryView::from).collect::<Vec<_>>(),
            });
            Ok(state.render("author_delete", &context)?.into_response())
        }
    }
}

/// The in-memory candidate echoed back on validation failure: the submitted
/// values as-is, carrying the original identity on update.
fn candidate_context(id: Option<i32>, form: &AuthorForm) -> Value {
    json!({
        "id": id,
        "first_name": form.first_name,
        "family_name": form.family_name,
        "date_of_birth": form.date_of_birth,
        "date_of_death": form.date_of_death,
        "date_of_birth_ymd": form.date_of_birth,
        "date_of_death_ymd": form.date_of_death,
    })
}

/// Pull the author fields and the portrait attachment out of a multipart
/// submission. An empty file input counts as no attachment.
async fn read_author_form(
    mut multipart: Multipart,
) -> AppResult<(AuthorForm, Option<UploadedFile>)> {
    let mut form = AuthorForm::default();
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "first_name" => form.first_name = field.text().await.map_err(bad_request)?,
            "family_name" => form.family_name = field.text().await.map_err(bad_request)?,
            "date_of_birth" => {
                form.date_of_birth = Some(field.text().await.map_err(bad_request)?)
            }
            "date_of_death" => {
                form.date_of_death = Some(field.text().await.map_err(bad_request)?)
            }
            "upload_file" => {
                let file_name = field.file_name().map(str::to_owned).unwrap_or_default();
                let bytes = field.bytes().await.map_err(bad_request)?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    upload = Some(UploadedFile {
                        name: file_name,
                        bytes,
                    });
                }
            }
            _ => {}
        }
    }

    Ok((form, upload))
}

fn bad_request(err: MultipartError) -> AppError {
    AppError::BadRequest(err.to_string())
}
