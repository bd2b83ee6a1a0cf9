//! Author workflow

use tokio::try_join;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorForm},
        book::BookSummary,
    },
    repository::Repository,
    uploads::{UploadStore, UploadedFile},
    validation::FieldError,
};

/// Author plus the books referencing it, fetched together.
#[derive(Debug)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<BookSummary>,
}

/// Result of a create or update submission.
#[derive(Debug)]
pub enum AuthorFormOutcome {
    Saved(Author),
    /// Field rules failed: echo the submitted values and the error list.
    Invalid {
        fields: AuthorForm,
        errors: Vec<FieldError>,
    },
}

/// Result of a delete submission.
#[derive(Debug)]
pub enum AuthorDeleteOutcome {
    Deleted,
    /// Books still reference the author; deletion refused, blockers listed.
    Blocked {
        author: Author,
        books: Vec<BookSummary>,
    },
}

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
    uploads: UploadStore,
}

impl AuthorsService {
    pub fn new(repository: Repository, uploads: UploadStore) -> Self {
        Self {
            repository,
            uploads,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list_by_family_name().await
    }

    /// Author detail: the author and its books, fetched concurrently.
    pub async fn detail(&self, id: i32) -> AppResult<AuthorDetail> {
        let (author, books) = try_join!(
            self.repository.authors.get(id),
            self.repository.books.find_by_author(id),
        )?;

        let author = author.ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;
        Ok(AuthorDetail { author, books })
    }

    /// Create an author from a validated form submission. The portrait
    /// attachment is required; it is checked after field validation and
    /// before anything is persisted.
    pub async fn create(
        &self,
        form: AuthorForm,
        upload: Option<UploadedFile>,
    ) -> AppResult<AuthorFormOutcome> {
        let form = form.trimmed();
        if let Err(errors) = form.check() {
            return Ok(AuthorFormOutcome::Invalid {
                fields: form,
                errors,
            });
        }

        let upload =
            upload.ok_or_else(|| AppError::InputMissing("No file was uploaded.".to_string()))?;
        let image_path = self.uploads.store(&upload).await?;

        let author = self
            .repository
            .authors
            .create(&form.to_record(image_path))
            .await?;
        Ok(AuthorFormOutcome::Saved(author))
    }

    /// Fetch the author backing the update form.
    pub async fn update_form(&self, id: i32) -> AppResult<Author> {
        self.repository
            .authors
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    /// Replace the author's mutable fields. The identity never changes.
    pub async fn update(
        &self,
        id: i32,
        form: AuthorForm,
        upload: Option<UploadedFile>,
    ) -> AppResult<AuthorFormOutcome> {
        let form = form.trimmed();
        if let Err(errors) = form.check() {
            return Ok(AuthorFormOutcome::Invalid {
                fields: form,
                errors,
            });
        }

        let existing = self.update_form(id).await?;
        let upload =
            upload.ok_or_else(|| AppError::InputMissing("No file was uploaded.".to_string()))?;
        let image_path = self.uploads.store(&upload).await?;

        let record = form.to_record(image_path);
        self.repository.authors.update(existing.id, &record).await?;

        Ok(AuthorFormOutcome::Saved(Author {
            id: existing.id,
            first_name: record.first_name,
            family_name: record.family_name,
            date_of_birth: record.date_of_birth,
            date_of_death: record.date_of_death,
            image_path: Some(record.image_path),
        }))
    }

    /// Data for the delete confirmation page. `None` means the author is
    /// already gone and the caller should fall back to the list page.
    pub async fn delete_view(&self, id: i32) -> AppResult<Option<AuthorDetail>> {
        let (author, books) = try_join!(
            self.repository.authors.get(id),
            self.repository.books.find_by_author(id),
        )?;

        Ok(author.map(|author| AuthorDetail { author, books }))
    }

    /// Delete the author unless books still reference it. The path id is
    /// authoritative; a form-submitted id may confirm it but not point
    /// elsewhere.
    pub async fn delete(
        &self,
        id: i32,
        submitted_id: Option<i32>,
    ) -> AppResult<AuthorDeleteOutcome> {
        if submitted_id.is_some_and(|submitted| submitted != id) {
            return Err(AppError::BadRequest(
                "Submitted author id does not match the request path".to_string(),
            ));
        }

        let (author, books) = try_join!(
            self.repository.authors.get(id),
            self.repository.books.find_by_author(id),
        )?;

        let Some(author) = author else {
            // Already gone; nothing to do.
            return Ok(AuthorDeleteOutcome::Deleted);
        };

        if !books.is_empty() {
            return Ok(AuthorDeleteOutcome::Blocked { author, books });
        }

        // Not atomic with the check above: a book created in the window will
        // end up referencing a missing author. Accepted.
        self.repository.authors.delete(author.id).await?;
        Ok(AuthorDeleteOutcome::Deleted)
    }
}
