//! Genre workflow

use tokio::try_join;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookSummary,
        genre::{Genre, GenreForm},
    },
    repository::Repository,
    validation::FieldError,
};

/// Genre plus the books referencing it, fetched together.
#[derive(Debug)]
pub struct GenreDetail {
    pub genre: Genre,
    pub books: Vec<BookSummary>,
}

/// Result of a create or update submission. A create that finds an existing
/// genre with the same name reports `Saved` with that genre: the caller
/// redirects to it instead of storing a duplicate.
#[derive(Debug)]
pub enum GenreFormOutcome {
    Saved(Genre),
    Invalid {
        fields: GenreForm,
        errors: Vec<FieldError>,
    },
}

/// Result of a delete submission.
#[derive(Debug)]
pub enum GenreDeleteOutcome {
    Deleted,
    Blocked {
        genre: Genre,
        books: Vec<BookSummary>,
    },
}

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list_by_name().await
    }

    /// Genre detail: the genre and its books, fetched concurrently.
    pub async fn detail(&self, id: i32) -> AppResult<GenreDetail> {
        let (genre, books) = try_join!(
            self.repository.genres.get(id),
            self.repository.books.find_by_genre(id),
        )?;

        let genre = genre.ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;
        Ok(GenreDetail { genre, books })
    }

    /// Create a genre, deduplicating on the stored name: an existing genre
    /// with the same name is reused rather than duplicated.
    pub async fn create(&self, form: GenreForm) -> AppResult<GenreFormOutcome> {
        let form = form.trimmed();
        if let Err(errors) = form.check() {
            return Ok(GenreFormOutcome::Invalid {
                fields: form,
                errors,
            });
        }

        let name = form.stored_name();
        if let Some(existing) = self.repository.genres.find_by_name(&name).await? {
            return Ok(GenreFormOutcome::Saved(existing));
        }

        let genre = self.repository.genres.create(&name).await?;
        Ok(GenreFormOutcome::Saved(genre))
    }

    /// Fetch the genre backing the update form.
    pub async fn update_form(&self, id: i32) -> AppResult<Genre> {
        self.repository
            .genres
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))
    }

    /// Replace the genre's name. The identity never changes.
    pub async fn update(&self, id: i32, form: GenreForm) -> AppResult<GenreFormOutcome> {
        let form = form.trimmed();
        if let Err(errors) = form.check() {
            return Ok(GenreFormOutcome::Invalid {
                fields: form,
                errors,
            });
        }

        let existing = self.update_form(id).await?;
        let name = form.stored_name();
        self.repository.genres.update(existing.id, &name).await?;

        Ok(GenreFormOutcome::Saved(Genre {
            id: existing.id,
            name,
        }))
    }

    /// Data for the delete confirmation page; `None` when the genre is gone.
    pub async fn delete_view(&self, id: i32) -> AppResult<Option<GenreDetail>> {
        let (genre, books) = try_join!(
            self.repository.genres.get(id),
            self.repository.books.find_by_genre(id),
        )?;

        Ok(genre.map(|genre| GenreDetail { genre, books }))
    }

    /// Delete the genre unless books still reference it.
    pub async fn delete(&self, id: i32, submitted_id: Option<i32>) -> AppResult<GenreDeleteOutcome> {
        if submitted_id.is_some_and(|submitted| submitted != id) {
            return Err(AppError::BadRequest(
                "Submitted genre id does not match the request path".to_string(),
            ));
        }

        let (genre, books) = try_join!(
            self.repository.genres.get(id),
            self.repository.books.find_by_genre(id),
        )?;

        let Some(genre) = genre else {
            return Ok(GenreDeleteOutcome::Deleted);
        };

        if !books.is_empty() {
            return Ok(GenreDeleteOutcome::Blocked { genre, books });
        }

        self.repository.genres.delete(genre.id).await?;
        Ok(GenreDeleteOutcome::Deleted)
    }
}
