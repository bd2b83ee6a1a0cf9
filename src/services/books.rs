//! Book workflow.
//!
//! Book deletion is intentionally left unimplemented; the HTTP layer answers
//! 501 for it (see `api::books`).

use std::collections::HashSet;

use tokio::try_join;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, BookForm, BookListEntry, NewBook},
        book_instance::BookInstance,
        genre::{mark_checked, Genre, GenreCheckbox},
    },
    repository::Repository,
    validation::FieldError,
};

/// Book plus its physical copies, fetched together.
#[derive(Debug)]
pub struct BookDetail {
    pub book: Book,
    pub instances: Vec<BookInstance>,
}

/// Reference data backing the create form.
#[derive(Debug)]
pub struct BookFormRefs {
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
}

/// Data backing the update form: the book plus reference data with the
/// book's genres pre-checked.
#[derive(Debug)]
pub struct BookUpdateForm {
    pub book: Book,
    pub authors: Vec<Author>,
    pub genres: Vec<GenreCheckbox>,
}

/// Result of a create or update submission.
#[derive(Debug)]
pub enum BookFormOutcome {
    Saved(Book),
    /// Field rules failed: echo the candidate and re-fetched reference data,
    /// with the candidate's genre selection marked on the checkboxes.
    Invalid {
        fields: BookForm,
        selected: Vec<i32>,
        authors: Vec<Author>,
        genres: Vec<GenreCheckbox>,
        errors: Vec<FieldError>,
    },
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<BookListEntry>> {
        self.repository.books.list_by_title().await
    }

    /// Book detail: the populated book and its copies, fetched concurrently.
    pub async fn detail(&self, id: i32) -> AppResult<BookDetail> {
        let (book, instances) = try_join!(
            self.repository.books.get_populated(id),
            self.repository.book_instances.find_by_book(id),
        )?;

        let book = book.ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        Ok(BookDetail { book, instances })
    }

    /// Reference data for the create form: all authors and genres.
    pub async fn form_refs(&self) -> AppResult<BookFormRefs> {
        let (authors, genres) = try_join!(
            self.repository.authors.list_by_family_name(),
            self.repository.genres.list_by_name(),
        )?;

        Ok(BookFormRefs { authors, genres })
    }

    pub async fn create(&self, form: BookForm) -> AppResult<BookFormOutcome> {
        let form = form.trimmed();
        let selected = parse_genre_ids(&form.genre)?;

        if let Err(errors) = form.check() {
            return self.invalid(form, selected, errors).await;
        }

        let author_id = parse_author_id(&form.author)?;
        let book = self
            .repository
            .books
            .create(&form.to_record(author_id, selected))
            .await?;
        Ok(BookFormOutcome::Saved(book))
    }

    /// Data for the update form; the book's own genre set drives the
    /// checkbox state.
    pub async fn update_form(&self, id: i32) -> AppResult<BookUpdateForm> {
        let (book, authors, genres) = try_join!(
            self.repository.books.get_populated(id),
            self.repository.authors.list_by_family_name(),
            self.repository.genres.list_by_name(),
        )?;

        let book = book.ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        let selected: HashSet<i32> = book.genre_ids.iter().copied().collect();

        Ok(BookUpdateForm {
            genres: mark_checked(genres, &selected),
            authors,
            book,
        })
    }

    /// Replace the book's mutable fields, genre set included. The identity
    /// never changes.
    pub async fn update(&self, id: i32, form: BookForm) -> AppResult<BookFormOutcome> {
        let form = form.trimmed();
        let selected = parse_genre_ids(&form.genre)?;

        if let Err(errors) = form.check() {
            return self.invalid(form, selected, errors).await;
        }

        let existing = self
            .repository
            .books
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        let author_id = parse_author_id(&form.author)?;
        let record = form.to_record(author_id, selected);
        self.repository.books.update(existing.id, &record).await?;

        Ok(BookFormOutcome::Saved(Book {
            id: existing.id,
            title: record.title,
            author_id: record.author_id,
            summary: record.summary,
            isbn: record.isbn,
            genre_ids: record.genre_ids,
            author: None,
            genres: vec![],
        }))
    }

    /// Failed-validation branch shared by create and update: re-fetch the
    /// reference data, mark the candidate's selection, echo the input.
    async fn invalid(
        &self,
        form: BookForm,
        selected: Vec<i32>,
        errors: Vec<FieldError>,
    ) -> AppResult<BookFormOutcome> {
        let refs = self.form_refs().await?;
        let set: HashSet<i32> = selected.iter().copied().collect();

        Ok(BookFormOutcome::Invalid {
            genres: mark_checked(refs.genres, &set),
            authors: refs.authors,
            selected,
            fields: form,
            errors,
        })
    }
}

/// The genre selector posts identities; anything non-numeric means the form
/// was tampered with, not that the user mistyped.
fn parse_genre_ids(values: &[String]) -> AppResult<Vec<i32>> {
    values
        .iter()
        .map(|v| {
            v.parse::<i32>()
                .map_err(|_| AppError::BadRequest(format!("Invalid genre reference: {}", v)))
        })
        .collect()
}

fn parse_author_id(value: &str) -> AppResult<i32> {
    value
        .parse::<i32>()
        .map_err(|_| AppError::BadRequest(format!("Invalid author reference: {}", value)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::eq;

    use super::*;
    use crate::repository::{
        authors::MockAuthorsStore, book_instances::MockBookInstancesStore, books::MockBooksStore,
        genres::MockGenresStore,
    };

    fn service(
        books: MockBooksStore,
        authors: MockAuthorsStore,
        genres: MockGenresStore,
        instances: MockBookInstancesStore,
    ) -> BooksService {
        BooksService::new(Repository {
            authors: Arc::new(authors),
            books: Arc::new(books),
            genres: Arc::new(genres),
            book_instances: Arc::new(instances),
        })
    }

    fn stored_book(id: i32) -> Book {
        Book {
            id,
            title: "The Dispossessed".to_string(),
            author_id: 7,
            summary: "An ambiguous utopia.".to_string(),
            isbn: "9780061054884".to_string(),
            genre_ids: vec![2],
            author: None,
            genres: vec![],
        }
    }

    fn an_author(id: i32) -> Author {
        Author {
            id,
            first_name: "Ursula".to_string(),
            family_name: "LeGuin".to_string(),
            date_of_birth: None,
            date_of_death: None,
            image_path: None,
        }
    }

    fn a_genre(id: i32, name: &str) -> Genre {
        Genre {
            id,
            name: name.to_string(),
        }
    }

    fn valid_form() -> BookForm {
        BookForm {
            title: "The Dispossessed".to_string(),
            author: "7".to_string(),
            summary: "An ambiguous utopia.".to_string(),
            isbn: "9780061054884".to_string(),
            genre: vec![],
        }
    }

    #[tokio::test]
    async fn create_with_omitted_genre_selector_stores_empty_set() {
        let mut books = MockBooksStore::new();
        books
            .expect_create()
            .withf(|data: &NewBook| data.genre_ids.is_empty() && data.author_id == 7)
            .times(1)
            .returning(|_| Ok(stored_book(11)));
        let service = service(
            books,
            MockAuthorsStore::new(),
            MockGenresStore::new(),
            MockBookInstancesStore::new(),
        );

        let outcome = service.create(valid_form()).await.unwrap();
        assert!(matches!(outcome, BookFormOutcome::Saved(b) if b.id == 11));
    }

    #[tokio::test]
    async fn create_with_single_genre_value_stores_one_element_set() {
        let mut books = MockBooksStore::new();
        books
            .expect_create()
            .withf(|data: &NewBook| data.genre_ids == [4])
            .times(1)
            .returning(|_| Ok(stored_book(11)));
        let service = service(
            books,
            MockAuthorsStore::new(),
            MockGenresStore::new(),
            MockBookInstancesStore::new(),
        );

        let form = BookForm {
            genre: vec!["4".to_string()],
            ..valid_form()
        };
        assert!(matches!(
            service.create(form).await.unwrap(),
            BookFormOutcome::Saved(_)
        ));
    }

    #[tokio::test]
    async fn create_with_malformed_genre_reference_is_bad_request() {
        let service = service(
            MockBooksStore::new(),
            MockAuthorsStore::new(),
            MockGenresStore::new(),
            MockBookInstancesStore::new(),
        );

        let form = BookForm {
            genre: vec!["fantasy".to_string()],
            ..valid_form()
        };
        let err = service.create(form).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn invalid_create_rerenders_with_candidate_selection_checked() {
        let mut books = MockBooksStore::new();
        books.expect_create().times(0);
        let mut authors = MockAuthorsStore::new();
        authors
            .expect_list_by_family_name()
            .returning(|| Ok(vec![an_author(7)]));
        let mut genres = MockGenresStore::new();
        genres.expect_list_by_name().returning(|| {
            Ok(vec![
                a_genre(1, "Essays"),
                a_genre(2, "Fantasy"),
                a_genre(5, "Poetry"),
            ])
        });
        let service = service(books, authors, genres, MockBookInstancesStore::new());

        let form = BookForm {
            title: String::new(),
            genre: vec!["5".to_string(), "1".to_string()],
            ..valid_form()
        };
        let outcome = service.create(form).await.unwrap();

        match outcome {
            BookFormOutcome::Invalid {
                fields,
                selected,
                authors,
                genres,
                errors,
            } => {
                assert_eq!(fields.summary, "An ambiguous utopia.");
                assert_eq!(selected, [5, 1]);
                assert_eq!(authors.len(), 1);
                let checked: Vec<_> = genres.iter().map(|g| (g.genre.id, g.checked)).collect();
                assert_eq!(checked, [(1, true), (2, false), (5, true)]);
                assert_eq!(errors[0].msg, "Title must not be empty.");
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_replaces_fields_and_preserves_identity() {
        let mut books = MockBooksStore::new();
        books
            .expect_get()
            .with(eq(11))
            .returning(|_| Ok(Some(stored_book(11))));
        books
            .expect_update()
            .withf(|id, data| *id == 11 && data.genre_ids == [2, 4])
            .times(1)
            .returning(|_, _| Ok(()));
        let service = service(
            books,
            MockAuthorsStore::new(),
            MockGenresStore::new(),
            MockBookInstancesStore::new(),
        );

        let form = BookForm {
            genre: vec!["2".to_string(), "4".to_string()],
            ..valid_form()
        };
        let outcome = service.update(11, form).await.unwrap();

        match outcome {
            BookFormOutcome::Saved(book) => {
                assert_eq!(book.id, 11);
                assert_eq!(book.url(), "/catalog/books/11");
            }
            other => panic!("expected Saved, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_of_missing_book_is_not_found() {
        let mut books = MockBooksStore::new();
        books.expect_get().returning(|_| Ok(None));
        books.expect_update().times(0);
        let service = service(
            books,
            MockAuthorsStore::new(),
            MockGenresStore::new(),
            MockBookInstancesStore::new(),
        );

        let err = service.update(11, valid_form()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_form_checks_the_books_own_genres() {
        let mut books = MockBooksStore::new();
        books
            .expect_get_populated()
            .with(eq(11))
            .returning(|_| Ok(Some(stored_book(11))));
        let mut authors = MockAuthorsStore::new();
        authors
            .expect_list_by_family_name()
            .returning(|| Ok(vec![an_author(7)]));
        let mut genres = MockGenresStore::new();
        genres
            .expect_list_by_name()
            .returning(|| Ok(vec![a_genre(1, "Essays"), a_genre(2, "Fantasy")]));
        let service = service(books, authors, genres, MockBookInstancesStore::new());

        let form = service.update_form(11).await.unwrap();
        let checked: Vec<_> = form.genres.iter().map(|g| (g.genre.id, g.checked)).collect();
        assert_eq!(checked, [(1, false), (2, true)]);
    }

    #[tokio::test]
    async fn detail_merges_book_and_instances() {
        let mut books = MockBooksStore::new();
        books
            .expect_get_populated()
            .returning(|_| Ok(Some(stored_book(11))));
        let mut instances = MockBookInstancesStore::new();
        instances.expect_find_by_book().with(eq(11)).returning(|_| {
            Ok(vec![BookInstance {
                id: 1,
                book_id: 11,
                imprint: "Harper Voyager, 1994".to_string(),
                status: "Available".to_string(),
                due_back: None,
            }])
        });
        let service = service(
            books,
            MockAuthorsStore::new(),
            MockGenresStore::new(),
            instances,
        );

        let detail = service.detail(11).await.unwrap();
        assert_eq!(detail.book.id, 11);
        assert_eq!(detail.instances.len(), 1);
    }

    #[tokio::test]
    async fn detail_of_missing_book_is_not_found() {
        let mut books = MockBooksStore::new();
        books.expect_get_populated().returning(|_| Ok(None));
        let mut instances = MockBookInstancesStore::new();
        instances.expect_find_by_book().returning(|_| Ok(vec![]));
        let service = service(
            books,
            MockAuthorsStore::new(),
            MockGenresStore::new(),
            instances,
        );

        let err = service.detail(11).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
