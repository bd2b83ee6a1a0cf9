//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::author::{Author, AuthorView};
use super::genre::{Genre, GenreView};
use crate::validation::{collect_errors, escape_html, FieldError};

/// Full book model. Relations are loaded separately by the store and absent
/// unless the populated fetch was used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub summary: String,
    pub isbn: String,
    #[sqlx(skip)]
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    #[sqlx(skip)]
    #[serde(default)]
    pub author: Option<Author>,
    #[sqlx(skip)]
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl Book {
    pub fn url(&self) -> String {
        format!("/catalog/books/{}", self.id)
    }
}

/// Book as exposed to view contexts and the search JSON payload.
#[derive(Serialize)]
pub struct BookView<'a> {
    pub id: i32,
    pub title: &'a str,
    pub author_id: i32,
    pub summary: &'a str,
    pub isbn: &'a str,
    pub genre_ids: &'a [i32],
    pub author: Option<AuthorView<'a>>,
    pub genres: Vec<GenreView<'a>>,
    pub url: String,
}

impl<'a> From<&'a Book> for BookView<'a> {
    fn from(book: &'a Book) -> Self {
        Self {
            id: book.id,
            title: &book.title,
            author_id: book.author_id,
            summary: &book.summary,
            isbn: &book.isbn,
            genre_ids: &book.genre_ids,
            author: book.author.as_ref().map(AuthorView::from),
            genres: book.genres.iter().map(GenreView::from).collect(),
            url: book.url(),
        }
    }
}

/// Row shape for the book list page: title plus the joined author name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookListEntry {
    pub id: i32,
    pub title: String,
    pub author_name: Option<String>,
}

impl BookListEntry {
    pub fn url(&self) -> String {
        format!("/catalog/books/{}", self.id)
    }
}

#[derive(Serialize)]
pub struct BookListEntryView<'a> {
    #[serde(flatten)]
    entry: &'a BookListEntry,
    pub url: String,
}

impl<'a> From<&'a BookListEntry> for BookListEntryView<'a> {
    fn from(entry: &'a BookListEntry) -> Self {
        Self {
            url: entry.url(),
            entry,
        }
    }
}

/// Row shape for dependent-book listings (author and genre detail/delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub summary: String,
}

impl BookSummary {
    pub fn url(&self) -> String {
        format!("/catalog/books/{}", self.id)
    }
}

#[derive(Serialize)]
pub struct BookSummaryView<'a> {
    #[serde(flatten)]
    summary: &'a BookSummary,
    pub url: String,
}

impl<'a> From<&'a BookSummary> for BookSummaryView<'a> {
    fn from(summary: &'a BookSummary) -> Self {
        Self {
            url: summary.url(),
            summary,
        }
    }
}

/// Mutable field set written by the create and update workflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author_id: i32,
    pub summary: String,
    pub isbn: String,
    pub genre_ids: Vec<i32>,
}

/// Book form payload. The genre selector arrives as zero, one or many values
/// and always deserializes to a set, never to an absent field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BookForm {
    #[validate(length(min = 1, message = "Title must not be empty."))]
    #[serde(default)]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty."))]
    #[serde(default)]
    pub author: String,
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    #[serde(default)]
    pub summary: String,
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub genre: Vec<String>,
}

impl BookForm {
    const FIELDS: [&'static str; 4] = ["title", "author", "summary", "isbn"];

    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            summary: self.summary.trim().to_string(),
            isbn: self.isbn.trim().to_string(),
            genre: self.genre,
        }
    }

    pub fn check(&self) -> Result<(), Vec<FieldError>> {
        self.validate()
            .map_err(|errors| collect_errors(&errors, &Self::FIELDS))
    }

    pub fn to_record(&self, author_id: i32, genre_ids: Vec<i32>) -> NewBook {
        NewBook {
            title: escape_html(&self.title),
            author_id,
            summary: escape_html(&self.summary),
            isbn: escape_html(&self.isbn),
            genre_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_is_derived_from_identity() {
        let book = Book {
            id: 11,
            title: "The Dispossessed".to_string(),
            author_id: 7,
            summary: "An ambiguous utopia.".to_string(),
            isbn: "9780061054884".to_string(),
            genre_ids: vec![1],
            author: None,
            genres: vec![],
        };
        assert_eq!(book.url(), "/catalog/books/11");
    }

    #[test]
    fn omitted_genre_selector_deserializes_to_empty_set() {
        let form: BookForm = serde_json::from_value(json!({
            "title": "The Dispossessed",
            "author": "7",
            "summary": "An ambiguous utopia.",
            "isbn": "9780061054884",
        }))
        .unwrap();
        assert!(form.genre.is_empty());
    }

    #[test]
    fn form_flags_every_empty_required_field_in_order() {
        let form = BookForm::default().trimmed();
        let errors = form.check().unwrap_err();
        let msgs: Vec<_> = errors.iter().map(|e| e.msg.as_str()).collect();
        assert_eq!(
            msgs,
            [
                "Title must not be empty.",
                "Author must not be empty.",
                "Summary must not be empty.",
                "ISBN must not be empty",
            ]
        );
    }

    #[test]
    fn record_escapes_text_fields_and_carries_references() {
        let form = BookForm {
            title: "Tales & Songs".to_string(),
            author: "7".to_string(),
            summary: "A <short> summary".to_string(),
            isbn: "123".to_string(),
            genre: vec!["1".to_string(), "4".to_string()],
        };
        let record = form.to_record(7, vec![1, 4]);
        assert_eq!(record.title, "Tales &amp; Songs");
        assert_eq!(record.summary, "A &lt;short&gt; summary");
        assert_eq!(record.author_id, 7);
        assert_eq!(record.genre_ids, [1, 4]);
    }
}
