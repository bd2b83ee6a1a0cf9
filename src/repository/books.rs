//! Books store.
//!
//! Genre references live in the `book_genres` junction table and are written
//! with a delete-then-insert replace, so an empty selection clears the set.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, BookListEntry, BookSummary, NewBook},
        genre::Genre,
    },
};

/// Store contract the book workflow depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksStore: Send + Sync {
    /// All books sorted by title, with the owning author's name joined in.
    async fn list_by_title(&self) -> AppResult<Vec<BookListEntry>>;
    /// Every book with its genre-id set, for the search fan-out.
    async fn list_all(&self) -> AppResult<Vec<Book>>;
    async fn get(&self, id: i32) -> AppResult<Option<Book>>;
    /// Book with author and genres resolved.
    async fn get_populated(&self, id: i32) -> AppResult<Option<Book>>;
    async fn find_by_author(&self, author_id: i32) -> AppResult<Vec<BookSummary>>;
    async fn find_by_genre(&self, genre_id: i32) -> AppResult<Vec<BookSummary>>;
    async fn create(&self, data: &NewBook) -> AppResult<Book>;
    async fn update(&self, id: i32, data: &NewBook) -> AppResult<()>;
    async fn count(&self) -> AppResult<i64>;
}

#[derive(Clone)]
pub struct PgBooksRepository {
    pool: Pool<Postgres>,
}

impl PgBooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Replace all genre references for a book: delete existing junction rows
    /// then insert the new set.
    async fn set_book_genres(&self, book_id: i32, genre_ids: &[i32]) -> AppResult<()> {
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(book_id)
            .execute(&self.pool)
            .await?;

        for genre_id in genre_ids {
            sqlx::query(
                r#"
                INSERT INTO book_genres (book_id, genre_id)
                VALUES ($1, $2)
                ON CONFLICT (book_id, genre_id) DO NOTHING
                "#,
            )
            .bind(book_id)
            .bind(genre_id)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn get_book_genres(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }
}

#[async_trait]
impl BooksStore for PgBooksRepository {
    async fn list_by_title(&self) -> AppResult<Vec<BookListEntry>> {
        let books = sqlx::query_as::<_, BookListEntry>(
            r#"
            SELECT b.id, b.title, (a.family_name || ', ' || a.first_name) AS author_name
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            ORDER BY b.title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn list_all(&self) -> AppResult<Vec<Book>> {
        let mut books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author_id, summary, isbn FROM books ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, (i32, i32)>(
            "SELECT book_id, genre_id FROM book_genres ORDER BY book_id, genre_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_book: HashMap<i32, Vec<i32>> = HashMap::new();
        for (book_id, genre_id) in rows {
            by_book.entry(book_id).or_default().push(genre_id);
        }
        for book in &mut books {
            book.genre_ids = by_book.remove(&book.id).unwrap_or_default();
        }

        Ok(books)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author_id, summary, isbn FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn get_populated(&self, id: i32) -> AppResult<Option<Book>> {
        let Some(mut book) = self.get(id).await? else {
            return Ok(None);
        };

        book.author = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, first_name, family_name, date_of_birth, date_of_death, image_path
            FROM authors
            WHERE id = $1
            "#,
        )
        .bind(book.author_id)
        .fetch_optional(&self.pool)
        .await?;

        book.genres = self.get_book_genres(id).await?;
        book.genre_ids = book.genres.iter().map(|g| g.id).collect();

        Ok(Some(book))
    }

    async fn find_by_author(&self, author_id: i32) -> AppResult<Vec<BookSummary>> {
        let books = sqlx::query_as::<_, BookSummary>(
            "SELECT id, title, summary FROM books WHERE author_id = $1 ORDER BY title",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn find_by_genre(&self, genre_id: i32) -> AppResult<Vec<BookSummary>> {
        let books = sqlx::query_as::<_, BookSummary>(
            r#"
            SELECT b.id, b.title, b.summary
            FROM books b
            JOIN book_genres bg ON bg.book_id = b.id
            WHERE bg.genre_id = $1
            ORDER BY b.title
            "#,
        )
        .bind(genre_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn create(&self, data: &NewBook) -> AppResult<Book> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (title, author_id, summary, isbn)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .fetch_one(&self.pool)
        .await?;

        self.set_book_genres(id, &data.genre_ids).await?;

        self.get_populated(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("book {} vanished after insert", id)))
    }

    async fn update(&self, id: i32, data: &NewBook) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE books SET
                title = $1,
                author_id = $2,
                summary = $3,
                isbn = $4
            WHERE id = $5
            "#,
        )
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.set_book_genres(id, &data.genre_ids).await?;

        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
