//! Authors store

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::author::{Author, NewAuthor},
};

/// Store contract the author workflow depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorsStore: Send + Sync {
    /// All authors, sorted ascending by their natural key (family name).
    async fn list_by_family_name(&self) -> AppResult<Vec<Author>>;
    async fn get(&self, id: i32) -> AppResult<Option<Author>>;
    async fn create(&self, data: &NewAuthor) -> AppResult<Author>;
    /// Replace the mutable fields of the author with the given identity.
    async fn update(&self, id: i32, data: &NewAuthor) -> AppResult<()>;
    async fn delete(&self, id: i32) -> AppResult<()>;
    async fn count(&self) -> AppResult<i64>;
}

#[derive(Clone)]
pub struct PgAuthorsRepository {
    pool: Pool<Postgres>,
}

impl PgAuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorsStore for PgAuthorsRepository {
    async fn list_by_family_name(&self) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, first_name, family_name, date_of_birth, date_of_death, image_path
            FROM authors
            ORDER BY family_name, first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, first_name, family_name, date_of_birth, date_of_death, image_path
            FROM authors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(author)
    }

    async fn create(&self, data: &NewAuthor) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, family_name, date_of_birth, date_of_death, image_path)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, first_name, family_name, date_of_birth, date_of_death, image_path
            "#,
        )
        .bind(&data.first_name)
        .bind(&data.family_name)
        .bind(data.date_of_birth)
        .bind(data.date_of_death)
        .bind(&data.image_path)
        .fetch_one(&self.pool)
        .await?;

        Ok(author)
    }

    async fn update(&self, id: i32, data: &NewAuthor) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE authors SET
                first_name = $1,
                family_name = $2,
                date_of_birth = $3,
                date_of_death = $4,
                image_path = $5
            WHERE id = $6
            "#,
        )
        .bind(&data.first_name)
        .bind(&data.family_name)
        .bind(data.date_of_birth)
        .bind(data.date_of_death)
        .bind(&data.image_path)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
