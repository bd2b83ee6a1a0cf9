//! Genres store

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::genre::Genre};

/// Store contract the genre workflow depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenresStore: Send + Sync {
    /// All genres, sorted ascending by their natural key (name).
    async fn list_by_name(&self) -> AppResult<Vec<Genre>>;
    async fn get(&self, id: i32) -> AppResult<Option<Genre>>;
    /// Exact-name lookup backing the create workflow's dedup check.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>>;
    async fn create(&self, name: &str) -> AppResult<Genre>;
    async fn update(&self, id: i32, name: &str) -> AppResult<()>;
    async fn delete(&self, id: i32) -> AppResult<()>;
    async fn count(&self) -> AppResult<i64>;
}

#[derive(Clone)]
pub struct PgGenresRepository {
    pool: Pool<Postgres>,
}

impl PgGenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenresStore for PgGenresRepository {
    async fn list_by_name(&self) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(genres)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Genre>> {
        let genre = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(genre)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let genre = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(genre)
    }

    async fn create(&self, name: &str) -> AppResult<Genre> {
        let genre = sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(genre)
    }

    async fn update(&self, id: i32, name: &str) -> AppResult<()> {
        sqlx::query("UPDATE genres SET name = $1 WHERE id = $2")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
