//! Book instances store

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::book_instance::{BookInstance, InstanceStatus},
};

/// Store contract for physical copies. Only the read side is needed: copies
/// feed the book detail page and the home-page counts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookInstancesStore: Send + Sync {
    async fn find_by_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>>;
    async fn count(&self) -> AppResult<i64>;
    async fn count_available(&self) -> AppResult<i64>;
}

#[derive(Clone)]
pub struct PgBookInstancesRepository {
    pool: Pool<Postgres>,
}

impl PgBookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookInstancesStore for PgBookInstancesRepository {
    async fn find_by_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let instances = sqlx::query_as::<_, BookInstance>(
            r#"
            SELECT id, book_id, imprint, status, due_back
            FROM book_instances
            WHERE book_id = $1
            ORDER BY imprint
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(instances)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_available(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(InstanceStatus::Available.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
