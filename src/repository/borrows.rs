//! Borrows repository for database operations.
//!
//! Borrow rows are append-only: created by the lending service after a
//! successful inventory decrement, removed only by the administrative bulk
//! clear. `book_id` is a weak reference — no foreign key — so deleting a
//! book leaves its borrow history behind.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::borrow::{Borrow, BorrowQuantity},
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Append a borrow record
    pub async fn create(
        &self,
        book_id: Uuid,
        quantity: i32,
        due_date: DateTime<Utc>,
    ) -> AppResult<Borrow> {
        let borrow = sqlx::query_as::<_, Borrow>(
            r#"
            INSERT INTO borrows (id, book_id, quantity, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book_id)
        .bind(quantity)
        .bind(due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(borrow)
    }

    /// Scan `(book_id, quantity)` for every borrow record, for the summary
    pub async fn quantities(&self) -> AppResult<Vec<BorrowQuantity>> {
        let rows =
            sqlx::query_as::<_, BorrowQuantity>("SELECT book_id, quantity FROM borrows")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    /// Remove every borrow record (administrative bulk clear)
    pub async fn delete_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM borrows")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
