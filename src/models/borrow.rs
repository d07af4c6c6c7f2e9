//! Borrow (lending transaction) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Borrow record from database. Immutable after creation: there is no
/// return/check-in flow, copies only come back through a catalog update.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrow {
    pub id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Borrow request. The due date must lie in the future; that is checked at
/// the validation boundary before the lending service runs.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BorrowRequest {
    /// Book to borrow from
    pub book_id: Uuid,
    /// Number of copies taken in this transaction
    #[validate(range(min = 1, message = "Quantity must be greater than zero"))]
    pub quantity: i32,
    /// Due date for the loan
    pub due_date: DateTime<Utc>,
}

/// One `(book, quantity)` pair from the ledger scan, input to the summary
#[derive(Debug, Clone, Copy, FromRow)]
pub struct BorrowQuantity {
    pub book_id: Uuid,
    pub quantity: i32,
}

/// Catalog metadata joined into the summary
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BookRef {
    #[serde(skip)]
    pub id: Uuid,
    pub title: String,
    pub isbn: String,
}

/// One summary row: a book and the total quantity borrowed across all of
/// its borrow records
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SummaryEntry {
    pub book: BookRef,
    pub total_quantity: i64,
}
