//! Lending service: the borrow transaction and the loan summary.
//!
//! Borrowing spans two records — the book's copy count and a new borrow
//! row — without a storage transaction around them. The inventory side is
//! a single guarded decrement, so two concurrent borrows can never
//! over-draw a book; the borrow row is appended only after that decrement
//! committed.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BookRef, Borrow, BorrowQuantity, BorrowRequest, SummaryEntry},
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
}

impl LendingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow copies of a book.
    ///
    /// The upfront availability and copy-count checks give precise error
    /// messages; the guarded decrement is what actually protects the
    /// inventory against concurrent borrows. When the guard fails, the
    /// current count is re-read for the message and the request fails —
    /// there is no retry.
    pub async fn borrow_book(&self, request: BorrowRequest) -> AppResult<Borrow> {
        let book = self.repository.books.get_by_id(request.book_id).await?;

        if !book.available {
            return Err(AppError::Unavailable(format!(
                "Book '{}' (ISBN: {}) is not available for borrowing",
                book.title, book.isbn
            )));
        }

        if book.copies < request.quantity {
            return Err(AppError::InsufficientInventory(format!(
                "Not enough copies, available: {}, requested: {}",
                book.copies, request.quantity
            )));
        }

        let taken = self
            .repository
            .books
            .take_copies(request.book_id, request.quantity)
            .await?;

        if taken.is_none() {
            let current = self.repository.books.get_by_id(request.book_id).await?;
            return Err(AppError::InsufficientInventory(format!(
                "Not enough copies, available: {}, requested: {}",
                current.copies, request.quantity
            )));
        }

        // The decrement is committed at this point. An insert failure is
        // surfaced as-is and the decrement is not reversed.
        self.repository
            .borrows
            .create(request.book_id, request.quantity, request.due_date)
            .await
            .map_err(|e| {
                tracing::error!(
                    book_id = %request.book_id,
                    quantity = request.quantity,
                    "borrow record insert failed after inventory decrement: {}",
                    e
                );
                AppError::Internal("Failed to record borrow after inventory update".to_string())
            })
    }

    /// Total quantity borrowed per book, joined with catalog metadata
    pub async fn summary(&self) -> AppResult<Vec<SummaryEntry>> {
        let quantities = self.repository.borrows.quantities().await?;
        let books = self.repository.books.refs().await?;
        Ok(summarize(&quantities, books))
    }
}

/// Group borrow quantities by book and join in catalog metadata.
///
/// Inner-join semantics: a book with no borrows produces no entry, and
/// borrows whose book has been deleted are dropped. Result order is
/// unspecified.
fn summarize(borrows: &[BorrowQuantity], books: Vec<BookRef>) -> Vec<SummaryEntry> {
    let mut totals: HashMap<Uuid, i64> = HashMap::new();
    for borrow in borrows {
        *totals.entry(borrow.book_id).or_insert(0) += i64::from(borrow.quantity);
    }

    books
        .into_iter()
        .filter_map(|book| {
            totals.get(&book.id).map(|&total_quantity| SummaryEntry {
                book,
                total_quantity,
            })
        })
        .collect()
}
