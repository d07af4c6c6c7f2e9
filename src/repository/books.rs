//! Books repository for database operations.
//!
//! `copies` and `available` are written only here, and only through paths
//! that recompute `available` from `copies` (`derived_available`): plain
//! create/update, and the guarded decrement used by the borrow transaction.

use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{derived_available, Book, CreateBook, ListBooksQuery, UpdateBook},
        borrow::BookRef,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Check whether a book with this ISBN already exists.
    /// The UNIQUE constraint on the column stays the final authority; this
    /// pre-check exists to produce a precise conflict message.
    pub async fn isbn_exists(&self, isbn: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Insert a new book with a freshly derived availability flag
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, title, author, genre, isbn, description, copies, available)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.genre)
        .bind(&book.isbn)
        .bind(&book.description)
        .bind(book.copies)
        .bind(derived_available(book.copies))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("A book with ISBN '{}' already exists.", book.isbn))
            }
            _ => AppError::Database(e),
        })?;

        Ok(created)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book not found with ID: '{}'", id)))
    }

    /// List books with optional genre filter, whitelisted sort and paging
    pub async fn list(&self, query: &ListBooksQuery) -> AppResult<Vec<Book>> {
        let (limit, offset) = query.paging();
        // order_by is built from closed enums, never from raw client input
        let sql = format!(
            "SELECT * FROM books{} ORDER BY {} LIMIT $1 OFFSET $2",
            if query.genre.is_some() {
                " WHERE genre = $3"
            } else {
                ""
            },
            query.order_by(),
        );

        let mut select = sqlx::query_as::<_, Book>(&sql).bind(limit).bind(offset);
        if let Some(genre) = query.genre {
            select = select.bind(genre);
        }

        Ok(select.fetch_all(&self.pool).await?)
    }

    /// Apply a partial update. When `copies` is part of the patch the
    /// availability flag is recomputed and written in the same statement.
    pub async fn update(&self, id: Uuid, patch: &UpdateBook) -> AppResult<Book> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE books SET updated_at = now()");

        if let Some(ref title) = patch.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(ref author) = patch.author {
            builder.push(", author = ").push_bind(author);
        }
        if let Some(genre) = patch.genre {
            builder.push(", genre = ").push_bind(genre);
        }
        if let Some(ref isbn) = patch.isbn {
            builder.push(", isbn = ").push_bind(isbn);
        }
        if let Some(ref description) = patch.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(copies) = patch.copies {
            builder.push(", copies = ").push_bind(copies);
            builder
                .push(", available = ")
                .push_bind(derived_available(copies));
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING *");

        builder
            .build_query_as::<Book>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(
                    format!(
                        "A book with ISBN '{}' already exists.",
                        patch.isbn.as_deref().unwrap_or_default()
                    ),
                ),
                _ => AppError::Database(e),
            })?
            .ok_or_else(|| AppError::NotFound(format!("Book not found with ID: '{}'", id)))
    }

    /// Delete a book unconditionally. Outstanding borrow records are left
    /// in place; the summary drops them once the book is gone.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let deleted = sqlx::query_scalar::<_, Uuid>("DELETE FROM books WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        deleted
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Book not found with ID: '{}'", id)))
    }

    /// Atomically take `quantity` copies from a book, recomputing the
    /// availability flag in the same statement. Returns `None` when the
    /// guard fails, i.e. the book no longer has `quantity` copies (or no
    /// longer exists); the caller decides how to report that.
    pub async fn take_copies(&self, id: Uuid, quantity: i32) -> AppResult<Option<Book>> {
        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET copies = copies - $2,
                available = (copies - $2) > 0,
                updated_at = now()
            WHERE id = $1 AND copies >= $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Scan `(id, title, isbn)` for every book, for the summary join
    pub async fn refs(&self) -> AppResult<Vec<BookRef>> {
        let refs = sqlx::query_as::<_, BookRef>("SELECT id, title, isbn FROM books")
            .fetch_all(&self.pool)
            .await?;
        Ok(refs)
    }

    /// Remove every book (administrative bulk clear)
    pub async fn delete_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM books").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
