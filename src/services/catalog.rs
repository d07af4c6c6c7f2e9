//! Book catalog service.
//!
//! Owns the catalog-side business rules: precise ISBN conflict reporting,
//! rejection of empty update patches, and id parsing. The availability
//! invariant itself is enforced by the repository write paths.

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, Genre, ListBooksQuery, UpdateBook},
    repository::Repository,
};

/// Parse a path identifier into a book id
fn parse_book_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::InvalidId(format!("Invalid book ID format: '{}'", raw)))
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new book entry
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        if self.repository.books.isbn_exists(&book.isbn).await? {
            return Err(AppError::Conflict(format!(
                "A book with ISBN '{}' already exists.",
                book.isbn
            )));
        }

        self.repository.books.create(&book).await
    }

    /// Get a book by its path identifier
    pub async fn get_book(&self, id: &str) -> AppResult<Book> {
        let id = parse_book_id(id)?;
        self.repository.books.get_by_id(id).await
    }

    /// List books with optional genre filter, sorting and paging
    pub async fn list_books(&self, query: &ListBooksQuery) -> AppResult<Vec<Book>> {
        self.repository.books.list(query).await
    }

    /// Apply a partial update to a book
    pub async fn update_book(&self, id: &str, patch: UpdateBook) -> AppResult<Book> {
        let id = parse_book_id(id)?;

        if patch.is_empty() {
            return Err(AppError::BadRequest(
                "No relevant values passed for update.".to_string(),
            ));
        }

        self.repository.books.update(id, &patch).await
    }

    /// Delete a book. Outstanding borrows do not block the removal.
    pub async fn delete_book(&self, id: &str) -> AppResult<()> {
        let id = parse_book_id(id)?;
        self.repository.books.delete(id).await
    }

    /// Seed the catalog with a fixed set of sample books
    pub async fn seed_books(&self) -> AppResult<Vec<Book>> {
        let mut seeded = Vec::with_capacity(SAMPLE_BOOKS.len());
        for (title, author, genre, isbn, description, copies) in SAMPLE_BOOKS {
            let book = CreateBook {
                title: title.to_string(),
                author: author.to_string(),
                genre: *genre,
                isbn: isbn.to_string(),
                description: Some(description.to_string()),
                copies: *copies,
            };
            seeded.push(self.create_book(book).await?);
        }
        Ok(seeded)
    }

    /// Administrative bulk clear: every borrow, then every book
    pub async fn clear_records(&self) -> AppResult<()> {
        self.repository.borrows.delete_all().await?;
        self.repository.books.delete_all().await?;
        Ok(())
    }
}

/// Default catalog used by the seed endpoint
const SAMPLE_BOOKS: &[(&str, &str, Genre, &str, &str, i32)] = &[
    (
        "The Theory of Everything",
        "Stephen Hawking",
        Genre::Science,
        "9780553380163",
        "An overview of cosmology from the Big Bang to black holes.",
        5,
    ),
    (
        "1984",
        "George Orwell",
        Genre::Fiction,
        "9780451524935",
        "A dystopian novel set in a totalitarian surveillance state.",
        8,
    ),
    (
        "A Brief History of Time",
        "Stephen Hawking",
        Genre::Science,
        "9780553109535",
        "Space, time and the quest for a unified theory.",
        4,
    ),
    (
        "The Diary of a Young Girl",
        "Anne Frank",
        Genre::Biography,
        "9780553296983",
        "The wartime diary kept in the secret annex.",
        3,
    ),
    (
        "Sapiens",
        "Yuval Noah Harari",
        Genre::History,
        "9780062316097",
        "A brief history of humankind.",
        6,
    ),
    (
        "The Hobbit",
        "J.R.R. Tolkien",
        Genre::Fantasy,
        "9780547928227",
        "There and back again.",
        7,
    ),
];
