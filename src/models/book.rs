//! Book (catalog entry) model and related types.
//!
//! `available` is a derived field: it always equals `copies > 0` and is
//! recomputed by every write path that can change `copies`. Clients never
//! set it directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Book genre classification (closed set, stored as the `genre` Postgres enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "genre")]
pub enum Genre {
    #[sqlx(rename = "FICTION")]
    Fiction,
    #[sqlx(rename = "NON_FICTION")]
    NonFiction,
    #[sqlx(rename = "SCIENCE")]
    Science,
    #[sqlx(rename = "HISTORY")]
    History,
    #[sqlx(rename = "BIOGRAPHY")]
    Biography,
    #[sqlx(rename = "FANTASY")]
    Fantasy,
}

impl Genre {
    /// Return the wire/storage code for this genre
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Fiction => "FICTION",
            Genre::NonFiction => "NON_FICTION",
            Genre::Science => "SCIENCE",
            Genre::History => "HISTORY",
            Genre::Biography => "BIOGRAPHY",
            Genre::Fantasy => "FANTASY",
        }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived availability: a book is available iff it has at least one copy.
/// Every write path that touches `copies` goes through this.
pub fn derived_available(copies: i32) -> bool {
    copies > 0
}

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub isbn: String,
    pub description: Option<String>,
    pub copies: i32,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create book request.
/// `available` is not part of the payload: it is derived from `copies`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: String,
    pub genre: Genre,
    #[validate(length(min = 1, message = "ISBN cannot be empty"))]
    pub isbn: String,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Copies can't be negative"))]
    pub copies: i32,
}

/// Partial update request; any subset of the create fields.
/// A patch with `copies` also gets a recomputed `available`.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: Option<String>,
    pub genre: Option<Genre>,
    #[validate(length(min = 1, message = "ISBN cannot be empty"))]
    pub isbn: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Copies can't be negative"))]
    pub copies: Option<i32>,
}

impl UpdateBook {
    /// True when no field of the patch is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.genre.is_none()
            && self.isbn.is_none()
            && self.description.is_none()
            && self.copies.is_none()
    }
}

/// Sortable columns for the book listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    Author,
    Genre,
    Isbn,
    Copies,
    Available,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Author => "author",
            SortField::Genre => "genre",
            SortField::Isbn => "isbn",
            SortField::Copies => "copies",
            SortField::Available => "available",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction for the book listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Book listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListBooksQuery {
    /// Filter by genre
    pub genre: Option<Genre>,
    /// Sort column (default: created_at)
    pub sort_by: Option<SortField>,
    /// Sort direction (default: asc)
    pub sort: Option<SortDirection>,
    /// Page size (default: 10, min: 1)
    pub limit: Option<i64>,
    /// Page number, 1-based (default: 1, min: 1)
    pub page: Option<i64>,
}

impl ListBooksQuery {
    /// Effective ORDER BY clause, whitelisted through the enums
    pub fn order_by(&self) -> String {
        let field = self.sort_by.unwrap_or(SortField::CreatedAt);
        let direction = self.sort.unwrap_or(SortDirection::Asc);
        format!("{} {}", field.column(), direction.as_sql())
    }

    /// Effective (limit, offset), both clamped to sane minimums
    pub fn paging(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(10).max(1);
        let page = self.page.unwrap_or(1).max(1);
        (limit, (page - 1) * limit)
    }
}
