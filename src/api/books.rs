//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Book, CreateBook, ListBooksQuery, UpdateBook},
};

use super::ApiResponse;

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = ApiResponse<Book>),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "ISBN already exists")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<ApiResponse<Book>>)> {
    request.validate()?;

    let book = state.services.catalog.create_book(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Book created successfully", book)),
    ))
}

/// List books with optional genre filter, sorting and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(ListBooksQuery),
    responses(
        (status = 200, description = "List of books", body = ApiResponse<Vec<Book>>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<ListBooksQuery>,
) -> AppResult<Json<ApiResponse<Vec<Book>>>> {
    let books = state.services.catalog.list_books(&query).await?;

    // An empty page is a successful result; the message names the filter
    // that produced no matches.
    let message = if books.is_empty() {
        match query.genre {
            Some(genre) => format!("No books found for genre '{}'", genre),
            None => "No books found".to_string(),
        }
    } else {
        "Books retrieved successfully".to_string()
    };

    Ok(Json(ApiResponse::ok(message, books)))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = ApiResponse<Book>),
        (status = 400, description = "Malformed book ID"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = state.services.catalog.get_book(&id).await?;
    Ok(Json(ApiResponse::ok("Book retrieved successfully", book)))
}

/// Update a book. A patch touching `copies` gets its availability flag
/// recomputed server-side; a client-supplied `available` is ignored.
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = ApiResponse<Book>),
        (status = 400, description = "Malformed book ID or empty patch"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "ISBN already exists")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBook>,
) -> AppResult<Json<ApiResponse<Book>>> {
    request.validate()?;

    let book = state.services.catalog.update_book(&id, request).await?;
    Ok(Json(ApiResponse::ok("Book updated successfully", book)))
}

/// Delete a book. Outstanding borrow records do not block the removal.
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = ApiResponse<Book>),
        (status = 400, description = "Malformed book ID"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Book>>> {
    state.services.catalog.delete_book(&id).await?;
    Ok(Json(ApiResponse::message("Book deleted successfully")))
}
