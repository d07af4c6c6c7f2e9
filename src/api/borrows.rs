//! Lending endpoints

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{Borrow, BorrowRequest, SummaryEntry},
};

use super::ApiResponse;

/// Borrow copies of a book
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Book borrowed", body = ApiResponse<Borrow>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Book unavailable or not enough copies")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Borrow>>)> {
    request.validate()?;

    // Due date check sits here at the validation boundary, not in the
    // lending service.
    if request.due_date <= Utc::now() {
        return Err(AppError::BadRequest(
            "Due date must be in the future".to_string(),
        ));
    }

    let borrow = state.services.lending.borrow_book(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Book borrowed successfully", borrow)),
    ))
}

/// Summary of total borrowed quantity per book
#[utoipa::path(
    get,
    path = "/borrows/summary",
    tag = "borrows",
    responses(
        (status = 200, description = "Borrowed books summary", body = ApiResponse<Vec<SummaryEntry>>)
    )
)]
pub async fn get_summary(
    State(state): State<crate::AppState>,
) -> AppResult<Json<ApiResponse<Vec<SummaryEntry>>>> {
    let summary = state.services.lending.summary().await?;

    Ok(Json(ApiResponse::ok(
        "Borrowed books summary retrieved successfully",
        summary,
    )))
}
