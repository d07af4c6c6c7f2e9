//! Administrative endpoints: catalog seeding and bulk clear

use axum::{extract::State, http::StatusCode, Json};

use crate::{error::AppResult, models::book::Book};

use super::ApiResponse;

/// Seed the catalog with a fixed set of sample books
#[utoipa::path(
    post,
    path = "/admin/seed",
    tag = "admin",
    responses(
        (status = 201, description = "Catalog seeded", body = ApiResponse<Vec<Book>>),
        (status = 409, description = "Sample books already present")
    )
)]
pub async fn seed_books(
    State(state): State<crate::AppState>,
) -> AppResult<(StatusCode, Json<ApiResponse<Vec<Book>>>)> {
    let seeded = state.services.catalog.seed_books().await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Database seeded with default books", seeded)),
    ))
}

/// Remove every borrow and every book
#[utoipa::path(
    delete,
    path = "/admin/records",
    tag = "admin",
    responses(
        (status = 200, description = "All records removed", body = ApiResponse<Vec<Book>>)
    )
)]
pub async fn clear_records(
    State(state): State<crate::AppState>,
) -> AppResult<Json<ApiResponse<Vec<Book>>>> {
    state.services.catalog.clear_records().await?;

    Ok(Json(ApiResponse::message(
        "All books and borrows deleted successfully",
    )))
}
