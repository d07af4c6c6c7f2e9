//! API handlers for Libris REST endpoints

pub mod admin;
pub mod books;
pub mod borrows;
pub mod health;
pub mod openapi;

use serde::Serialize;
use utoipa::ToSchema;

/// Success response envelope shared by all endpoints
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Always true on this envelope
    pub success: bool,
    /// Human-readable status message
    pub message: String,
    /// Operation result, null where the operation returns nothing
    pub data: Option<T>,
}

impl<T> ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Envelope with a payload
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Envelope with a message only (data is null)
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}
