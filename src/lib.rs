//! Libris Library Catalog & Lending Service
//!
//! A Rust REST server tracking a book catalog and its lending
//! transactions: book records with a derived availability flag, borrow
//! records with an inventory-guarded creation path, and an aggregate
//! summary of outstanding loans.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
