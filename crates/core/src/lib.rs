//! Core business logic for murmur.
//!
//! Post and comment services plus the rating and like engine that keeps the
//! denormalized aggregates on posts and comments in step with their event
//! rows.

pub mod services;
pub mod validation;

pub use services::*;

use murmur_common::AppError;

/// Map a sea-orm error into the application error type.
pub(crate) fn db_err(e: sea_orm::DbErr) -> AppError {
    AppError::Database(e.to_string())
}
