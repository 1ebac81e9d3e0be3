// src/error.rs

use std::fmt;

/// Internal application error.
///
/// Deliberately not convertible into a response: every handler maps
/// failures into the generic wire-level error shape itself, so internal
/// detail can only ever reach the logs.
#[derive(Debug)]
pub enum AppError {
    /// Persistence failure in the record store.
    Store(String),

    /// Confirmation notification could not be dispatched.
    Notify(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Store(msg) => write!(f, "store error: {msg}"),
            AppError::Notify(msg) => write!(f, "notify error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `sqlx::Error` into `AppError::Store`.
/// Allows using `?` operator on store queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Store(err.to_string())
    }
}
