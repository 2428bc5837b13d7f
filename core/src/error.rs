//! # Error Handling
//!
//! Provides the `AppError` enum for faults that escape the validation pipeline.
//!
//! Pipeline outcomes (server/path/method/status/body mismatches) are *values*
//! of type [`crate::ValidationError`] and never travel through `AppError`.

use derive_more::{Display, From};

/// The crate-level fault type.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors (reading documents from disk).
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The OpenAPI document could not be parsed or failed the structural check.
    #[from(ignore)]
    #[display("Invalid OpenAPI document: {_0}")]
    InvalidDocument(String),

    /// A response URL could not be turned into a pathname.
    #[from(ignore)]
    #[display("Invalid response URL: {_0}")]
    InvalidUrl(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
