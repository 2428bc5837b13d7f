#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use orv_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Failure raised by the validation library (document or URL problems).
    #[display("{}", _0)]
    App(AppError),

    /// Input file is not valid JSON.
    #[display("JSON Error: {}", _0)]
    Json(serde_json::Error),

    /// Input file is not valid YAML.
    #[display("YAML Error: {}", _0)]
    Yaml(serde_yaml::Error),

    /// The `--skip` pattern does not compile.
    #[display("Invalid skip pattern: {}", _0)]
    Pattern(regex::Error),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
