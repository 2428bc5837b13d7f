#![deny(missing_docs)]

//! # Validation Error Taxonomy
//!
//! The fixed vocabulary of failures produced by the resolution pipeline and
//! the body validator. A `ValidationError` is a plain value: it is returned,
//! logged, serialized, never thrown.

use derive_more::Display;
use serde::Serialize;

/// The kind of validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorCode {
    /// No server base path is a prefix of the request pathname.
    #[display("SERVER_NOT_FOUND")]
    ServerNotFound,
    /// No path template matches the pathname.
    #[display("PATH_NOT_FOUND")]
    PathNotFound,
    /// The matched path item has no operation for the method.
    #[display("METHOD_NOT_FOUND")]
    MethodNotFound,
    /// The operation declares no response for the status code.
    #[display("STATUS_NOT_FOUND")]
    StatusNotFound,
    /// The response body does not satisfy the declared schema.
    #[display("INVALID_BODY")]
    InvalidBody,
    /// A standalone value does not satisfy the given schema.
    #[display("INVALID_OBJECT")]
    InvalidObject,
}

impl ValidationErrorCode {
    /// Returns the wire name of the code (e.g. `PATH_NOT_FOUND`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorCode::ServerNotFound => "SERVER_NOT_FOUND",
            ValidationErrorCode::PathNotFound => "PATH_NOT_FOUND",
            ValidationErrorCode::MethodNotFound => "METHOD_NOT_FOUND",
            ValidationErrorCode::StatusNotFound => "STATUS_NOT_FOUND",
            ValidationErrorCode::InvalidBody => "INVALID_BODY",
            ValidationErrorCode::InvalidObject => "INVALID_OBJECT",
        }
    }
}

/// A single validation failure.
///
/// `Display` renders the message, which defaults to the code name.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize)]
#[display("{message}")]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Failure kind.
    pub code: ValidationErrorCode,
    /// Human readable description.
    pub message: String,
    /// `operationId` of the resolved operation, when one was resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
}

impl ValidationError {
    /// Creates an error whose message is the code name.
    pub fn new(code: ValidationErrorCode) -> Self {
        Self {
            code,
            message: code.as_str().to_string(),
            operation_id: None,
        }
    }

    /// Creates an error with an explicit message.
    pub fn with_message(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code,
            message: if message.is_empty() {
                code.as_str().to_string()
            } else {
                message
            },
            operation_id: None,
        }
    }

    /// Attaches the operation the failure is attributed to.
    pub fn for_operation(mut self, operation_id: Option<&str>) -> Self {
        self.operation_id = operation_id.map(str::to_string);
        self
    }

    /// True for failures where the document could not describe the response
    /// (document mismatch or caller misuse).
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self.code,
            ValidationErrorCode::ServerNotFound
                | ValidationErrorCode::PathNotFound
                | ValidationErrorCode::MethodNotFound
                | ValidationErrorCode::StatusNotFound
        )
    }

    /// True for failures where the payload violates the declared contract.
    pub fn is_body_failure(&self) -> bool {
        matches!(
            self.code,
            ValidationErrorCode::InvalidBody | ValidationErrorCode::InvalidObject
        )
    }
}

impl std::error::Error for ValidationError {}
