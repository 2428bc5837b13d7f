#![deny(missing_docs)]

//! # Result Rendering
//!
//! Formats validation results for the terminal, either one line per response
//! or as a JSON array.

use orv_core::ValidationResult;
use serde::Serialize;

use crate::error::CliResult;

/// Renders results as text lines or pretty JSON.
pub fn render<R: Serialize>(results: &[ValidationResult<R>], json: bool) -> CliResult<String> {
    if json {
        return Ok(serde_json::to_string_pretty(results)?);
    }

    let lines: Vec<String> = results.iter().map(render_line).collect();
    Ok(lines.join("\n"))
}

fn render_line<R>(result: &ValidationResult<R>) -> String {
    let head = format!(
        "{} {} {}",
        result.method.to_uppercase(),
        result.path,
        result.status
    );
    match &result.validation_error {
        None => format!("PASS {}", head),
        Some(error) => {
            let operation = error
                .operation_id
                .as_deref()
                .map(|id| format!(" [{}]", id))
                .unwrap_or_default();
            format!("FAIL {}{}: {} {}", head, operation, error.code, error.message)
        }
    }
}

/// True when every result passed.
pub fn all_valid<R>(results: &[ValidationResult<R>]) -> bool {
    results.iter().all(ValidationResult::is_valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orv_core::{RecordedResponse, ValidationError, ValidationErrorCode};

    fn result(error: Option<ValidationError>) -> ValidationResult<RecordedResponse> {
        ValidationResult {
            response: RecordedResponse::new("http://x/users", 200, None),
            validation_error: error,
            status: 200,
            method: "get".into(),
            path: "/users".into(),
        }
    }

    #[test]
    fn test_text_lines() {
        let failing = ValidationError::with_message(ValidationErrorCode::InvalidBody, "response bad")
            .for_operation(Some("listUsers"));
        let results = vec![result(None), result(Some(failing))];
        let text = render(&results, false).unwrap();
        assert_eq!(
            text,
            "PASS GET /users 200\nFAIL GET /users 200 [listUsers]: INVALID_BODY response bad"
        );
        assert!(!all_valid(&results));
    }

    #[test]
    fn test_json_output() {
        let results = vec![result(Some(ValidationError::new(
            ValidationErrorCode::PathNotFound,
        )))];
        let text = render(&results, true).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["validationError"]["code"], "PATH_NOT_FOUND");
        assert_eq!(parsed[0]["path"], "/users");
    }

    #[test]
    fn test_empty_is_valid() {
        let results: Vec<ValidationResult<RecordedResponse>> = Vec::new();
        assert!(all_valid(&results));
        assert_eq!(render(&results, false).unwrap(), "");
    }
}
