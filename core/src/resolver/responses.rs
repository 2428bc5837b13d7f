#![deny(missing_docs)]

//! # Response Resolution
//!
//! Finds the declared response for a matched path template, method and status,
//! following `$ref`s into the document's shared responses.
//!
//! A reference that cannot be resolved is *not* an error here: the original
//! definition is kept and the body validator reports the mismatch instead.

use crate::oas::document::ResponseDefinition;
use crate::spec::OpenApiSpec;
use crate::validation_error::{ValidationError, ValidationErrorCode};
use tracing::{debug, warn};

/// The response a body must be checked against.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedResponse<'a> {
    /// Status key the response was found under.
    pub status: String,
    /// The (possibly substituted) response definition.
    pub definition: &'a ResponseDefinition,
    /// `operationId` of the owning operation.
    pub operation_id: Option<&'a str>,
}

/// Resolves the response declared for `template` + `method` + `status`.
///
/// # Errors
///
/// * `METHOD_NOT_FOUND` when the path item has no operation for the method
///   (or the template is unknown to the document).
/// * `STATUS_NOT_FOUND` when the operation declares no response for the status.
pub fn resolve_response<'a, S>(
    spec: &'a S,
    template: &str,
    method: &str,
    status: u16,
) -> Result<ResolvedResponse<'a>, ValidationError>
where
    S: OpenApiSpec + ?Sized,
{
    let operation = spec
        .document()
        .path_item(template)
        .and_then(|item| item.operation(method))
        .ok_or_else(|| {
            ValidationError::with_message(
                ValidationErrorCode::MethodNotFound,
                format!(
                    "Method {} not found for path '{}'",
                    method.to_uppercase(),
                    template
                ),
            )
        })?;

    let operation_id = operation.operation_id.as_deref();
    let status_key = status.to_string();

    let declared = operation.responses.get(&status_key).ok_or_else(|| {
        ValidationError::with_message(
            ValidationErrorCode::StatusNotFound,
            format!(
                "Status {} not declared for {} '{}'",
                status_key,
                method.to_uppercase(),
                template
            ),
        )
        .for_operation(operation_id)
    })?;

    let definition = match declared.reference() {
        Some(reference) if reference.starts_with(spec.response_reference_prefix()) => {
            match spec.find_response_definition(reference) {
                Some(found) => {
                    debug!(reference, "substituted shared response definition");
                    found
                }
                None => {
                    warn!(
                        reference,
                        template, "response reference could not be resolved; keeping it as declared"
                    );
                    declared
                }
            }
        }
        _ => declared,
    };

    Ok(ResolvedResponse {
        status: status_key,
        definition,
        operation_id,
    })
}
