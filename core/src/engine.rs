#![deny(missing_docs)]

//! # Response Validation Engine
//!
//! Runs one response through the resolution stages and the body check:
//!
//! ```text
//! ResolvingServer -> ResolvingPath -> ResolvingOperation -> ValidatingBody -> Done
//! ```
//!
//! The first stage that fails determines the returned `ValidationError`; later
//! stages are not attempted. Every call is independent of every other call.

use crate::body::{BodySchemaValidator, BodyViolation};
use crate::error::{AppError, AppResult};
use crate::oas::document::ResponseDefinition;
use crate::resolver::resolve_response;
use crate::spec::OpenApiSpec;
use crate::validation_error::{ValidationError, ValidationErrorCode};
use derive_more::Display;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

/// Origin used to resolve relative response URLs; only the path is kept.
const PLACEHOLDER_ORIGIN: &str = "http://example.invalid/";

/// The request side of an observed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseMeta<'a> {
    /// Absolute or relative URL the response was served for.
    pub url: &'a str,
    /// HTTP method of the request, any case.
    pub method: &'a str,
    /// HTTP status of the response.
    pub status: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
enum Stage {
    ResolvingServer,
    ResolvingPath,
    ResolvingOperation,
    ValidatingBody,
    Done,
}

/// Extracts the pathname of a URL, without query or fragment.
///
/// # Errors
///
/// Returns `AppError::InvalidUrl` when the URL cannot be parsed even relative
/// to a placeholder origin.
pub fn pathname_of(url: &str) -> AppResult<String> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(PLACEHOLDER_ORIGIN)
            .and_then(|base| base.join(url))
            .map_err(|e| AppError::InvalidUrl(format!("'{}': {}", url, e)))?,
        Err(e) => return Err(AppError::InvalidUrl(format!("'{}': {}", url, e))),
    };
    Ok(parsed.path().to_string())
}

/// Validates a response given its URL, method, status and parsed body.
///
/// Returns `Ok(None)` when the response conforms to the document.
///
/// # Errors
///
/// Only URL parsing can fail; validation outcomes are returned as values.
pub fn validate_response<S>(
    spec: &S,
    meta: ResponseMeta<'_>,
    body: Option<&Value>,
) -> AppResult<Option<ValidationError>>
where
    S: OpenApiSpec + ?Sized,
{
    let pathname = pathname_of(meta.url)?;
    Ok(validate_pathname(
        spec,
        &pathname,
        meta.method,
        meta.status,
        body,
    ))
}

/// Validates a response whose pathname is already known (and prepared).
pub fn validate_pathname<S>(
    spec: &S,
    pathname: &str,
    method: &str,
    status: u16,
    body: Option<&Value>,
) -> Option<ValidationError>
where
    S: OpenApiSpec + ?Sized,
{
    match run_stages(spec, pathname, method, status, body) {
        Ok(()) => None,
        Err((stage, error)) => {
            debug!(%stage, code = %error.code, pathname, method, status, "response rejected");
            Some(error)
        }
    }
}

fn run_stages<S>(
    spec: &S,
    pathname: &str,
    method: &str,
    status: u16,
    body: Option<&Value>,
) -> Result<(), (Stage, ValidationError)>
where
    S: OpenApiSpec + ?Sized,
{
    enter(Stage::ResolvingServer, pathname);
    let template = spec
        .find_open_api_path_matching_pathname(pathname)
        .map_err(|e| (lookup_stage(&e), e))?;

    let stage = enter(Stage::ResolvingOperation, pathname);
    let resolved = resolve_response(spec, template, method, status).map_err(|e| (stage, e))?;

    let stage = enter(Stage::ValidatingBody, pathname);
    let violations = check_body(spec, resolved.definition, body, "response");
    if !violations.is_empty() {
        let error = ValidationError::with_message(
            ValidationErrorCode::InvalidBody,
            join_violations(&violations),
        )
        .for_operation(resolved.operation_id);
        return Err((stage, error));
    }

    enter(Stage::Done, pathname);
    Ok(())
}

/// Server and path resolution share one lookup; the error code tells them apart.
fn lookup_stage(error: &ValidationError) -> Stage {
    match error.code {
        ValidationErrorCode::ServerNotFound => Stage::ResolvingServer,
        _ => Stage::ResolvingPath,
    }
}

fn enter(stage: Stage, pathname: &str) -> Stage {
    debug!(%stage, pathname, "validation stage");
    stage
}

/// Validates a standalone value against a schema from (or compatible with) the document.
///
/// The schema is wrapped in a synthetic `200` response and checked like a body;
/// violation paths are labelled `object`. Failures carry no operation id.
pub fn validate_object<S>(spec: &S, value: &Value, schema: &Value) -> Option<ValidationError>
where
    S: OpenApiSpec + ?Sized,
{
    let definition = ResponseDefinition::new(json!({ "schema": schema }));

    let violations = check_body(spec, &definition, Some(value), "object");
    if violations.is_empty() {
        return None;
    }
    Some(ValidationError::with_message(
        ValidationErrorCode::InvalidObject,
        join_violations(&violations),
    ))
}

fn check_body<S>(
    spec: &S,
    definition: &ResponseDefinition,
    body: Option<&Value>,
    label: &str,
) -> Vec<BodyViolation>
where
    S: OpenApiSpec + ?Sized,
{
    match definition.schema() {
        Some(schema) => BodySchemaValidator::new(spec.component_definitions(), spec.draft())
            .validate(schema, body, label),
        None => Vec::new(),
    }
}

fn join_violations(violations: &[BodyViolation]) -> String {
    violations
        .iter()
        .map(BodyViolation::describe)
        .collect::<Vec<_>>()
        .join(", ")
}
