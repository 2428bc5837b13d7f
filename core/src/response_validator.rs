#![deny(missing_docs)]

//! # Response Validator
//!
//! The caller-facing entry point. A `ResponseValidator` is built once from an
//! OpenAPI document plus optional hooks, then validates any number of observed
//! responses, from any number of threads.
//!
//! ```rust
//! use orv_core::{create_response_validator, RecordedResponse};
//! use serde_json::json;
//!
//! let validator = create_response_validator::<RecordedResponse>(json!({
//!     "openapi": "3.0.0",
//!     "info": {"title": "Pets", "version": "1"},
//!     "paths": {
//!         "/pets": {"get": {"responses": {"200": {
//!             "description": "ok",
//!             "content": {"application/json": {"schema": {"type": "array"}}}
//!         }}}}
//!     }
//! }))
//! .unwrap();
//!
//! let response = RecordedResponse::new("https://api.example.com/pets", 200, Some(json!([])));
//! let result = validator.validate(response, "GET").unwrap();
//! assert!(result.validation_error.is_none());
//! ```

use crate::engine::{pathname_of, validate_object, validate_pathname};
use crate::error::AppResult;
use crate::spec::{make_api_spec, ApiSpec};
use crate::validation_error::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

/// What the validator needs to know about an observed response.
pub trait ObservedResponse {
    /// The URL the response was served for.
    fn url(&self) -> &str;

    /// The HTTP status code.
    fn status(&self) -> u16;

    /// The raw body, if one was captured.
    fn body(&self) -> Option<Cow<'_, [u8]>>;
}

/// A response captured elsewhere (a log, a fixture file, a proxy dump).
///
/// `body` holds inline JSON; a JSON string is treated as raw body text, so
/// `"{\"id\": 1}"` and `{"id": 1}` describe the same payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedResponse {
    /// Request URL.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Captured body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl RecordedResponse {
    /// Creates a recorded response.
    pub fn new(url: impl Into<String>, status: u16, body: Option<Value>) -> Self {
        Self {
            url: url.into(),
            status,
            body,
        }
    }
}

impl ObservedResponse for RecordedResponse {
    fn url(&self) -> &str {
        &self.url
    }

    fn status(&self) -> u16 {
        self.status
    }

    fn body(&self) -> Option<Cow<'_, [u8]>> {
        match self.body.as_ref()? {
            Value::String(text) => Some(Cow::Borrowed(text.as_bytes())),
            other => serde_json::to_vec(other).ok().map(Cow::Owned),
        }
    }
}

/// Outcome of validating one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult<R> {
    /// The response that was validated.
    pub response: R,
    /// `None` when the response conforms (or validation was skipped).
    pub validation_error: Option<ValidationError>,
    /// HTTP status of the response.
    pub status: u16,
    /// HTTP method as given by the caller.
    pub method: String,
    /// Pathname after `prepare_pathname`.
    pub path: String,
}

impl<R> ValidationResult<R> {
    /// True when no validation error was found.
    pub fn is_valid(&self) -> bool {
        self.validation_error.is_none()
    }
}

type PreparePathnameFn = Box<dyn Fn(&str) -> String + Send + Sync>;
type SkipValidationFn = Box<dyn Fn(&str) -> bool + Send + Sync>;
type OnValidateFn<R> = Box<dyn Fn(&ValidationResult<R>) + Send + Sync>;
type GetResponseDataFn<R> = Box<dyn Fn(&R) -> Option<Value> + Send + Sync>;

/// Caller customization points, fixed when the validator is built.
pub struct ValidatorHooks<R> {
    /// Rewrites the response pathname before anything else sees it
    /// (e.g. stripping a proxy prefix). Defaults to identity.
    pub prepare_pathname: PreparePathnameFn,
    /// Receives the prepared path; `true` skips validation. Defaults to `false`.
    pub skip_validation: SkipValidationFn,
    /// Called with every result before it is returned. Defaults to a no-op.
    pub on_validate: OnValidateFn<R>,
    /// Extracts the body to validate. Defaults to parsing the raw body as
    /// JSON; a missing or unparsable body counts as absent.
    pub get_response_data: GetResponseDataFn<R>,
}

impl<R: ObservedResponse> Default for ValidatorHooks<R> {
    fn default() -> Self {
        Self {
            prepare_pathname: Box::new(|pathname: &str| pathname.to_string()),
            skip_validation: Box::new(|_: &str| false),
            on_validate: Box::new(|_: &ValidationResult<R>| {}),
            get_response_data: Box::new(|response: &R| default_response_data(response)),
        }
    }
}

impl<R> fmt::Debug for ValidatorHooks<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorHooks").finish_non_exhaustive()
    }
}

fn default_response_data<R: ObservedResponse>(response: &R) -> Option<Value> {
    let raw = response.body()?;
    serde_json::from_slice(&raw).ok()
}

/// Validates observed responses against one OpenAPI document.
///
/// Immutable after construction; share it behind an `Arc` to validate from
/// several threads at once.
#[derive(Debug)]
pub struct ResponseValidator<R> {
    spec: ApiSpec,
    hooks: ValidatorHooks<R>,
}

impl<R: ObservedResponse> ResponseValidator<R> {
    /// Creates a validator with default hooks.
    pub fn new(spec: ApiSpec) -> Self {
        Self {
            spec,
            hooks: ValidatorHooks::default(),
        }
    }
}

impl<R> ResponseValidator<R> {
    /// Replaces all hooks at once.
    pub fn with_hooks(mut self, hooks: ValidatorHooks<R>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Installs the pathname rewrite hook.
    pub fn with_prepare_pathname<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.hooks.prepare_pathname = Box::new(f);
        self
    }

    /// Installs the skip predicate.
    pub fn with_skip_validation<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.hooks.skip_validation = Box::new(f);
        self
    }

    /// Installs the result callback.
    pub fn with_on_validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&ValidationResult<R>) + Send + Sync + 'static,
    {
        self.hooks.on_validate = Box::new(f);
        self
    }

    /// Installs the body extraction hook.
    pub fn with_get_response_data<F>(mut self, f: F) -> Self
    where
        F: Fn(&R) -> Option<Value> + Send + Sync + 'static,
    {
        self.hooks.get_response_data = Box::new(f);
        self
    }

    /// The loaded document.
    pub fn spec(&self) -> &ApiSpec {
        &self.spec
    }

    /// Validates a standalone value against a schema; see [`validate_object`].
    pub fn validate_object(&self, value: &Value, schema: &Value) -> Option<ValidationError> {
        validate_object(&self.spec, value, schema)
    }
}

impl<R: ObservedResponse> ResponseValidator<R> {
    /// Validates one response observed for a request made with `method`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` when the response URL cannot be parsed.
    /// Every validation outcome, including mismatches, is an `Ok` result.
    pub fn validate(&self, response: R, method: &str) -> AppResult<ValidationResult<R>> {
        let status = response.status();
        let path = (self.hooks.prepare_pathname)(&pathname_of(response.url())?);
        let body = (self.hooks.get_response_data)(&response);

        let validation_error = if (self.hooks.skip_validation)(&path) {
            debug!(path = %path, "validation skipped");
            None
        } else {
            validate_pathname(&self.spec, &path, method, status, body.as_ref())
        };

        let result = ValidationResult {
            response,
            validation_error,
            status,
            method: method.to_string(),
            path,
        };
        (self.hooks.on_validate)(&result);
        Ok(result)
    }
}

/// Builds a validator from a parsed OpenAPI document with default hooks.
///
/// # Errors
///
/// Returns `AppError::InvalidDocument` when the document is not a usable
/// OpenAPI 2.0 / 3.x document.
pub fn create_response_validator<R: ObservedResponse>(
    openapi: Value,
) -> AppResult<ResponseValidator<R>> {
    Ok(ResponseValidator::new(make_api_spec(openapi)?))
}
