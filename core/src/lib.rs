#![deny(missing_docs)]

//! # ORV Core
//!
//! Runtime validation of HTTP responses against an OpenAPI 2.0 / 3.x document.
//!
//! A response is resolved to the schema it must satisfy in four stages (server
//! base path, path template, operation and status, body) and the first failing
//! stage is reported as a [`ValidationError`].

/// Shared error types.
pub mod error;

/// Validation failure taxonomy.
pub mod validation_error;

/// OpenAPI document model and loading.
pub mod oas;

/// Server, path and response resolution stages.
pub mod resolver;

/// Dialect-specific document variants.
pub mod spec;

/// JSON Schema body checks.
pub mod body;

/// The validation pipeline.
pub mod engine;

/// Validator factory and caller hooks.
pub mod response_validator;

pub use body::{BodySchemaValidator, BodyViolation};
pub use engine::{pathname_of, validate_object, validate_pathname, validate_response, ResponseMeta};
pub use error::{AppError, AppResult};
pub use oas::{OpenApiDocument, SpecVersion};
pub use resolver::{cartesian_product, PathTemplate, ResolvedResponse};
pub use response_validator::{
    create_response_validator, ObservedResponse, RecordedResponse, ResponseValidator,
    ValidationResult, ValidatorHooks,
};
pub use spec::{make_api_spec, ApiSpec, OpenApi2Spec, OpenApi3Spec, OpenApiSpec};
pub use validation_error::{ValidationError, ValidationErrorCode};
