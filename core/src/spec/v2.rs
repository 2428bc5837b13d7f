#![deny(missing_docs)]

//! # Swagger 2.0
//!
//! Shared responses live under the root `responses` object and schemas under
//! `definitions`. The single server is derived from `basePath`.

use crate::error::{AppError, AppResult};
use crate::oas::document::{OpenApiDocument, SpecVersion};
use crate::oas::ref_utils::SWAGGER_RESPONSES_PREFIX;
use crate::spec::OpenApiSpec;
use jsonschema::Draft;

/// A Swagger 2.0 document.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenApi2Spec {
    document: OpenApiDocument,
}

impl OpenApi2Spec {
    /// Wraps a loaded Swagger 2.0 document.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidDocument` for an OpenAPI 3.x document.
    pub fn new(document: OpenApiDocument) -> AppResult<Self> {
        if document.version() != SpecVersion::Swagger2 {
            return Err(AppError::InvalidDocument(
                "expected a Swagger 2.0 document".into(),
            ));
        }
        Ok(Self { document })
    }
}

impl OpenApiSpec for OpenApi2Spec {
    fn document(&self) -> &OpenApiDocument {
        &self.document
    }

    fn response_reference_prefix(&self) -> &'static str {
        SWAGGER_RESPONSES_PREFIX
    }

    fn draft(&self) -> Draft {
        Draft::Draft4
    }
}
