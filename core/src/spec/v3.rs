#![deny(missing_docs)]

//! # OpenAPI 3.x
//!
//! Shared responses live under `components.responses`; nested schema references
//! point into `components`.

use crate::error::{AppError, AppResult};
use crate::oas::document::{OpenApiDocument, SpecVersion};
use crate::oas::ref_utils::COMPONENT_RESPONSES_PREFIX;
use crate::spec::OpenApiSpec;
use jsonschema::Draft;

/// An OpenAPI 3.0 or 3.1 document.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenApi3Spec {
    document: OpenApiDocument,
}

impl OpenApi3Spec {
    /// Wraps a loaded 3.x document.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidDocument` for a Swagger 2.0 document.
    pub fn new(document: OpenApiDocument) -> AppResult<Self> {
        match document.version() {
            SpecVersion::OpenApi30 | SpecVersion::OpenApi31 => Ok(Self { document }),
            SpecVersion::Swagger2 => Err(AppError::InvalidDocument(
                "expected an OpenAPI 3.x document, found Swagger 2.0".into(),
            )),
        }
    }
}

impl OpenApiSpec for OpenApi3Spec {
    fn document(&self) -> &OpenApiDocument {
        &self.document
    }

    fn response_reference_prefix(&self) -> &'static str {
        COMPONENT_RESPONSES_PREFIX
    }

    fn draft(&self) -> Draft {
        // 3.0 schemas are a Draft 4 dialect; 3.1 aligned with 2020-12.
        match self.document.version() {
            SpecVersion::OpenApi31 => Draft::Draft202012,
            _ => Draft::Draft4,
        }
    }
}
