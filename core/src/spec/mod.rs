#![deny(missing_docs)]

//! # Document Variants
//!
//! Defines the `OpenApiSpec` trait and its implementations (`OpenApi3Spec`,
//! `OpenApi2Spec`) so the pipeline can resolve responses without caring which
//! dialect the document was written in.
//!
//! `ApiSpec` is the tagged variant chosen from the document version by
//! [`make_api_spec`]; it is what callers normally hold.

pub mod v2;
pub mod v3;

pub use v2::OpenApi2Spec;
pub use v3::OpenApi3Spec;

use crate::error::{AppError, AppResult};
use crate::oas::document::{OpenApiDocument, ResponseDefinition, SpecVersion};
use crate::oas::ref_utils::component_name;
use crate::resolver::{match_path_template, resolve_base_paths, strip_base_path};
use crate::validation_error::ValidationError;
use jsonschema::Draft;
use serde_json::{Map, Value};
use std::path::Path;

/// Dialect-specific capabilities of a loaded document.
///
/// Implementors only describe where things live in their dialect; the path
/// lookup is shared through the default method.
pub trait OpenApiSpec: Send + Sync {
    /// The loaded document.
    fn document(&self) -> &OpenApiDocument;

    /// JSON pointer prefix under which shared responses are referenced.
    fn response_reference_prefix(&self) -> &'static str;

    /// JSON-Schema draft response bodies are checked with.
    fn draft(&self) -> Draft;

    /// Root-level sections nested schema references may point into.
    fn component_definitions(&self) -> &Map<String, Value> {
        self.document().definitions()
    }

    /// Looks up a shared response by reference (e.g. `#/components/responses/NotFound`).
    ///
    /// Returns `None` for references outside this dialect's response prefix or
    /// naming a response that is not declared.
    fn find_response_definition(&self, reference: &str) -> Option<&ResponseDefinition> {
        let name = component_name(reference, self.response_reference_prefix())?;
        self.document().shared_responses().get(&name)
    }

    /// Finds the path template a request pathname belongs to.
    ///
    /// Server base paths are resolved first, each matching base path is stripped
    /// to form a candidate, and the candidates are matched against the templates.
    fn find_open_api_path_matching_pathname(
        &self,
        pathname: &str,
    ) -> Result<&str, ValidationError> {
        let document = self.document();
        let candidates: Vec<String> = resolve_base_paths(document.servers(), pathname)?
            .iter()
            .map(|base| strip_base_path(base, pathname))
            .collect();
        match_path_template(&candidates, document.templates())
    }
}

/// A loaded document of either dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiSpec {
    /// OpenAPI 3.0 / 3.1.
    V3(OpenApi3Spec),
    /// Swagger 2.0.
    V2(OpenApi2Spec),
}

impl ApiSpec {
    /// Loads a document from YAML text.
    pub fn from_yaml(text: &str) -> AppResult<Self> {
        Self::from_document(OpenApiDocument::from_text(text)?)
    }

    /// Loads a document from JSON text.
    pub fn from_json(text: &str) -> AppResult<Self> {
        let raw: Value = serde_json::from_str(text)
            .map_err(|e| AppError::InvalidDocument(format!("Failed to parse OpenAPI JSON: {}", e)))?;
        make_api_spec(raw)
    }

    /// Loads a document from an already parsed value.
    pub fn from_value(raw: Value) -> AppResult<Self> {
        make_api_spec(raw)
    }

    /// Reads and loads a document file (YAML or JSON).
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&text)
    }

    fn from_document(document: OpenApiDocument) -> AppResult<Self> {
        Ok(match document.version() {
            SpecVersion::Swagger2 => ApiSpec::V2(OpenApi2Spec::new(document)?),
            SpecVersion::OpenApi30 | SpecVersion::OpenApi31 => {
                ApiSpec::V3(OpenApi3Spec::new(document)?)
            }
        })
    }

    fn inner(&self) -> &dyn OpenApiSpec {
        match self {
            ApiSpec::V3(spec) => spec,
            ApiSpec::V2(spec) => spec,
        }
    }
}

impl OpenApiSpec for ApiSpec {
    fn document(&self) -> &OpenApiDocument {
        self.inner().document()
    }

    fn response_reference_prefix(&self) -> &'static str {
        self.inner().response_reference_prefix()
    }

    fn draft(&self) -> Draft {
        self.inner().draft()
    }
}

/// Builds the variant matching the document's declared version.
///
/// # Errors
///
/// Returns `AppError::InvalidDocument` when the version is unsupported or the
/// document fails the structural check.
pub fn make_api_spec(raw: Value) -> AppResult<ApiSpec> {
    ApiSpec::from_document(OpenApiDocument::from_value(raw)?)
}
