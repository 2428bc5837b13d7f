#![deny(missing_docs)]

//! # Body Schema Validation
//!
//! Adapter around the `jsonschema` crate. Schemas taken from a document may
//! reference other parts of it (`#/components/schemas/User`,
//! `#/definitions/Pet`), so every schema is compiled inside a root that carries
//! the document's definition sections:
//!
//! ```json
//! { "allOf": [<schema>], "components": { ... } }
//! ```
//!
//! Only document-local references are resolved. Remote references are refused
//! and surface as a compile failure of the schema.

use jsonschema::{Draft, Retrieve, Uri};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// One way in which a value fails its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyViolation {
    /// Label plus the JSON pointer of the offending value (e.g. `response/id`).
    pub path: String,
    /// Validator message.
    pub message: String,
}

impl BodyViolation {
    /// Renders the violation as `"{path} {message}"`.
    pub fn describe(&self) -> String {
        format!("{} {}", self.path, self.message)
    }
}

/// Refuses every reference that would leave the document.
struct LocalOnlyRetriever;

impl Retrieve for LocalOnlyRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("remote reference '{}' is not allowed", uri.as_str()).into())
    }
}

/// Validates values against schemas taken from one document.
#[derive(Debug, Clone, Copy)]
pub struct BodySchemaValidator<'a> {
    definitions: &'a Map<String, Value>,
    draft: Draft,
}

impl<'a> BodySchemaValidator<'a> {
    /// Creates a validator resolving references against `definitions`.
    pub fn new(definitions: &'a Map<String, Value>, draft: Draft) -> Self {
        Self { definitions, draft }
    }

    /// Validates `body` (absent bodies are checked as `null`) against `schema`.
    ///
    /// Returns every violation found; an empty list means the value is valid.
    /// A schema that cannot be compiled yields a single violation at `label`.
    pub fn validate(&self, schema: &Value, body: Option<&Value>, label: &str) -> Vec<BodyViolation> {
        let root = self.root_schema(schema);

        let validator = match jsonschema::options()
            .with_draft(self.draft)
            .with_retriever(LocalOnlyRetriever)
            .build(&root)
        {
            Ok(validator) => validator,
            Err(e) => {
                debug!(error = %e, "response schema failed to compile");
                return vec![BodyViolation {
                    path: label.to_string(),
                    message: format!("schema could not be compiled: {}", e),
                }];
            }
        };

        let instance = body.unwrap_or(&Value::Null);
        validator
            .iter_errors(instance)
            .map(|e| BodyViolation {
                path: format!("{}{}", label, e.instance_path),
                message: e.to_string(),
            })
            .collect()
    }

    fn root_schema(&self, schema: &Value) -> Value {
        let mut root = self.definitions.clone();
        root.insert("allOf".to_string(), Value::Array(vec![schema.clone()]));
        Value::Object(root)
    }
}
