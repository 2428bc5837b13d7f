#![deny(missing_docs)]

//! # OpenAPI Document Model
//!
//! The read-only view of an OpenAPI 2.0 / 3.x document that the resolution
//! pipeline works on. Built once, never mutated, shared freely across threads.
//!
//! Only the parts the pipeline needs are typed (servers, paths, operations,
//! responses). Schemas stay as raw `serde_json::Value` for the body validator.

use crate::error::{AppError, AppResult};
use crate::oas::normalization::normalize_nullable_schemas;
use crate::oas::ref_utils::ref_of;
use crate::oas::validation::validate_openapi_root;
use crate::resolver::paths::PathTemplate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

/// Base path used when a server URL has no path, and the default server URL.
pub const DEFAULT_BASE_PATH: &str = "/";

/// Path Item keys that declare operations.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// The dialect of the loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    /// `swagger: "2.0"`.
    Swagger2,
    /// `openapi: 3.0.x`.
    OpenApi30,
    /// `openapi: 3.1.x` and later.
    OpenApi31,
}

/// Reads a version field; unquoted YAML versions (`swagger: 2.0`) arrive as numbers.
fn version_field(raw: &Value, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(v) => Some(v.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl SpecVersion {
    /// Detects the dialect from the root `openapi` / `swagger` fields.
    pub fn detect(raw: &Value) -> AppResult<Self> {
        let openapi = version_field(raw, "openapi");
        let swagger = version_field(raw, "swagger");

        match (openapi.as_deref(), swagger.as_deref()) {
            (Some(_), Some(_)) => Err(AppError::InvalidDocument(
                "document declares both 'openapi' and 'swagger'".into(),
            )),
            (None, Some(v)) if v.starts_with("2.") => Ok(SpecVersion::Swagger2),
            (Some(v), None) if v.starts_with("3.0") => Ok(SpecVersion::OpenApi30),
            (Some(v), None) if v.starts_with("3.") => Ok(SpecVersion::OpenApi31),
            (Some(v), None) | (None, Some(v)) => Err(AppError::InvalidDocument(format!(
                "unsupported OpenAPI version '{}'",
                v
            ))),
            (None, None) => Err(AppError::InvalidDocument(
                "missing 'openapi' or 'swagger' version field".into(),
            )),
        }
    }

    /// True for documents that use OpenAPI 3.0 / Swagger `nullable` flags.
    pub fn uses_nullable_flags(&self) -> bool {
        !matches!(self, SpecVersion::OpenApi31)
    }
}

/// An object representing a Server.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Server {
    /// URL template, may contain `{variable}` placeholders.
    pub url: String,
    /// Variables substituted into the URL template, in declaration order.
    #[serde(default)]
    pub variables: IndexMap<String, ServerVariable>,
    /// An optional string describing the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Server {
    /// Creates a server without variables.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            variables: IndexMap::new(),
            description: None,
        }
    }
}

/// An object representing a Server Variable.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerVariable {
    /// The default value to use for substitution.
    pub default: String,
    /// Allowed values, if restricted.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// An optional description for the server variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ServerVariable {
    /// Every value the variable may take: the default first, then the `enum`
    /// members without duplicates.
    pub fn possible_values(&self) -> Vec<&str> {
        let mut values = vec![self.default.as_str()];
        for candidate in self.enum_values.iter().flatten() {
            if !values.contains(&candidate.as_str()) {
                values.push(candidate.as_str());
            }
        }
        values
    }
}

/// A declared response, kept raw so `$ref`s can be resolved lazily.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDefinition {
    raw: Value,
}

impl ResponseDefinition {
    /// Wraps a raw Response Object (or Reference Object).
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// The raw JSON of the response.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The reference this response points at, if any.
    ///
    /// Checks the entry itself first (`{"$ref": ...}`) and then the legacy
    /// form where the `schema` is a reference (`{"schema": {"$ref": ...}}`).
    pub fn reference(&self) -> Option<&str> {
        ref_of(&self.raw).or_else(|| self.raw.get("schema").and_then(ref_of))
    }

    /// The schema the body must satisfy, if the response declares one.
    ///
    /// Swagger 2.0 responses carry `schema` directly; OpenAPI 3.x responses carry
    /// it per media type under `content`. A reference entry stands for itself, so an
    /// unresolved reference reaches the body validator and fails there.
    pub fn schema(&self) -> Option<&Value> {
        if ref_of(&self.raw).is_some() {
            return Some(&self.raw);
        }
        if let Some(schema) = self.raw.get("schema") {
            return Some(schema);
        }
        self.raw
            .get("content")
            .and_then(Value::as_object)
            .and_then(select_json_media_type)
            .and_then(|media| media.get("schema"))
    }
}

/// Selects the most appropriate response content for JSON-like payloads.
///
/// Preference order:
/// 1. `application/json`
/// 2. Any `+json` media type (e.g. `application/vnd.api+json`)
/// 3. `application/*`
/// 4. `*/*`
/// 5. First available entry
fn select_json_media_type(content: &Map<String, Value>) -> Option<&Value> {
    if let Some(media) = content.get("application/json") {
        return Some(media);
    }

    if let Some((_, media)) = content
        .iter()
        .find(|(k, _)| k.split(';').next().unwrap_or_default().ends_with("+json"))
    {
        return Some(media);
    }

    if let Some(media) = content.get("application/*") {
        return Some(media);
    }

    if let Some(media) = content.get("*/*") {
        return Some(media);
    }

    content.values().next()
}

/// An Operation Object reduced to what response validation needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Operation {
    /// Identifier used to attribute errors.
    pub operation_id: Option<String>,
    /// Declared responses keyed by status code string (`"200"`, `"default"`, ...).
    pub responses: IndexMap<String, ResponseDefinition>,
}

/// A Path Item Object: lower-cased HTTP method to operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathItem {
    operations: IndexMap<String, Operation>,
}

impl PathItem {
    /// Looks up the operation for a method, case-insensitively.
    pub fn operation(&self, method: &str) -> Option<&Operation> {
        self.operations.get(&method.to_lowercase())
    }

    /// Declared methods in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }
}

/// The immutable document the validator resolves against.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenApiDocument {
    version: SpecVersion,
    servers: Vec<Server>,
    paths: IndexMap<String, PathItem>,
    templates: Vec<PathTemplate>,
    responses: IndexMap<String, ResponseDefinition>,
    definitions: Map<String, Value>,
}

impl OpenApiDocument {
    /// Parses YAML or JSON text (YAML is a superset of JSON).
    pub fn from_text(text: &str) -> AppResult<Self> {
        Self::from_value(parse_document_text(text)?)
    }

    /// Builds the document from an already parsed JSON value.
    ///
    /// Runs nullable normalization and the structural check, then extracts the
    /// typed view. Empty or missing `servers` become a single `/` server.
    pub fn from_value(mut raw: Value) -> AppResult<Self> {
        let version = SpecVersion::detect(&raw)?;
        if version.uses_nullable_flags() {
            normalize_nullable_schemas(&mut raw);
        }
        validate_openapi_root(&raw, version)?;

        let servers = match version {
            SpecVersion::Swagger2 => vec![Server::new(
                raw.get("basePath")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_BASE_PATH),
            )],
            SpecVersion::OpenApi30 | SpecVersion::OpenApi31 => parse_servers(&raw)?,
        };

        let mut paths = IndexMap::new();
        let mut templates = Vec::new();
        if let Some(items) = raw.get("paths").and_then(Value::as_object) {
            for (template, item) in items {
                if template.starts_with("x-") {
                    continue;
                }
                templates.push(PathTemplate::parse(template)?);
                paths.insert(template.clone(), parse_path_item(item));
            }
        }

        let shared_responses = match version {
            SpecVersion::Swagger2 => raw.get("responses"),
            _ => raw.get("components").and_then(|c| c.get("responses")),
        };
        let responses = shared_responses
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .map(|(name, value)| (name.clone(), ResponseDefinition::new(value.clone())))
                    .collect()
            })
            .unwrap_or_default();

        let sections: &[&str] = match version {
            SpecVersion::Swagger2 => &["definitions", "responses", "parameters"],
            _ => &["components"],
        };
        let definitions = sections
            .iter()
            .filter_map(|key| raw.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect();

        info!(
            ?version,
            servers = servers.len(),
            paths = paths.len(),
            "loaded OpenAPI document"
        );

        Ok(Self {
            version,
            servers,
            paths,
            templates,
            responses,
            definitions,
        })
    }

    /// The document dialect.
    pub fn version(&self) -> SpecVersion {
        self.version
    }

    /// Declared servers; never empty.
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Path items keyed by template, in declaration order.
    pub fn paths(&self) -> &IndexMap<String, PathItem> {
        &self.paths
    }

    /// Looks up the Path Item for a template.
    pub fn path_item(&self, template: &str) -> Option<&PathItem> {
        self.paths.get(template)
    }

    /// Compiled path templates, in declaration order.
    pub fn templates(&self) -> &[PathTemplate] {
        &self.templates
    }

    /// Shared response definitions (`components.responses` or Swagger `responses`).
    pub fn shared_responses(&self) -> &IndexMap<String, ResponseDefinition> {
        &self.responses
    }

    /// Root-level sections that nested schema `$ref`s may point into.
    pub fn definitions(&self) -> &Map<String, Value> {
        &self.definitions
    }
}

/// Parses document text as YAML (which also accepts JSON).
pub fn parse_document_text(text: &str) -> AppResult<Value> {
    serde_yaml::from_str(text)
        .map_err(|e| AppError::InvalidDocument(format!("Failed to parse OpenAPI text: {}", e)))
}

fn parse_servers(raw: &Value) -> AppResult<Vec<Server>> {
    let servers: Vec<Server> = match raw.get("servers") {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| AppError::InvalidDocument(format!("Invalid 'servers': {}", e)))?,
    };

    if servers.is_empty() {
        Ok(vec![Server::new(DEFAULT_BASE_PATH)])
    } else {
        Ok(servers)
    }
}

fn parse_path_item(item: &Value) -> PathItem {
    let mut operations = IndexMap::new();
    let Some(map) = item.as_object() else {
        return PathItem { operations };
    };

    for (key, value) in map {
        let method = key.to_lowercase();
        if !HTTP_METHODS.contains(&method.as_str()) {
            continue;
        }
        operations.insert(method, parse_operation(value));
    }

    PathItem { operations }
}

fn parse_operation(value: &Value) -> Operation {
    let operation_id = value
        .get("operationId")
        .and_then(Value::as_str)
        .map(str::to_string);

    let responses = value
        .get("responses")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter(|(status, _)| !status.starts_with("x-"))
                .map(|(status, r)| (status.clone(), ResponseDefinition::new(r.clone())))
                .collect()
        })
        .unwrap_or_default();

    Operation {
        operation_id,
        responses,
    }
}
