#![deny(missing_docs)]

//! # Object Command
//!
//! Validates a standalone value against a schema. The schema is either a file
//! or a pointer into the document (`#/components/schemas/User`).

use std::fs;
use std::path::{Path, PathBuf};

use orv_core::{validate_object, ValidationError};
use serde_json::{json, Value};

use crate::error::{CliError, CliResult};
use crate::options::load_spec;

/// Arguments for the object command.
#[derive(clap::Args, Debug, Clone)]
pub struct ObjectArgs {
    /// Path to the OpenAPI document (YAML or JSON).
    #[clap(long, env = "ORV_OPENAPI")]
    pub openapi: PathBuf,

    /// Schema file (YAML or JSON), or a `#/...` pointer into the document.
    #[clap(long)]
    pub schema: String,

    /// File holding the value to validate (YAML or JSON).
    pub value: PathBuf,

    /// Print the outcome as JSON.
    #[clap(long)]
    pub json: bool,
}

/// Turns the `--schema` argument into a schema value.
pub fn resolve_schema_arg(schema: &str) -> CliResult<Value> {
    if schema.starts_with('#') {
        return Ok(json!({ "$ref": schema }));
    }
    read_yaml(Path::new(schema))
}

fn read_yaml(path: &Path) -> CliResult<Value> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::General(format!("Failed to read {:?}: {}", path, e)))?;
    Ok(serde_yaml::from_str(&text)?)
}

fn render(error: Option<&ValidationError>, json: bool) -> CliResult<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&error)?);
    }
    Ok(match error {
        None => "PASS".to_string(),
        Some(error) => format!("FAIL: {} {}", error.code, error.message),
    })
}

/// Executes the object command.
///
/// Returns `true` when the value satisfies the schema.
pub fn execute(args: &ObjectArgs) -> CliResult<bool> {
    let spec = load_spec(&args.openapi)?;
    let schema = resolve_schema_arg(&args.schema)?;
    let value = read_yaml(&args.value)?;

    let error = validate_object(&spec, &value, &schema);
    println!("{}", render(error.as_ref(), args.json)?);

    Ok(error.is_none())
}
