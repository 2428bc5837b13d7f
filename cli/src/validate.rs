#![deny(missing_docs)]

//! # Validate Command
//!
//! Validates recorded responses read from a JSON file. The file holds either a
//! single record or an array of records:
//!
//! ```json
//! [{"method": "GET", "url": "https://api.example.com/v1/users/1", "status": 200, "body": {"id": 1}}]
//! ```

use std::fs;
use std::path::PathBuf;

use orv_core::{RecordedResponse, ValidationResult};
use serde::Deserialize;
use tracing::debug;

use crate::error::{CliError, CliResult};
use crate::options::ValidatorOptions;
use crate::report::{all_valid, render};

/// Arguments for the validate command.
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    #[clap(flatten)]
    pub options: ValidatorOptions,

    /// JSON file with one recorded response or an array of them.
    pub responses: PathBuf,

    /// Print results as JSON instead of text lines.
    #[clap(long)]
    pub json: bool,
}

/// A recorded response plus the method of the request that produced it.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseRecord {
    /// HTTP method; `GET` when omitted.
    #[serde(default = "default_method")]
    pub method: String,
    /// The response itself.
    #[serde(flatten)]
    pub response: RecordedResponse,
}

fn default_method() -> String {
    "GET".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    Many(Vec<ResponseRecord>),
    One(ResponseRecord),
}

/// Reads response records from JSON text.
pub fn parse_records(text: &str) -> CliResult<Vec<ResponseRecord>> {
    let file: RecordFile = serde_json::from_str(text)?;
    Ok(match file {
        RecordFile::Many(records) => records,
        RecordFile::One(record) => vec![record],
    })
}

/// Executes the validate command.
///
/// Returns `true` when every response conforms to the document.
pub fn execute(args: &ValidateArgs) -> CliResult<bool> {
    let validator = args.options.build::<RecordedResponse>()?;

    let text = fs::read_to_string(&args.responses).map_err(|e| {
        CliError::General(format!(
            "Failed to read responses file {:?}: {}",
            args.responses, e
        ))
    })?;
    let records = parse_records(&text)?;
    debug!(count = records.len(), "validating recorded responses");

    let results = records
        .into_iter()
        .map(|record| validator.validate(record.response, &record.method))
        .collect::<Result<Vec<ValidationResult<RecordedResponse>>, _>>()?;

    println!("{}", render(&results, args.json)?);

    Ok(all_valid(&results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DOC: &str = r#"
openapi: 3.0.0
info: {title: Users, version: "1"}
servers:
  - url: https://api.example.com/v1
paths:
  /users/{id}:
    get:
      operationId: getUser
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: object
                required: [id]
                properties:
                  id: {type: integer}
"#;

    fn args(dir: &std::path::Path, responses: &str) -> ValidateArgs {
        let openapi = dir.join("openapi.yaml");
        fs::write(&openapi, DOC).unwrap();
        let file = dir.join("responses.json");
        fs::write(&file, responses).unwrap();
        ValidateArgs {
            options: ValidatorOptions {
                openapi,
                strip_prefix: None,
                skip: None,
            },
            responses: file,
            json: false,
        }
    }

    #[test]
    fn test_parse_single_and_many() {
        let one = parse_records(r#"{"url": "/a", "status": 200}"#).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].method, "GET");
        assert!(one[0].response.body.is_none());

        let many = parse_records(
            r#"[{"method": "post", "url": "/a", "status": 201, "body": {"x": 1}}, {"url": "/b", "status": 204}]"#,
        )
        .unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[0].method, "post");
        assert_eq!(many[0].response.status, 201);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_records("[1, 2]").is_err());
    }

    #[test]
    fn test_all_valid() {
        let dir = tempdir().unwrap();
        let args = args(
            dir.path(),
            r#"{"url": "https://api.example.com/v1/users/1", "status": 200, "body": {"id": 1}}"#,
        );
        assert!(execute(&args).unwrap());
    }

    #[test]
    fn test_failure_reported() {
        let dir = tempdir().unwrap();
        let args = args(
            dir.path(),
            r#"[
                {"url": "https://api.example.com/v1/users/1", "status": 200, "body": {"id": 1}},
                {"url": "https://api.example.com/v1/users/1", "status": 200, "body": {}}
            ]"#,
        );
        assert!(!execute(&args).unwrap());
    }

    #[test]
    fn test_missing_responses_file() {
        let dir = tempdir().unwrap();
        let mut args = args(dir.path(), "[]");
        args.responses = dir.path().join("missing.json");
        assert!(execute(&args).is_err());
    }
}
