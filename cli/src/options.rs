#![deny(missing_docs)]

//! # Validator Options
//!
//! Flags shared by the commands that validate responses. Every flag can also be
//! supplied through the environment.

use std::path::{Path, PathBuf};

use orv_core::{ApiSpec, ObservedResponse, ResponseValidator};
use regex::Regex;
use tracing::info;

use crate::error::CliResult;

/// Document and hook configuration for a `ResponseValidator`.
#[derive(clap::Args, Debug, Clone)]
pub struct ValidatorOptions {
    /// Path to the OpenAPI document (YAML or JSON).
    #[clap(long, env = "ORV_OPENAPI")]
    pub openapi: PathBuf,

    /// Prefix removed from response pathnames before matching (e.g. a proxy mount).
    #[clap(long, env = "ORV_STRIP_PREFIX")]
    pub strip_prefix: Option<String>,

    /// Regex; responses whose prepared path matches are not validated.
    #[clap(long, env = "ORV_SKIP")]
    pub skip: Option<String>,
}

impl ValidatorOptions {
    /// Builds a validator with the configured hooks installed.
    pub fn build<R: ObservedResponse>(&self) -> CliResult<ResponseValidator<R>> {
        let mut validator = ResponseValidator::new(load_spec(&self.openapi)?);

        if let Some(prefix) = self.strip_prefix.clone() {
            validator = validator.with_prepare_pathname(move |path| strip_path_prefix(&prefix, path));
        }

        if let Some(pattern) = &self.skip {
            let re = Regex::new(pattern)?;
            validator = validator.with_skip_validation(move |path| re.is_match(path));
        }

        Ok(validator)
    }
}

/// Loads an OpenAPI document from disk.
pub fn load_spec(path: &Path) -> CliResult<ApiSpec> {
    let spec = ApiSpec::from_path(path)?;
    info!(path = %path.display(), "loaded OpenAPI document");
    Ok(spec)
}

/// Removes `prefix` from `path` when it ends on a segment boundary.
///
/// `/proxy/users` with prefix `/proxy` becomes `/users`; `/proxyusers` is left alone.
pub fn strip_path_prefix(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    match path.strip_prefix(prefix) {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orv_core::RecordedResponse;
    use std::fs;
    use tempfile::tempdir;

    const DOC: &str = r#"
openapi: 3.0.0
info: {title: T, version: "1"}
paths:
  /users:
    get:
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema: {type: array}
"#;

    #[test]
    fn test_strip_path_prefix() {
        assert_eq!(strip_path_prefix("/proxy", "/proxy/users"), "/users");
        assert_eq!(strip_path_prefix("/proxy/", "/proxy/users"), "/users");
        assert_eq!(strip_path_prefix("/proxy", "/proxy"), "/");
        assert_eq!(strip_path_prefix("/proxy", "/proxyusers"), "/proxyusers");
        assert_eq!(strip_path_prefix("/proxy", "/users"), "/users");
    }

    #[test]
    fn test_build_installs_hooks() {
        let dir = tempdir().unwrap();
        let openapi = dir.path().join("openapi.yaml");
        fs::write(&openapi, DOC).unwrap();

        let options = ValidatorOptions {
            openapi,
            strip_prefix: Some("/proxy".into()),
            skip: Some("^/health".into()),
        };
        let validator = options.build::<RecordedResponse>().unwrap();

        let result = validator
            .validate(
                RecordedResponse::new("http://gw/proxy/users", 200, Some(serde_json::json!([]))),
                "GET",
            )
            .unwrap();
        assert_eq!(result.path, "/users");
        assert!(result.is_valid());

        let skipped = validator
            .validate(RecordedResponse::new("http://gw/proxy/health", 200, None), "GET")
            .unwrap();
        assert!(skipped.is_valid());
    }

    #[test]
    fn test_bad_skip_pattern() {
        let dir = tempdir().unwrap();
        let openapi = dir.path().join("openapi.yaml");
        fs::write(&openapi, DOC).unwrap();

        let options = ValidatorOptions {
            openapi,
            strip_prefix: None,
            skip: Some("(".into()),
        };
        assert!(options.build::<RecordedResponse>().is_err());
    }

    #[test]
    fn test_missing_document() {
        assert!(load_spec(Path::new("/no/such/openapi.yaml")).is_err());
    }
}
