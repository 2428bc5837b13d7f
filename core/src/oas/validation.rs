#![deny(missing_docs)]

//! # OpenAPI Structural Validation
//!
//! Checks performed once, before the typed document is built. A document that
//! passes may still be semantically odd, but every consumer can rely on:
//!
//! - a usable `info` object;
//! - path keys that start with `/` and have well-formed `{param}` placeholders;
//! - operations that declare a non-empty `responses` object;
//! - server URLs whose placeholders are declared variables with a `default`;
//! - server variable enums, when present, being non-empty.

use crate::error::{AppError, AppResult};
use crate::oas::document::{SpecVersion, HTTP_METHODS};
use regex::Regex;
use serde_json::Value;

/// Validates required root-level fields and the shape of paths, operations and servers.
pub(crate) fn validate_openapi_root(raw: &Value, version: SpecVersion) -> AppResult<()> {
    if !raw.is_object() {
        return Err(AppError::InvalidDocument(
            "OpenAPI document must be an object".into(),
        ));
    }

    validate_info(raw)?;
    validate_paths(raw, version)?;
    if version != SpecVersion::Swagger2 {
        validate_servers(raw)?;
    }
    validate_shared_responses(raw, version)?;

    Ok(())
}

fn validate_info(raw: &Value) -> AppResult<()> {
    let info = raw.get("info").and_then(Value::as_object).ok_or_else(|| {
        AppError::InvalidDocument("OpenAPI document missing required 'info' object".into())
    })?;

    let title_ok = info
        .get("title")
        .and_then(Value::as_str)
        .map(|t| !t.trim().is_empty())
        .unwrap_or(false);
    if !title_ok {
        return Err(AppError::InvalidDocument(
            "Info.title must be a non-empty string".into(),
        ));
    }

    // YAML authors frequently write `version: 1.0`, which parses as a number.
    let version_ok = match info.get("version") {
        Some(Value::String(v)) => !v.trim().is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    };
    if !version_ok {
        return Err(AppError::InvalidDocument(
            "Info.version must be a non-empty string".into(),
        ));
    }

    Ok(())
}

fn validate_paths(raw: &Value, version: SpecVersion) -> AppResult<()> {
    let paths = match raw.get("paths") {
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(AppError::InvalidDocument(
                "'paths' must be an object".into(),
            ))
        }
        // OAS 3.1 made `paths` optional.
        None if version == SpecVersion::OpenApi31 => return Ok(()),
        None => {
            return Err(AppError::InvalidDocument(
                "OpenAPI document missing required 'paths' object".into(),
            ))
        }
    };

    for (template, item) in paths {
        if template.starts_with("x-") {
            continue;
        }
        validate_path_template(template)?;

        let Some(item) = item.as_object() else {
            return Err(AppError::InvalidDocument(format!(
                "Path item '{}' must be an object",
                template
            )));
        };

        for (key, operation) in item {
            let method = key.to_lowercase();
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }
            validate_operation_responses(operation, &format!("paths.{}.{}", template, method))?;
        }
    }

    Ok(())
}

/// Validates a path key: leading `/`, balanced non-empty `{param}` placeholders.
pub(crate) fn validate_path_template(template: &str) -> AppResult<()> {
    if !template.starts_with('/') {
        return Err(AppError::InvalidDocument(format!(
            "Path '{}' must start with '/'",
            template
        )));
    }

    let mut open = false;
    let mut name_len = 0usize;
    for ch in template.chars() {
        match ch {
            '{' if open => break,
            '{' => {
                open = true;
                name_len = 0;
            }
            '}' if !open => {
                return Err(AppError::InvalidDocument(format!(
                    "Path '{}' has an unmatched '}}'",
                    template
                )))
            }
            '}' => {
                if name_len == 0 {
                    return Err(AppError::InvalidDocument(format!(
                        "Path '{}' has an empty parameter name",
                        template
                    )));
                }
                open = false;
            }
            '/' if open => break,
            _ if open => name_len += 1,
            _ => {}
        }
    }

    if open {
        return Err(AppError::InvalidDocument(format!(
            "Path '{}' has an unterminated '{{' placeholder",
            template
        )));
    }

    Ok(())
}

fn validate_operation_responses(operation: &Value, context: &str) -> AppResult<()> {
    let responses = operation
        .get("responses")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            AppError::InvalidDocument(format!("{} must declare a 'responses' object", context))
        })?;

    let declared = responses.keys().filter(|k| !k.starts_with("x-")).count();
    if declared == 0 {
        return Err(AppError::InvalidDocument(format!(
            "{}.responses must define at least one response",
            context
        )));
    }

    Ok(())
}

/// Validates Server Objects: URL present, placeholders declared, defaults present.
fn validate_servers(raw: &Value) -> AppResult<()> {
    let servers = match raw.get("servers") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Array(servers)) => servers,
        Some(_) => {
            return Err(AppError::InvalidDocument(
                "'servers' must be an array".into(),
            ))
        }
    };

    for (idx, server) in servers.iter().enumerate() {
        validate_server(server, &format!("servers[{}]", idx))?;
    }

    Ok(())
}

fn validate_server(server: &Value, context: &str) -> AppResult<()> {
    let url = server.get("url").and_then(Value::as_str).ok_or_else(|| {
        AppError::InvalidDocument(format!("{} must declare a string 'url'", context))
    })?;

    let variables = server.get("variables").and_then(Value::as_object);

    let placeholder_re = Regex::new(r"\{([^}]+)}").expect("Invalid regex constant");
    for cap in placeholder_re.captures_iter(url) {
        let name = &cap[1];
        if !variables.map(|vars| vars.contains_key(name)).unwrap_or(false) {
            return Err(AppError::InvalidDocument(format!(
                "Server URL '{}' in {} references undefined variable '{}'",
                url, context, name
            )));
        }
    }

    let Some(variables) = variables else {
        return Ok(());
    };

    for (name, var) in variables {
        if !var.get("default").map(Value::is_string).unwrap_or(false) {
            return Err(AppError::InvalidDocument(format!(
                "Server variable '{}' in {} must declare a string 'default'",
                name, context
            )));
        }

        match var.get("enum") {
            None => {}
            Some(Value::Array(values)) => {
                if values.is_empty() {
                    return Err(AppError::InvalidDocument(format!(
                        "Server variable '{}' in {} has an empty enum",
                        name, context
                    )));
                }
                if !values.iter().all(Value::is_string) {
                    return Err(AppError::InvalidDocument(format!(
                        "Server variable '{}' in {} has a non-string enum value",
                        name, context
                    )));
                }
            }
            Some(_) => {
                return Err(AppError::InvalidDocument(format!(
                    "Server variable '{}' in {} has a non-array enum",
                    name, context
                )))
            }
        }
    }

    Ok(())
}

fn validate_shared_responses(raw: &Value, version: SpecVersion) -> AppResult<()> {
    let (responses, context) = match version {
        SpecVersion::Swagger2 => (raw.get("responses"), "responses"),
        _ => (
            raw.get("components").and_then(|c| c.get("responses")),
            "components.responses",
        ),
    };

    match responses {
        None | Some(Value::Object(_)) => Ok(()),
        Some(_) => Err(AppError::InvalidDocument(format!(
            "'{}' must be an object",
            context
        ))),
    }
}
