#![deny(missing_docs)]

//! # Server Base Path Resolution
//!
//! Expands every declared server (including templated variables) into concrete
//! base paths and keeps those that prefix the request pathname.
//!
//! A server `https://api.example.com/{version}/v1` with `version` in
//! `{v1, v2, v3}` yields `/v1/v1`, `/v2/v1` and `/v3/v1`, each tested on its own.

use crate::oas::document::{Server, DEFAULT_BASE_PATH};
use crate::validation_error::{ValidationError, ValidationErrorCode};
use tracing::trace;

/// Returns the path portion of a server URL template.
///
/// The path starts at the first `/` after the `scheme://host` part; URLs without
/// one (e.g. `https://api.example.com`) have the base path `/`.
pub fn base_path(url: &str) -> &str {
    // Mask the first `//` so the scheme separator is not mistaken for the path.
    let masked = url.replacen("//", "  ", 1);
    match masked.find('/') {
        Some(start) => &url[start..],
        None => DEFAULT_BASE_PATH,
    }
}

/// Every combination that picks one item from each set.
///
/// The first set varies slowest: `[[a, b], [x, y]]` yields
/// `[a, x], [a, y], [b, x], [b, y]`. No sets yield a single empty combination;
/// any empty set yields no combinations.
pub fn cartesian_product<T: Clone>(sets: &[Vec<T>]) -> Vec<Vec<T>> {
    sets.iter().fold(vec![Vec::new()], |acc, set| {
        acc.iter()
            .flat_map(|prefix| {
                set.iter().map(move |item| {
                    let mut combination = prefix.clone();
                    combination.push(item.clone());
                    combination
                })
            })
            .collect()
    })
}

/// Expands one server into its concrete candidate base paths, in combination order.
pub fn candidate_base_paths(server: &Server) -> Vec<String> {
    let template = base_path(&server.url);
    if server.variables.is_empty() {
        return vec![template.to_string()];
    }

    let names: Vec<&str> = server.variables.keys().map(String::as_str).collect();
    let value_sets: Vec<Vec<&str>> = server
        .variables
        .values()
        .map(|variable| variable.possible_values())
        .collect();

    cartesian_product(&value_sets)
        .into_iter()
        .map(|combination| {
            names
                .iter()
                .zip(combination)
                .fold(template.to_string(), |path, (name, value)| {
                    path.replace(&format!("{{{}}}", name), value)
                })
        })
        .collect()
}

/// Finds every concrete server base path that prefixes `pathname`.
///
/// Servers keep their declaration order, and within one server candidates keep
/// their combination order. Fails with `SERVER_NOT_FOUND` when nothing matches.
pub fn resolve_base_paths(
    servers: &[Server],
    pathname: &str,
) -> Result<Vec<String>, ValidationError> {
    let matching: Vec<String> = servers
        .iter()
        .flat_map(candidate_base_paths)
        .filter(|candidate| pathname.starts_with(candidate.as_str()))
        .collect();

    trace!(pathname, candidates = ?matching, "resolved server base paths");

    if matching.is_empty() {
        return Err(ValidationError::with_message(
            ValidationErrorCode::ServerNotFound,
            format!("No server base path matches pathname '{}'", pathname),
        ));
    }

    Ok(matching)
}

/// Removes a matched base path from the front of `pathname`.
///
/// The root base path `/` leaves the pathname untouched.
pub fn strip_base_path(base_path: &str, pathname: &str) -> String {
    if base_path == DEFAULT_BASE_PATH {
        return pathname.to_string();
    }
    pathname
        .strip_prefix(base_path)
        .unwrap_or(pathname)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::document::ServerVariable;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn templated(url: &str, vars: &[(&str, &str, &[&str])]) -> Server {
        let mut variables = IndexMap::new();
        for (name, default, values) in vars {
            variables.insert(
                name.to_string(),
                ServerVariable {
                    default: default.to_string(),
                    enum_values: if values.is_empty() {
                        None
                    } else {
                        Some(values.iter().map(|v| v.to_string()).collect())
                    },
                    description: None,
                },
            );
        }
        Server {
            url: url.to_string(),
            variables,
            description: None,
        }
    }

    #[test]
    fn test_base_path_extraction() {
        assert_eq!(base_path("https://api.example.com/v1"), "/v1");
        assert_eq!(base_path("https://api.example.com"), "/");
        assert_eq!(base_path("/api"), "/api");
        assert_eq!(base_path("/"), "/");
        assert_eq!(base_path("{scheme}://{host}/base/{v}"), "/base/{v}");
        assert_eq!(base_path("//cdn.example.com/static"), "/static");
    }

    #[test]
    fn test_cartesian_product_order() {
        let sets = vec![vec!["a", "b"], vec!["x", "y"]];
        assert_eq!(
            cartesian_product(&sets),
            vec![
                vec!["a", "x"],
                vec!["a", "y"],
                vec!["b", "x"],
                vec!["b", "y"]
            ]
        );
    }

    #[test]
    fn test_cartesian_product_edges() {
        let none: Vec<Vec<&str>> = Vec::new();
        assert_eq!(cartesian_product(&none), vec![Vec::<&str>::new()]);
        let with_empty = vec![vec!["a"], Vec::new()];
        assert!(cartesian_product(&with_empty).is_empty());
    }

    #[test]
    fn test_expansion_yields_every_enum_value() {
        let server = templated(
            "https://api.example.com/{version}/v1",
            &[("version", "v2", &["v1", "v2", "v3"])],
        );
        let mut candidates = candidate_base_paths(&server);
        assert_eq!(candidates.len(), 3);
        candidates.sort();
        assert_eq!(candidates, vec!["/v1/v1", "/v2/v1", "/v3/v1"]);
    }

    #[test]
    fn test_expansion_multiple_variables() {
        let server = templated(
            "https://{region}.example.com/{tenant}/{version}",
            &[
                ("region", "eu", &["eu", "us"]),
                ("tenant", "acme", &[]),
                ("version", "v1", &["v1", "v2"]),
            ],
        );
        // `region` lives in the host, so it multiplies identical candidates.
        assert_eq!(
            candidate_base_paths(&server),
            vec!["/acme/v1", "/acme/v2", "/acme/v1", "/acme/v2"]
        );
    }

    #[test]
    fn test_expansion_replaces_every_occurrence() {
        let server = templated("/{v}/mirror/{v}", &[("v", "a", &[])]);
        assert_eq!(candidate_base_paths(&server), vec!["/a/mirror/a"]);
    }

    #[test]
    fn test_resolve_keeps_server_order() {
        let servers = vec![
            Server::new("https://a.example.com/api"),
            Server::new("https://b.example.com/"),
            Server::new("https://c.example.com/other"),
        ];
        let matched = resolve_base_paths(&servers, "/api/users").unwrap();
        assert_eq!(matched, vec!["/api", "/"]);
    }

    #[test]
    fn test_resolve_server_not_found() {
        let servers = vec![Server::new("https://api.example.com/v1")];
        let err = resolve_base_paths(&servers, "/v2/users").unwrap_err();
        assert_eq!(err.code, ValidationErrorCode::ServerNotFound);
        assert!(err.message.contains("/v2/users"));
    }

    #[test]
    fn test_strip_base_path() {
        assert_eq!(strip_base_path("/", "/users"), "/users");
        assert_eq!(strip_base_path("/api", "/api/users"), "/users");
        assert_eq!(strip_base_path("/api", "/other"), "/other");
    }
}
