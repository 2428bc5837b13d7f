#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Helpers for local `$ref` pointers such as `#/components/responses/NotFound`.
//!
//! Only document-local references are understood; anything else is left for the
//! body validator to reject.

use percent_encoding::percent_decode_str;

/// Reference prefix for shared responses in OpenAPI 3.x documents.
pub const COMPONENT_RESPONSES_PREFIX: &str = "#/components/responses/";

/// Reference prefix for shared responses in Swagger 2.0 documents.
pub const SWAGGER_RESPONSES_PREFIX: &str = "#/responses/";

/// Extracts the decoded component name from a reference starting with `prefix`.
///
/// Returns `None` if the reference does not start with the prefix or the name is empty.
/// Only the first pointer segment after the prefix is considered a name.
pub fn component_name(reference: &str, prefix: &str) -> Option<String> {
    let rest = reference.strip_prefix(prefix)?;
    let segment = rest.split('/').next().unwrap_or_default();
    let name = decode_pointer_segment(segment);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Returns the `$ref` string of a JSON object, if it has one.
pub(crate) fn ref_of(value: &serde_json::Value) -> Option<&str> {
    value.get("$ref").and_then(|r| r.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_component_name_v3() {
        let name = component_name("#/components/responses/NotFound", COMPONENT_RESPONSES_PREFIX);
        assert_eq!(name.as_deref(), Some("NotFound"));
    }

    #[test]
    fn test_component_name_wrong_prefix() {
        let name = component_name("#/components/schemas/User", COMPONENT_RESPONSES_PREFIX);
        assert!(name.is_none());
    }

    #[test]
    fn test_component_name_empty() {
        assert!(component_name("#/responses/", SWAGGER_RESPONSES_PREFIX).is_none());
    }

    #[test]
    fn test_decode_pointer_segment() {
        assert_eq!(decode_pointer_segment("a~1b~0c"), "a/b~c");
        assert_eq!(decode_pointer_segment("Not%20Found"), "Not Found");
    }

    #[test]
    fn test_ref_of() {
        assert_eq!(ref_of(&json!({"$ref": "#/x"})), Some("#/x"));
        assert_eq!(ref_of(&json!({"type": "string"})), None);
    }
}
