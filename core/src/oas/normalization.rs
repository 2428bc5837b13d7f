#![deny(missing_docs)]

//! # OpenAPI Normalization
//!
//! Rewrites OpenAPI-only schema keywords into plain JSON Schema before the
//! document is handed to the body validator. Only fields that are known
//! compatibility gaps are rewritten.

use serde_json::{json, Map, Value};

/// Schema keywords whose values are instance data rather than schemas.
const LITERAL_KEYS: [&str; 5] = ["example", "examples", "default", "enum", "const"];

/// Keywords whose values map arbitrary names to schemas or responses.
const NAME_MAP_KEYS: [&str; 7] = [
    "properties",
    "patternProperties",
    "dependentSchemas",
    "definitions",
    "$defs",
    "schemas",
    "responses",
];

/// Normalizes `nullable` / `x-nullable` schema flags into JSON Schema null unions.
///
/// OpenAPI 3.0 uses `nullable: true` and Swagger 2.0 documents commonly carry
/// `x-nullable: true`; JSON Schema spells the same thing `type: [T, "null"]`.
/// Untyped schemas (e.g. a bare `$ref`) become `anyOf: [schema, {type: null}]`.
///
/// Literal payloads (`example`, `default`, `enum`, ...) are not descended into.
/// Entries of name maps such as `properties` or `responses` are always walked,
/// so a property or response called `default` is still normalized.
pub fn normalize_nullable_schemas(value: &mut Value) {
    walk(value, false);
}

fn walk(value: &mut Value, in_name_map: bool) {
    match value {
        Value::Object(map) => {
            if !in_name_map {
                if let Some(wrapped) = rewrite_nullable(map) {
                    *value = wrapped;
                    // The original schema now sits at `anyOf[0]`.
                    walk(value, false);
                    return;
                }
            }
            for (key, child) in map.iter_mut() {
                if in_name_map {
                    walk(child, false);
                } else if !LITERAL_KEYS.contains(&key.as_str()) {
                    walk(child, NAME_MAP_KEYS.contains(&key.as_str()));
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|item| walk(item, false)),
        _ => {}
    }
}

fn is_flag_set(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool) == Some(true)
}

/// Strips the nullable flags from `map`.
///
/// Typed schemas are widened in place and `None` is returned; untyped schemas
/// are returned wrapped in an `anyOf` for the caller to substitute.
fn rewrite_nullable(map: &mut Map<String, Value>) -> Option<Value> {
    if !is_flag_set(map, "nullable") && !is_flag_set(map, "x-nullable") {
        return None;
    }
    map.remove("nullable");
    map.remove("x-nullable");

    let null = Value::String("null".into());
    match map.get_mut("type") {
        Some(type_val) => match type_val {
            Value::String(single) if single.as_str() != "null" => {
                *type_val = Value::Array(vec![Value::String(std::mem::take(single)), null]);
            }
            Value::Array(types) if !types.contains(&null) => types.push(null),
            _ => {}
        },
        None => {
            let original = Value::Object(std::mem::take(map));
            return Some(json!({ "anyOf": [original, { "type": "null" }] }));
        }
    }

    // A typed `enum` must list null as well.
    if let Some(Value::Array(members)) = map.get_mut("enum") {
        if !members.contains(&Value::Null) {
            members.push(Value::Null);
        }
    }
    None
}
