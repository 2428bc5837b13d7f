#![deny(missing_docs)]

//! # OpenAPI Document Module
//!
//! - **document**: Typed read-only view of a loaded document.
//! - **validation**: Structural checks run before the view is built.
//! - **normalization**: OpenAPI-to-JSON-Schema keyword rewrites.
//! - **ref_utils**: Local `$ref` pointer helpers.

pub mod document;
pub mod normalization;
pub mod ref_utils;
pub(crate) mod validation;

pub use document::{
    parse_document_text, OpenApiDocument, Operation, PathItem, ResponseDefinition, Server,
    ServerVariable, SpecVersion, DEFAULT_BASE_PATH,
};
