#![deny(missing_docs)]

//! # Resolution Stages
//!
//! The three synchronous stages that turn a concrete response into the schema it
//! must satisfy. Each stage returns `Result<_, ValidationError>` and the engine
//! stops at the first failure.
//!
//! - **servers**: server URL templates to matching base paths.
//! - **paths**: base-path-stripped pathnames to a path template.
//! - **responses**: template + method + status to a response definition.

pub mod paths;
pub mod responses;
pub mod servers;

pub use paths::{match_path_template, PathTemplate};
pub use responses::{resolve_response, ResolvedResponse};
pub use servers::{
    base_path, candidate_base_paths, cartesian_product, resolve_base_paths, strip_base_path,
};
