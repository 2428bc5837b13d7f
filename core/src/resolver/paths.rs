#![deny(missing_docs)]

//! # Path Template Matching
//!
//! Compiles OpenAPI path keys (`/users/{id}`) once at load time and matches
//! concrete pathnames against them.
//!
//! ## Scan order
//!
//! Candidates (one per matching server base path) form the outer loop, templates
//! in declaration order the inner loop. A template that is string-equal to the
//! candidate wins immediately. Parameterized matches do not stop the scan: every
//! later match overwrites the previous one, so the *last* parameterized match wins.
//! Callers relying on ordering should declare the more specific template last.

use crate::error::{AppError, AppResult};
use crate::oas::validation::validate_path_template;
use crate::validation_error::{ValidationError, ValidationErrorCode};
use regex::Regex;
use tracing::trace;

/// One `/`-separated piece of a path template.
#[derive(Debug, Clone)]
enum TemplateSegment {
    /// Must equal the pathname segment exactly.
    Literal(String),
    /// A whole-segment `{param}`; matches any non-empty segment.
    Parameter,
    /// A segment mixing literals and parameters, e.g. `{name}.json`.
    Pattern(Regex),
}

impl TemplateSegment {
    fn matches(&self, segment: &str) -> bool {
        match self {
            TemplateSegment::Literal(literal) => literal == segment,
            TemplateSegment::Parameter => !segment.is_empty(),
            TemplateSegment::Pattern(re) => re.is_match(segment),
        }
    }
}

/// A compiled OpenAPI path template.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<TemplateSegment>,
}

impl PartialEq for PathTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl PathTemplate {
    /// Compiles a path key.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidDocument` for keys without a leading `/` or with
    /// malformed placeholders.
    pub fn parse(raw: &str) -> AppResult<Self> {
        validate_path_template(raw)?;

        let segments = raw
            .split('/')
            .map(compile_segment)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The template as declared in the document.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when the template contains no parameters.
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, TemplateSegment::Literal(_)))
    }

    /// Matches a pathname: equal segment counts, equal literals, non-empty parameters.
    pub fn matches(&self, pathname: &str) -> bool {
        let mut parts = pathname.split('/');
        for segment in &self.segments {
            match parts.next() {
                Some(part) if segment.matches(part) => {}
                _ => return false,
            }
        }
        parts.next().is_none()
    }
}

fn compile_segment(segment: &str) -> AppResult<TemplateSegment> {
    if !segment.contains('{') {
        return Ok(TemplateSegment::Literal(segment.to_string()));
    }

    if segment.starts_with('{') && segment.ends_with('}') && segment.matches('{').count() == 1 {
        return Ok(TemplateSegment::Parameter);
    }

    let mut pattern = String::from("^");
    let mut rest = segment;
    while let Some(open) = rest.find('{') {
        pattern.push_str(&regex::escape(&rest[..open]));
        let close = rest[open..]
            .find('}')
            .map(|idx| open + idx)
            .ok_or_else(|| {
                AppError::InvalidDocument(format!("Unterminated placeholder in '{}'", segment))
            })?;
        pattern.push_str("[^/]+?");
        rest = &rest[close + 1..];
    }
    pattern.push_str(&regex::escape(rest));
    pattern.push('$');

    Regex::new(&pattern)
        .map(TemplateSegment::Pattern)
        .map_err(|e| {
            AppError::InvalidDocument(format!("Invalid path segment '{}': {}", segment, e))
        })
}

/// Picks the path template for a set of candidate pathnames.
///
/// See the module documentation for the scan order and tie-break.
/// Fails with `PATH_NOT_FOUND` when no template matches any candidate.
pub fn match_path_template<'a>(
    candidates: &[String],
    templates: &'a [PathTemplate],
) -> Result<&'a str, ValidationError> {
    let mut best: Option<&'a str> = None;

    for candidate in candidates {
        for template in templates {
            if template.as_str() == candidate {
                trace!(candidate = %candidate, template = template.as_str(), "exact path match");
                return Ok(template.as_str());
            }
            if template.matches(candidate) {
                trace!(candidate = %candidate, template = template.as_str(), "parameterized path match");
                best = Some(template.as_str());
            }
        }
    }

    best.ok_or_else(|| {
        ValidationError::with_message(
            ValidationErrorCode::PathNotFound,
            format!(
                "No path template matches pathname '{}'",
                candidates.first().map(String::as_str).unwrap_or_default()
            ),
        )
    })
}
