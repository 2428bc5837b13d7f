#![deny(missing_docs)]

//! # Fetch Command
//!
//! Performs a live HTTP request and validates the response it gets back.
//! Non-2xx statuses are validated like any other response, never treated as
//! transport errors.

use std::borrow::Cow;

use orv_core::ObservedResponse;
use serde::Serialize;
use tracing::debug;

use crate::error::{CliError, CliResult};
use crate::options::ValidatorOptions;
use crate::report::{all_valid, render};

/// Arguments for the fetch command.
#[derive(clap::Args, Debug, Clone)]
pub struct FetchArgs {
    #[clap(flatten)]
    pub options: ValidatorOptions,

    /// HTTP method of the request.
    #[clap(long, default_value = "GET")]
    pub method: String,

    /// URL to request.
    pub url: String,

    /// Print the result as JSON instead of a text line.
    #[clap(long)]
    pub json: bool,
}

/// A response received over the network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveResponse {
    /// Requested URL.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Body text (lossily decoded as UTF-8).
    pub body: String,
}

impl ObservedResponse for LiveResponse {
    fn url(&self) -> &str {
        &self.url
    }

    fn status(&self) -> u16 {
        self.status
    }

    fn body(&self) -> Option<Cow<'_, [u8]>> {
        if self.body.is_empty() {
            None
        } else {
            Some(Cow::Borrowed(self.body.as_bytes()))
        }
    }
}

fn http_error(e: ureq::Error) -> CliError {
    CliError::General(format!("HTTP request failed: {}", e))
}

/// Sends a request without a body and captures the response.
pub fn send(method: &str, url: &str) -> CliResult<LiveResponse> {
    let result = match method.to_uppercase().as_str() {
        "GET" => ureq::get(url).config().http_status_as_error(false).build().call(),
        "HEAD" => ureq::head(url).config().http_status_as_error(false).build().call(),
        "DELETE" => ureq::delete(url).config().http_status_as_error(false).build().call(),
        "OPTIONS" => ureq::options(url).config().http_status_as_error(false).build().call(),
        "POST" => ureq::post(url).config().http_status_as_error(false).build().send_empty(),
        "PUT" => ureq::put(url).config().http_status_as_error(false).build().send_empty(),
        "PATCH" => ureq::patch(url).config().http_status_as_error(false).build().send_empty(),
        other => {
            return Err(CliError::General(format!("Unsupported HTTP method '{}'", other)));
        }
    };

    let mut response = result.map_err(http_error)?;
    let status = response.status().as_u16();
    let bytes = response.body_mut().read_to_vec().map_err(http_error)?;
    debug!(url, status, bytes = bytes.len(), "received response");

    Ok(LiveResponse {
        url: url.to_string(),
        status,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

/// Executes the fetch command.
///
/// Returns `true` when the live response conforms to the document.
pub fn execute(args: &FetchArgs) -> CliResult<bool> {
    let validator = args.options.build::<LiveResponse>()?;
    let response = send(&args.method, &args.url)?;
    let result = validator.validate(response, &args.method)?;

    let results = [result];
    println!("{}", render(&results, args.json)?);
    Ok(all_valid(&results))
}
