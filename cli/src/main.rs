#![deny(missing_docs)]

//! # ORV CLI
//!
//! Command Line Interface for validating HTTP responses against OpenAPI documents.
//!
//! Supported Commands:
//! - `validate`: Validates recorded responses from a JSON file.
//! - `object`: Validates a standalone value against a schema.
//! - `fetch`: Requests a URL and validates the live response (feature `client`).

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod error;
#[cfg(feature = "client")]
mod fetch;
mod object;
mod options;
mod report;
mod validate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI response validator")]
struct Cli {
    /// Log output format (logs go to stderr; filter with RUST_LOG).
    #[clap(long, value_enum, env = "ORV_LOG_FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate recorded responses against an OpenAPI document.
    Validate(validate::ValidateArgs),
    /// Validate a standalone value against a schema.
    Object(object::ObjectArgs),
    /// Request a URL and validate the response.
    #[cfg(feature = "client")]
    Fetch(fetch::FetchArgs),
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let outcome = match &cli.command {
        Commands::Validate(args) => validate::execute(args),
        Commands::Object(args) => object::execute(args),
        #[cfg(feature = "client")]
        Commands::Fetch(args) => fetch::execute(args),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}
