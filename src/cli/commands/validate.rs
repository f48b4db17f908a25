//! `validate` command
//!
//! Loads each game file and reports every problem found, without playing.

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{self, loader};
use crate::error::KillwordError;

/// Validate configuration files.
///
/// Every file is checked even after a failure; the first error is
/// returned once all have been reported.
///
/// # Errors
///
/// Returns the first load or validation error encountered.
pub fn run(args: &ValidateArgs) -> Result<(), KillwordError> {
    let mut first_error = None;
    let mut reports = Vec::with_capacity(args.files.len());

    for path in &args.files {
        tracing::info!(file = %path.display(), "validating configuration");
        let errors = match loader::load_unvalidated(path) {
            Ok(cfg) => config::check(&cfg).errors,
            Err(e) => vec![e],
        };

        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        match args.format {
            OutputFormat::Human if messages.is_empty() => {
                println!("{}: ok", path.display());
            }
            OutputFormat::Human => {
                for message in &messages {
                    println!("{}: {message}", path.display());
                }
            }
            OutputFormat::Json => reports.push(serde_json::json!({
                "file": path.display().to_string(),
                "valid": messages.is_empty(),
                "errors": messages,
            })),
        }

        if first_error.is_none() {
            first_error = errors.into_iter().next();
        }
    }

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::Value::Array(reports));
    }

    first_error.map_or(Ok(()), |e| Err(e.into()))
}
