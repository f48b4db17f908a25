//! Diagnostic logging for `killword`.
//!
//! Game output goes to stdout, so diagnostics always go to stderr. `-v`
//! raises only this crate's level; dependencies stay at `warn` unless
//! `KILLWORD_LOG_LEVEL` says otherwise.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{ColorChoice, OutputFormat};

/// Environment variable holding a full `EnvFilter` directive.
pub const LOG_LEVEL_ENV: &str = "KILLWORD_LOG_LEVEL";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per line, event fields flattened to the top level.
    Json,
}

impl From<OutputFormat> for LogFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => Self::Human,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Filter directive for a `-v` count.
#[must_use]
pub fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,killword={level}")
}

fn wants_ansi(color: ColorChoice) -> bool {
    match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
    }
}

/// Installs the global subscriber. Later calls leave the first one in
/// place.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2);

    let installed = match format {
        LogFormat::Human => builder.with_ansi(wants_ansi(color)).try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };
    if installed.is_err() {
        tracing::debug!("subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_only_raises_own_crate() {
        assert_eq!(default_filter(0), "warn,killword=warn");
        assert_eq!(default_filter(1), "warn,killword=info");
        assert_eq!(default_filter(2), "warn,killword=debug");
        assert_eq!(default_filter(9), "warn,killword=trace");
    }

    #[test]
    fn filters_parse() {
        for v in 0..4 {
            assert!(EnvFilter::try_new(default_filter(v)).is_ok());
        }
    }

    #[test]
    fn output_format_maps_to_log_format() {
        assert_eq!(LogFormat::from(OutputFormat::Json), LogFormat::Json);
        assert_eq!(LogFormat::from(OutputFormat::Human), LogFormat::Human);
    }

    #[test]
    fn never_color_disables_ansi() {
        assert!(!wants_ansi(ColorChoice::Never));
        assert!(wants_ansi(ColorChoice::Always));
    }

    #[test]
    fn repeated_init_is_harmless() {
        init_logging(LogFormat::Json, 3, ColorChoice::Never);
        init_logging(LogFormat::Human, 0, ColorChoice::Auto);
    }
}
