//! CLI argument definitions
//!
//! All Clap derive structs for `killword` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Last-player-standing word game.
#[derive(Parser, Debug)]
#[command(name = "killword", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "KILLWORD_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "KILLWORD_LOG_FORMAT")]
    pub log_format: OutputFormat,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a game over stdin/stdout.
    Run(RunArgs),

    /// Validate game configuration files without playing.
    Validate(ValidateArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the YAML game configuration.
    #[arg(short, long, env = "KILLWORD_CONFIG")]
    pub config: PathBuf,

    /// Write JSONL game events to this file.
    #[arg(long, env = "KILLWORD_EVENTS_FILE")]
    pub events: Option<PathBuf>,

    /// Serve Prometheus metrics on this port.
    #[arg(long, env = "KILLWORD_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_with_options() {
        let cli = Cli::try_parse_from([
            "killword",
            "-vv",
            "run",
            "--config",
            "game.yaml",
            "--events",
            "events.jsonl",
            "--metrics-port",
            "9100",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.config, PathBuf::from("game.yaml"));
        assert_eq!(args.events, Some(PathBuf::from("events.jsonl")));
        assert_eq!(args.metrics_port, Some(9100));
    }

    #[test]
    fn validate_requires_files() {
        assert!(Cli::try_parse_from(["killword", "validate"]).is_err());
        let cli = Cli::try_parse_from(["killword", "validate", "a.yaml", "b.yaml"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.format, OutputFormat::Human);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["killword", "version", "--format", "json", "-q", "--color", "never"])
                .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.color, ColorChoice::Never);
        let Commands::Version(args) = cli.command else {
            panic!("expected version");
        };
        assert_eq!(args.format, OutputFormat::Json);
    }
}
