//! Error types for `killword`
//!
//! One error enum per domain, aggregated by [`KillwordError`] which also
//! maps every failure to a process exit code.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::PlayerId;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `killword` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Engine error (game already in progress)
    pub const ENGINE_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `killword` operations.
#[derive(Debug, Error)]
pub enum KillwordError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Progression engine error
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Word list error
    #[error(transparent)]
    WordList(#[from] WordListError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KillwordError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::WordList(WordListError::Empty) => ExitCode::CONFIG_ERROR,
            Self::Engine(_) => ExitCode::ENGINE_ERROR,
            Self::Io(_) | Self::WordList(WordListError::Io { .. }) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Assignment Model Errors
// ============================================================================

/// Invariant violations rejected at the assignment model boundary.
///
/// Under correct engine usage these never reach a player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// No player with this id exists in the game
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    /// The player is already eliminated
    #[error("player {0} is already dead")]
    PlayerDead(PlayerId),

    /// Tried to hand a contract to or from a dead player
    #[error("player {player} and target {target} must both be alive")]
    TargetDead {
        /// Player receiving the target
        player: PlayerId,
        /// The requested target
        target: PlayerId,
    },
}

// ============================================================================
// Engine Errors
// ============================================================================

/// Progression engine invocation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// `run` was called while another game is active on the same engine.
    ///
    /// Carries the localised message from the engine's template set.
    #[error("{0}")]
    GameInProgress(String),

    /// The game handed to `run` could not be started
    #[error("cannot start game: {0}")]
    Model(#[from] ModelError),
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Game configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("cannot read {path}: {source}")]
    Read {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    Parse {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// A required environment variable is unset
    #[error("environment variable '{var}' is not set: {message}")]
    EnvVarNotSet {
        /// Variable name
        var: String,
        /// Message supplied with `${VAR:?message}`
        message: String,
    },

    /// A field holds an unusable value
    #[error("invalid value for '{field}': {message}")]
    Invalid {
        /// Dotted path of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Two roster entries share an id
    #[error("duplicate player id {0}")]
    DuplicatePlayer(PlayerId),

    /// The roster is empty
    #[error("game has no players")]
    EmptyRoster,

    /// Neither `words` nor `words_file` supplied any phrase
    #[error("no kill words configured")]
    NoWords,
}

// ============================================================================
// Word List Errors
// ============================================================================

/// Failures building a [`WordList`](crate::words::WordList).
#[derive(Debug, Error)]
pub enum WordListError {
    /// Reading the word source failed
    #[error("cannot read word list: {source}")]
    Io {
        /// Underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// The source held no words
    #[error("word list is empty")]
    Empty,
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `killword` operations.
pub type Result<T> = std::result::Result<T, KillwordError>;

// ============================================================================
// Tests
// ============================================================================
