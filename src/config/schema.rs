//! Configuration schema types
//!
//! The YAML layout of a game file. Durations are `humantime` strings
//! (`"30s"`, `"1m 30s"`) and are parsed when the delay provider is built.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::{DelayProvider, FixedDelay, InstantDelay, RandomDelay};
use crate::error::ConfigError;
use crate::lang::Lang;
use crate::model::PlayerId;

/// Attack delay used when the file does not set one.
pub const DEFAULT_ATTACK_DELAY: &str = "30s";

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root configuration for one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct GameConfig {
    /// Game metadata
    #[serde(default)]
    pub game: GameMetadata,

    /// The roster, in order
    pub players: Vec<PlayerEntry>,

    /// Inline kill words
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<String>,

    /// Whitespace-separated word file, relative to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words_file: Option<PathBuf>,

    /// How long attacks wait before landing
    #[serde(default)]
    pub attack_delay: AttackDelay,

    /// Message template overrides; missing keys fall back to English
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<Lang>,
}

impl GameConfig {
    /// The templates this game speaks with.
    #[must_use]
    pub fn lang(&self) -> Lang {
        self.lang.clone().unwrap_or_default()
    }
}

/// Game metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct GameMetadata {
    /// Game identifier, carried into logs and events
    #[serde(default = "default_game_id")]
    pub id: u64,

    /// Human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Default for GameMetadata {
    fn default() -> Self {
        Self {
            id: default_game_id(),
            name: None,
        }
    }
}

const fn default_game_id() -> u64 {
    1
}

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerEntry {
    /// Stable player identifier
    pub id: PlayerId,
    /// Display name; also what the player types before `:` on stdin
    pub name: String,
}

// ============================================================================
// Attack Delay
// ============================================================================

/// Attack delay configuration.
///
/// ```yaml
/// attack_delay:
///   fixed: 30s
/// # or
/// attack_delay:
///   min: 10s
///   max: 1m
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttackDelay {
    /// Every attack waits the same time
    Fixed {
        /// Duration string
        fixed: String,
    },
    /// Uniformly random wait within the bounds
    Range {
        /// Lower bound
        min: String,
        /// Upper bound
        max: String,
    },
}

impl Default for AttackDelay {
    fn default() -> Self {
        Self::Fixed {
            fixed: DEFAULT_ATTACK_DELAY.to_owned(),
        }
    }
}

impl AttackDelay {
    /// Parses the configured durations.
    ///
    /// Returns `(min, max)`; both are the same for a fixed delay.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a duration does not parse or
    /// `min` exceeds `max`.
    pub fn bounds(&self) -> Result<(Duration, Duration), ConfigError> {
        match self {
            Self::Fixed { fixed } => {
                let d = parse_duration("attack_delay.fixed", fixed)?;
                Ok((d, d))
            }
            Self::Range { min, max } => {
                let lo = parse_duration("attack_delay.min", min)?;
                let hi = parse_duration("attack_delay.max", max)?;
                if lo > hi {
                    return Err(ConfigError::Invalid {
                        field: "attack_delay".to_owned(),
                        message: format!("min ({min}) is greater than max ({max})"),
                    });
                }
                Ok((lo, hi))
            }
        }
    }

    /// Builds the delay provider for the engine.
    ///
    /// # Errors
    ///
    /// See [`AttackDelay::bounds`].
    pub fn provider(&self) -> Result<Arc<dyn DelayProvider>, ConfigError> {
        let (min, max) = self.bounds()?;
        Ok(match self {
            _ if max.is_zero() => Arc::new(InstantDelay),
            Self::Fixed { .. } => Arc::new(FixedDelay(min)),
            Self::Range { .. } => Arc::new(RandomDelay::new(min, max)),
        })
    }
}

fn parse_duration(field: &str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|e| ConfigError::Invalid {
        field: field.to_owned(),
        message: format!("'{value}': {e}"),
    })
}
