//! Player identity and per-player state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a player for the lifetime of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A participant in the game.
///
/// `target` and `assigned_by` are ids into the owning [`Game`](super::Game)
/// arena. Fields are only mutated through the game so that the two edges
/// stay inverse to each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub(super) id: PlayerId,
    pub(super) name: String,
    pub(super) alive: bool,
    pub(super) phrase: String,
    pub(super) target: Option<PlayerId>,
    pub(super) assigned_by: Option<PlayerId>,
}

impl Player {
    pub(super) fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            alive: true,
            phrase: String::new(),
            target: None,
            assigned_by: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// The kill word tied to this player's current target, empty when
    /// the player has no target.
    #[must_use]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// The player this one must eliminate.
    #[must_use]
    pub const fn target(&self) -> Option<PlayerId> {
        self.target
    }

    /// The player currently holding the contract on this one.
    #[must_use]
    pub const fn assigned_by(&self) -> Option<PlayerId> {
        self.assigned_by
    }
}
