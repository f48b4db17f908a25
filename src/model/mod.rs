//! Assignment model: players, their kill words, and the target ring.
//!
//! Pure state. The model has no locks and no notion of time; the
//! progression engine is its only runtime caller.

pub mod game;
pub mod player;

pub use game::{Elimination, Game};
pub use player::{Player, PlayerId};
