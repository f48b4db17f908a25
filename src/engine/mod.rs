//! Progression engine
//!
//! Drives a [`Game`](crate::model::Game) from start to a single survivor.
//!
//! # Architecture
//!
//! - [`GameEngine`]: the loop; sole mutator of the game while it runs
//! - [`PendingAttacks`]: FIFO of delayed attacks and their counter flags
//! - [`Notifier`]: outbound announcements and private notices
//! - [`DelayProvider`]: how long an attack waits before it lands

pub mod delay;
pub mod notifier;
pub mod runner;
pub mod tracker;

pub use delay::{DelayProvider, FixedDelay, InstantDelay, RandomDelay};
pub use notifier::{ChannelNotifier, Notice, Notifier};
pub use runner::{EngineOptions, EngineState, GameEngine, GameReport};
pub use tracker::{PendingAttack, PendingAttacks};
