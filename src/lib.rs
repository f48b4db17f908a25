//! `killword` - a last-player-standing word game engine
//!
//! Players are arranged in a ring of targets. Saying your assigner's secret
//! word kills you on the spot; saying your own launches a delayed attack on
//! your target that the target can turn around by saying the same word
//! before it lands.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod lang;
pub mod model;
pub mod observability;
pub mod transport;
pub mod words;
