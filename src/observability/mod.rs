//! Observability module
//!
//! Logging, metrics, and structured game events.

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{Event, EventEmitter};
pub use logging::{LogFormat, init_logging};
pub use metrics::{EliminationCause, init_metrics};
