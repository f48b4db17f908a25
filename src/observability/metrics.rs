//! Metrics collection for `killword`.
//!
//! Prometheus-compatible counters and gauges for game progression, with
//! typed recording functions that no-op when no recorder is installed.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde::Serialize;

use crate::error::KillwordError;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// How a player left the game; used as the `cause` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationCause {
    /// Said their assigner's kill word.
    Assassination,
    /// Hit by an uncountered delayed attack.
    Attack,
    /// Their attack was countered.
    Counter,
}

impl EliminationCause {
    /// Label value for this cause.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assassination => "assassination",
            Self::Attack => "attack",
            Self::Counter => "counter",
        }
    }
}

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without an
/// HTTP endpoint.
///
/// # Errors
///
/// Returns `KillwordError::Io` if the recorder or HTTP listener cannot be
/// installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), KillwordError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| KillwordError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!("killword_games_total", "Games started");
    describe_counter!("killword_attacks_total", "Delayed attacks launched");
    describe_counter!("killword_counters_total", "Attacks countered by their victim");
    describe_counter!(
        "killword_eliminations_total",
        "Players eliminated, by cause"
    );
    describe_counter!(
        "killword_stale_actions_total",
        "Resolutions dropped because the game had moved on"
    );
    describe_gauge!("killword_players_alive", "Players alive in the running game");
}

pub fn record_game_started() {
    counter!("killword_games_total").increment(1);
}

pub fn record_attack() {
    counter!("killword_attacks_total").increment(1);
}

pub fn record_counter() {
    counter!("killword_counters_total").increment(1);
}

pub fn record_elimination(cause: EliminationCause) {
    counter!("killword_eliminations_total", "cause" => cause.as_str()).increment(1);
}

pub fn record_stale_action() {
    counter!("killword_stale_actions_total").increment(1);
}

/// Sets the alive-players gauge.
#[allow(clippy::cast_precision_loss)]
pub fn set_players_alive(count: usize) {
    gauge!("killword_players_alive").set(count as f64);
}
