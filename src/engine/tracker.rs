//! In-flight delayed attacks.
//!
//! Entries are resolved strictly in push order. Each push is paired with
//! exactly one timer task, and each timer completion pops exactly one
//! entry. Timers post their completions in push order, so the two stay
//! in lock-step.

use std::collections::VecDeque;

use crate::model::PlayerId;

/// One attack waiting for its timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAttack {
    pub attacker: PlayerId,
    pub victim: PlayerId,
    /// Set once when the victim counters inside the delay window.
    pub retaliated: bool,
}

/// FIFO of [`PendingAttack`]s.
#[derive(Debug, Default)]
pub struct PendingAttacks {
    queue: VecDeque<PendingAttack>,
}

impl PendingAttacks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attacker: PlayerId, victim: PlayerId) {
        self.queue.push_back(PendingAttack {
            attacker,
            victim,
            retaliated: false,
        });
    }

    /// Flags the oldest unflagged attack on `victim` as countered.
    ///
    /// Stops at the first match. Returns whether one was found.
    pub fn scan_for_retaliation(&mut self, victim: PlayerId) -> bool {
        self.queue
            .iter_mut()
            .find(|a| a.victim == victim && !a.retaliated)
            .map(|a| a.retaliated = true)
            .is_some()
    }

    /// Removes the oldest entry, flagged or not.
    pub fn pop(&mut self) -> Option<PendingAttack> {
        self.queue.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
