//! Attack delay providers.
//!
//! The engine asks its [`DelayProvider`] once per attack, from inside the
//! attack's timer task, for how long the victim has to counter.
//!
//! Attacks resolve in push order. A later attack that draws a shorter
//! delay than an earlier one still pending waits for the earlier one, so
//! its effective window may be longer than drawn but never shorter.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

/// Source of the attack-to-resolution wait.
#[async_trait]
pub trait DelayProvider: Send + Sync {
    /// Returns how long to wait before the attack resolves.
    async fn delay(&self) -> Duration;
}

/// Every attack waits the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

#[async_trait]
impl DelayProvider for FixedDelay {
    async fn delay(&self) -> Duration {
        self.0
    }
}

/// Attacks resolve on the next loop turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstantDelay;

#[async_trait]
impl DelayProvider for InstantDelay {
    async fn delay(&self) -> Duration {
        Duration::ZERO
    }
}

/// Uniformly random delay in `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomDelay {
    pub min: Duration,
    pub max: Duration,
}

impl RandomDelay {
    /// Creates a provider, swapping the bounds if they arrive reversed.
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }
}

#[async_trait]
impl DelayProvider for RandomDelay {
    async fn delay(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::rng().random_range(self.min..=self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_and_instant() {
        assert_eq!(FixedDelay(Duration::from_secs(3)).delay().await, Duration::from_secs(3));
        assert_eq!(InstantDelay.delay().await, Duration::ZERO);
    }

    #[tokio::test]
    async fn random_stays_in_bounds() {
        let provider = RandomDelay::new(Duration::from_millis(10), Duration::from_millis(20));
        for _ in 0..100 {
            let d = provider.delay().await;
            assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(20));
        }
    }

    #[test]
    fn random_swaps_reversed_bounds() {
        let provider = RandomDelay::new(Duration::from_secs(5), Duration::from_secs(1));
        assert_eq!(provider.min, Duration::from_secs(1));
        assert_eq!(provider.max, Duration::from_secs(5));
    }
}
