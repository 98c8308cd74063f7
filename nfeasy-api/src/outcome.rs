//! Pass/fail decisions for simulated processing
//!
//! Invoice validation and EDAP submission draw their outcome from an
//! [`OutcomePolicy`] so tests can force either branch.

use rand::Rng;

pub trait OutcomePolicy: Send + Sync {
    /// `true` when the simulated operation succeeds
    fn succeeds(&self) -> bool;
}

/// Succeeds with a fixed probability
#[derive(Debug, Clone, Copy)]
pub struct RandomOutcome {
    success_rate: f64,
}

impl RandomOutcome {
    /// `success_rate` is clamped to [0, 1]
    pub fn with_success_rate(success_rate: f64) -> Self {
        Self {
            success_rate: success_rate.clamp(0.0, 1.0),
        }
    }

    pub fn with_failure_rate(failure_rate: f64) -> Self {
        Self::with_success_rate(1.0 - failure_rate)
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }
}

impl OutcomePolicy for RandomOutcome {
    fn succeeds(&self) -> bool {
        rand::thread_rng().gen_bool(self.success_rate)
    }
}

/// Always returns the same outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedOutcome(pub bool);

impl FixedOutcome {
    pub fn pass() -> Self {
        Self(true)
    }

    pub fn fail() -> Self {
        Self(false)
    }
}

impl OutcomePolicy for FixedOutcome {
    fn succeeds(&self) -> bool {
        self.0
    }
}
