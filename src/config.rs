//! Broadcaster configuration.

use crate::constants::{
    DEFAULT_OBSERVATION_WINDOW, DEFAULT_POLL_INTERVAL, DEFAULT_RETRY_BUDGET,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the broadcast-confirm coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Number of retry rounds before a batch is reported as exhausted.
    ///
    /// The budget is decremented once per round regardless of how many
    /// transactions were resubmitted within it.
    pub retry_budget: u32,
    /// How long finalization is polled for within a single round.
    #[serde(with = "crate::serde::duration")]
    pub observation_window: Duration,
    /// Interval between finalization polls within the observation window.
    #[serde(with = "crate::serde::duration")]
    pub poll_interval: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            retry_budget: DEFAULT_RETRY_BUDGET,
            observation_window: DEFAULT_OBSERVATION_WINDOW,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl CoordinatorConfig {
    /// Sets the number of retry rounds.
    pub fn with_retry_budget(mut self, retry_budget: u32) -> Self {
        self.retry_budget = retry_budget;
        self
    }

    /// Sets the duration finalization is polled for within a single round.
    pub fn with_observation_window(mut self, observation_window: Duration) -> Self {
        self.observation_window = observation_window;
        self
    }

    /// Sets the interval between finalization polls.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}
