//! Broadcaster constants.

use std::time::Duration;

/// Number of retry rounds a batch is given before it is reported as exhausted.
///
/// Each round is one full cycle of submitting unfinalized transactions and
/// polling for their finalization.
pub const DEFAULT_RETRY_BUDGET: u32 = 50;

/// How long finalization is polled for within a single round before the
/// remaining transactions are resubmitted.
pub const DEFAULT_OBSERVATION_WINDOW: Duration = Duration::from_secs(1);

/// Interval between finalization polls within the observation window.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
