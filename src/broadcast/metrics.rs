use metrics::{Counter, Gauge, Histogram};
use metrics_derive::Metrics;

/// Metrics for the [`Coordinator`](super::Coordinator).
#[derive(Metrics)]
#[metrics(scope = "broadcaster")]
pub struct CoordinatorMetrics {
    /// Number of submission attempts sent to the ledger.
    pub submissions: Counter,
    /// Number of transactions observed finalized.
    pub finalized: Counter,
    /// Number of batches that exhausted their retry budget.
    pub exhausted: Counter,
    /// Number of batches currently being broadcast.
    pub in_flight: Gauge,
    /// Number of retry rounds consumed per batch.
    pub rounds: Histogram,
    /// Time it takes to confirm a batch, in milliseconds.
    pub confirmation_time: Histogram,
}
