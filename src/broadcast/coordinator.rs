use super::{
    metrics::CoordinatorMetrics,
    transaction::{BatchOutcome, SubmissionBatch, TxState, TxTracker},
};
use crate::{
    config::CoordinatorConfig,
    ledger::{Ledger, LedgerApi},
};
use chrono::Utc;
use futures_util::{StreamExt, stream::FuturesUnordered};
use std::sync::Arc;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

/// Coordinates broadcasting a batch of pre-signed transactions until every
/// one of them is observed finalized or the retry budget runs out.
///
/// Each retry round submits all not-yet-finalized transactions, then polls
/// their finalization across a fixed observation window. Submission and query
/// errors are transient by assumption: the affected transaction is retried on
/// the next round and nothing is propagated to the caller. The ledger
/// endpoint owns duplicate rejection, so resubmitting a transaction whose
/// earlier broadcast is still propagating is safe.
#[derive(Debug, Clone)]
pub struct Coordinator {
    /// Ledger endpoint transactions are submitted to.
    ledger: Ledger,
    /// Retry budget and timing configuration.
    config: CoordinatorConfig,
    /// Metrics for the coordinator.
    metrics: Arc<CoordinatorMetrics>,
}

impl Coordinator {
    /// Creates a new [`Coordinator`].
    pub fn new(ledger: Ledger, config: CoordinatorConfig) -> Self {
        Self { ledger, config, metrics: Arc::new(CoordinatorMetrics::default()) }
    }

    /// The configuration of this coordinator.
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Submits every transaction of the batch and polls the ledger until all
    /// of them are observed finalized, resubmitting unconfirmed ones for up
    /// to the configured number of retry rounds.
    ///
    /// The returned [`BatchOutcome`] carries a terminal outcome per batch
    /// index; [`BatchOutcome::is_success`] is `true` iff every transaction
    /// was observed finalized within the budget.
    pub async fn submit_and_confirm(&self, batch: SubmissionBatch) -> BatchOutcome {
        let received_at = Utc::now();
        self.metrics.in_flight.increment(1);

        let mut trackers: Vec<TxTracker> =
            (0..batch.len()).map(|_| TxTracker::default()).collect();
        let mut rounds = 0;

        'rounds: while rounds < self.config.retry_budget {
            rounds += 1;
            self.submit_unfinalized(&batch, &mut trackers).await;

            let started = Instant::now();
            loop {
                self.poll_finalization(&mut trackers).await;

                if trackers.iter().all(TxTracker::is_finalized) {
                    break 'rounds;
                }

                if started.elapsed() >= self.config.observation_window {
                    break;
                }

                sleep(self.config.poll_interval).await;
            }
        }

        self.metrics.in_flight.decrement(1);
        self.metrics.rounds.record(rounds as f64);

        let outcome =
            BatchOutcome { outcomes: trackers.iter().map(TxTracker::outcome).collect(), rounds };

        if outcome.is_success() {
            self.metrics
                .confirmation_time
                .record(Utc::now().signed_duration_since(received_at).num_milliseconds() as f64);
        } else {
            self.metrics.exhausted.increment(1);
            warn!(batch = %batch.id(), rounds, "retry budget exhausted");
        }

        outcome
    }

    /// Concurrently submits every not-yet-finalized transaction of the batch.
    ///
    /// A submission that errors leaves its transaction without an
    /// acknowledgment for this round; it is simply attempted again on the
    /// next one.
    async fn submit_unfinalized(&self, batch: &SubmissionBatch, trackers: &mut [TxTracker]) {
        let unfinalized: Vec<usize> =
            (0..batch.len()).filter(|index| !trackers[*index].is_finalized()).collect();

        let mut submissions: FuturesUnordered<_> = unfinalized
            .into_iter()
            .map(|index| {
                let tx = &batch.transactions()[index];
                async move { (index, self.ledger.submit_transaction(tx).await) }
            })
            .collect();

        while let Some((index, result)) = submissions.next().await {
            self.metrics.submissions.increment(1);
            if let Err(err) = &result {
                warn!(index, %err, "submission failed");
            }
            trackers[index].record_submission(result);
        }
    }

    /// Concurrently polls finalization of every acknowledged, not-yet-final
    /// transaction. A query error leaves the transaction pending.
    async fn poll_finalization(&self, trackers: &mut [TxTracker]) {
        let pending: Vec<_> = trackers
            .iter()
            .enumerate()
            .filter_map(|(index, tracker)| match tracker.state() {
                TxState::Submitted(id) => Some((index, id)),
                _ => None,
            })
            .collect();

        let mut queries: FuturesUnordered<_> = pending
            .into_iter()
            .map(|(index, id)| async move { (index, self.ledger.finalization_status(id).await) })
            .collect();

        while let Some((index, result)) = queries.next().await {
            match result {
                Ok(status) if status.is_finalized() => {
                    debug!(index, "transaction finalized");
                    self.metrics.finalized.increment(1);
                    trackers[index].record_finalized();
                }
                Ok(_) => {}
                Err(err) => debug!(index, %err, "finalization query failed"),
            }
        }
    }
}
