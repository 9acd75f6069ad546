use crate::error::LedgerError;
use alloy_primitives::{Bytes, keccak256, wrap_fixed_bytes};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

wrap_fixed_bytes! {
    /// An id of a batch being handled by the broadcaster.
    ///
    /// Derived from the payloads of the batch, so resubmitting the same batch
    /// yields the same id.
    pub struct BatchId<32>;
}

wrap_fixed_bytes! {
    /// Acknowledgment identifier handed out by the ledger endpoint for a
    /// submission.
    ///
    /// Note: this is not assigned by the broadcaster. Resubmitting the same
    /// payload may yield the same identifier; only the latest one per
    /// transaction is tracked.
    pub struct TxId<32>;
}

/// An already-signed, serialized transaction.
///
/// The payload is opaque to the broadcaster: it is produced by an external
/// signer and never mutated. Signature validity is not checked here, an
/// invalid payload surfaces as a submission error from the ledger endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignedTransaction(Bytes);

impl SignedTransaction {
    /// Creates a new [`SignedTransaction`] from serialized bytes.
    pub fn new(raw: impl Into<Bytes>) -> Self {
        Self(raw.into())
    }

    /// The serialized transaction payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for SignedTransaction {
    fn from(raw: Vec<u8>) -> Self {
        Self(raw.into())
    }
}

/// An ordered sequence of [`SignedTransaction`]s submitted together.
///
/// The position of a transaction within the batch is the sole key for
/// confirmation tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionBatch {
    transactions: Vec<SignedTransaction>,
}

impl SubmissionBatch {
    /// Creates a new [`SubmissionBatch`].
    pub fn new(transactions: Vec<SignedTransaction>) -> Self {
        Self { transactions }
    }

    /// Returns the [`BatchId`] of the batch.
    pub fn id(&self) -> BatchId {
        // Hash of per-transaction hashes, so payload boundaries matter.
        let mut digests = Vec::with_capacity(32 * self.transactions.len());
        for tx in &self.transactions {
            digests.extend_from_slice(keccak256(tx.as_bytes()).as_slice());
        }
        BatchId(keccak256(digests))
    }

    /// The transactions of the batch, in submission order.
    pub fn transactions(&self) -> &[SignedTransaction] {
        &self.transactions
    }

    /// Number of transactions in the batch.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the batch contains no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl FromIterator<SignedTransaction> for SubmissionBatch {
    fn from_iter<I: IntoIterator<Item = SignedTransaction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Point-in-time finalization answer from the ledger endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizationStatus {
    /// The transaction is permanently recorded and will not be rolled back.
    Finalized,
    /// The transaction has not been observed finalized yet.
    Pending,
}

impl FinalizationStatus {
    /// Whether the status is [`FinalizationStatus::Finalized`].
    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Finalized)
    }
}

/// Broadcast state of a single transaction within a batch.
///
/// `Finalized` is terminal: once entered, no transition leaves it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TxState {
    /// No submission has been acknowledged yet.
    #[default]
    Pending,
    /// A submission was acknowledged, finalization not yet observed.
    Submitted(TxId),
    /// Finalization was observed.
    Finalized(TxId),
}

impl TxState {
    /// Whether the transaction was observed finalized.
    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Finalized(_))
    }

    /// The latest acknowledged identifier, if any.
    pub fn tx_id(&self) -> Option<TxId> {
        match self {
            Self::Submitted(id) | Self::Finalized(id) => Some(*id),
            Self::Pending => None,
        }
    }

    /// Records a submission acknowledgment. A finalized transaction is
    /// unaffected.
    pub fn on_submitted(&mut self, id: TxId) {
        if !self.is_finalized() {
            *self = Self::Submitted(id);
        }
    }

    /// Records a finalization observation for the tracked identifier.
    pub fn on_finalized(&mut self) {
        if let Self::Submitted(id) = self {
            *self = Self::Finalized(*id);
        }
    }
}

/// Bookkeeping for one transaction of a batch across retry rounds.
#[derive(Debug, Default)]
pub struct TxTracker {
    state: TxState,
    submissions: u32,
    last_error: Option<Arc<LedgerError>>,
}

impl TxTracker {
    /// The current [`TxState`].
    pub fn state(&self) -> TxState {
        self.state
    }

    /// Number of submission attempts so far.
    pub fn submissions(&self) -> u32 {
        self.submissions
    }

    /// Whether the transaction was observed finalized.
    pub fn is_finalized(&self) -> bool {
        self.state.is_finalized()
    }

    /// Records the result of a submission attempt.
    pub fn record_submission(&mut self, result: Result<TxId, LedgerError>) {
        self.submissions += 1;
        match result {
            Ok(id) => self.state.on_submitted(id),
            Err(err) => self.last_error = Some(Arc::new(err)),
        }
    }

    /// Records a finalization observation.
    pub fn record_finalized(&mut self) {
        self.state.on_finalized();
    }

    /// The terminal [`TxOutcome`] for this transaction.
    pub fn outcome(&self) -> TxOutcome {
        match self.state {
            TxState::Finalized(id) => TxOutcome::Finalized(id),
            TxState::Submitted(id) => TxOutcome::TimedOut(id),
            TxState::Pending => match &self.last_error {
                Some(err) => TxOutcome::SubmissionFailed(err.clone()),
                None => TxOutcome::NeverSubmitted,
            },
        }
    }
}

/// Terminal outcome of a single transaction within a batch.
#[derive(Debug, Clone)]
pub enum TxOutcome {
    /// The transaction was observed finalized.
    Finalized(TxId),
    /// No submission was ever attempted.
    NeverSubmitted,
    /// Every attempted submission failed; the last error is carried.
    SubmissionFailed(Arc<LedgerError>),
    /// Submissions were acknowledged but finalization was never observed.
    TimedOut(TxId),
}

impl TxOutcome {
    /// Whether the transaction was observed finalized.
    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Finalized(_))
    }
}

/// Result of a full broadcast-confirm run over a batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Per-transaction outcomes, in batch order.
    pub outcomes: Vec<TxOutcome>,
    /// Number of retry rounds consumed.
    pub rounds: u32,
}

impl BatchOutcome {
    /// Whether every transaction in the batch was observed finalized.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(TxOutcome::is_finalized)
    }
}
