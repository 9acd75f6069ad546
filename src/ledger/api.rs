//! Ledger endpoint api.

use crate::{
    broadcast::{FinalizationStatus, SignedTransaction, TxId},
    error::LedgerError,
};
use async_trait::async_trait;
use std::fmt::Debug;

/// Type alias for `Result<T, LedgerError>`
pub type Result<T> = core::result::Result<T, LedgerError>;

/// Ledger endpoint API.
///
/// The endpoint is expected to reject duplicate submissions of an
/// already-processed transaction without side effects, which is what makes
/// at-least-once submission by the broadcaster safe.
#[async_trait]
pub trait LedgerApi: Debug + Send + Sync {
    /// Broadcasts a serialized, already-signed transaction.
    ///
    /// Best effort: preflight checks are skipped, and the returned
    /// acknowledgment does not imply finalization.
    async fn submit_transaction(&self, tx: &SignedTransaction) -> Result<TxId>;

    /// Point-in-time finalization check for a previously acknowledged
    /// submission.
    async fn finalization_status(&self, id: TxId) -> Result<FinalizationStatus>;
}
