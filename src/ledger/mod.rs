//! Ledger endpoint abstraction.

mod api;
pub use api::LedgerApi;
pub mod mock;

use crate::broadcast::{FinalizationStatus, SignedTransaction, TxId};
use async_trait::async_trait;
use std::sync::Arc;

/// Ledger endpoint interface.
#[derive(Debug, Clone)]
pub struct Ledger {
    inner: Arc<dyn LedgerApi>,
}

impl Ledger {
    /// Creates a [`Ledger`] backed by the given endpoint implementation.
    pub fn new(inner: Arc<dyn LedgerApi>) -> Self {
        Self { inner }
    }

    /// Creates a [`Ledger`] with a scripted in-process backend. Used for
    /// testing only.
    pub fn mocked(mock: mock::MockLedger) -> Self {
        Self { inner: Arc::new(mock) }
    }
}

#[async_trait]
impl LedgerApi for Ledger {
    async fn submit_transaction(&self, tx: &SignedTransaction) -> api::Result<TxId> {
        self.inner.submit_transaction(tx).await
    }

    async fn finalization_status(&self, id: TxId) -> api::Result<FinalizationStatus> {
        self.inner.finalization_status(id).await
    }
}
