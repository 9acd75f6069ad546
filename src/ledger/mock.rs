//! Scripted ledger endpoint implementation in-process. For testing only.

use super::api::{LedgerApi, Result};
use crate::{
    broadcast::{FinalizationStatus, SignedTransaction, TxId},
    error::LedgerError,
};
use alloy_primitives::keccak256;
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Scripted endpoint behavior for a single transaction payload.
#[derive(Debug, Clone)]
pub struct TxScript {
    /// Number of initial submissions that fail with a transport error.
    pub rejected_submissions: u32,
    /// Number of finalization queries answered [`FinalizationStatus::Pending`]
    /// after a successful submission before the transaction is reported
    /// finalized. `None` means it never finalizes.
    pub pending_polls: Option<u32>,
}

impl Default for TxScript {
    fn default() -> Self {
        // Finalize on the first query.
        Self { rejected_submissions: 0, pending_polls: Some(0) }
    }
}

impl TxScript {
    /// Finalizes on the first query after a successful submission.
    pub fn immediate() -> Self {
        Self::default()
    }

    /// Never finalizes.
    pub fn never_finalizes() -> Self {
        Self { rejected_submissions: 0, pending_polls: None }
    }

    /// Fails the first `count` submissions with a transport error.
    pub fn with_rejected_submissions(mut self, count: u32) -> Self {
        self.rejected_submissions = count;
        self
    }

    /// Answers [`FinalizationStatus::Pending`] to the first `count`
    /// finalization queries.
    pub fn with_pending_polls(mut self, count: u32) -> Self {
        self.pending_polls = Some(count);
        self
    }
}

/// Per-payload bookkeeping.
#[derive(Debug, Default)]
struct TxRecord {
    script: TxScript,
    submissions: u32,
    polls: u32,
}

/// Scripted in-process ledger endpoint. Used for testing only.
///
/// Unscripted payloads finalize on the first query after a successful
/// submission. Clones share state, so a test can keep one clone for
/// assertions while the coordinator owns another.
#[derive(Debug, Clone, Default)]
pub struct MockLedger {
    records: Arc<RwLock<HashMap<TxId, TxRecord>>>,
}

impl MockLedger {
    /// The identifier this endpoint acknowledges `tx` with.
    pub fn tx_id(tx: &SignedTransaction) -> TxId {
        TxId(keccak256(tx.as_bytes()))
    }

    /// Scripts the endpoint behavior for a payload.
    pub async fn script(&self, tx: &SignedTransaction, script: TxScript) {
        let mut records = self.records.write().await;
        records.entry(Self::tx_id(tx)).or_default().script = script;
    }

    /// Number of submissions observed for a payload.
    pub async fn submissions(&self, tx: &SignedTransaction) -> u32 {
        let records = self.records.read().await;
        records.get(&Self::tx_id(tx)).map(|record| record.submissions).unwrap_or_default()
    }

    /// Total number of submissions observed across all payloads.
    pub async fn total_submissions(&self) -> u32 {
        let records = self.records.read().await;
        records.values().map(|record| record.submissions).sum()
    }
}

#[async_trait]
impl LedgerApi for MockLedger {
    async fn submit_transaction(&self, tx: &SignedTransaction) -> Result<TxId> {
        let id = Self::tx_id(tx);
        let mut records = self.records.write().await;
        let record = records.entry(id).or_default();
        record.submissions += 1;

        if record.submissions <= record.script.rejected_submissions {
            return Err(LedgerError::Transport("connection reset".into()));
        }

        Ok(id)
    }

    async fn finalization_status(&self, id: TxId) -> Result<FinalizationStatus> {
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(&id) else {
            return Ok(FinalizationStatus::Pending);
        };

        match record.script.pending_polls {
            Some(pending) if record.polls >= pending => Ok(FinalizationStatus::Finalized),
            _ => {
                record.polls += 1;
                Ok(FinalizationStatus::Pending)
            }
        }
    }
}
