//! Service responsible for broadcasting batches of pre-signed transactions.

mod coordinator;
pub use coordinator::*;
mod service;
pub use service::*;
mod transaction;
pub use transaction::{
    BatchId, BatchOutcome, FinalizationStatus, SignedTransaction, SubmissionBatch, TxId,
    TxOutcome, TxState, TxTracker,
};

pub mod metrics;
