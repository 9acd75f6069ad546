//! Broadcaster error types.

use thiserror::Error;

/// Errors surfaced by a ledger endpoint.
///
/// The coordinator treats all of these as transient: a failed submission is
/// retried on the next round and a failed finalization query is treated as
/// "still pending". They are never propagated to the caller directly, but the
/// last submission error of an index is carried in its outcome.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The endpoint could not be reached or the request did not complete.
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint refused the submission.
    #[error("submission rejected: {0}")]
    Rejected(String),

    /// Other errors.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}
