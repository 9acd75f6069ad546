//! # Broadcaster
//!
//! Library for broadcasting batches of pre-signed transactions and tracking
//! their finalization.

pub mod broadcast;
pub mod config;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod serde;
