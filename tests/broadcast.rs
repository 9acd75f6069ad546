//! Integration tests for the broadcast-confirm coordinator.

use broadcaster::{
    broadcast::{
        BatchStatus, BroadcastService, Coordinator, SignedTransaction, SubmissionBatch, TxOutcome,
    },
    config::CoordinatorConfig,
    ledger::{
        Ledger,
        mock::{MockLedger, TxScript},
    },
};
use std::time::Duration;

fn test_config(retry_budget: u32) -> CoordinatorConfig {
    CoordinatorConfig::default()
        .with_retry_budget(retry_budget)
        .with_observation_window(Duration::from_millis(40))
        .with_poll_interval(Duration::from_millis(10))
}

fn coordinator(ledger: &MockLedger, retry_budget: u32) -> Coordinator {
    Coordinator::new(Ledger::mocked(ledger.clone()), test_config(retry_budget))
}

fn tx(byte: u8) -> SignedTransaction {
    SignedTransaction::new(vec![byte; 8])
}

#[tokio::test]
async fn batch_finalizing_in_first_round_succeeds_with_one_submission_each() {
    let ledger = MockLedger::default();
    let batch = SubmissionBatch::new(vec![tx(1), tx(2), tx(3)]);

    let outcome = coordinator(&ledger, 50).submit_and_confirm(batch.clone()).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.rounds, 1);
    assert_eq!(ledger.total_submissions().await, 3);
    for transaction in batch.transactions() {
        assert_eq!(ledger.submissions(transaction).await, 1);
    }
    for (transaction, outcome) in batch.transactions().iter().zip(&outcome.outcomes) {
        assert!(
            matches!(outcome, TxOutcome::Finalized(id) if *id == MockLedger::tx_id(transaction))
        );
    }
}

#[tokio::test]
async fn unfinalizable_transaction_exhausts_the_full_budget() {
    let ledger = MockLedger::default();
    let batch = SubmissionBatch::new(vec![tx(1), tx(2)]);
    ledger.script(&tx(2), TxScript::never_finalizes()).await;

    let outcome = coordinator(&ledger, 3).submit_and_confirm(batch).await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.rounds, 3);
    // The finalized transaction is never resubmitted; the straggler is
    // resubmitted once per round.
    assert_eq!(ledger.submissions(&tx(1)).await, 1);
    assert_eq!(ledger.submissions(&tx(2)).await, 3);
    assert!(matches!(outcome.outcomes[0], TxOutcome::Finalized(_)));
    assert!(
        matches!(outcome.outcomes[1], TxOutcome::TimedOut(id) if id == MockLedger::tx_id(&tx(2)))
    );
}

#[tokio::test]
async fn submission_error_is_retried_next_round() {
    let ledger = MockLedger::default();
    let batch = SubmissionBatch::new(vec![tx(1)]);
    ledger.script(&tx(1), TxScript::immediate().with_rejected_submissions(1)).await;

    let outcome = coordinator(&ledger, 50).submit_and_confirm(batch).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.rounds, 2);
    assert_eq!(ledger.submissions(&tx(1)).await, 2);
}

#[tokio::test]
async fn zero_budget_fails_without_submitting() {
    let ledger = MockLedger::default();
    let batch = SubmissionBatch::new(vec![tx(1), tx(2)]);

    let outcome = coordinator(&ledger, 0).submit_and_confirm(batch).await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.rounds, 0);
    assert_eq!(ledger.total_submissions().await, 0);
    assert!(outcome.outcomes.iter().all(|o| matches!(o, TxOutcome::NeverSubmitted)));
}

#[tokio::test]
async fn always_rejected_submission_reports_the_error() {
    let ledger = MockLedger::default();
    let batch = SubmissionBatch::new(vec![tx(1)]);
    ledger.script(&tx(1), TxScript::immediate().with_rejected_submissions(u32::MAX)).await;

    let outcome = coordinator(&ledger, 2).submit_and_confirm(batch).await;

    assert!(!outcome.is_success());
    assert_eq!(ledger.submissions(&tx(1)).await, 2);
    assert!(matches!(&outcome.outcomes[0], TxOutcome::SubmissionFailed(err)
        if err.to_string().contains("connection reset")));
}

#[tokio::test]
async fn finalization_order_does_not_affect_the_result() {
    for transactions in [vec![tx(1), tx(2)], vec![tx(2), tx(1)]] {
        let ledger = MockLedger::default();
        ledger.script(&tx(1), TxScript::immediate().with_pending_polls(1)).await;
        let batch = SubmissionBatch::new(transactions);

        let outcome = coordinator(&ledger, 50).submit_and_confirm(batch).await;

        assert!(outcome.is_success());
        assert!(outcome.outcomes.iter().all(TxOutcome::is_finalized));
    }
}

#[tokio::test]
async fn empty_batch_confirms_immediately() {
    let ledger = MockLedger::default();

    let outcome = coordinator(&ledger, 50).submit_and_confirm(SubmissionBatch::new(vec![])).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.rounds, 1);
    assert_eq!(ledger.total_submissions().await, 0);
}

#[tokio::test]
async fn service_streams_statuses_until_confirmation() {
    let ledger = MockLedger::default();
    let handle = BroadcastService::spawn(coordinator(&ledger, 50));

    let mut status_rx = handle.submit_batch(SubmissionBatch::new(vec![tx(1), tx(2)]));

    let status = status_rx.recv().await.unwrap();
    assert!(matches!(status, BatchStatus::InFlight));
    assert!(!status.is_final());

    let status = status_rx.recv().await.unwrap();
    assert!(status.is_final());
    match status {
        BatchStatus::Confirmed(outcome) => assert!(outcome.is_success()),
        other => panic!("unexpected status: {other:?}"),
    }
}

#[tokio::test]
async fn service_reports_exhaustion() {
    let ledger = MockLedger::default();
    ledger.script(&tx(1), TxScript::never_finalizes()).await;
    let handle = BroadcastService::spawn(coordinator(&ledger, 2));

    let mut status_rx = handle.submit_batch(SubmissionBatch::new(vec![tx(1)]));

    assert!(matches!(status_rx.recv().await.unwrap(), BatchStatus::InFlight));
    match status_rx.recv().await.unwrap() {
        BatchStatus::Exhausted(outcome) => {
            assert!(!outcome.is_success());
            assert_eq!(outcome.rounds, 2);
        }
        other => panic!("unexpected status: {other:?}"),
    }
}
