use super::{
    coordinator::Coordinator,
    transaction::{BatchOutcome, SubmissionBatch},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use std::pin::Pin;
use tokio::sync::mpsc;

/// Messages accepted by the [`BroadcastService`].
#[derive(Debug)]
pub enum BroadcastServiceMessage {
    /// Message to broadcast a batch.
    SubmitBatch(SubmissionBatch, mpsc::UnboundedSender<BatchStatus>),
}

/// Status of a batch handled by the [`BroadcastService`].
#[derive(Debug, Clone)]
pub enum BatchStatus {
    /// The batch is being broadcast.
    InFlight,
    /// Every transaction of the batch was observed finalized.
    Confirmed(BatchOutcome),
    /// The retry budget ran out with unconfirmed transactions left.
    Exhausted(BatchOutcome),
}

impl BatchStatus {
    /// Whether the status is final.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Confirmed(_) | Self::Exhausted(_))
    }

    /// The batch outcome, if the status is final.
    pub fn outcome(&self) -> Option<&BatchOutcome> {
        match self {
            Self::Confirmed(outcome) | Self::Exhausted(outcome) => Some(outcome),
            Self::InFlight => None,
        }
    }
}

/// Handle to communicate with the [`BroadcastService`].
#[derive(Debug, Clone)]
pub struct BroadcastServiceHandle {
    command_tx: mpsc::UnboundedSender<BroadcastServiceMessage>,
}

impl BroadcastServiceHandle {
    /// Submits a batch for broadcasting, returning a stream of status
    /// updates ending in a final [`BatchStatus`].
    pub fn submit_batch(&self, batch: SubmissionBatch) -> mpsc::UnboundedReceiver<BatchStatus> {
        let (status_tx, status_rx) = mpsc::unbounded_channel();
        let _ = self.command_tx.send(BroadcastServiceMessage::SubmitBatch(batch, status_tx));
        status_rx
    }
}

/// Service driving batch broadcasts.
///
/// Batches are handled concurrently; each runs its own broadcast-confirm
/// loop on the shared [`Coordinator`].
#[derive(Debug)]
pub struct BroadcastService {
    /// Coordinator running the broadcast-confirm loop for each batch.
    coordinator: Coordinator,
    /// Incoming messages for the service.
    command_rx: mpsc::UnboundedReceiver<BroadcastServiceMessage>,
}

impl BroadcastService {
    /// Creates a new [`BroadcastService`].
    pub fn new(coordinator: Coordinator) -> (Self, BroadcastServiceHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        (Self { coordinator, command_rx }, BroadcastServiceHandle { command_tx })
    }

    /// Creates a new [`BroadcastService`] and spawns it.
    pub fn spawn(coordinator: Coordinator) -> BroadcastServiceHandle {
        let (this, handle) = Self::new(coordinator);
        tokio::spawn(this.into_future());
        handle
    }

    /// Converts [`BroadcastService`] into its event loop future.
    async fn into_future(mut self) {
        let mut in_flight: FuturesUnordered<Pin<Box<dyn Future<Output = ()> + Send>>> =
            FuturesUnordered::new();

        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(BroadcastServiceMessage::SubmitBatch(batch, status_tx)) => {
                        let coordinator = self.coordinator.clone();
                        in_flight.push(Box::pin(async move {
                            let _ = status_tx.send(BatchStatus::InFlight);

                            let outcome = coordinator.submit_and_confirm(batch).await;
                            let status = if outcome.is_success() {
                                BatchStatus::Confirmed(outcome)
                            } else {
                                BatchStatus::Exhausted(outcome)
                            };
                            let _ = status_tx.send(status);
                        }));
                    }
                    None => break, // all handles dropped
                },
                Some(_) = in_flight.next() => {}
            }
        }

        // Finish batches that were in flight when the last handle dropped.
        while in_flight.next().await.is_some() {}
    }
}
