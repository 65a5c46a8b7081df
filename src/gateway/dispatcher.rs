//! Runs backend calls off the UI thread.
//!
//! Only the most recent submission matters: submitting cancels the request
//! still in flight, and any outcome that is not tagged with the latest id is
//! dropped when it is received.

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use super::client::SummaryClient;
use super::error::GatewayError;
use super::types::SummaryRequest;
use crate::models::Endpoint;

pub type RequestId = u64;

/// A unit of backend work
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    Summarize { endpoint: Endpoint, request: SummaryRequest },
    /// Re-summarize the current transcript
    Rephrase { request: SummaryRequest },
    ClearMemory,
}

#[derive(Debug)]
pub enum Outcome {
    Summary { endpoint: Endpoint, result: Result<String, GatewayError> },
    Rephrase { result: Result<String, GatewayError> },
    MemoryCleared { result: Result<(), GatewayError> },
}

#[derive(Debug)]
pub struct Completed {
    pub id: RequestId,
    pub outcome: Outcome,
}

/// Execute `job` to completion
pub async fn run_job(client: &SummaryClient, job: Job) -> Outcome {
    match job {
        Job::Summarize { endpoint, request } => {
            let result = client.summarize(endpoint, &request).await;
            Outcome::Summary { endpoint, result }
        }
        Job::Rephrase { request } => {
            let result = client.summarize(Endpoint::Summarize, &request).await;
            Outcome::Rephrase { result }
        }
        Job::ClearMemory => Outcome::MemoryCleared { result: client.clear_memory().await },
    }
}

pub struct Dispatcher {
    client: SummaryClient,
    handle: Handle,
    tx: UnboundedSender<Completed>,
    rx: UnboundedReceiver<Completed>,
    latest: RequestId,
    in_flight: Option<CancellationToken>,
}

impl Dispatcher {
    pub fn new(client: SummaryClient, handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { client, handle, tx, rx, latest: 0, in_flight: None }
    }

    pub fn client(&self) -> &SummaryClient {
        &self.client
    }

    /// Start `job`, superseding whatever is still running
    pub fn submit(&mut self, job: Job) -> RequestId {
        self.cancel();
        self.latest += 1;
        let id = self.latest;

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.handle.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(id, "Request cancelled");
                }
                outcome = run_job(&client, job) => {
                    // The receiver only goes away on shutdown
                    let _ = tx.send(Completed { id, outcome });
                }
            }
        });
        id
    }

    /// Abort the in-flight request, if any
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn latest(&self) -> RequestId {
        self.latest
    }

    fn accept(&mut self, completed: Completed) -> Option<Completed> {
        if completed.id != self.latest {
            tracing::debug!(id = completed.id, latest = self.latest, "Dropping stale outcome");
            return None;
        }
        self.in_flight = None;
        Some(completed)
    }

    /// Non-blocking poll for the latest outcome, called once per frame
    pub fn try_next(&mut self) -> Option<Completed> {
        while let Ok(completed) = self.rx.try_recv() {
            if let Some(current) = self.accept(completed) {
                return Some(current);
            }
        }
        None
    }

    /// Wait for the latest outcome. Returns `None` when nothing is pending.
    pub async fn next(&mut self) -> Option<Completed> {
        while self.is_pending() {
            let completed = self.rx.recv().await?;
            if let Some(current) = self.accept(completed) {
                return Some(current);
            }
        }
        None
    }
}
