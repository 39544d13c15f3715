use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::WorkerError;
use crate::message::{DecodeRequest, DecodeResponse};
use crate::task::DecodeTask;

/// Default number of requests that may wait in a worker's inbox.
pub const DEFAULT_QUEUE_DEPTH: usize = 64;

/// One queued request together with the channel its answer goes back on.
struct Job {
    request: DecodeRequest,
    reply: oneshot::Sender<DecodeResponse>,
}

/// Long-lived background decoder driven by message passing.
///
/// The worker owns an inbox. Callers post a [`DecodeRequest`] and get
/// back a one-shot reply channel; the worker answers every accepted
/// request exactly once, strictly in the order the requests arrived.
///
/// ```text
///   caller ──post(request)──▶ [ inbox ] ──▶ worker loop ──▶ DecodeTask::dispatch
///      ▲                                        │
///      └──────────── oneshot reply ◀────────────┘
/// ```
///
/// Requests are processed one at a time. For parallel decoding, spawn
/// several workers.
pub struct DecodeWorker {
    inbox: mpsc::Sender<Job>,
    join: JoinHandle<()>,
}

impl DecodeWorker {
    /// Spawn a worker with the default queue depth.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(task: DecodeTask) -> Self {
        Self::with_queue_depth(task, DEFAULT_QUEUE_DEPTH)
    }

    /// Spawn a worker whose inbox holds at most `depth` pending requests.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero.
    #[must_use]
    pub fn with_queue_depth(task: DecodeTask, depth: usize) -> Self {
        let (inbox, mut jobs) = mpsc::channel::<Job>(depth);
        let join = tokio::spawn(async move {
            let mut served: u64 = 0;
            while let Some(Job { request, reply }) = jobs.recv().await {
                let response = task.dispatch(request).await;
                served += 1;
                if reply.send(response).is_err() {
                    tracing::debug!(served, "caller went away before the reply");
                }
            }
            tracing::debug!(served, "decode worker inbox closed");
        });
        Self { inbox, join }
    }

    /// Queue `request` and return the channel its response will arrive on.
    ///
    /// Waits for inbox space if the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Closed`] if the worker has stopped.
    pub async fn post(&self, request: DecodeRequest) -> Result<oneshot::Receiver<DecodeResponse>, WorkerError> {
        let (reply, response) = oneshot::channel();
        self.inbox
            .send(Job { request, reply })
            .await
            .map_err(|_| WorkerError::Closed)?;
        Ok(response)
    }

    /// Queue `request` and wait for its response.
    ///
    /// # Errors
    ///
    /// - [`WorkerError::Closed`] if the worker has stopped.
    /// - [`WorkerError::ReplyDropped`] if the worker stopped while the
    ///   request was in flight.
    pub async fn submit(&self, request: DecodeRequest) -> Result<DecodeResponse, WorkerError> {
        self.post(request)
            .await?
            .await
            .map_err(|_| WorkerError::ReplyDropped)
    }

    /// Stop accepting requests, drain the inbox, and wait for the worker
    /// to finish.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Join`] if the worker task panicked.
    pub async fn shutdown(self) -> Result<(), WorkerError> {
        drop(self.inbox);
        self.join.await?;
        Ok(())
    }
}
