//! Chunk dispatch to the inference capability
//!
//! Results always reach the consumer in ascending chunk index order, whatever
//! the dispatch mode. A failed chunk is reported as a failure result and never
//! stops the other chunks.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::errors::ChunkFailure;
use crate::domain::model::{ChunkDescriptor, ChunkResult, Credential, DispatchMode, RawScene};
use crate::domain::rules::{ResponseValidator, SCENE_INSTRUCTIONS};
use crate::ports::{ChunkSourcePort, InferencePort};

/// Default per-chunk time limit
pub const DEFAULT_CHUNK_TIMEOUT: Duration = Duration::from_secs(300);

/// Dispatch settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOptions {
    pub mode: DispatchMode,
    /// Parallel-mode cap; `None` sends every chunk at once
    pub max_concurrency: Option<usize>,
    pub chunk_timeout: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            mode: DispatchMode::Sequential,
            max_concurrency: None,
            chunk_timeout: DEFAULT_CHUNK_TIMEOUT,
        }
    }
}

/// Sends chunks to the inference capability and reports ordered results
pub struct ChunkDispatcher {
    worker: ChunkWorker,
    options: DispatchOptions,
}

/// Processes a single chunk; cheap to clone into concurrent tasks
#[derive(Clone)]
struct ChunkWorker {
    inference: Arc<dyn InferencePort>,
    chunks: Arc<dyn ChunkSourcePort>,
    credential: Credential,
    timeout: Duration,
}

impl ChunkDispatcher {
    /// Create a dispatcher with the run's injected credential
    pub fn new(
        inference: Arc<dyn InferencePort>,
        chunks: Arc<dyn ChunkSourcePort>,
        credential: Credential,
        options: DispatchOptions,
    ) -> Self {
        let worker = ChunkWorker {
            inference,
            chunks,
            credential,
            timeout: options.chunk_timeout,
        };
        Self { worker, options }
    }

    /// Start dispatching and return the ordered result stream.
    ///
    /// Cancelling `cancel` stops further calls and drops in-flight ones.
    /// Dropping the receiver has the same effect.
    pub fn dispatch(
        &self,
        mut descriptors: Vec<ChunkDescriptor>,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<ChunkResult> {
        descriptors.sort_by_key(|d| d.index);

        let (tx, rx) = mpsc::channel(1);
        let worker = self.worker.clone();
        let options = self.options.clone();

        info!(
            chunks = descriptors.len(),
            mode = ?options.mode,
            "Dispatching chunks"
        );

        tokio::spawn(async move {
            match options.mode {
                DispatchMode::Sequential => run_sequential(worker, descriptors, tx, cancel).await,
                DispatchMode::Parallel => {
                    run_parallel(worker, descriptors, options.max_concurrency, tx, cancel).await
                }
            }
        });

        rx
    }
}

async fn run_sequential(
    worker: ChunkWorker,
    descriptors: Vec<ChunkDescriptor>,
    tx: mpsc::Sender<ChunkResult>,
    cancel: CancellationToken,
) {
    for descriptor in descriptors {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Sequential dispatch cancelled");
                return;
            }
            result = worker.process(descriptor) => result,
        };

        if tx.send(result).await.is_err() {
            debug!("Result consumer dropped, stopping dispatch");
            return;
        }
    }
}

async fn run_parallel(
    worker: ChunkWorker,
    descriptors: Vec<ChunkDescriptor>,
    max_concurrency: Option<usize>,
    tx: mpsc::Sender<ChunkResult>,
    cancel: CancellationToken,
) {
    let mut expected: VecDeque<usize> = descriptors.iter().map(|d| d.index).collect();
    let limiter = max_concurrency.map(|n| Arc::new(Semaphore::new(n.max(1))));

    let mut in_flight = FuturesUnordered::new();
    for descriptor in descriptors {
        let worker = worker.clone();
        let limiter = limiter.clone();
        in_flight.push(async move {
            // The semaphore is never closed, so acquisition only waits
            let _permit = match limiter {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };
            worker.process(descriptor).await
        });
    }

    // Completed out of order, held until every lower index has been sent
    let mut pending: BTreeMap<usize, ChunkResult> = BTreeMap::new();

    loop {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(in_flight = in_flight.len(), "Parallel dispatch cancelled");
                return;
            }
            next = in_flight.next() => match next {
                Some(result) => result,
                None => break,
            },
        };

        pending.insert(result.index, result);

        while let Some(next_index) = expected.front().copied() {
            let Some(ready) = pending.remove(&next_index) else {
                break;
            };
            expected.pop_front();
            if tx.send(ready).await.is_err() {
                debug!("Result consumer dropped, stopping dispatch");
                return;
            }
        }
    }
}

impl ChunkWorker {
    async fn process(&self, descriptor: ChunkDescriptor) -> ChunkResult {
        let index = descriptor.index;
        debug!(chunk = index, start = descriptor.start_offset, "Sending chunk");

        let outcome = match tokio::time::timeout(self.timeout, self.call(&descriptor)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ChunkFailure::Timeout(self.timeout.as_secs())),
        };

        match outcome {
            Ok(scenes) => {
                debug!(chunk = index, scenes = scenes.len(), "Chunk analysed");
                ChunkResult::success(index, scenes)
            }
            Err(failure) => {
                warn!(chunk = index, error = %failure, "Chunk failed");
                ChunkResult::failure(index, failure)
            }
        }
    }

    async fn call(&self, descriptor: &ChunkDescriptor) -> Result<Vec<RawScene>, ChunkFailure> {
        let payload = self.chunks.load_payload(descriptor).await?;
        let text = self
            .inference
            .detect_scenes(&self.credential, &payload, SCENE_INSTRUCTIONS)
            .await?;
        ResponseValidator::parse(&text)
    }
}
