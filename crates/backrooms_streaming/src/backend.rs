//! # Generation Backends
//!
//! The engine never calls the generator directly. It submits requests to a
//! `GenerationBackend` and later drains completed outcomes, in whatever
//! order they finish.
//!
//! ## Architecture
//!
//! ```text
//!   Engine ──submit──> [job channel] ──> chunk-gen-0 ──┐
//!                                   ──> chunk-gen-1 ──┼──> [done channel] ──try_drain──> Engine
//!                                   ──> chunk-gen-N ──┘
//! ```
//!
//! Responses move through the done channel by value: the geometry vectors
//! change owner, their contents are never copied.

use std::collections::VecDeque;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use backrooms_procedural::{
    generate_chunk, ChunkCoord, GenerationError, GenerationRequest, GenerationResponse,
    GenerationResult, SessionSeed,
};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::error::{StreamError, StreamResult};

/// Function that turns a request into a chunk.
pub type Generator = fn(&GenerationRequest) -> GenerationResult<GenerationResponse>;

/// Upper bound on automatically sized pools.
const MAX_DEFAULT_WORKERS: usize = 4;

/// Result of one generation request.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// The chunk was generated.
    Ready(GenerationResponse),
    /// Generation failed for this chunk only.
    Failed {
        /// Seed of the failed request.
        seed: SessionSeed,
        /// Coordinate of the failed request.
        coord: ChunkCoord,
        /// What went wrong.
        error: GenerationError,
    },
}

impl GenerationOutcome {
    /// Runs `generator` and wraps the result.
    #[must_use]
    pub fn generate(generator: Generator, request: &GenerationRequest) -> Self {
        match generator(request) {
            Ok(response) => Self::Ready(response),
            Err(error) => Self::Failed {
                seed: request.seed.clone(),
                coord: request.coord,
                error,
            },
        }
    }

    /// Seed the outcome belongs to.
    #[must_use]
    pub fn seed(&self) -> &SessionSeed {
        match self {
            Self::Ready(response) => &response.seed,
            Self::Failed { seed, .. } => seed,
        }
    }

    /// Coordinate the outcome belongs to.
    #[must_use]
    pub fn coord(&self) -> ChunkCoord {
        match self {
            Self::Ready(response) => response.coord,
            Self::Failed { coord, .. } => *coord,
        }
    }
}

/// Where generation requests go and completed chunks come back from.
pub trait GenerationBackend {
    /// Queues a request. Must not block on generation.
    ///
    /// # Errors
    ///
    /// Returns `BackendDisconnected` if the backend can no longer accept work.
    fn submit(&mut self, request: GenerationRequest) -> StreamResult<()>;

    /// Takes every outcome that has completed so far, without blocking.
    fn try_drain(&mut self) -> Vec<GenerationOutcome>;

    /// Waits up to `timeout` for the next outcome.
    ///
    /// # Errors
    ///
    /// Returns `BackendDisconnected` if no outcome can ever arrive.
    fn wait_for(&mut self, timeout: Duration) -> StreamResult<Option<GenerationOutcome>>;
}

/// Pool of generation threads fed through crossbeam channels.
///
/// Dropping the pool closes the job queue and joins every worker. Requests
/// still queued at that point are generated and discarded.
#[derive(Debug)]
pub struct WorkerPool {
    jobs: Option<Sender<GenerationRequest>>,
    done: Receiver<GenerationOutcome>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `worker_count` threads running [`generate_chunk`].
    ///
    /// # Errors
    ///
    /// Returns `WorkerSpawn` if a thread cannot be created.
    pub fn new(worker_count: usize) -> StreamResult<Self> {
        Self::with_generator(worker_count, generate_chunk)
    }

    /// Sizes the pool from the available parallelism, keeping one core for
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns `WorkerSpawn` if a thread cannot be created.
    pub fn with_default_workers() -> StreamResult<Self> {
        let cores = thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
        Self::new(cores.saturating_sub(1).clamp(1, MAX_DEFAULT_WORKERS))
    }

    /// Spawns `worker_count` threads running `generator`.
    ///
    /// # Errors
    ///
    /// Returns `WorkerSpawn` if a thread cannot be created.
    pub fn with_generator(worker_count: usize, generator: Generator) -> StreamResult<Self> {
        let (job_tx, job_rx) = unbounded::<GenerationRequest>();
        let (done_tx, done_rx) = unbounded::<GenerationOutcome>();

        let mut workers = Vec::with_capacity(worker_count.max(1));
        for index in 0..worker_count.max(1) {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("chunk-gen-{index}"))
                .spawn(move || worker_loop(generator, &job_rx, &done_tx))
                .map_err(|e| StreamError::WorkerSpawn(e.to_string()))?;
            workers.push(handle);
        }

        tracing::info!("Generation pool started with {} workers", workers.len());

        Ok(Self {
            jobs: Some(job_tx),
            done: done_rx,
            workers,
        })
    }

    /// Number of worker threads.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

fn worker_loop(
    generator: Generator,
    jobs: &Receiver<GenerationRequest>,
    done: &Sender<GenerationOutcome>,
) {
    while let Ok(request) = jobs.recv() {
        let outcome = GenerationOutcome::generate(generator, &request);
        if done.send(outcome).is_err() {
            break;
        }
    }
}

impl GenerationBackend for WorkerPool {
    fn submit(&mut self, request: GenerationRequest) -> StreamResult<()> {
        let jobs = self.jobs.as_ref().ok_or(StreamError::BackendDisconnected)?;
        jobs.send(request).map_err(|_| StreamError::BackendDisconnected)
    }

    fn try_drain(&mut self) -> Vec<GenerationOutcome> {
        self.done.try_iter().collect()
    }

    fn wait_for(&mut self, timeout: Duration) -> StreamResult<Option<GenerationOutcome>> {
        match self.done.recv_timeout(timeout) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(StreamError::BackendDisconnected),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the queue ends every worker loop
        self.jobs = None;
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("Generation worker panicked during shutdown");
            }
        }
        tracing::info!("Generation pool stopped");
    }
}

/// Generates on submit, delivers on the next drain.
///
/// For single-threaded targets and deterministic tests. Delivery is still
/// deferred so the engine sees the same submit-then-poll sequence as with
/// a worker pool.
pub struct InlineBackend {
    generator: Generator,
    ready: VecDeque<GenerationOutcome>,
}

impl InlineBackend {
    /// Backend running [`generate_chunk`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_generator(generate_chunk)
    }

    /// Backend running a custom generator.
    #[must_use]
    pub fn with_generator(generator: Generator) -> Self {
        Self {
            generator,
            ready: VecDeque::new(),
        }
    }

    /// Outcomes waiting to be drained.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.ready.len()
    }
}

impl std::fmt::Debug for InlineBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InlineBackend")
            .field("queued", &self.ready.len())
            .finish_non_exhaustive()
    }
}

impl Default for InlineBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationBackend for InlineBackend {
    fn submit(&mut self, request: GenerationRequest) -> StreamResult<()> {
        self.ready
            .push_back(GenerationOutcome::generate(self.generator, &request));
        Ok(())
    }

    fn try_drain(&mut self) -> Vec<GenerationOutcome> {
        self.ready.drain(..).collect()
    }

    fn wait_for(&mut self, _timeout: Duration) -> StreamResult<Option<GenerationOutcome>> {
        Ok(self.ready.pop_front())
    }
}
