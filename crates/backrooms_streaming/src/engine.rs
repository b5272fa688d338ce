//! # Chunk Stream Engine
//!
//! Keeps a moving observer supplied with nearby maze geometry.
//!
//! ## Per-chunk lifecycle
//!
//! ```text
//!   unrequested ──request──> pending ──ingest──> cached ──evict──> (gone)
//!        ^                      │
//!        └───── failed ─────────┘
//! ```
//!
//! ## Sync pass
//!
//! 1. Touch cached chunks within `cache_radius` of the reference chunk and
//!    request the ones that are neither cached nor pending (nearest first)
//! 2. Evict chunks farther than `cache_radius + 1`
//! 3. Evict least recently touched chunks over the hard capacity
//! 4. Rebuild and publish the snapshot
//!
//! The engine never blocks: requests are fire-and-forget, and outcomes are
//! applied whenever `poll` finds them, in arrival order.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use backrooms_procedural::{ChunkCoord, GenerationResponse, SessionSeed, WorldConfig};

use crate::backend::{GenerationBackend, GenerationOutcome, WorkerPool};
use crate::cache::ChunkCache;
use crate::error::StreamResult;
use crate::snapshot::{SnapshotHandle, StreamSnapshot};

/// Streaming counters for the current engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Generation requests submitted.
    pub requested: u64,
    /// Responses inserted into the cache.
    pub ingested: u64,
    /// Responses dropped because their seed is no longer live.
    pub stale_discarded: u64,
    /// Generation faults reported by the backend.
    pub failed: u64,
    /// Requests the backend refused.
    pub submit_errors: u64,
    /// Chunks evicted for being too far away.
    pub evicted_distance: u64,
    /// Chunks evicted to stay within capacity.
    pub evicted_capacity: u64,
    /// Seed changes handled.
    pub seed_resets: u64,
    /// Chunks currently cached.
    pub loaded: usize,
    /// Requests currently in flight.
    pub pending: usize,
}

/// Owns the chunk cache and pending set for one play session.
#[derive(Debug)]
pub struct ChunkStreamEngine<B: GenerationBackend = WorkerPool> {
    config: WorldConfig,
    seed: SessionSeed,
    backend: B,
    cache: ChunkCache,
    pending: HashSet<ChunkCoord>,
    center: Option<ChunkCoord>,
    snapshot: Arc<StreamSnapshot>,
    publisher: SnapshotHandle,
    stats: StreamStats,
}

impl ChunkStreamEngine<WorkerPool> {
    /// Engine backed by a worker pool sized to the machine.
    ///
    /// # Errors
    ///
    /// Returns `Config` for an invalid configuration and `WorkerSpawn` if
    /// the pool cannot start.
    pub fn with_worker_pool(config: WorldConfig, seed: SessionSeed) -> StreamResult<Self> {
        config.validate()?;
        Self::new(config, seed, WorkerPool::with_default_workers()?)
    }
}

impl<B: GenerationBackend> ChunkStreamEngine<B> {
    /// Creates an engine for one session.
    ///
    /// Nothing is requested until the first [`sync_around`](Self::sync_around)
    /// or [`update_position`](Self::update_position).
    ///
    /// # Errors
    ///
    /// Returns `Config` if the configuration fails validation.
    pub fn new(config: WorldConfig, seed: SessionSeed, backend: B) -> StreamResult<Self> {
        config.validate()?;
        let capacity = config.max_cache_entries();

        tracing::info!(
            "Stream engine ready: seed={} chunk_size={} cache_radius={} capacity={}",
            seed.prefix(8),
            config.chunk_size,
            config.cache_radius,
            capacity
        );

        Ok(Self {
            config,
            seed,
            backend,
            cache: ChunkCache::new(capacity),
            pending: HashSet::new(),
            center: None,
            snapshot: Arc::new(StreamSnapshot::empty(ChunkCoord::default())),
            publisher: SnapshotHandle::default(),
            stats: StreamStats::default(),
        })
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Live session seed.
    #[must_use]
    pub const fn seed(&self) -> &SessionSeed {
        &self.seed
    }

    /// Reference chunk of the last sync, if any.
    #[must_use]
    pub const fn current_chunk(&self) -> Option<ChunkCoord> {
        self.center
    }

    /// Latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<StreamSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Handle for reading snapshots from other threads.
    #[must_use]
    pub fn snapshot_handle(&self) -> SnapshotHandle {
        self.publisher.clone()
    }

    /// Number of cached chunks.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.cache.len()
    }

    /// Number of requests in flight.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if a request for `coord` is in flight.
    #[must_use]
    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.pending.contains(&coord)
    }

    /// Returns true if `coord` is cached.
    #[must_use]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.cache.contains(coord)
    }

    /// Cached chunk coordinates, sorted.
    #[must_use]
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.cache.iter().map(|chunk| chunk.coord()).collect();
        coords.sort_unstable();
        coords
    }

    /// Streaming counters.
    #[must_use]
    pub fn stats(&self) -> StreamStats {
        StreamStats {
            loaded: self.cache.len(),
            pending: self.pending.len(),
            ..self.stats
        }
    }

    /// Shared access to the backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Exclusive access to the backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Re-centres streaming on `center` for `seed` and returns the new
    /// snapshot.
    ///
    /// A seed different from the live one resets the session first: the
    /// cache and pending set are cleared and every chunk is requested anew.
    pub fn sync_around(&mut self, seed: &SessionSeed, center: ChunkCoord) -> Arc<StreamSnapshot> {
        if *seed != self.seed {
            self.reset_seed(seed.clone());
        }
        self.center = Some(center);
        self.sync();
        self.snapshot()
    }

    /// Re-centres on the chunk containing a world position.
    ///
    /// Syncs only when the observer entered a different chunk. Returns true
    /// if it did. Non-finite positions are ignored.
    pub fn update_position(&mut self, world_x: f64, world_z: f64) -> bool {
        if !world_x.is_finite() || !world_z.is_finite() {
            tracing::warn!("Ignoring non-finite observer position ({}, {})", world_x, world_z);
            return false;
        }

        let coord = self.config.chunk_coord_at(world_x, world_z);
        if self.center == Some(coord) {
            return false;
        }

        tracing::debug!("Observer entered chunk {}", coord);
        self.center = Some(coord);
        self.sync();
        true
    }

    /// Switches to a new session seed and resyncs around the current chunk.
    pub fn set_seed(&mut self, seed: SessionSeed) {
        if seed == self.seed {
            return;
        }
        self.reset_seed(seed);
        self.sync();
    }

    /// Applies every outcome the backend has finished so far.
    ///
    /// Returns the number of chunks inserted into the cache.
    pub fn poll(&mut self) -> usize {
        let outcomes = self.backend.try_drain();
        self.apply_outcomes(outcomes)
    }

    /// Blocks until every pending request has completed or `timeout` has
    /// elapsed. Used to preload the spawn area.
    ///
    /// Returns true if nothing is left pending.
    pub fn flush_generation_queue(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        while !self.pending.is_empty() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }

            match self.backend.wait_for(deadline - now) {
                Ok(Some(outcome)) => {
                    let mut outcomes = vec![outcome];
                    outcomes.extend(self.backend.try_drain());
                    self.apply_outcomes(outcomes);
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("Flush aborted: {}", e);
                    break;
                }
            }
        }

        if !self.pending.is_empty() {
            tracing::debug!("Flush timed out with {} chunks pending", self.pending.len());
        }
        self.pending.is_empty()
    }

    fn apply_outcomes(&mut self, outcomes: Vec<GenerationOutcome>) -> usize {
        let mut ingested = 0;
        for outcome in outcomes {
            if self.ingest(outcome) {
                ingested += 1;
            }
        }
        if ingested > 0 {
            self.sync();
        }
        ingested
    }

    /// Applies one outcome. Returns true if a chunk entered the cache.
    fn ingest(&mut self, outcome: GenerationOutcome) -> bool {
        if *outcome.seed() != self.seed {
            tracing::trace!(
                "Discarding stale chunk {} from seed {}",
                outcome.coord(),
                outcome.seed().prefix(8)
            );
            self.stats.stale_discarded += 1;
            return false;
        }

        let coord = outcome.coord();
        self.pending.remove(&coord);

        match outcome {
            GenerationOutcome::Ready(response) => {
                self.insert(response);
                true
            }
            GenerationOutcome::Failed { error, .. } => {
                // Not cached and no longer pending: the next sync asks again
                tracing::warn!("Generation of chunk {} failed: {}", coord, error);
                self.stats.failed += 1;
                false
            }
        }
    }

    fn insert(&mut self, response: GenerationResponse) {
        tracing::debug!(
            "Ingested chunk {} ({}, {} bytes)",
            response.coord,
            response.checksum,
            response.data.byte_size()
        );
        self.cache.insert(response);
        self.stats.ingested += 1;
    }

    fn reset_seed(&mut self, seed: SessionSeed) {
        tracing::info!(
            "Seed changed {} -> {}, dropping {} cached and {} pending chunks",
            self.seed.prefix(8),
            seed.prefix(8),
            self.cache.len(),
            self.pending.len()
        );
        self.seed = seed;
        self.cache.clear();
        self.pending.clear();
        self.stats.seed_resets += 1;
    }

    fn sync(&mut self) {
        let Some(center) = self.center else {
            return;
        };
        let cache_radius = self.config.cache_radius.unsigned_abs();
        let active_radius = self.config.active_radius.unsigned_abs();

        let mut missing = Vec::new();
        for coord in center.square_around(cache_radius) {
            if self.cache.touch(coord) || self.pending.contains(&coord) {
                continue;
            }
            missing.push(coord);
        }
        missing.sort_by_key(|coord| coord.chebyshev_distance(center));
        for coord in missing {
            self.request(coord);
        }

        let far = self.cache.evict_beyond(center, cache_radius + 1);
        if !far.is_empty() {
            tracing::debug!("Evicted {} distant chunks", far.len());
            self.stats.evicted_distance += far.len() as u64;
        }

        let over = self.cache.evict_over_capacity(center);
        if !over.is_empty() {
            tracing::debug!("Evicted {} chunks over capacity", over.len());
            self.stats.evicted_capacity += over.len() as u64;
        }

        let snapshot = Arc::new(StreamSnapshot::build(&mut self.cache, center, active_radius));
        self.publisher.publish(Arc::clone(&snapshot));
        self.snapshot = snapshot;
    }

    fn request(&mut self, coord: ChunkCoord) {
        let request = self.config.generation_request(&self.seed, coord);
        match self.backend.submit(request) {
            Ok(()) => {
                self.pending.insert(coord);
                self.stats.requested += 1;
            }
            Err(e) => {
                tracing::warn!("Cannot request chunk {}: {}", coord, e);
                self.stats.submit_errors += 1;
            }
        }
    }
}
