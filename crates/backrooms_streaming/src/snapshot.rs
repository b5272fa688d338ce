//! # Stream Snapshot
//!
//! A derived, read-only view of the cache around the current chunk. Rebuilt
//! from scratch after every change; the cache holds tens of chunks, so
//! recomputing is cheaper than diffing.
//!
//! Renderers and physics on other threads read the latest snapshot through
//! a [`SnapshotHandle`] without ever touching engine state.

use std::sync::Arc;

use backrooms_procedural::{ChunkCoord, CollisionBox};
use parking_lot::RwLock;

use crate::cache::ChunkCache;
use crate::runtime::ChunkRuntime;

/// Chebyshev radius of chunks whose colliders are published.
pub const COLLIDER_RADIUS: u32 = 1;

/// What the streaming engine hands to render and physics collaborators.
#[derive(Clone, Debug, Default)]
pub struct StreamSnapshot {
    /// Cached chunks within the active radius, ordered by coordinate.
    pub active_chunks: Vec<Arc<ChunkRuntime>>,
    /// Colliders of every cached chunk within [`COLLIDER_RADIUS`].
    pub nearby_colliders: Vec<CollisionBox>,
    /// Total number of cached chunks.
    pub loaded_chunk_count: usize,
    /// Reference chunk the snapshot was built around.
    pub current_chunk: ChunkCoord,
}

impl StreamSnapshot {
    /// Builds a snapshot from the cache, touching every active chunk.
    pub(crate) fn build(cache: &mut ChunkCache, center: ChunkCoord, active_radius: u32) -> Self {
        let mut active_chunks: Vec<Arc<ChunkRuntime>> = cache
            .iter()
            .filter(|chunk| chunk.coord().chebyshev_distance(center) <= active_radius)
            .cloned()
            .collect();
        active_chunks.sort_unstable_by_key(|chunk| (chunk.coord().z, chunk.coord().x));
        for chunk in &active_chunks {
            cache.touch(chunk.coord());
        }

        let mut nearby: Vec<&Arc<ChunkRuntime>> = cache
            .iter()
            .filter(|chunk| chunk.coord().chebyshev_distance(center) <= COLLIDER_RADIUS)
            .collect();
        nearby.sort_unstable_by_key(|chunk| (chunk.coord().z, chunk.coord().x));
        let nearby_colliders = nearby
            .into_iter()
            .flat_map(|chunk| chunk.colliders().iter().copied())
            .collect();

        Self {
            active_chunks,
            nearby_colliders,
            loaded_chunk_count: cache.len(),
            current_chunk: center,
        }
    }

    /// Empty snapshot centred on `center`.
    #[must_use]
    pub fn empty(center: ChunkCoord) -> Self {
        Self {
            current_chunk: center,
            ..Self::default()
        }
    }

    /// Returns the active chunk at `coord`, if loaded.
    #[must_use]
    pub fn active_chunk(&self, coord: ChunkCoord) -> Option<&Arc<ChunkRuntime>> {
        self.active_chunks.iter().find(|chunk| chunk.coord() == coord)
    }
}

/// Cloneable reader of the latest published snapshot.
#[derive(Clone, Debug, Default)]
pub struct SnapshotHandle {
    latest: Arc<RwLock<Arc<StreamSnapshot>>>,
}

impl SnapshotHandle {
    /// Returns the most recently published snapshot.
    #[must_use]
    pub fn load(&self) -> Arc<StreamSnapshot> {
        Arc::clone(&*self.latest.read())
    }

    pub(crate) fn publish(&self, snapshot: Arc<StreamSnapshot>) {
        *self.latest.write() = snapshot;
    }
}
