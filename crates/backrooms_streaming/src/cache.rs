//! # Chunk Cache
//!
//! The sole store of generated geometry. Entries are keyed by chunk
//! coordinate and stamped with a logical tick on every touch. A logical
//! clock instead of wall time keeps eviction order reproducible in tests.
//!
//! ## Eviction
//!
//! 1. `evict_beyond`: drop everything farther than a Chebyshev radius
//! 2. `evict_over_capacity`: drop least recently touched entries until the
//!    cache fits its hard capacity; ties go to the farthest chunk first

use std::collections::HashMap;
use std::sync::Arc;

use backrooms_procedural::{ChunkCoord, GenerationResponse};

use crate::runtime::ChunkRuntime;

/// Bounded map from chunk coordinate to cached chunk.
#[derive(Debug)]
pub struct ChunkCache {
    entries: HashMap<ChunkCoord, Arc<ChunkRuntime>>,
    capacity: usize,
    clock: u64,
}

impl ChunkCache {
    /// Creates an empty cache with a hard capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity + 1),
            capacity,
            clock: 0,
        }
    }

    /// Hard capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cached chunks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the chunk is cached.
    #[must_use]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.entries.contains_key(&coord)
    }

    /// Returns the cached chunk without touching it.
    #[must_use]
    pub fn get(&self, coord: ChunkCoord) -> Option<&Arc<ChunkRuntime>> {
        self.entries.get(&coord)
    }

    /// Iterates over all cached chunks in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ChunkRuntime>> {
        self.entries.values()
    }

    /// Marks a chunk as used now. Returns false if it is not cached.
    pub fn touch(&mut self, coord: ChunkCoord) -> bool {
        match self.entries.get(&coord) {
            Some(chunk) => {
                self.clock += 1;
                chunk.touch(self.clock);
                true
            }
            None => false,
        }
    }

    /// Inserts a generated chunk, replacing any previous entry for the
    /// same coordinate. Returns the replaced entry.
    pub fn insert(&mut self, response: GenerationResponse) -> Option<Arc<ChunkRuntime>> {
        self.clock += 1;
        let chunk = ChunkRuntime::from_response(response, self.clock);
        self.entries.insert(chunk.coord(), Arc::new(chunk))
    }

    /// Removes every chunk farther than `radius` from `center`.
    ///
    /// Returns the evicted coordinates.
    pub fn evict_beyond(&mut self, center: ChunkCoord, radius: u32) -> Vec<ChunkCoord> {
        let mut evicted = Vec::new();
        self.entries.retain(|&coord, _| {
            let keep = coord.chebyshev_distance(center) <= radius;
            if !keep {
                evicted.push(coord);
            }
            keep
        });
        evicted.sort_unstable();
        evicted
    }

    /// Removes least recently touched chunks until `len() <= capacity()`.
    ///
    /// Returns the evicted coordinates in eviction order.
    pub fn evict_over_capacity(&mut self, center: ChunkCoord) -> Vec<ChunkCoord> {
        let excess = self.entries.len().saturating_sub(self.capacity);
        if excess == 0 {
            return Vec::new();
        }

        let mut order: Vec<(u64, std::cmp::Reverse<u32>, ChunkCoord)> = self
            .entries
            .values()
            .map(|chunk| {
                (
                    chunk.last_touched(),
                    std::cmp::Reverse(chunk.coord().chebyshev_distance(center)),
                    chunk.coord(),
                )
            })
            .collect();
        order.sort_unstable();

        let evicted: Vec<ChunkCoord> = order.into_iter().take(excess).map(|(_, _, c)| c).collect();
        for coord in &evicted {
            self.entries.remove(coord);
        }
        evicted
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
