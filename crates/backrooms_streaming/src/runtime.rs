//! Cached chunk records.

use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(not(target_arch = "wasm32"))]
use std::time::SystemTime;
#[cfg(target_arch = "wasm32")]
use web_time::SystemTime;

use backrooms_procedural::{
    ChunkChecksum, ChunkCoord, ChunkData, CollisionBox, GenerationResponse, SessionSeed,
};

/// A generated chunk as held by the cache.
///
/// Created when a generation response is ingested, shared read-only with
/// snapshot consumers, and dropped once evicted and no snapshot refers to
/// it. The only mutable field is the last-touched tick.
#[derive(Debug)]
pub struct ChunkRuntime {
    key: String,
    coord: ChunkCoord,
    seed: SessionSeed,
    checksum: ChunkChecksum,
    config_version: u32,
    generated_at: SystemTime,
    last_touched: AtomicU64,
    data: ChunkData,
}

impl ChunkRuntime {
    /// Wraps a generation response, touched at `tick`.
    #[must_use]
    pub fn from_response(response: GenerationResponse, tick: u64) -> Self {
        Self {
            key: response.coord.key(),
            coord: response.coord,
            seed: response.seed,
            checksum: response.checksum,
            config_version: response.config_version,
            generated_at: response.generated_at,
            last_touched: AtomicU64::new(tick),
            data: response.data,
        }
    }

    /// Stable `"x,z"` key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Chunk coordinate.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Seed the chunk was generated with.
    #[must_use]
    pub const fn seed(&self) -> &SessionSeed {
        &self.seed
    }

    /// Content checksum.
    #[must_use]
    pub const fn checksum(&self) -> &ChunkChecksum {
        &self.checksum
    }

    /// Configuration version from the request.
    #[must_use]
    pub const fn config_version(&self) -> u32 {
        self.config_version
    }

    /// Wall-clock generation time.
    #[must_use]
    pub fn generated_at(&self) -> SystemTime {
        self.generated_at
    }

    /// Logical tick of the last cache touch.
    #[must_use]
    pub fn last_touched(&self) -> u64 {
        self.last_touched.load(Ordering::Relaxed)
    }

    pub(crate) fn touch(&self, tick: u64) {
        self.last_touched.store(tick, Ordering::Relaxed);
    }

    /// Geometry payload.
    #[must_use]
    pub const fn data(&self) -> &ChunkData {
        &self.data
    }

    /// Colliders of this chunk.
    #[must_use]
    pub fn colliders(&self) -> &[CollisionBox] {
        self.data.colliders()
    }
}
