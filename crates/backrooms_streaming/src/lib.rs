//! # Backrooms Chunk Streaming
//!
//! Feeds a moving observer with nearby maze chunks under a bounded memory
//! budget.
//!
//! ## Design Principles
//!
//! 1. **Never block**: generation runs on a backend, results are polled
//! 2. **Owned state**: the cache and pending set live in one engine value
//! 3. **Bounded**: distance pruning plus a hard LRU capacity
//! 4. **Read-only output**: snapshots are shared behind `Arc`
//!
//! ## Core Components
//!
//! - `ChunkStreamEngine`: request ring, ingest, eviction, snapshots
//! - `ChunkCache`: coordinate-keyed store with logical-clock LRU
//! - `WorkerPool` / `InlineBackend`: `GenerationBackend` implementations
//! - `SnapshotHandle`: cross-thread reader of the latest snapshot
//!
//! ## Example
//!
//! ```rust
//! use backrooms_procedural::{SessionSeed, WorldConfig};
//! use backrooms_streaming::{ChunkStreamEngine, InlineBackend};
//! use std::time::Duration;
//!
//! let seed = SessionSeed::new("deadbeef00face55");
//! let mut engine =
//!     ChunkStreamEngine::new(WorldConfig::test(), seed, InlineBackend::new()).unwrap();
//!
//! engine.update_position(0.0, 0.0);
//! engine.flush_generation_queue(Duration::from_secs(5));
//!
//! let snapshot = engine.snapshot();
//! assert!(!snapshot.active_chunks.is_empty());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod cache;
pub mod engine;
pub mod error;
pub mod runtime;
pub mod snapshot;

pub use backend::{GenerationBackend, GenerationOutcome, Generator, InlineBackend, WorkerPool};
pub use cache::ChunkCache;
pub use engine::{ChunkStreamEngine, StreamStats};
pub use error::{StreamError, StreamResult};
pub use runtime::ChunkRuntime;
pub use snapshot::{SnapshotHandle, StreamSnapshot, COLLIDER_RADIUS};
