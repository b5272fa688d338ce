//! # Backrooms Procedural Generation
//!
//! Deterministic maze generation for an infinite, reproducible backrooms.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same maze
//! 2. **Chunked**: The maze is generated in fixed-size square chunks
//! 3. **Seamless**: Every rule is a pure function of world cell coordinates,
//!    so neighbouring chunks agree on their shared boundary
//! 4. **Stateless**: No threads, no caches, no shared mutable state
//!
//! ## Core Components
//!
//! - `SessionSeed` / `CellHasher`: seed fingerprint and per-cell dice rolls
//! - `MazeRules`: room grid walls plus interior sub-division
//! - `FeatureRules`: ceiling lights, table groups, office lamps
//! - `generate_chunk`: one chunk of geometry, colliders and checksum
//! - `WorldConfig`: per-session configuration
//! - `resolve_collisions`: pushes an observer out of chunk colliders
//!
//! ## Example
//!
//! ```rust
//! use backrooms_procedural::{generate_chunk, ChunkCoord, SessionSeed, WorldConfig};
//!
//! let config = WorldConfig::default();
//! let seed = SessionSeed::new("deadbeef00face55");
//! let request = config.generation_request(&seed, ChunkCoord::new(0, 0));
//!
//! let first = generate_chunk(&request).unwrap();
//! let second = generate_chunk(&request).unwrap();
//! assert_eq!(first.checksum, second.checksum);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

pub mod chunk;
pub mod collision;
pub mod config;
pub mod error;
pub mod features;
pub mod geometry;
pub mod hash;
pub mod maze;

pub use chunk::{
    generate_chunk, ChunkChecksum, ChunkCoord, ChunkData, GenerationRequest, GenerationResponse,
    MAX_CHUNK_SIZE,
};
pub use collision::resolve_collisions;
pub use config::WorldConfig;
pub use error::{
    ChunkKeyError, ConfigError, ConfigResult, EntropyError, GenerationError, GenerationResult,
};
pub use features::{FeatureRules, TableGroup};
pub use geometry::{
    CeilingLight, CellCenter, CollisionBox, FurniturePlacement, OfficeLamp, WallSegment,
};
pub use hash::{hash_unit, CellHasher, SessionSeed};
pub use maze::{is_wall_x, is_wall_z, MazeRules, WallAxis};
