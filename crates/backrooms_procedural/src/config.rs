//! # World Configuration
//!
//! Per-session constants shared by the generator and the streaming engine.
//! Supplied once and treated as immutable for the session's lifetime.
//!
//! ```toml
//! cell_size = 2.5
//! chunk_size = 24
//! active_radius = 2
//! cache_radius = 3
//! ```
//!
//! Missing keys fall back to `WorldConfig::default()`.

use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunk::{ChunkCoord, GenerationRequest, MAX_CHUNK_SIZE};
use crate::error::{ConfigError, ConfigResult};
use crate::hash::SessionSeed;

/// World generation and streaming configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Cell edge in world units.
    pub cell_size: f32,
    /// Chunk edge in cells.
    pub chunk_size: u32,
    /// Chebyshev radius of chunks handed to the renderer.
    pub active_radius: i32,
    /// Chebyshev radius of chunks kept requested and cached.
    pub cache_radius: i32,
    /// Extra cache entries allowed beyond the cache square.
    pub cache_margin: usize,
    /// Wall thickness in world units.
    pub wall_thickness: f32,
    /// Wall height in world units.
    pub wall_height: f32,
    /// Ceiling height in world units.
    pub ceiling_height: f32,
    /// Observer collision radius.
    pub player_radius: f32,
    /// Opaque version tag carried through generation.
    pub config_version: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            cell_size: 2.5,
            chunk_size: 24,
            active_radius: 2,
            cache_radius: 3,
            cache_margin: 24,
            wall_thickness: 0.14,
            wall_height: 2.9,
            ceiling_height: 3.0,
            player_radius: 0.35,
            config_version: 1,
        }
    }
}

impl WorldConfig {
    /// Small world for tests: tiny chunks, tight radii.
    #[must_use]
    pub fn test() -> Self {
        Self {
            chunk_size: 8,
            active_radius: 1,
            cache_radius: 2,
            cache_margin: 4,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed TOML or unknown keys and `Invalid` if
    /// validation fails.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise as
    /// [`WorldConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if serialization fails.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Checks every field against the ranges the generator supports.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::Invalid {
                field: "chunk_size",
                reason: format!("{} outside 1..={MAX_CHUNK_SIZE}", self.chunk_size),
            });
        }

        for (field, value) in [
            ("cell_size", self.cell_size),
            ("wall_thickness", self.wall_thickness),
            ("wall_height", self.wall_height),
            ("ceiling_height", self.ceiling_height),
            ("player_radius", self.player_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive and finite, got {value}"),
                });
            }
        }

        for (field, value) in [
            ("active_radius", self.active_radius),
            ("cache_radius", self.cache_radius),
        ] {
            if value < 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must not be negative, got {value}"),
                });
            }
        }

        if self.active_radius > self.cache_radius {
            return Err(ConfigError::Invalid {
                field: "active_radius",
                reason: format!(
                    "{} exceeds cache_radius {}",
                    self.active_radius, self.cache_radius
                ),
            });
        }

        Ok(())
    }

    /// Hard cache capacity: `(cache_radius * 2 + 1)^2 + cache_margin`.
    #[must_use]
    pub fn max_cache_entries(&self) -> usize {
        let side = self.cache_radius.max(0).unsigned_abs() as usize * 2 + 1;
        side * side + self.cache_margin
    }

    /// Chunk edge in world units.
    #[must_use]
    pub fn chunk_span(&self) -> f64 {
        f64::from(self.chunk_size) * f64::from(self.cell_size)
    }

    /// Chunk containing a world position.
    #[must_use]
    pub fn chunk_coord_at(&self, world_x: f64, world_z: f64) -> ChunkCoord {
        ChunkCoord::from_world_pos(world_x, world_z, self.chunk_size, f64::from(self.cell_size))
    }

    /// Builds the generation request for one chunk of this session.
    #[must_use]
    pub fn generation_request(&self, seed: &SessionSeed, coord: ChunkCoord) -> GenerationRequest {
        GenerationRequest {
            seed: seed.clone(),
            coord,
            config_version: self.config_version,
            chunk_size: self.chunk_size,
            cell_size: self.cell_size,
            wall_thickness: self.wall_thickness,
            ceiling_height: self.ceiling_height,
        }
    }
}
