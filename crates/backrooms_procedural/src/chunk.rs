//! # Chunk Generator
//!
//! The infinite maze is cut into square chunks of `chunk_size` x
//! `chunk_size` cells. A chunk is generated as a unit from a
//! `GenerationRequest` and comes back as per-category geometry buffers,
//! colliders, and a content checksum.
//!
//! ## Boundary Ownership
//!
//! Each cell only emits the walls on its *own* east and south faces. The
//! wall on the shared edge between chunk `(0, 0)` and chunk `(1, 0)` is the
//! east face of the last column of `(0, 0)`, so exactly one chunk owns it.
//!
//! ## Buffers
//!
//! Buffers are plain `Vec`s of `Pod` records. Moving a `GenerationResponse`
//! through a channel moves the heap allocations, never the contents.

use std::fmt;
use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use std::time::SystemTime;
#[cfg(target_arch = "wasm32")]
use web_time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::{ChunkKeyError, GenerationError, GenerationResult};
use crate::features::{cell_center, FeatureRules};
use crate::geometry::{
    CeilingLight, CellCenter, CollisionBox, FurniturePlacement, OfficeLamp, WallSegment,
};
use crate::hash::SessionSeed;

/// Largest accepted chunk edge in cells.
pub const MAX_CHUNK_SIZE: u32 = 256;

/// Characters of the seed kept in a checksum tag.
const CHECKSUM_SEED_PREFIX: usize = 6;

/// Samples taken per buffer when checksumming.
const CHECKSUM_SAMPLES: usize = 32;

/// Cells past the chunk edge that generation inspects (wall neighbours and
/// chair cells).
const CELL_MARGIN: i64 = 4;

/// Chunk coordinate (identifies a chunk in the chunk grid).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not cells).
    pub x: i32,
    /// Z coordinate (in chunks, not cells).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing a world-space position.
    ///
    /// `floor(world / (chunk_size * cell_size))` on each axis. Positions
    /// beyond the grid saturate to the outermost chunk; NaN maps to 0, so
    /// callers filter non-finite positions first.
    #[must_use]
    pub fn from_world_pos(world_x: f64, world_z: f64, chunk_size: u32, cell_size: f64) -> Self {
        let span = f64::from(chunk_size) * cell_size;
        Self {
            x: (world_x / span).floor() as i32,
            z: (world_z / span).floor() as i32,
        }
    }

    /// World cell of the chunk's origin (min corner), saturating at the
    /// `i32` limits.
    #[inline]
    #[must_use]
    pub fn origin_cell(self, chunk_size: u32) -> (i32, i32) {
        let size = i32::try_from(chunk_size).unwrap_or(i32::MAX);
        (self.x.saturating_mul(size), self.z.saturating_mul(size))
    }

    /// Returns true if every cell of this chunk, plus the neighbours
    /// generation looks at, has an `i32` world coordinate.
    #[must_use]
    pub fn cells_in_range(self, chunk_size: u32) -> bool {
        let size = i64::from(chunk_size);
        let fits = |c: i32| {
            let first = i64::from(c) * size - CELL_MARGIN;
            let last = (i64::from(c) + 1) * size + CELL_MARGIN;
            first >= i64::from(i32::MIN) && last <= i64::from(i32::MAX)
        };
        fits(self.x) && fits(self.z)
    }

    /// Chebyshev (king-move) distance in chunks.
    #[inline]
    #[must_use]
    pub const fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dz = self.z.abs_diff(other.z);
        if dx > dz { dx } else { dz }
    }

    /// Stable string key, `"x,z"`.
    #[must_use]
    pub fn key(self) -> String {
        self.to_string()
    }

    /// All coordinates within `radius` (Chebyshev), row by row from `(-r, -r)`.
    ///
    /// Coordinates past the `i32` limits are skipped.
    pub fn square_around(self, radius: u32) -> impl Iterator<Item = ChunkCoord> {
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        (-r..=r)
            .filter_map(move |dz| self.z.checked_add(dz))
            .flat_map(move |z| {
                (-r..=r).filter_map(move |dx| Some(Self::new(self.x.checked_add(dx)?, z)))
            })
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.z)
    }
}

impl FromStr for ChunkCoord {
    type Err = ChunkKeyError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let malformed = || ChunkKeyError(key.to_string());
        let (x, z) = key.split_once(',').ok_or_else(malformed)?;
        let x = x.trim().parse().map_err(|_| malformed())?;
        let z = z.trim().parse().map_err(|_| malformed())?;
        Ok(Self::new(x, z))
    }
}

/// Everything the generator needs to build one chunk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Session seed.
    pub seed: SessionSeed,
    /// Chunk to generate.
    pub coord: ChunkCoord,
    /// Configuration version, carried through untouched.
    pub config_version: u32,
    /// Chunk edge in cells.
    pub chunk_size: u32,
    /// Cell edge in world units.
    pub cell_size: f32,
    /// Wall thickness in world units.
    pub wall_thickness: f32,
    /// Ceiling height in world units.
    pub ceiling_height: f32,
}

impl GenerationRequest {
    /// Checks that the request describes a chunk we can build.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for an empty or oversized chunk, for a
    /// chunk at the edge of the `i32` cell grid, or for non-finite or
    /// non-positive dimensions.
    pub fn validate(&self) -> GenerationResult<()> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(GenerationError::InvalidRequest(format!(
                "chunk_size {} outside 1..={MAX_CHUNK_SIZE}",
                self.chunk_size
            )));
        }
        if !self.coord.cells_in_range(self.chunk_size) {
            return Err(GenerationError::InvalidRequest(format!(
                "chunk {} lies outside the cell grid",
                self.coord
            )));
        }
        for (name, value) in [
            ("cell_size", self.cell_size),
            ("wall_thickness", self.wall_thickness),
            ("ceiling_height", self.ceiling_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GenerationError::InvalidRequest(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Content checksum of a generated chunk.
///
/// `"<seed prefix>:<x>:<z>:<rolling hash>"`. Cheap equality and debug aid,
/// not an integrity check.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkChecksum(String);

impl ChunkChecksum {
    /// Returns the checksum string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn compute(seed: &SessionSeed, coord: ChunkCoord, parts: &[&[f32]]) -> Self {
        let mut rolling: u32 = 0;
        for part in parts {
            let step = (part.len() / CHECKSUM_SAMPLES).max(1);
            for &value in part.iter().step_by(step) {
                rolling = rolling.wrapping_mul(131).wrapping_add(sample_bits(value));
            }
            rolling = rolling.wrapping_mul(257).wrapping_add(part.len() as u32);
        }
        Self(format!(
            "{}:{}:{}:{rolling:x}",
            seed.prefix(CHECKSUM_SEED_PREFIX),
            coord.x,
            coord.z
        ))
    }
}

impl fmt::Display for ChunkChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Milli-unit sample of a buffer value, wrapped into 32 bits.
#[inline]
fn sample_bits(value: f32) -> u32 {
    (f64::from(value) * 1000.0).floor() as i64 as u32
}

/// Generated payload for one chunk.
///
/// Each category is a contiguous vector of records. The `*_data` /
/// `*_centers` accessors expose the same memory as flat interleaved `f32`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkData {
    /// Chunk this payload belongs to.
    pub coord: ChunkCoord,
    floors: Vec<CellCenter>,
    ceilings: Vec<CellCenter>,
    walls_x: Vec<WallSegment>,
    walls_z: Vec<WallSegment>,
    tables: Vec<FurniturePlacement>,
    chairs: Vec<FurniturePlacement>,
    lights: Vec<CeilingLight>,
    office_lamps: Vec<OfficeLamp>,
    colliders: Vec<CollisionBox>,
}

impl ChunkData {
    /// Floor cell centres.
    #[must_use]
    pub fn floors(&self) -> &[CellCenter] {
        &self.floors
    }

    /// Ceiling cell centres.
    #[must_use]
    pub fn ceilings(&self) -> &[CellCenter] {
        &self.ceilings
    }

    /// Walls on east cell faces.
    #[must_use]
    pub fn walls_x(&self) -> &[WallSegment] {
        &self.walls_x
    }

    /// Walls on south cell faces.
    #[must_use]
    pub fn walls_z(&self) -> &[WallSegment] {
        &self.walls_z
    }

    /// Tables.
    #[must_use]
    pub fn tables(&self) -> &[FurniturePlacement] {
        &self.tables
    }

    /// Chairs.
    #[must_use]
    pub fn chairs(&self) -> &[FurniturePlacement] {
        &self.chairs
    }

    /// Ceiling lights.
    #[must_use]
    pub fn lights(&self) -> &[CeilingLight] {
        &self.lights
    }

    /// Office lamps.
    #[must_use]
    pub fn office_lamps(&self) -> &[OfficeLamp] {
        &self.office_lamps
    }

    /// Colliders for walls and furniture.
    #[must_use]
    pub fn colliders(&self) -> &[CollisionBox] {
        &self.colliders
    }

    /// Flat `[x, z, ...]` floor buffer.
    #[must_use]
    pub fn floor_centers(&self) -> &[f32] {
        bytemuck::cast_slice(&self.floors)
    }

    /// Flat `[x, z, ...]` ceiling buffer.
    #[must_use]
    pub fn ceiling_centers(&self) -> &[f32] {
        bytemuck::cast_slice(&self.ceilings)
    }

    /// Flat `[x, z, ...]` east-face wall buffer.
    #[must_use]
    pub fn wall_x_centers(&self) -> &[f32] {
        bytemuck::cast_slice(&self.walls_x)
    }

    /// Flat `[x, z, ...]` south-face wall buffer.
    #[must_use]
    pub fn wall_z_centers(&self) -> &[f32] {
        bytemuck::cast_slice(&self.walls_z)
    }

    /// Flat `[x, z, yaw, scale, ...]` table buffer.
    #[must_use]
    pub fn table_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.tables)
    }

    /// Flat `[x, z, yaw, scale, ...]` chair buffer.
    #[must_use]
    pub fn chair_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.chairs)
    }

    /// Flat `[x, y, z, intensity, phase, ...]` light buffer.
    #[must_use]
    pub fn light_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.lights)
    }

    /// Flat `[x, z, scale, intensity, phase, flicker, ...]` lamp buffer.
    #[must_use]
    pub fn office_lamp_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.office_lamps)
    }

    /// Flat `[x, z, half_x, half_z, ...]` collider buffer.
    #[must_use]
    pub fn collider_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colliders)
    }

    /// Total bytes held by all buffers.
    #[must_use]
    pub fn byte_size(&self) -> usize {
        [
            self.floor_centers(),
            self.ceiling_centers(),
            self.wall_x_centers(),
            self.wall_z_centers(),
            self.table_data(),
            self.chair_data(),
            self.light_data(),
            self.office_lamp_data(),
            self.collider_data(),
        ]
        .iter()
        .map(|part| std::mem::size_of_val(*part))
        .sum()
    }

    fn checksum(&self, seed: &SessionSeed) -> ChunkChecksum {
        ChunkChecksum::compute(
            seed,
            self.coord,
            &[
                self.floor_centers(),
                self.wall_x_centers(),
                self.wall_z_centers(),
                self.table_data(),
                self.chair_data(),
                self.light_data(),
                self.office_lamp_data(),
                self.collider_data(),
            ],
        )
    }
}

/// A finished chunk, as handed back across the worker boundary.
#[derive(Clone, Debug)]
pub struct GenerationResponse {
    /// Seed the chunk was generated with.
    pub seed: SessionSeed,
    /// Chunk coordinate.
    pub coord: ChunkCoord,
    /// Configuration version from the request.
    pub config_version: u32,
    /// Content checksum.
    pub checksum: ChunkChecksum,
    /// Wall-clock time of generation.
    pub generated_at: SystemTime,
    /// Geometry payload.
    pub data: ChunkData,
}

/// Generates one chunk.
///
/// Pure apart from the `generated_at` timestamp: identical requests yield
/// identical buffers and checksums.
///
/// # Errors
///
/// Returns `InvalidRequest` if the request fails validation and
/// `Allocation` if the output buffers cannot be reserved.
pub fn generate_chunk(request: &GenerationRequest) -> GenerationResult<GenerationResponse> {
    request.validate()?;

    let rules = FeatureRules::new(&request.seed);
    let maze = rules.maze();
    let cell_size = f64::from(request.cell_size);
    let ceiling_height = f64::from(request.ceiling_height);
    let size = request.chunk_size as i32;
    let cell_count = (request.chunk_size * request.chunk_size) as usize;
    let (origin_x, origin_z) = request.coord.origin_cell(request.chunk_size);

    let mut data = ChunkData {
        coord: request.coord,
        ..ChunkData::default()
    };
    reserve(&mut data.floors, cell_count)?;
    reserve(&mut data.ceilings, cell_count)?;
    reserve(&mut data.walls_x, cell_count / 2)?;
    reserve(&mut data.walls_z, cell_count / 2)?;
    reserve(&mut data.colliders, cell_count)?;

    for local_z in 0..size {
        for local_x in 0..size {
            let world_x = origin_x + local_x;
            let world_z = origin_z + local_z;
            let (center_x, center_z) = cell_center(world_x, world_z, cell_size);

            let center = CellCenter {
                x: center_x as f32,
                z: center_z as f32,
            };
            data.floors.push(center);
            data.ceilings.push(center);

            if maze.is_wall_x(world_x, world_z) {
                let wall = WallSegment {
                    x: ((f64::from(world_x) + 1.0) * cell_size) as f32,
                    z: center_z as f32,
                };
                data.walls_x.push(wall);
                data.colliders
                    .push(CollisionBox::wall_x(wall, request.cell_size, request.wall_thickness));
            }

            if maze.is_wall_z(world_x, world_z) {
                let wall = WallSegment {
                    x: center_x as f32,
                    z: ((f64::from(world_z) + 1.0) * cell_size) as f32,
                };
                data.walls_z.push(wall);
                data.colliders
                    .push(CollisionBox::wall_z(wall, request.cell_size, request.wall_thickness));
            }

            if let Some(light) = rules.ceiling_light(world_x, world_z, cell_size, ceiling_height) {
                data.lights.push(light);
            }

            let group = rules.table_group(world_x, world_z, cell_size);
            if let Some(group) = &group {
                data.tables.push(group.table);
                data.colliders.push(CollisionBox::table(&group.table));
                for chair in group.chairs() {
                    data.chairs.push(chair.placement);
                    data.colliders.push(CollisionBox::chair(&chair.placement));
                }
            }

            if group.is_none() {
                if let Some(lamp) = rules.office_lamp(world_x, world_z, cell_size) {
                    data.office_lamps.push(lamp);
                    data.colliders.push(CollisionBox::office_lamp(&lamp));
                }
            }
        }
    }

    let checksum = data.checksum(&request.seed);

    Ok(GenerationResponse {
        seed: request.seed.clone(),
        coord: request.coord,
        config_version: request.config_version,
        checksum,
        generated_at: SystemTime::now(),
        data,
    })
}

/// Reserves output capacity, reporting allocation failure instead of aborting.
fn reserve<T>(buffer: &mut Vec<T>, additional: usize) -> GenerationResult<()> {
    buffer
        .try_reserve_exact(additional)
        .map_err(|_| GenerationError::Allocation {
            requested: additional * std::mem::size_of::<T>(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::MazeRules;

    fn request(coord: ChunkCoord) -> GenerationRequest {
        GenerationRequest {
            seed: SessionSeed::new("deadbeef00face55"),
            coord,
            config_version: 1,
            chunk_size: 24,
            cell_size: 2.5,
            wall_thickness: 0.14,
            ceiling_height: 3.0,
        }
    }

    #[test]
    fn test_chunk_coord_from_world_pos() {
        let span_cells = 24;
        let cell = 2.5;
        assert_eq!(ChunkCoord::from_world_pos(0.0, 0.0, span_cells, cell), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world_pos(59.9, 59.9, span_cells, cell), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world_pos(60.0, 60.0, span_cells, cell), ChunkCoord::new(1, 1));
        assert_eq!(ChunkCoord::from_world_pos(-0.1, -0.1, span_cells, cell), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_world_pos(-60.0, -60.1, span_cells, cell), ChunkCoord::new(-1, -2));
    }

    #[test]
    fn test_chunk_key_roundtrip_and_rejects_garbage() {
        let coord = ChunkCoord::new(-3, 17);
        assert_eq!(coord.key(), "-3,17");
        assert_eq!("-3,17".parse::<ChunkCoord>(), Ok(coord));

        for bad in ["", "3", "3,", ",4", "a,b", "1,2,3", "1.5,2"] {
            assert!(bad.parse::<ChunkCoord>().is_err(), "Accepted `{bad}`");
        }
    }

    #[test]
    fn test_chebyshev_distance() {
        let origin = ChunkCoord::new(0, 0);
        assert_eq!(origin.chebyshev_distance(ChunkCoord::new(3, -1)), 3);
        assert_eq!(origin.chebyshev_distance(ChunkCoord::new(-2, 5)), 5);
        assert_eq!(origin.chebyshev_distance(origin), 0);
        assert_eq!(
            ChunkCoord::new(i32::MIN, 0).chebyshev_distance(ChunkCoord::new(i32::MAX, 0)),
            u32::MAX
        );
    }

    #[test]
    fn test_square_around() {
        let coords: Vec<_> = ChunkCoord::new(5, 5).square_around(1).collect();
        assert_eq!(coords.len(), 9);
        assert_eq!(coords[0], ChunkCoord::new(4, 4));
        assert_eq!(coords[8], ChunkCoord::new(6, 6));
        assert_eq!(ChunkCoord::new(0, 0).square_around(3).count(), 49);
        assert_eq!(ChunkCoord::new(0, 0).square_around(0).count(), 1);
    }

    #[test]
    fn test_square_around_stops_at_integer_limits() {
        let coords: Vec<_> = ChunkCoord::new(i32::MAX, 0).square_around(1).collect();
        assert_eq!(coords.len(), 6);
        assert!(coords.iter().all(|c| c.x >= i32::MAX - 1));

        assert_eq!(ChunkCoord::new(i32::MIN, i32::MIN).square_around(2).count(), 9);
    }

    #[test]
    fn test_origin_cell_saturates() {
        assert_eq!(ChunkCoord::new(-1, 2).origin_cell(24), (-24, 48));
        assert_eq!(ChunkCoord::new(i32::MAX, i32::MIN).origin_cell(24), (i32::MAX, i32::MIN));
    }

    #[test]
    fn test_chunks_at_grid_edge_are_rejected() {
        // (MAX / 24) * 24 + 24 overflows i32
        let req = request(ChunkCoord::new(i32::MAX / 24, 0));
        assert!(matches!(generate_chunk(&req), Err(GenerationError::InvalidRequest(_))));

        let req = request(ChunkCoord::new(0, i32::MIN / 24 - 1));
        assert!(matches!(generate_chunk(&req), Err(GenerationError::InvalidRequest(_))));

        let req = request(ChunkCoord::new(i32::MAX, i32::MAX));
        assert!(matches!(generate_chunk(&req), Err(GenerationError::InvalidRequest(_))));
    }

    #[test]
    fn test_outermost_valid_chunks_generate() {
        for coord in [
            ChunkCoord::new(i32::MAX / 24 - 1, 0),
            ChunkCoord::new(i32::MIN / 24, i32::MIN / 24),
        ] {
            let response = generate_chunk(&request(coord)).unwrap();
            assert_eq!(response.data.floors().len(), 24 * 24);
            assert_eq!(response.coord, coord);
        }
    }

    #[test]
    fn test_chunk_generation_determinism() {
        let first = generate_chunk(&request(ChunkCoord::new(5, -3))).unwrap();
        let second = generate_chunk(&request(ChunkCoord::new(5, -3))).unwrap();

        assert_eq!(first.checksum, second.checksum);
        assert_eq!(first.data, second.data);
    }

    #[test]
    fn test_checksum_shape() {
        let response = generate_chunk(&request(ChunkCoord::new(2, -7))).unwrap();
        assert!(response.checksum.as_str().starts_with("deadbe:2:-7:"));
    }

    #[test]
    fn test_checksum_differs_between_chunks() {
        let a = generate_chunk(&request(ChunkCoord::new(0, 0))).unwrap();
        let b = generate_chunk(&request(ChunkCoord::new(1, 0))).unwrap();
        assert_ne!(a.checksum, b.checksum);
    }

    #[test]
    fn test_every_cell_has_floor_and_ceiling() {
        let response = generate_chunk(&request(ChunkCoord::new(-1, 2))).unwrap();
        assert_eq!(response.data.floors().len(), 24 * 24);
        assert_eq!(response.data.ceilings().len(), 24 * 24);
        assert_eq!(response.data.floor_centers().len(), 24 * 24 * 2);

        let first = response.data.floors()[0];
        // Origin cell of chunk (-1, 2) is (-24, 48)
        assert_eq!((first.x, first.z), (-58.75, 121.25));
    }

    #[test]
    fn test_walls_match_rules() {
        let req = request(ChunkCoord::new(3, 3));
        let response = generate_chunk(&req).unwrap();
        let maze = MazeRules::new(&req.seed);

        let (ox, oz) = req.coord.origin_cell(req.chunk_size);
        let expected_x = (0..24)
            .flat_map(|z| (0..24).map(move |x| (ox + x, oz + z)))
            .filter(|&(x, z)| maze.is_wall_x(x, z))
            .count();
        let expected_z = (0..24)
            .flat_map(|z| (0..24).map(move |x| (ox + x, oz + z)))
            .filter(|&(x, z)| maze.is_wall_z(x, z))
            .count();

        assert_eq!(response.data.walls_x().len(), expected_x);
        assert_eq!(response.data.walls_z().len(), expected_z);
    }

    #[test]
    fn test_collider_count_matches_geometry() {
        let response = generate_chunk(&request(ChunkCoord::new(0, 0))).unwrap();
        let data = &response.data;
        let expected = data.walls_x().len()
            + data.walls_z().len()
            + data.tables().len()
            + data.chairs().len()
            + data.office_lamps().len();
        assert_eq!(data.colliders().len(), expected);
        assert_eq!(data.collider_data().len(), expected * 4);
    }

    #[test]
    fn test_config_version_is_carried_through() {
        let mut req = request(ChunkCoord::new(0, 0));
        req.config_version = 42;
        let response = generate_chunk(&req).unwrap();
        assert_eq!(response.config_version, 42);
        assert_eq!(response.seed, req.seed);
    }

    #[test]
    fn test_invalid_requests_are_rejected() {
        let mut req = request(ChunkCoord::new(0, 0));
        req.chunk_size = 0;
        assert!(matches!(generate_chunk(&req), Err(GenerationError::InvalidRequest(_))));

        let mut req = request(ChunkCoord::new(0, 0));
        req.chunk_size = MAX_CHUNK_SIZE + 1;
        assert!(matches!(generate_chunk(&req), Err(GenerationError::InvalidRequest(_))));

        let mut req = request(ChunkCoord::new(0, 0));
        req.cell_size = f32::NAN;
        assert!(matches!(generate_chunk(&req), Err(GenerationError::InvalidRequest(_))));

        let mut req = request(ChunkCoord::new(0, 0));
        req.wall_thickness = -1.0;
        assert!(matches!(generate_chunk(&req), Err(GenerationError::InvalidRequest(_))));
    }

    #[test]
    fn test_byte_size_counts_every_buffer() {
        let response = generate_chunk(&request(ChunkCoord::new(0, 0))).unwrap();
        let data = &response.data;
        let floats = data.floor_centers().len()
            + data.ceiling_centers().len()
            + data.wall_x_centers().len()
            + data.wall_z_centers().len()
            + data.table_data().len()
            + data.chair_data().len()
            + data.light_data().len()
            + data.office_lamp_data().len()
            + data.collider_data().len();
        assert_eq!(data.byte_size(), floats * 4);
    }
}
