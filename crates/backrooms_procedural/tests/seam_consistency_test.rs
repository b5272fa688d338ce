//! # Seam Consistency Integration Test
//!
//! Neighbouring chunks are generated independently. Every wall on their
//! shared edge must be emitted by exactly one of them, and must agree with
//! evaluating the wall rule directly at that boundary.

use backrooms_procedural::{
    generate_chunk, is_wall_x, is_wall_z, ChunkCoord, SessionSeed, WallSegment, WorldConfig,
};

const EPSILON: f32 = 1e-3;

fn has_wall(walls: &[WallSegment], x: f32, z: f32) -> bool {
    walls
        .iter()
        .any(|w| (w.x - x).abs() < EPSILON && (w.z - z).abs() < EPSILON)
}

/// Checks the east edge of `west` against the west edge of its neighbour.
fn assert_x_seam(seed: &SessionSeed, config: &WorldConfig, west: ChunkCoord) {
    let east = ChunkCoord::new(west.x + 1, west.z);
    let west_chunk = generate_chunk(&config.generation_request(seed, west)).unwrap();
    let east_chunk = generate_chunk(&config.generation_request(seed, east)).unwrap();

    let size = config.chunk_size as i32;
    let cell = config.cell_size;
    let (origin_x, origin_z) = west.origin_cell(config.chunk_size);
    let seam_x = origin_x + size - 1;

    for local_z in 0..size {
        let world_z = origin_z + local_z;
        let wall_x = (seam_x + 1) as f32 * cell;
        let wall_z = (world_z as f32 + 0.5) * cell;

        let expected = is_wall_x(seed, seam_x, world_z);
        assert_eq!(
            has_wall(west_chunk.data.walls_x(), wall_x, wall_z),
            expected,
            "Owning chunk {west} disagrees with rule at ({seam_x}, {world_z})"
        );
        assert!(
            !has_wall(east_chunk.data.walls_x(), wall_x, wall_z),
            "Chunk {east} emitted a wall it does not own at ({seam_x}, {world_z})"
        );
    }
}

/// Checks the south edge of `north` against the north edge of its neighbour.
fn assert_z_seam(seed: &SessionSeed, config: &WorldConfig, north: ChunkCoord) {
    let south = ChunkCoord::new(north.x, north.z + 1);
    let north_chunk = generate_chunk(&config.generation_request(seed, north)).unwrap();
    let south_chunk = generate_chunk(&config.generation_request(seed, south)).unwrap();

    let size = config.chunk_size as i32;
    let cell = config.cell_size;
    let (origin_x, origin_z) = north.origin_cell(config.chunk_size);
    let seam_z = origin_z + size - 1;

    for local_x in 0..size {
        let world_x = origin_x + local_x;
        let wall_x = (world_x as f32 + 0.5) * cell;
        let wall_z = (seam_z + 1) as f32 * cell;

        let expected = is_wall_z(seed, world_x, seam_z);
        assert_eq!(
            has_wall(north_chunk.data.walls_z(), wall_x, wall_z),
            expected,
            "Owning chunk {north} disagrees with rule at ({world_x}, {seam_z})"
        );
        assert!(
            !has_wall(south_chunk.data.walls_z(), wall_x, wall_z),
            "Chunk {south} emitted a wall it does not own at ({world_x}, {seam_z})"
        );
    }
}

/// Test: chunk (0,0) and (1,0) agree on every wall at worldX = 23.
#[test]
fn test_reference_seam_at_world_x_23() {
    let seed = SessionSeed::new("deadbeef00face55");
    let config = WorldConfig::default();
    assert_eq!(config.chunk_size, 24);
    assert_x_seam(&seed, &config, ChunkCoord::new(0, 0));
}

/// Test: seams on both axes, across several seeds and negative coordinates.
#[test]
fn test_seams_across_seeds_and_quadrants() {
    let config = WorldConfig::default();
    let coords = [
        ChunkCoord::new(0, 0),
        ChunkCoord::new(-1, 0),
        ChunkCoord::new(0, -1),
        ChunkCoord::new(-3, 4),
        ChunkCoord::new(7, -9),
    ];

    for seed in ["deadbeef00face55", "backrooms", "0123456789abcdef01234567"] {
        let seed = SessionSeed::new(seed);
        for &coord in &coords {
            assert_x_seam(&seed, &config, coord);
            assert_z_seam(&seed, &config, coord);
        }
    }
}

/// Test: chunk sizes that do not divide the room grid still stitch cleanly.
#[test]
fn test_seams_with_odd_chunk_size() {
    let config = WorldConfig {
        chunk_size: 13,
        ..WorldConfig::default()
    };
    let seed = SessionSeed::new("odd-chunks");

    for x in -2..2 {
        for z in -2..2 {
            assert_x_seam(&seed, &config, ChunkCoord::new(x, z));
            assert_z_seam(&seed, &config, ChunkCoord::new(x, z));
        }
    }
}

/// Test: every wall a chunk emits lies on a face of one of its own cells.
#[test]
fn test_walls_stay_inside_owned_faces() {
    let seed = SessionSeed::new("deadbeef00face55");
    let config = WorldConfig::default();
    let coord = ChunkCoord::new(2, -1);
    let response = generate_chunk(&config.generation_request(&seed, coord)).unwrap();

    let span = config.chunk_span() as f32;
    let min_x = coord.x as f32 * span;
    let min_z = coord.z as f32 * span;

    for wall in response.data.walls_x() {
        assert!(wall.x > min_x + EPSILON && wall.x <= min_x + span + EPSILON);
        assert!(wall.z > min_z && wall.z < min_z + span);
    }
    for wall in response.data.walls_z() {
        assert!(wall.x > min_x && wall.x < min_x + span);
        assert!(wall.z > min_z + EPSILON && wall.z <= min_z + span + EPSILON);
    }
}
