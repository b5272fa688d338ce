//! # Feature Placement Rules
//!
//! Ceiling lights, tables with chairs, and office lamps.
//!
//! - Lights sit on a coarse periodic grid plus rare off-grid spots and
//!   ignore walls entirely.
//! - Furniture only goes into *open* cells: no wall on the cell's own
//!   perimeter and not squeezed between walled neighbours on either axis.
//! - A cell holds at most one of table or office lamp; the table wins.
//!
//! Every roll uses its own hash channel (see [`crate::hash::channel`]).

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::geometry::{CeilingLight, FurniturePlacement, OfficeLamp};
use crate::hash::{channel, CellHasher, SessionSeed};
use crate::maze::MazeRules;

/// Light grid period in cells.
pub const LIGHT_PATCH_SIZE: i32 = 5;
/// Probability of a light on a grid cell.
pub const LIGHT_PATCH_CHANCE: f64 = 0.65;
/// Probability of a light on any other cell.
pub const SPARSE_LIGHT_CHANCE: f64 = 0.015;
/// Probability of a table in an open cell.
pub const TABLE_CHANCE: f64 = 0.018;
/// Table jitter as a fraction of the cell size.
pub const TABLE_JITTER: f64 = 0.32;
/// Probability that a given chair slot around a table is filled.
pub const CHAIR_CHANCE: f64 = 0.62;
/// Probability of an office lamp in an open cell without a table.
pub const OFFICE_LAMP_CHANCE: f64 = 0.007;
/// Office lamp jitter as a fraction of the cell size.
pub const OFFICE_LAMP_JITTER: f64 = 0.34;
/// Probability that an office lamp flickers periodically.
pub const LAMP_FLICKER_CHANCE: f64 = 0.38;
/// Light fixtures hang this far below the ceiling.
const LIGHT_DROP: f64 = 0.08;

/// Chair slot in the table's local frame.
struct ChairSide {
    x: f64,
    z: f64,
    yaw: f64,
}

/// Back, front, left, right.
const CHAIR_SIDES: [ChairSide; 4] = [
    ChairSide { x: 0.0, z: -0.78, yaw: PI },
    ChairSide { x: 0.0, z: 0.78, yaw: 0.0 },
    ChairSide { x: -0.92, z: 0.0, yaw: FRAC_PI_2 },
    ChairSide { x: 0.92, z: 0.0, yaw: -FRAC_PI_2 },
];

/// A chair accepted next to a table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedChair {
    /// The chair instance.
    pub placement: FurniturePlacement,
    /// World cell the chair was validated against.
    pub cell: (i32, i32),
}

/// A table and the chairs that survived their openness checks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableGroup {
    /// The table instance.
    pub table: FurniturePlacement,
    /// Chair slots (back, front, left, right).
    pub chairs: [Option<PlacedChair>; 4],
}

impl TableGroup {
    /// Iterates over the placed chairs.
    pub fn chairs(&self) -> impl Iterator<Item = &PlacedChair> {
        self.chairs.iter().flatten()
    }
}

/// Feature placement for one session seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureRules {
    maze: MazeRules,
}

impl FeatureRules {
    /// Creates the rules for a seed.
    #[must_use]
    pub fn new(seed: &SessionSeed) -> Self {
        Self::from_maze(MazeRules::new(seed))
    }

    /// Creates the rules on top of existing maze rules.
    #[inline]
    #[must_use]
    pub const fn from_maze(maze: MazeRules) -> Self {
        Self { maze }
    }

    /// Returns the maze rules furniture placement is gated on.
    #[inline]
    #[must_use]
    pub const fn maze(&self) -> &MazeRules {
        &self.maze
    }

    #[inline]
    fn hasher(&self) -> CellHasher {
        self.maze.hasher()
    }

    /// Whether a ceiling light hangs over this cell.
    #[must_use]
    pub fn should_place_light(&self, world_x: i32, world_z: i32) -> bool {
        let on_grid = world_x.rem_euclid(LIGHT_PATCH_SIZE) == 0
            && world_z.rem_euclid(LIGHT_PATCH_SIZE) == 0;
        if on_grid {
            self.hasher().unit(world_x, world_z, channel::LIGHT_PATCH) < LIGHT_PATCH_CHANCE
        } else {
            self.hasher().unit(world_x, world_z, channel::LIGHT_SPARSE) < SPARSE_LIGHT_CHANCE
        }
    }

    /// Returns true if any of the cell's four faces is a wall.
    ///
    /// Neighbours wrap at the `i32` limits.
    #[must_use]
    pub fn has_perimeter_wall(&self, world_x: i32, world_z: i32) -> bool {
        self.maze.is_wall_z(world_x, world_z.wrapping_sub(1))
            || self.maze.is_wall_z(world_x, world_z)
            || self.maze.is_wall_x(world_x.wrapping_sub(1), world_z)
            || self.maze.is_wall_x(world_x, world_z)
    }

    /// Whether furniture may stand in this cell.
    ///
    /// The cell itself must be wall-free and must not sit between two walled
    /// neighbours on the same axis.
    #[must_use]
    pub fn is_furniture_cell_open(&self, world_x: i32, world_z: i32) -> bool {
        if self.has_perimeter_wall(world_x, world_z) {
            return false;
        }

        let x_blocked = self.has_perimeter_wall(world_x.wrapping_sub(1), world_z)
            && self.has_perimeter_wall(world_x.wrapping_add(1), world_z);
        let z_blocked = self.has_perimeter_wall(world_x, world_z.wrapping_sub(1))
            && self.has_perimeter_wall(world_x, world_z.wrapping_add(1));
        !x_blocked && !z_blocked
    }

    /// Table roll for this cell (ignores openness).
    #[must_use]
    pub fn should_place_table(&self, world_x: i32, world_z: i32) -> bool {
        self.hasher().unit(world_x, world_z, channel::TABLE) < TABLE_CHANCE
    }

    /// Office lamp roll for this cell (ignores openness and tables).
    #[must_use]
    pub fn should_place_office_lamp(&self, world_x: i32, world_z: i32) -> bool {
        self.hasher().unit(world_x, world_z, channel::LAMP) < OFFICE_LAMP_CHANCE
    }

    /// Ceiling light for this cell, if any.
    #[must_use]
    pub fn ceiling_light(
        &self,
        world_x: i32,
        world_z: i32,
        cell_size: f64,
        ceiling_height: f64,
    ) -> Option<CeilingLight> {
        if !self.should_place_light(world_x, world_z) {
            return None;
        }

        let h = self.hasher();
        let (center_x, center_z) = cell_center(world_x, world_z, cell_size);
        let intensity = 1.5 + h.unit(world_x, world_z, channel::LIGHT_INTENSITY) * 1.3;
        let phase = h.unit(world_x, world_z, channel::LIGHT_PHASE) * TAU;

        Some(CeilingLight {
            x: center_x as f32,
            y: (ceiling_height - LIGHT_DROP) as f32,
            z: center_z as f32,
            intensity: intensity as f32,
            phase: phase as f32,
        })
    }

    /// Table and chairs for this cell, if the table roll succeeds in an open cell.
    #[must_use]
    pub fn table_group(&self, world_x: i32, world_z: i32, cell_size: f64) -> Option<TableGroup> {
        if !self.should_place_table(world_x, world_z) || !self.is_furniture_cell_open(world_x, world_z) {
            return None;
        }

        let h = self.hasher();
        let (center_x, center_z) = cell_center(world_x, world_z, cell_size);
        let jitter_x = (h.unit(world_x, world_z, channel::TABLE_JITTER_X) - 0.5) * cell_size * TABLE_JITTER;
        let jitter_z = (h.unit(world_x, world_z, channel::TABLE_JITTER_Z) - 0.5) * cell_size * TABLE_JITTER;
        let yaw = h.unit(world_x, world_z, channel::TABLE_YAW) * TAU;
        let scale = 0.9 + h.unit(world_x, world_z, channel::TABLE_SCALE) * 0.24;
        let table_x = center_x + jitter_x;
        let table_z = center_z + jitter_z;

        let mut chairs = [None; 4];
        let (sin, cos) = yaw.sin_cos();
        for (side, (slot, config)) in (0u32..).zip(chairs.iter_mut().zip(CHAIR_SIDES.iter())) {
            if h.unit(world_x, world_z, channel::CHAIR_PRESENT + side) > CHAIR_CHANCE {
                continue;
            }

            let chair_x = table_x + config.x * cos - config.z * sin;
            let chair_z = table_z + config.x * sin + config.z * cos;
            let cell = (
                (chair_x / cell_size).floor() as i32,
                (chair_z / cell_size).floor() as i32,
            );
            if !self.is_furniture_cell_open(cell.0, cell.1) {
                continue;
            }

            let wobble = (h.unit(world_x, world_z, channel::CHAIR_YAW + side) - 0.5) * 0.22;
            let chair_scale = 0.9 + h.unit(world_x, world_z, channel::CHAIR_SCALE + side) * 0.18;
            *slot = Some(PlacedChair {
                placement: FurniturePlacement {
                    x: chair_x as f32,
                    z: chair_z as f32,
                    yaw: (yaw + config.yaw + wobble) as f32,
                    scale: chair_scale as f32,
                },
                cell,
            });
        }

        Some(TableGroup {
            table: FurniturePlacement {
                x: table_x as f32,
                z: table_z as f32,
                yaw: yaw as f32,
                scale: scale as f32,
            },
            chairs,
        })
    }

    /// Office lamp for this cell, if the roll succeeds in an open cell.
    ///
    /// Callers must not place a lamp in a cell that already holds a table.
    #[must_use]
    pub fn office_lamp(&self, world_x: i32, world_z: i32, cell_size: f64) -> Option<OfficeLamp> {
        if !self.should_place_office_lamp(world_x, world_z)
            || !self.is_furniture_cell_open(world_x, world_z)
        {
            return None;
        }

        let h = self.hasher();
        let (center_x, center_z) = cell_center(world_x, world_z, cell_size);
        let jitter_x = (h.unit(world_x, world_z, channel::LAMP_JITTER_X) - 0.5) * cell_size * OFFICE_LAMP_JITTER;
        let jitter_z = (h.unit(world_x, world_z, channel::LAMP_JITTER_Z) - 0.5) * cell_size * OFFICE_LAMP_JITTER;
        let scale = 0.92 + h.unit(world_x, world_z, channel::LAMP_SCALE) * 0.26;
        let intensity = 0.9 + h.unit(world_x, world_z, channel::LAMP_INTENSITY) * 0.8;
        let phase = h.unit(world_x, world_z, channel::LAMP_PHASE) * TAU;
        let flickers = h.unit(world_x, world_z, channel::LAMP_FLICKER) < LAMP_FLICKER_CHANCE;

        Some(OfficeLamp {
            x: (center_x + jitter_x) as f32,
            z: (center_z + jitter_z) as f32,
            scale: scale as f32,
            intensity: intensity as f32,
            phase: phase as f32,
            flicker: if flickers { 1.0 } else { 0.0 },
        })
    }
}

/// World-space centre of a cell.
#[inline]
#[must_use]
pub fn cell_center(world_x: i32, world_z: i32, cell_size: f64) -> (f64, f64) {
    (
        (f64::from(world_x) + 0.5) * cell_size,
        (f64::from(world_z) + 0.5) * cell_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: f64 = 2.5;

    fn rules() -> FeatureRules {
        FeatureRules::new(&SessionSeed::new("deadbeef00face55"))
    }

    #[test]
    fn test_grid_lights_are_common() {
        let rules = rules();
        let mut grid_cells = 0;
        let mut lit = 0;
        for x in (-100..100).step_by(LIGHT_PATCH_SIZE as usize) {
            for z in (-100..100).step_by(LIGHT_PATCH_SIZE as usize) {
                grid_cells += 1;
                if rules.should_place_light(x, z) {
                    lit += 1;
                }
            }
        }
        let share = f64::from(lit) / f64::from(grid_cells);
        assert!((0.55..0.75).contains(&share), "Grid light share {share:.2}");
    }

    #[test]
    fn test_off_grid_lights_are_rare() {
        let rules = rules();
        let mut cells = 0;
        let mut lit = 0;
        for x in -100..100 {
            for z in -100..100 {
                if x % LIGHT_PATCH_SIZE == 0 && z % LIGHT_PATCH_SIZE == 0 {
                    continue;
                }
                cells += 1;
                if rules.should_place_light(x, z) {
                    lit += 1;
                }
            }
        }
        let share = f64::from(lit) / f64::from(cells);
        assert!(share < 0.03, "Off-grid light share {share:.3}");
    }

    #[test]
    fn test_light_hangs_below_ceiling() {
        let rules = rules();
        let light = (0..LIGHT_PATCH_SIZE * 40)
            .step_by(LIGHT_PATCH_SIZE as usize)
            .find_map(|x| rules.ceiling_light(x, 0, CELL, 3.0))
            .expect("some grid light");

        assert!((light.y - 2.92).abs() < 1e-5);
        assert!((1.5..2.8).contains(&light.intensity));
        assert!((0.0..std::f32::consts::TAU + 1e-4).contains(&light.phase));
    }

    #[test]
    fn test_walled_cell_is_never_open() {
        let rules = rules();
        for x in -50..50 {
            for z in -50..50 {
                if rules.has_perimeter_wall(x, z) {
                    assert!(!rules.is_furniture_cell_open(x, z));
                }
            }
        }
    }

    #[test]
    fn test_tables_only_in_open_cells() {
        let rules = rules();
        let mut tables = 0;
        for x in -150..150 {
            for z in -150..150 {
                if let Some(group) = rules.table_group(x, z, CELL) {
                    tables += 1;
                    assert!(rules.is_furniture_cell_open(x, z), "Table in closed cell ({x}, {z})");
                    for chair in group.chairs() {
                        assert!(
                            rules.is_furniture_cell_open(chair.cell.0, chair.cell.1),
                            "Chair in closed cell {:?}",
                            chair.cell
                        );
                    }
                }
            }
        }
        assert!(tables > 0, "No tables in a 300x300 area");
    }

    #[test]
    fn test_table_stays_inside_its_cell() {
        let rules = rules();
        for x in -150..150 {
            for z in -150..150 {
                if let Some(group) = rules.table_group(x, z, CELL) {
                    let cell_x = (f64::from(group.table.x) / CELL).floor() as i32;
                    let cell_z = (f64::from(group.table.z) / CELL).floor() as i32;
                    assert_eq!((cell_x, cell_z), (x, z));
                    assert!((0.9..=1.14).contains(&group.table.scale));
                }
            }
        }
    }

    #[test]
    fn test_lamp_only_in_open_cells() {
        let rules = rules();
        let mut lamps = 0;
        for x in -150..150 {
            for z in -150..150 {
                if let Some(lamp) = rules.office_lamp(x, z, CELL) {
                    lamps += 1;
                    assert!(rules.is_furniture_cell_open(x, z));
                    assert!(lamp.flicker == 0.0 || lamp.flicker == 1.0);
                }
            }
        }
        assert!(lamps > 0, "No office lamps in a 300x300 area");
    }

    #[test]
    fn test_placement_rules_at_integer_limits() {
        let rules = rules();
        for (x, z) in [
            (i32::MAX, i32::MAX),
            (i32::MIN, i32::MIN),
            (i32::MAX, i32::MIN),
            (i32::MIN, i32::MAX),
        ] {
            let _ = rules.is_furniture_cell_open(x, z);
            let _ = rules.table_group(x, z, CELL);
            let _ = rules.office_lamp(x, z, CELL);
        }
    }

    #[test]
    fn test_cell_center() {
        assert_eq!(cell_center(0, 0, CELL), (1.25, 1.25));
        assert_eq!(cell_center(-1, 2, CELL), (-1.25, 6.25));
    }
}
