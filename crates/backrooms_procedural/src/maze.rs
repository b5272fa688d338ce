//! # Maze Rule Engine
//!
//! Decides, for every grid cell, whether a wall stands on its east face
//! (`is_wall_x`) and on its south face (`is_wall_z`).
//!
//! ## Layers
//!
//! 1. **Major grid**: every `ROOM_WIDTH` x `ROOM_HEIGHT` boundary is a room
//!    wall with one or two door openings. Doors are rolled per boundary
//!    *line segment*, never per cell, so every cell on the segment agrees.
//! 2. **Interior**: rooms may be split by one vertical and/or one
//!    horizontal wall, placed away from the room border, with its own doors.
//!
//! ## Seam Consistency
//!
//! Both layers are pure functions of world coordinates and the seed. They
//! know nothing about chunks, so a boundary evaluates identically no matter
//! which chunk asks.

use crate::hash::{channel, CellHasher, SessionSeed};

/// Room width in cells (major grid period along X).
pub const ROOM_WIDTH: i32 = 8;
/// Room height in cells (major grid period along Z).
pub const ROOM_HEIGHT: i32 = 8;
/// Width of a door in a major wall.
pub const MAJOR_DOOR_WIDTH: i32 = 2;
/// Width of a door in an interior wall.
pub const INTERIOR_DOOR_WIDTH: i32 = 2;
/// Probability that a room rolls an interior wall for a given orientation.
pub const INTERIOR_WALL_CHANCE: f64 = 0.74;
/// Probability that a major wall segment gets a second door.
pub const MAJOR_EXTRA_DOOR_CHANCE: f64 = 0.22;
/// Style threshold above which interior walls get a second door.
const INTERIOR_EXTRA_DOOR_STYLE: f64 = 0.86;
/// Cells kept free of doors at both ends of a wall segment.
const DOOR_MARGIN: i32 = 1;

/// Orientation of a wall segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WallAxis {
    /// Wall on the east face of a cell (normal along X).
    X,
    /// Wall on the south face of a cell (normal along Z).
    Z,
}

/// Per-axis constants: grid periods and hash channels.
struct AxisRules {
    /// Room size across the wall (the axis the boundary is counted on).
    across_size: i32,
    /// Room size along the wall.
    along_size: i32,
    major_door_a: u32,
    major_extra_door: u32,
    major_door_b: u32,
    interior_present: u32,
    interior_style: u32,
    interior_offset: u32,
    interior_door_a: u32,
    interior_door_b: u32,
}

const X_RULES: AxisRules = AxisRules {
    across_size: ROOM_WIDTH,
    along_size: ROOM_HEIGHT,
    major_door_a: channel::MAJOR_X_DOOR_A,
    major_extra_door: channel::MAJOR_X_EXTRA_DOOR,
    major_door_b: channel::MAJOR_X_DOOR_B,
    interior_present: channel::INTERIOR_X_PRESENT,
    interior_style: channel::INTERIOR_X_STYLE,
    interior_offset: channel::INTERIOR_X_OFFSET,
    interior_door_a: channel::INTERIOR_X_DOOR_A,
    interior_door_b: channel::INTERIOR_X_DOOR_B,
};

const Z_RULES: AxisRules = AxisRules {
    across_size: ROOM_HEIGHT,
    along_size: ROOM_WIDTH,
    major_door_a: channel::MAJOR_Z_DOOR_A,
    major_extra_door: channel::MAJOR_Z_EXTRA_DOOR,
    major_door_b: channel::MAJOR_Z_DOOR_B,
    interior_present: channel::INTERIOR_Z_PRESENT,
    interior_style: channel::INTERIOR_Z_STYLE,
    interior_offset: channel::INTERIOR_Z_OFFSET,
    interior_door_a: channel::INTERIOR_Z_DOOR_A,
    interior_door_b: channel::INTERIOR_Z_DOOR_B,
};

impl WallAxis {
    const fn rules(self) -> &'static AxisRules {
        match self {
            Self::X => &X_RULES,
            Self::Z => &Z_RULES,
        }
    }

    /// Splits a cell into (coordinate across the wall, coordinate along it).
    const fn split(self, world_x: i32, world_z: i32) -> (i32, i32) {
        match self {
            Self::X => (world_x, world_z),
            Self::Z => (world_z, world_x),
        }
    }

    /// Re-orders (across, along) back into hash `(x, z)` order.
    const fn join(self, across: i32, along: i32) -> (i32, i32) {
        match self {
            Self::X => (across, along),
            Self::Z => (along, across),
        }
    }

    /// Whether the room style roll enables interior walls on this axis.
    fn interior_enabled(self, style: f64) -> bool {
        match self {
            Self::X => style < 0.46 || style >= INTERIOR_EXTRA_DOOR_STYLE,
            Self::Z => style >= 0.42,
        }
    }
}

/// Returns true if `value` lies in `[start, start + width)`.
#[inline]
const fn in_range(value: i32, start: i32, width: i32) -> bool {
    value >= start && value < start + width
}

/// Offset of a cell's far face within its room, in `0..room_size`.
///
/// Computed in `i64` so the face of the last cell before `i32::MAX` is a
/// face like any other.
#[inline]
fn far_face_offset(across: i32, room_size: i32) -> i32 {
    (i64::from(across) + 1).rem_euclid(i64::from(room_size)) as i32
}

/// Index of the major grid line on a cell's far face, if it lies on one.
#[inline]
fn grid_line(across: i32, room_size: i32) -> Option<i32> {
    let boundary = i64::from(across) + 1;
    let size = i64::from(room_size);
    (boundary.rem_euclid(size) == 0).then(|| boundary.div_euclid(size) as i32)
}

/// Picks the first cell of a door opening on a wall segment.
///
/// The door never touches the first or last `margin` cells of the segment.
#[inline]
fn pick_door_start(
    hasher: CellHasher,
    a: i32,
    b: i32,
    channel: u32,
    segment_size: i32,
    door_width: i32,
    margin: i32,
) -> i32 {
    let slots = (segment_size - door_width - margin * 2 + 1).max(1);
    margin + (hasher.unit(a, b, channel) * f64::from(slots)) as i32
}

/// Wall predicates for one session seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MazeRules {
    hasher: CellHasher,
}

impl MazeRules {
    /// Creates the rules for a seed.
    #[must_use]
    pub fn new(seed: &SessionSeed) -> Self {
        Self::from_hasher(seed.hasher())
    }

    /// Creates the rules from an existing hasher.
    #[inline]
    #[must_use]
    pub const fn from_hasher(hasher: CellHasher) -> Self {
        Self { hasher }
    }

    /// Returns the underlying hasher.
    #[inline]
    #[must_use]
    pub const fn hasher(&self) -> CellHasher {
        self.hasher
    }

    /// Wall between `(world_x, world_z)` and `(world_x + 1, world_z)`.
    #[inline]
    #[must_use]
    pub fn is_wall_x(&self, world_x: i32, world_z: i32) -> bool {
        self.is_wall(WallAxis::X, world_x, world_z)
    }

    /// Wall between `(world_x, world_z)` and `(world_x, world_z + 1)`.
    #[inline]
    #[must_use]
    pub fn is_wall_z(&self, world_x: i32, world_z: i32) -> bool {
        self.is_wall(WallAxis::Z, world_x, world_z)
    }

    /// Wall on the far face of a cell along `axis`.
    #[must_use]
    pub fn is_wall(&self, axis: WallAxis, world_x: i32, world_z: i32) -> bool {
        match self.major_wall(axis, world_x, world_z) {
            Some(wall) => wall,
            None => self.interior_wall(axis, world_x, world_z),
        }
    }

    /// Major grid layer. `None` when the face is not on a major grid line.
    fn major_wall(&self, axis: WallAxis, world_x: i32, world_z: i32) -> Option<bool> {
        let rules = axis.rules();
        let (across, along) = axis.split(world_x, world_z);

        let line = grid_line(across, rules.across_size)?;

        // Door rolls are keyed by the line and the band it crosses
        let band = along.div_euclid(rules.along_size);
        let local = along.rem_euclid(rules.along_size);
        let (a, b) = axis.join(line, band);

        let door_a = pick_door_start(
            self.hasher,
            a,
            b,
            rules.major_door_a,
            rules.along_size,
            MAJOR_DOOR_WIDTH,
            DOOR_MARGIN,
        );
        let has_extra_door = self.hasher.unit(a, b, rules.major_extra_door) < MAJOR_EXTRA_DOOR_CHANCE;
        let door_b = pick_door_start(
            self.hasher,
            a,
            b,
            rules.major_door_b,
            rules.along_size,
            MAJOR_DOOR_WIDTH,
            DOOR_MARGIN,
        );

        let open = in_range(local, door_a, MAJOR_DOOR_WIDTH)
            || (has_extra_door && in_range(local, door_b, MAJOR_DOOR_WIDTH));
        Some(!open)
    }

    /// Interior sub-division layer.
    fn interior_wall(&self, axis: WallAxis, world_x: i32, world_z: i32) -> bool {
        let rules = axis.rules();
        let (across, along) = axis.split(world_x, world_z);

        let local_boundary = far_face_offset(across, rules.across_size);
        if local_boundary == 0 || local_boundary == 1 || local_boundary == rules.across_size - 1 {
            return false;
        }

        let room_x = world_x.div_euclid(ROOM_WIDTH);
        let room_z = world_z.div_euclid(ROOM_HEIGHT);
        let local = along.rem_euclid(rules.along_size);

        if self.hasher.unit(room_x, room_z, rules.interior_present) > INTERIOR_WALL_CHANCE {
            return false;
        }

        let style = self.hasher.unit(room_x, room_z, rules.interior_style);
        if !axis.interior_enabled(style) {
            return false;
        }

        let offset_slots = f64::from(rules.across_size - 3);
        let wall_offset =
            2 + (self.hasher.unit(room_x, room_z, rules.interior_offset) * offset_slots) as i32;
        if local_boundary != wall_offset {
            return false;
        }

        let door_a = pick_door_start(
            self.hasher,
            room_x,
            room_z,
            rules.interior_door_a,
            rules.along_size,
            INTERIOR_DOOR_WIDTH,
            DOOR_MARGIN,
        );
        let has_extra_door = style >= INTERIOR_EXTRA_DOOR_STYLE;
        let door_b = pick_door_start(
            self.hasher,
            room_x,
            room_z,
            rules.interior_door_b,
            rules.along_size,
            INTERIOR_DOOR_WIDTH,
            DOOR_MARGIN,
        );

        let open = in_range(local, door_a, INTERIOR_DOOR_WIDTH)
            || (has_extra_door && in_range(local, door_b, INTERIOR_DOOR_WIDTH));
        !open
    }
}

/// Evaluates the east-face wall predicate directly from a seed.
#[must_use]
pub fn is_wall_x(seed: &SessionSeed, world_x: i32, world_z: i32) -> bool {
    MazeRules::new(seed).is_wall_x(world_x, world_z)
}

/// Evaluates the south-face wall predicate directly from a seed.
#[must_use]
pub fn is_wall_z(seed: &SessionSeed, world_x: i32, world_z: i32) -> bool {
    MazeRules::new(seed).is_wall_z(world_x, world_z)
}
