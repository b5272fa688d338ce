//! # Geometry Records
//!
//! Fixed-layout records emitted by the chunk generator. Each record is
//! `#[repr(C)]` and `Pod`, so a `Vec<Record>` is byte-for-byte the same as
//! the interleaved flat `f32` buffer renderers consume
//! (`[x0, z0, x1, z1, ...]`). Typed access at call sites, flat layout in
//! memory.

use bytemuck::{Pod, Zeroable};

/// Centre of a floor or ceiling cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct CellCenter {
    /// World X.
    pub x: f32,
    /// World Z.
    pub z: f32,
}

/// Centre of one wall segment (one cell long).
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct WallSegment {
    /// World X.
    pub x: f32,
    /// World Z.
    pub z: f32,
}

/// A table or chair instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct FurniturePlacement {
    /// World X.
    pub x: f32,
    /// World Z.
    pub z: f32,
    /// Rotation around Y in radians.
    pub yaw: f32,
    /// Uniform scale.
    pub scale: f32,
}

/// A ceiling light sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct CeilingLight {
    /// World X.
    pub x: f32,
    /// Height of the fixture.
    pub y: f32,
    /// World Z.
    pub z: f32,
    /// Base intensity.
    pub intensity: f32,
    /// Flicker phase in radians.
    pub phase: f32,
}

/// An office floor lamp sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct OfficeLamp {
    /// World X.
    pub x: f32,
    /// World Z.
    pub z: f32,
    /// Uniform scale.
    pub scale: f32,
    /// Base intensity.
    pub intensity: f32,
    /// Flicker phase in radians.
    pub phase: f32,
    /// `1.0` for a periodically flickering lamp, `0.0` otherwise.
    pub flicker: f32,
}

impl OfficeLamp {
    /// Returns true if the lamp flickers periodically.
    #[inline]
    #[must_use]
    pub fn flickers(&self) -> bool {
        self.flicker > 0.5
    }
}

/// Axis-aligned obstacle on the XZ plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct CollisionBox {
    /// Centre X.
    pub x: f32,
    /// Centre Z.
    pub z: f32,
    /// Half extent along X.
    pub half_x: f32,
    /// Half extent along Z.
    pub half_z: f32,
}

impl CollisionBox {
    /// Table footprint half extents per unit scale.
    const TABLE_HALF: (f32, f32) = (0.58, 0.4);
    /// Chair footprint half extent per unit scale.
    const CHAIR_HALF: f32 = 0.24;
    /// Office lamp footprint half extent per unit scale.
    const LAMP_HALF: f32 = 0.17;

    /// Creates a box from centre and half extents.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, z: f32, half_x: f32, half_z: f32) -> Self {
        Self { x, z, half_x, half_z }
    }

    /// Collider for a wall on the east face of a cell.
    #[inline]
    #[must_use]
    pub fn wall_x(wall: WallSegment, cell_size: f32, wall_thickness: f32) -> Self {
        Self::new(wall.x, wall.z, wall_thickness * 0.5, cell_size * 0.5)
    }

    /// Collider for a wall on the south face of a cell.
    #[inline]
    #[must_use]
    pub fn wall_z(wall: WallSegment, cell_size: f32, wall_thickness: f32) -> Self {
        Self::new(wall.x, wall.z, cell_size * 0.5, wall_thickness * 0.5)
    }

    /// Collider for a table.
    #[inline]
    #[must_use]
    pub fn table(table: &FurniturePlacement) -> Self {
        let (hx, hz) = Self::TABLE_HALF;
        Self::new(table.x, table.z, hx * table.scale, hz * table.scale)
    }

    /// Collider for a chair.
    #[inline]
    #[must_use]
    pub fn chair(chair: &FurniturePlacement) -> Self {
        let half = Self::CHAIR_HALF * chair.scale;
        Self::new(chair.x, chair.z, half, half)
    }

    /// Collider for an office lamp.
    #[inline]
    #[must_use]
    pub fn office_lamp(lamp: &OfficeLamp) -> Self {
        let half = Self::LAMP_HALF * lamp.scale;
        Self::new(lamp.x, lamp.z, half, half)
    }

    /// Minimum corner `(x, z)`.
    #[inline]
    #[must_use]
    pub fn min(&self) -> (f32, f32) {
        (self.x - self.half_x, self.z - self.half_z)
    }

    /// Maximum corner `(x, z)`.
    #[inline]
    #[must_use]
    pub fn max(&self) -> (f32, f32) {
        (self.x + self.half_x, self.z + self.half_z)
    }

    /// Returns true if the point lies inside or on the box.
    #[must_use]
    pub fn contains(&self, x: f32, z: f32) -> bool {
        let (min_x, min_z) = self.min();
        let (max_x, max_z) = self.max();
        x >= min_x && x <= max_x && z >= min_z && z <= max_z
    }
}
