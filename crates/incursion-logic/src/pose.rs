//! Entity pose in continuous world units and grid ↔ world conversion.
//!
//! World position = grid coordinate × unit size, so cell centres sit on
//! integer multiples of the unit size. Yaw 0 faces −z; positive yaw turns
//! toward −x.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub z: f64,
    pub yaw: f64,
}

impl Pose {
    pub fn new(x: f64, z: f64, yaw: f64) -> Self {
        Self { x, z, yaw }
    }

    /// Pose at the centre of grid cell `(gx, gz)`.
    pub fn at_cell(gx: usize, gz: usize, unit_size: f64) -> Self {
        let (x, z) = grid_to_world(gx, gz, unit_size);
        Self { x, z, yaw: 0.0 }
    }

    /// Unit vector the pose is facing, on the x/z plane.
    pub fn forward(&self) -> (f64, f64) {
        (-self.yaw.sin(), -self.yaw.cos())
    }

    pub fn distance_to(&self, other: &Pose) -> f64 {
        distance(self.x, self.z, other.x, other.z)
    }

    /// Yaw that faces the point `(x, z)` from this pose.
    pub fn yaw_towards(&self, x: f64, z: f64) -> f64 {
        let (dx, dz) = (x - self.x, z - self.z);
        (-dx).atan2(-dz)
    }
}

pub fn distance(x0: f64, z0: f64, x1: f64, z1: f64) -> f64 {
    ((x1 - x0).powi(2) + (z1 - z0).powi(2)).sqrt()
}

pub fn grid_to_world(gx: usize, gz: usize, unit_size: f64) -> (f64, f64) {
    (gx as f64 * unit_size, gz as f64 * unit_size)
}

/// Nearest grid cell for a world position. May be negative or past the
/// grid edge; callers treat those as out of range.
pub fn world_to_grid(x: f64, z: f64, unit_size: f64) -> (i64, i64) {
    ((x / unit_size).round() as i64, (z / unit_size).round() as i64)
}

/// Wrap an angle into (−π, π].
pub fn normalize_angle(mut a: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    if !a.is_finite() {
        return 0.0;
    }
    a %= TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}
