//! Collision queries and wall-sliding resolution.
//!
//! Two backends share the [`Collider`] trait:
//! - [`GridCollider`]: maze walls, resolved against the nearest cell
//! - [`BoxCollider`]: an outer bound plus axis-aligned obstacles (hub room)
//!
//! Resolution is "full step, then slide":
//! 1. Try the whole step
//! 2. Otherwise try the X component alone
//! 3. Otherwise try the Z component alone
//! 4. Otherwise stay put

use serde::{Deserialize, Serialize};

use crate::constants::world::MARGIN_FACTOR;
use crate::grid::{Grid, Tile};
use crate::pose::world_to_grid;

/// Point-in-obstacle test on the x/z plane.
pub trait Collider {
    fn blocked(&self, x: f64, z: f64) -> bool;
}

/// Maze walls. A point is tested against its nearest cell only; when that
/// cell is a wall, the wall's footprint (grown by the collision margin)
/// decides.
#[derive(Debug, Clone, Copy)]
pub struct GridCollider<'a> {
    grid: &'a Grid,
    unit_size: f64,
    radius: f64,
}

impl<'a> GridCollider<'a> {
    pub fn new(grid: &'a Grid, unit_size: f64, radius: f64) -> Self {
        Self {
            grid,
            unit_size,
            radius,
        }
    }

    /// Half extent of a wall footprint including the margin.
    fn reach(&self) -> f64 {
        self.unit_size / 2.0 + self.radius * MARGIN_FACTOR
    }

    fn wall_covers(&self, gx: i64, gz: i64, x: f64, z: f64) -> bool {
        if self.grid.tile(gx as usize, gz as usize) != Some(Tile::Wall) {
            return false;
        }
        let reach = self.reach();
        let dx = x - gx as f64 * self.unit_size;
        let dz = z - gz as f64 * self.unit_size;
        dx.abs() < reach && dz.abs() < reach
    }
}

impl Collider for GridCollider<'_> {
    fn blocked(&self, x: f64, z: f64) -> bool {
        if !x.is_finite() || !z.is_finite() {
            return true;
        }
        let (gx, gz) = world_to_grid(x, z, self.unit_size);
        if !self.grid.in_bounds(gx, gz) {
            return true;
        }
        self.wall_covers(gx, gz, x, z)
    }
}

/// Axis-aligned box on the x/z plane (centre + half extents).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center_x: f64,
    pub center_z: f64,
    pub half_width: f64,
    pub half_depth: f64,
}

impl Aabb {
    /// Box from a centre and full width/depth.
    pub fn new(x: f64, z: f64, width: f64, depth: f64) -> Self {
        Self {
            center_x: x,
            center_z: z,
            half_width: width / 2.0,
            half_depth: depth / 2.0,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.center_x - self.half_width
    }
    pub fn max_x(&self) -> f64 {
        self.center_x + self.half_width
    }
    pub fn min_z(&self) -> f64 {
        self.center_z - self.half_depth
    }
    pub fn max_z(&self) -> f64 {
        self.center_z + self.half_depth
    }

    /// Inclusive containment.
    pub fn contains(&self, x: f64, z: f64) -> bool {
        x >= self.min_x() && x <= self.max_x() && z >= self.min_z() && z <= self.max_z()
    }
}

/// Outer bound plus solid obstacles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxCollider {
    pub bounds: Aabb,
    pub obstacles: Vec<Aabb>,
}

impl BoxCollider {
    pub fn new(bounds: Aabb, obstacles: Vec<Aabb>) -> Self {
        Self { bounds, obstacles }
    }
}

impl Collider for BoxCollider {
    fn blocked(&self, x: f64, z: f64) -> bool {
        // Standing exactly on the outer bound is allowed.
        if !self.bounds.contains(x, z) {
            return true;
        }
        self.obstacles.iter().any(|o| o.contains(x, z))
    }
}

/// Either backend, for callers that switch spaces at runtime.
#[derive(Debug, Clone)]
pub enum CollisionResolver<'a> {
    Grid(GridCollider<'a>),
    Room(&'a BoxCollider),
}

impl Collider for CollisionResolver<'_> {
    fn blocked(&self, x: f64, z: f64) -> bool {
        match self {
            CollisionResolver::Grid(g) => g.blocked(x, z),
            CollisionResolver::Room(b) => b.blocked(x, z),
        }
    }
}

/// Outcome of a resolved step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoveResult {
    /// Whole step taken.
    Free { x: f64, z: f64 },
    /// Only one axis of the step taken.
    Slide { x: f64, z: f64 },
    /// Nothing taken; position unchanged.
    Blocked { x: f64, z: f64 },
}

impl MoveResult {
    pub fn position(&self) -> (f64, f64) {
        match *self {
            MoveResult::Free { x, z }
            | MoveResult::Slide { x, z }
            | MoveResult::Blocked { x, z } => (x, z),
        }
    }

    pub fn moved(&self) -> bool {
        !matches!(self, MoveResult::Blocked { .. })
    }
}

/// Resolve a step of `(dx, dz)` from `(x, z)` against `collider`.
pub fn resolve_move<C: Collider + ?Sized>(
    collider: &C,
    x: f64,
    z: f64,
    dx: f64,
    dz: f64,
) -> MoveResult {
    if dx == 0.0 && dz == 0.0 {
        return MoveResult::Blocked { x, z };
    }
    if !collider.blocked(x + dx, z + dz) {
        return MoveResult::Free {
            x: x + dx,
            z: z + dz,
        };
    }
    if dx != 0.0 && !collider.blocked(x + dx, z) {
        return MoveResult::Slide { x: x + dx, z };
    }
    if dz != 0.0 && !collider.blocked(x, z + dz) {
        return MoveResult::Slide { x, z: z + dz };
    }
    MoveResult::Blocked { x, z }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cells (1..=3, 1) open, everything else wall. Unit 4, radius 1.
    fn corridor() -> Grid {
        Grid::from_rows(&["#####", "#   #", "#####"])
    }

    fn room() -> BoxCollider {
        BoxCollider::new(
            Aabb::new(0.0, 0.0, 18.0, 18.0),
            vec![Aabb::new(0.0, -9.0, 6.0, 2.0)],
        )
    }

    // --- Grid backend ---

    #[test]
    fn wall_cell_is_blocked() {
        let g = corridor();
        let c = GridCollider::new(&g, 4.0, 1.0);
        assert!(c.blocked(0.0, 0.0));
        assert!(c.blocked(8.0, 0.0));
    }

    #[test]
    fn open_cell_centre_is_free() {
        let g = corridor();
        let c = GridCollider::new(&g, 4.0, 1.0);
        assert!(!c.blocked(4.0, 4.0));
        assert!(!c.blocked(8.0, 4.0));
    }

    #[test]
    fn only_the_nearest_cell_counts() {
        let g = corridor();
        let c = GridCollider::new(&g, 4.0, 1.0);
        // Nearest cell (2,1) is open even though wall (2,0) is close.
        assert_eq!(g.tile(2, 1), Some(Tile::Empty));
        assert!(!c.blocked(8.0, 2.3));
        assert!(!c.blocked(8.0, 2.01));
        // Nearest cell (2,0) is a wall.
        assert!(c.blocked(8.0, 1.9));
    }

    #[test]
    fn open_cell_interior_never_blocked() {
        let g = corridor();
        let c = GridCollider::new(&g, 4.0, 1.0);
        for i in 0..=20 {
            let x = 2.1 + 11.8 * i as f64 / 20.0;
            for j in 0..=20 {
                let z = 2.1 + 3.8 * j as f64 / 20.0;
                assert!(!c.blocked(x, z), "({x}, {z}) blocked");
            }
        }
    }

    #[test]
    fn out_of_range_is_blocked() {
        let g = corridor();
        let c = GridCollider::new(&g, 4.0, 1.0);
        assert!(c.blocked(-10.0, 4.0));
        assert!(c.blocked(4.0, 100.0));
        assert!(c.blocked(f64::NAN, 4.0));
    }

    // --- Box backend ---

    #[test]
    fn box_bounds_are_inclusive() {
        let b = room();
        assert!(!b.blocked(9.0, 0.0));
        assert!(b.blocked(9.01, 0.0));
        assert!(b.blocked(0.0, -9.5));
    }

    #[test]
    fn obstacle_edge_is_blocked() {
        let b = room();
        // Desk spans z in [-10, -8].
        assert!(b.blocked(3.0, -8.0));
        assert!(!b.blocked(3.0, -7.99));
    }

    // --- Resolution ---

    #[test]
    fn free_move_in_open_space() {
        let b = room();
        assert_eq!(
            resolve_move(&b, 0.0, 0.0, 1.0, 0.0),
            MoveResult::Free { x: 1.0, z: 0.0 }
        );
    }

    #[test]
    fn slide_along_x_when_z_blocked() {
        let b = room();
        let res = resolve_move(&b, 5.0, 8.5, 1.0, 1.0);
        assert_eq!(res, MoveResult::Slide { x: 6.0, z: 8.5 });
    }

    #[test]
    fn slide_along_z_when_x_blocked() {
        let b = room();
        let res = resolve_move(&b, 8.5, 0.0, 1.0, 1.0);
        assert_eq!(res, MoveResult::Slide { x: 8.5, z: 1.0 });
    }

    #[test]
    fn corner_blocks_both_axes() {
        let b = room();
        let res = resolve_move(&b, 8.5, 8.5, 1.0, 1.0);
        assert_eq!(res, MoveResult::Blocked { x: 8.5, z: 8.5 });
        assert!(!res.moved());
    }

    #[test]
    fn grid_slide_along_corridor_wall() {
        let g = corridor();
        let c = GridCollider::new(&g, 4.0, 1.0);
        // Pushing diagonally into the north wall slides east.
        let res = resolve_move(&c, 4.0, 4.0, 1.0, -3.0);
        assert_eq!(res, MoveResult::Slide { x: 5.0, z: 4.0 });
    }

    #[test]
    fn resolver_dispatches_to_backend() {
        let g = corridor();
        let b = room();
        let grid = CollisionResolver::Grid(GridCollider::new(&g, 4.0, 1.0));
        let boxed = CollisionResolver::Room(&b);
        assert!(grid.blocked(0.0, 0.0));
        assert!(!boxed.blocked(0.0, 0.0));
    }
}
