//! Maze carving: recursive backtracker plus loop injection.
//!
//! Algorithm:
//! 1. Force odd dimensions and fill every cell with `Wall`
//! 2. Depth-first carve from (1, 1) over the odd-coordinate lattice with an
//!    explicit stack, clearing the wall between each step (a spanning tree)
//! 3. Knock out a random subset of interior walls that touch two or more
//!    passages, turning the tree into a graph with cycles
//!
//! Odd rows/columns are passage candidates and even ones are wall
//! candidates. Step 3 only ever adds passages next to existing ones, so
//! every carved cell stays reachable from the origin.

use rand::Rng;

use crate::config::{check_loop_chance, ensure_valid, LevelConfig};
use crate::constants::world::{CARVE_ORIGIN, CARVE_STEP};
use crate::error::LevelError;
use crate::grid::{Grid, Tile};

/// Carve directions, checked in this order: up, right, down, left.
const DIRECTIONS: [(i64, i64); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Generate a carved maze for `config` using `rng`.
///
/// `loop_chance` is the probability that a qualifying interior wall is
/// removed during loop injection.
pub fn generate<R: Rng + ?Sized>(
    config: &LevelConfig,
    loop_chance: f64,
    rng: &mut R,
) -> Result<Grid, LevelError> {
    ensure_valid(config)?;
    check_loop_chance(loop_chance)?;
    let (w, h) = config.odd_dimensions();
    let mut grid = Grid::filled(w as usize, h as usize, Tile::Wall);

    carve(&mut grid, rng);
    let opened = inject_loops(&mut grid, loop_chance, rng);

    log::debug!(
        "carved {}x{} maze: {} passage cells, {} loop openings",
        w,
        h,
        grid.count(Tile::Empty),
        opened
    );
    Ok(grid)
}

/// Walls two steps away from `(x, z)` that are inside the grid.
fn unvisited_neighbors(grid: &Grid, x: usize, z: usize) -> Vec<(usize, usize)> {
    let step = CARVE_STEP as i64;
    DIRECTIONS
        .iter()
        .map(|&(dx, dz)| (x as i64 + dx * step, z as i64 + dz * step))
        .filter(|&(nx, nz)| {
            nx > 0
                && nz > 0
                && (nx as usize) < grid.width()
                && (nz as usize) < grid.height()
                && grid.tile(nx as usize, nz as usize) == Some(Tile::Wall)
        })
        .map(|(nx, nz)| (nx as usize, nz as usize))
        .collect()
}

fn carve<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let (sx, sz) = CARVE_ORIGIN;
    grid.set(sx, sz, Tile::Empty);
    let mut stack = vec![(sx, sz)];

    while let Some(&(cx, cz)) = stack.last() {
        let neighbors = unvisited_neighbors(grid, cx, cz);
        if neighbors.is_empty() {
            stack.pop();
            continue;
        }
        let (nx, nz) = neighbors[rng.gen_range(0..neighbors.len())];
        grid.set((cx + nx) / 2, (cz + nz) / 2, Tile::Empty);
        grid.set(nx, nz, Tile::Empty);
        stack.push((nx, nz));
    }
}

/// Open interior walls bordering two or more passages. Returns how many
/// walls were removed.
fn inject_loops<R: Rng + ?Sized>(grid: &mut Grid, chance: f64, rng: &mut R) -> usize {
    let (w, h) = (grid.width(), grid.height());
    let mut opened = 0;
    for z in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            if grid.tile(x, z) != Some(Tile::Wall) {
                continue;
            }
            let empties = grid
                .neighbors4(x, z)
                .filter(|&(nx, nz)| grid.tile(nx, nz) == Some(Tile::Empty))
                .count();
            if empties >= 2 && rng.gen_bool(chance) {
                grid.set(x, z, Tile::Empty);
                opened += 1;
            }
        }
    }
    opened
}
