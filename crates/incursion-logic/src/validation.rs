//! Validation for generated levels.
//!
//! Pure functions that take a level and return validation errors. Used by
//! the tests and the simtest harness to check generation output across
//! many seeds.

use std::collections::VecDeque;

use crate::config::FeatureCounts;
use crate::grid::{Grid, Tile};
use crate::level::Level;
use crate::placement::FeatureKind;

/// A level validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

fn error(category: &'static str, message: String) -> ValidationError {
    ValidationError {
        category,
        severity: Severity::Error,
        message,
    }
}

/// Number of passable cells reachable from `from` over 4-connected
/// non-wall cells. Zero if `from` is a wall.
pub fn reachable_from(grid: &Grid, from: (usize, usize)) -> usize {
    if grid.is_wall(from.0, from.1) {
        return 0;
    }
    let mut visited = vec![false; grid.width() * grid.height()];
    let mut queue = VecDeque::new();
    visited[from.1 * grid.width() + from.0] = true;
    queue.push_back(from);
    let mut count = 0;

    while let Some((x, z)) = queue.pop_front() {
        count += 1;
        for (nx, nz) in grid.neighbors4(x, z) {
            let i = nz * grid.width() + nx;
            if !visited[i] && !grid.is_wall(nx, nz) {
                visited[i] = true;
                queue.push_back((nx, nz));
            }
        }
    }
    count
}

// ── A. Shape ────────────────────────────────────────────────────────────

/// Dimensions must be odd so odd cells are passages and even cells walls.
pub fn check_odd_dimensions(grid: &Grid) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if grid.width() % 2 == 0 || grid.height() % 2 == 0 {
        errors.push(error(
            "shape",
            format!("grid is {}×{}, expected odd", grid.width(), grid.height()),
        ));
    }
    errors
}

/// The outer ring must be solid.
pub fn check_border(grid: &Grid) -> Vec<ValidationError> {
    let (w, h) = (grid.width(), grid.height());
    let open = grid
        .cells()
        .filter(|&(x, z, t)| (x == 0 || z == 0 || x + 1 == w || z + 1 == h) && t != Tile::Wall)
        .count();
    if open == 0 {
        return Vec::new();
    }
    vec![error("shape", format!("{} open cells on the border", open))]
}

// ── B. Features ─────────────────────────────────────────────────────────

/// Tile counts must match the requested feature counts exactly.
pub fn check_feature_counts(grid: &Grid, counts: &FeatureCounts) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (kind, expected) in counts.in_placement_order() {
        let found = grid.count(kind.tile());
        if found != expected as usize {
            errors.push(error(
                "features",
                format!("{:?}: expected {}, found {}", kind, expected, found),
            ));
        }
    }
    errors
}

/// Each feature record must sit on a cell carrying its own tile, and no two
/// records may share a cell.
pub fn check_feature_records(level: &Level) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for f in level.features() {
        let tile = level.grid().tile(f.grid_x, f.grid_z);
        if tile != Some(f.kind.tile()) {
            errors.push(error(
                "features",
                format!(
                    "feature #{} {:?} at ({}, {}) sits on {:?}",
                    f.id.0, f.kind, f.grid_x, f.grid_z, tile
                ),
            ));
        }
        if !seen.insert((f.grid_x, f.grid_z)) {
            errors.push(error(
                "features",
                format!("features overlap at ({}, {})", f.grid_x, f.grid_z),
            ));
        }
    }
    errors
}

// ── C. Connectivity ─────────────────────────────────────────────────────

/// Every passable cell must be reachable from the start.
pub fn check_connectivity(grid: &Grid) -> Vec<ValidationError> {
    let passable = grid.cells().filter(|&(_, _, t)| t.is_passable()).count();
    let Some(start) = grid.find(Tile::Start) else {
        return vec![error("connectivity", "no start cell".to_string())];
    };
    let reached = reachable_from(grid, start);
    if reached == passable {
        return Vec::new();
    }
    vec![error(
        "connectivity",
        format!(
            "{} of {} passable cells unreachable from start",
            passable - reached,
            passable
        ),
    )]
}

/// Warn when the adversary spawns right next to the player.
pub fn check_spawn_separation(level: &Level, min_cells: usize) -> Vec<ValidationError> {
    let (Some(s), Some(e)) = (level.start_cell(), level.enemy_spawn_cell()) else {
        return Vec::new();
    };
    let manhattan = s.0.abs_diff(e.0) + s.1.abs_diff(e.1);
    if manhattan >= min_cells {
        return Vec::new();
    }
    vec![ValidationError {
        category: "features",
        severity: Severity::Warning,
        message: format!(
            "{:?} spawns {} cells from the start",
            FeatureKind::EnemySpawn,
            manhattan
        ),
    }]
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all level validations and return combined results.
pub fn validate_level(level: &Level, counts: &FeatureCounts) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_odd_dimensions(level.grid()));
    all.extend(check_border(level.grid()));
    all.extend(check_feature_counts(level.grid(), counts));
    all.extend(check_feature_records(level));
    all.extend(check_connectivity(level.grid()));
    all.extend(check_spawn_separation(level, 4));
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelConfig;

    fn level(rows: &[&str]) -> Level {
        Level::from_grid(LevelConfig::default(), Grid::from_rows(rows))
    }

    fn counts(starts: u32, generators: u32, keys: u32, spawns: u32) -> FeatureCounts {
        FeatureCounts {
            starts,
            generators,
            keys,
            batteries: 0,
            notes: 0,
            enemy_spawns: spawns,
        }
    }

    #[test]
    fn test_clean_level_has_no_errors() {
        let l = level(&["#######", "#S    #", "# ### #", "#G  KE#", "#######"]);
        let errors = validate_level(&l, &counts(1, 1, 1, 1));
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_even_dimensions() {
        let g = Grid::from_rows(&["######", "#S   #", "######"]);
        assert_eq!(check_odd_dimensions(&g).len(), 1);
    }

    #[test]
    fn test_open_border() {
        let g = Grid::from_rows(&["## ##", "#S  #", "#####"]);
        let errors = check_border(&g);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("1 open"));
    }

    #[test]
    fn test_wrong_feature_counts() {
        let g = Grid::from_rows(&["#####", "#SGG#", "#####"]);
        let errors = check_feature_counts(&g, &counts(1, 3, 0, 0));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Generator"));
    }

    #[test]
    fn test_disconnected_pocket() {
        let g = Grid::from_rows(&["#######", "#S #  #", "#######"]);
        let errors = check_connectivity(&g);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("2 of 4"));
    }

    #[test]
    fn test_missing_start() {
        let g = Grid::from_rows(&["#####", "#   #", "#####"]);
        assert_eq!(check_connectivity(&g)[0].message, "no start cell");
    }

    #[test]
    fn test_reachable_from_wall_is_zero() {
        let g = Grid::from_rows(&["#####", "#S  #", "#####"]);
        assert_eq!(reachable_from(&g, (0, 0)), 0);
        assert_eq!(reachable_from(&g, (1, 1)), 3);
    }

    #[test]
    fn test_spawn_too_close_is_a_warning() {
        let l = level(&["#####", "#SE #", "#####"]);
        let warnings = check_spawn_separation(&l, 4);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, Severity::Warning);
    }
}
