//! Feature placement: scatter typed features onto empty maze cells.
//!
//! Rejection sampling: pick a uniformly random interior cell, accept it if
//! it is `Empty`, stamp the feature tile, repeat until the count is met.
//! Cells inside the 3×3 block at the grid origin are refused for every
//! kind except `Start`.
//!
//! Sampling is bounded twice over: placement fails up front when fewer
//! eligible cells exist than features remain, and each feature instance
//! gets at most `max_attempts` samples.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::FeatureCounts;
use crate::constants::{world::SPAWN_GUARD, NOTE_TEXT};
use crate::error::LevelError;
use crate::grid::{Grid, Tile};

/// Gameplay-significant feature kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    Start,
    EnemySpawn,
    Key,
    Generator,
    Battery,
    Note,
}

impl FeatureKind {
    pub fn tile(self) -> Tile {
        match self {
            FeatureKind::Start => Tile::Start,
            FeatureKind::EnemySpawn => Tile::EnemySpawn,
            FeatureKind::Key => Tile::Key,
            FeatureKind::Generator => Tile::Generator,
            FeatureKind::Battery => Tile::Battery,
            FeatureKind::Note => Tile::Note,
        }
    }

    pub fn from_tile(tile: Tile) -> Option<Self> {
        match tile {
            Tile::Start => Some(FeatureKind::Start),
            Tile::EnemySpawn => Some(FeatureKind::EnemySpawn),
            Tile::Key => Some(FeatureKind::Key),
            Tile::Generator => Some(FeatureKind::Generator),
            Tile::Battery => Some(FeatureKind::Battery),
            Tile::Note => Some(FeatureKind::Note),
            Tile::Empty | Tile::Wall => None,
        }
    }

    /// Whether the origin guard block is off limits to this kind.
    fn guarded(self) -> bool {
        self != FeatureKind::Start
    }
}

/// Stable identifier of a placed feature within one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId(pub u32);

/// A feature stamped onto the grid, recorded separately from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedFeature {
    pub id: FeatureId,
    pub kind: FeatureKind,
    pub grid_x: usize,
    pub grid_z: usize,
    pub active: bool,
    /// Text carried by notes.
    pub payload: Option<String>,
}

fn in_guard_block(x: usize, z: usize) -> bool {
    x < SPAWN_GUARD && z < SPAWN_GUARD
}

fn eligible(grid: &Grid, x: usize, z: usize, kind: FeatureKind) -> bool {
    grid.tile(x, z) == Some(Tile::Empty) && !(kind.guarded() && in_guard_block(x, z))
}

fn eligible_cells(grid: &Grid, kind: FeatureKind) -> usize {
    grid.cells()
        .filter(|&(x, z, _)| eligible(grid, x, z, kind))
        .count()
}

/// Place every feature in `counts` onto `grid`, mutating it in place.
///
/// Returns the placed features in placement order, with ids assigned
/// sequentially from zero.
pub fn place_features<R: Rng + ?Sized>(
    grid: &mut Grid,
    counts: &FeatureCounts,
    max_attempts: u32,
    rng: &mut R,
) -> Result<Vec<PlacedFeature>, LevelError> {
    let mut placed = Vec::with_capacity(counts.total() as usize);
    for (kind, count) in counts.in_placement_order() {
        place_kind(grid, kind, count, max_attempts, rng, &mut placed)?;
    }
    Ok(placed)
}

fn place_kind<R: Rng + ?Sized>(
    grid: &mut Grid,
    kind: FeatureKind,
    count: u32,
    max_attempts: u32,
    rng: &mut R,
    placed: &mut Vec<PlacedFeature>,
) -> Result<(), LevelError> {
    if count == 0 {
        return Ok(());
    }
    let (w, h) = (grid.width(), grid.height());
    let exhausted = |done: u32| {
        log::warn!(
            "placement exhausted for {:?}: {} of {} on {}x{} grid",
            kind,
            done,
            count,
            w,
            h
        );
        LevelError::PlacementExhausted {
            kind,
            placed: done,
            requested: count,
        }
    };

    if w < 3 || h < 3 || eligible_cells(grid, kind) < count as usize {
        return Err(exhausted(0));
    }

    for done in 0..count {
        let mut attempts = 0;
        let (x, z) = loop {
            if attempts >= max_attempts {
                return Err(exhausted(done));
            }
            attempts += 1;
            let x = rng.gen_range(1..w - 1);
            let z = rng.gen_range(1..h - 1);
            if eligible(grid, x, z, kind) {
                break (x, z);
            }
        };
        grid.set(x, z, kind.tile());
        placed.push(PlacedFeature {
            id: FeatureId(placed.len() as u32),
            kind,
            grid_x: x,
            grid_z: z,
            active: true,
            payload: (kind == FeatureKind::Note).then(|| NOTE_TEXT.to_string()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn open_room(w: usize, h: usize) -> Grid {
        let mut g = Grid::filled(w, h, Tile::Wall);
        for z in 1..h - 1 {
            for x in 1..w - 1 {
                g.set(x, z, Tile::Empty);
            }
        }
        g
    }

    fn only(kind: FeatureKind, n: u32) -> FeatureCounts {
        let mut c = FeatureCounts {
            starts: 0,
            generators: 0,
            keys: 0,
            batteries: 0,
            notes: 0,
            enemy_spawns: 0,
        };
        match kind {
            FeatureKind::Start => c.starts = n,
            FeatureKind::EnemySpawn => c.enemy_spawns = n,
            FeatureKind::Key => c.keys = n,
            FeatureKind::Generator => c.generators = n,
            FeatureKind::Battery => c.batteries = n,
            FeatureKind::Note => c.notes = n,
        }
        c
    }

    #[test]
    fn places_default_counts_on_empty_cells() {
        let mut g = open_room(15, 15);
        let mut rng = StdRng::seed_from_u64(1);
        let placed = place_features(&mut g, &FeatureCounts::default(), 1000, &mut rng).unwrap();
        assert_eq!(placed.len(), 12);
        assert_eq!(g.count(Tile::Start), 1);
        assert_eq!(g.count(Tile::Generator), 3);
        assert_eq!(g.count(Tile::Battery), 4);
        assert_eq!(g.count(Tile::EnemySpawn), 1);
        for f in &placed {
            assert_eq!(g.tile(f.grid_x, f.grid_z), Some(f.kind.tile()));
            assert!(f.active);
        }
    }

    #[test]
    fn ids_follow_placement_order() {
        let mut g = open_room(11, 11);
        let mut rng = StdRng::seed_from_u64(2);
        let placed = place_features(&mut g, &FeatureCounts::default(), 1000, &mut rng).unwrap();
        for (i, f) in placed.iter().enumerate() {
            assert_eq!(f.id, FeatureId(i as u32));
        }
        assert_eq!(placed[0].kind, FeatureKind::Start);
        assert_eq!(placed.last().map(|f| f.kind), Some(FeatureKind::EnemySpawn));
    }

    #[test]
    fn guard_block_refuses_non_start_features() {
        for seed in 0..30 {
            let mut g = open_room(7, 7);
            let mut rng = StdRng::seed_from_u64(seed);
            let placed = place_features(&mut g, &only(FeatureKind::Battery, 10), 5000, &mut rng)
                .unwrap();
            assert!(placed.iter().all(|f| !(f.grid_x < 3 && f.grid_z < 3)));
        }
    }

    #[test]
    fn start_may_land_in_guard_block() {
        // Only (1,1) is open, so the start must go there.
        let mut g = Grid::filled(5, 5, Tile::Wall);
        g.set(1, 1, Tile::Empty);
        let mut rng = StdRng::seed_from_u64(0);
        let placed = place_features(&mut g, &only(FeatureKind::Start, 1), 1000, &mut rng).unwrap();
        assert_eq!((placed[0].grid_x, placed[0].grid_z), (1, 1));
    }

    #[test]
    fn notes_carry_text() {
        let mut g = open_room(9, 9);
        let mut rng = StdRng::seed_from_u64(4);
        let placed = place_features(&mut g, &only(FeatureKind::Note, 2), 1000, &mut rng).unwrap();
        assert!(placed.iter().all(|f| f.payload.as_deref() == Some(NOTE_TEXT)));
    }

    #[test]
    fn too_little_space_fails_fast() {
        // 3x3 interior = 9 cells, 4 of them inside the guard block.
        let mut g = open_room(5, 5);
        let mut rng = StdRng::seed_from_u64(0);
        let err = place_features(&mut g, &only(FeatureKind::Generator, 6), 1000, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            LevelError::PlacementExhausted {
                kind: FeatureKind::Generator,
                placed: 0,
                requested: 6,
            }
        );
    }

    #[test]
    fn attempt_budget_bounds_sampling() {
        // One eligible cell in a large grid: a budget of one sample will
        // almost never hit it, and must not loop forever.
        let mut g = Grid::filled(101, 101, Tile::Wall);
        g.set(99, 99, Tile::Empty);
        let mut rng = StdRng::seed_from_u64(8);
        let result = place_features(&mut g, &only(FeatureKind::Key, 1), 1, &mut rng);
        match result {
            Ok(placed) => assert_eq!((placed[0].grid_x, placed[0].grid_z), (99, 99)),
            Err(e) => assert!(matches!(e, LevelError::PlacementExhausted { placed: 0, .. })),
        }
    }

    #[test]
    fn kind_tile_mapping_is_symmetric() {
        for kind in [
            FeatureKind::Start,
            FeatureKind::EnemySpawn,
            FeatureKind::Key,
            FeatureKind::Generator,
            FeatureKind::Battery,
            FeatureKind::Note,
        ] {
            assert_eq!(FeatureKind::from_tile(kind.tile()), Some(kind));
        }
        assert_eq!(FeatureKind::from_tile(Tile::Wall), None);
    }
}
