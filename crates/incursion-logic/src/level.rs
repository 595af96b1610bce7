//! A generated level: the immutable grid plus its placed features.
//!
//! `generate_level` threads one seeded `StdRng` through carving and
//! placement, so the same config and seed always produce the same level.
//!
//! ```
//! use incursion_logic::config::{FeatureCounts, LevelConfig, Tuning};
//! use incursion_logic::level::generate_level;
//!
//! let config = LevelConfig::new(21, 21, 1, 42);
//! let level = generate_level(&config, &FeatureCounts::default(), &Tuning::default()).unwrap();
//! assert_eq!(level.grid().width(), 21);
//! assert!(level.start_cell().is_some());
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::{FeatureCounts, LevelConfig, Tuning};
use crate::constants::NOTE_TEXT;
use crate::error::LevelError;
use crate::grid::{Grid, Tile};
use crate::maze;
use crate::placement::{place_features, FeatureId, FeatureKind, PlacedFeature};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    config: LevelConfig,
    grid: Grid,
    features: Vec<PlacedFeature>,
}

/// Carve a maze and place features, deterministically from `config.seed`.
pub fn generate_level(
    config: &LevelConfig,
    counts: &FeatureCounts,
    tuning: &Tuning,
) -> Result<Level, LevelError> {
    tuning.validate()?;
    counts.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut grid = maze::generate(config, tuning.loop_chance, &mut rng)?;
    let features = place_features(&mut grid, counts, tuning.placement_attempts, &mut rng)?;

    log::info!(
        "generated level {}x{} seed={} difficulty={} features={}",
        grid.width(),
        grid.height(),
        config.seed,
        config.difficulty,
        features.len()
    );

    Ok(Level {
        config: *config,
        grid,
        features,
    })
}

impl Level {
    /// Wrap an existing grid, recovering features from its tiles in row
    /// order.
    pub fn from_grid(config: LevelConfig, grid: Grid) -> Self {
        let features = grid
            .cells()
            .filter_map(|(x, z, t)| FeatureKind::from_tile(t).map(|k| (x, z, k)))
            .enumerate()
            .map(|(i, (x, z, kind))| PlacedFeature {
                id: FeatureId(i as u32),
                kind,
                grid_x: x,
                grid_z: z,
                active: true,
                payload: (kind == FeatureKind::Note).then(|| NOTE_TEXT.to_string()),
            })
            .collect();
        Self {
            config,
            grid,
            features,
        }
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn features(&self) -> &[PlacedFeature] {
        &self.features
    }

    pub fn feature(&self, id: FeatureId) -> Option<&PlacedFeature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn features_of(&self, kind: FeatureKind) -> impl Iterator<Item = &PlacedFeature> {
        self.features.iter().filter(move |f| f.kind == kind)
    }

    fn first_cell(&self, kind: FeatureKind) -> Option<(usize, usize)> {
        self.features_of(kind)
            .next()
            .map(|f| (f.grid_x, f.grid_z))
            .or_else(|| self.grid.find(kind.tile()))
    }

    pub fn start_cell(&self) -> Option<(usize, usize)> {
        self.first_cell(FeatureKind::Start)
    }

    pub fn enemy_spawn_cell(&self) -> Option<(usize, usize)> {
        self.first_cell(FeatureKind::EnemySpawn)
    }

    /// Number of generators the player has to activate.
    pub fn generator_count(&self) -> usize {
        self.grid.count(Tile::Generator)
    }
}
