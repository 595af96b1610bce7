//! Run configuration: level parameters, feature counts, and tuning.
//!
//! Callers build a [`LevelConfig`] before a run starts. [`Tuning`] holds
//! every numeric constant the simulation uses; it deserializes with
//! per-field defaults so a partial JSON object overrides only what it
//! names.
//!
//! ```
//! use incursion_logic::config::{validate_config, LevelConfig};
//!
//! let config = LevelConfig::default();
//! assert!(validate_config(&config).is_empty());
//! assert_eq!(config.odd_dimensions(), (21, 21));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{feature_defaults, limits, world};
use crate::error::LevelError;
use crate::placement::FeatureKind;

/// Level generation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Grid width in cells (forced odd).
    pub width: u32,
    /// Grid height in cells (forced odd).
    pub height: u32,
    /// Threat level, 0–10. Scales adversary speed.
    pub difficulty: u32,
    /// Seed for carving and placement.
    pub seed: u64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: 21,
            height: 21,
            difficulty: 1,
            seed: 42,
        }
    }
}

impl LevelConfig {
    pub fn new(width: u32, height: u32, difficulty: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            difficulty,
            seed,
        }
    }

    /// Width and height rounded up to the next odd value.
    pub fn odd_dimensions(&self) -> (u32, u32) {
        (force_odd(self.width), force_odd(self.height))
    }
}

fn force_odd(n: u32) -> u32 {
    if n % 2 == 0 {
        n.saturating_add(1)
    } else {
        n
    }
}

/// Reasons a config is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("width {0} is below the minimum of {min}", min = limits::MIN_DIMENSION)]
    TooNarrow(u32),
    #[error("height {0} is below the minimum of {min}", min = limits::MIN_DIMENSION)]
    TooShort(u32),
    #[error("width {0} exceeds the maximum of {max}", max = limits::MAX_DIMENSION)]
    TooWide(u32),
    #[error("height {0} exceeds the maximum of {max}", max = limits::MAX_DIMENSION)]
    TooTall(u32),
    #[error("difficulty {0} is outside 0..={max}", max = limits::MAX_DIFFICULTY)]
    DifficultyOutOfRange(u32),
}

/// Validate a level config. Returns every problem found.
///
/// Dimensions are checked after odd forcing, so a width of 4 (→ 5) passes.
pub fn validate_config(config: &LevelConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let (w, h) = config.odd_dimensions();

    if w < limits::MIN_DIMENSION {
        errors.push(ConfigError::TooNarrow(w));
    }
    if h < limits::MIN_DIMENSION {
        errors.push(ConfigError::TooShort(h));
    }
    if w > limits::MAX_DIMENSION {
        errors.push(ConfigError::TooWide(w));
    }
    if h > limits::MAX_DIMENSION {
        errors.push(ConfigError::TooTall(h));
    }
    if config.difficulty > limits::MAX_DIFFICULTY {
        errors.push(ConfigError::DifficultyOutOfRange(config.difficulty));
    }

    errors
}

/// Convert validation findings into the generation error.
pub fn ensure_valid(config: &LevelConfig) -> Result<(), LevelError> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }
    let reason = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    log::warn!("rejecting level config {:?}: {}", config, reason);
    Err(LevelError::config(reason))
}

/// Target count for each feature kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureCounts {
    pub starts: u32,
    pub generators: u32,
    pub keys: u32,
    pub batteries: u32,
    pub notes: u32,
    pub enemy_spawns: u32,
}

impl Default for FeatureCounts {
    fn default() -> Self {
        Self {
            starts: feature_defaults::STARTS,
            generators: feature_defaults::GENERATORS,
            keys: feature_defaults::KEYS,
            batteries: feature_defaults::BATTERIES,
            notes: feature_defaults::NOTES,
            enemy_spawns: feature_defaults::ENEMY_SPAWNS,
        }
    }
}

impl FeatureCounts {
    /// Counts in placement order.
    pub fn in_placement_order(&self) -> [(FeatureKind, u32); 6] {
        [
            (FeatureKind::Start, self.starts),
            (FeatureKind::Generator, self.generators),
            (FeatureKind::Key, self.keys),
            (FeatureKind::Battery, self.batteries),
            (FeatureKind::Note, self.notes),
            (FeatureKind::EnemySpawn, self.enemy_spawns),
        ]
    }

    pub fn get(&self, kind: FeatureKind) -> u32 {
        match kind {
            FeatureKind::Start => self.starts,
            FeatureKind::Generator => self.generators,
            FeatureKind::Key => self.keys,
            FeatureKind::Battery => self.batteries,
            FeatureKind::Note => self.notes,
            FeatureKind::EnemySpawn => self.enemy_spawns,
        }
    }

    pub fn total(&self) -> u32 {
        self.in_placement_order().iter().map(|(_, n)| n).sum()
    }

    /// A level has exactly one start and one enemy spawn.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.starts != 1 || self.enemy_spawns != 1 {
            return Err(LevelError::config(format!(
                "a level needs exactly 1 start and 1 enemy spawn, got {} and {}",
                self.starts, self.enemy_spawns
            )));
        }
        Ok(())
    }
}

/// Every numeric constant the simulation reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // World
    pub unit_size: f64,
    pub collision_radius: f64,

    // Generation
    /// Chance that a qualifying interior wall is knocked out.
    pub loop_chance: f64,
    /// Samples allowed per feature instance before giving up.
    pub placement_attempts: u32,

    // Player
    pub walk_speed: f64,
    pub run_speed: f64,
    pub crouch_speed: f64,
    /// Stamina lost per second while sprinting.
    pub stamina_drain: f64,
    /// Stamina regained per second otherwise.
    pub stamina_regen: f64,
    pub stand_eye_height: f64,
    pub crouch_eye_height: f64,

    // Interaction
    pub interact_distance: f64,
    pub interact_radius: f64,
    /// Battery charge restored by one pickup.
    pub battery_restore: f64,

    // Adversary
    pub enemy_speed: f64,
    pub capture_distance: f64,
    pub proximity_radius: f64,
    /// Sanity lost per second while pursued within the proximity radius.
    pub pursuit_drain: f64,
    /// Sanity lost per second while the adversary idles.
    pub idle_drain: f64,

    // Clock
    pub max_dt: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            unit_size: world::UNIT_SIZE,
            collision_radius: world::COLLISION_RADIUS,
            loop_chance: 0.10,
            placement_attempts: 10_000,
            walk_speed: 6.0,
            run_speed: 9.0,
            crouch_speed: 3.0,
            stamina_drain: 20.0,
            stamina_regen: 10.0,
            stand_eye_height: 1.7,
            crouch_eye_height: 1.0,
            interact_distance: 6.0,
            interact_radius: 0.5,
            battery_restore: 25.0,
            enemy_speed: 3.5,
            capture_distance: 1.5,
            proximity_radius: 10.0,
            pursuit_drain: 5.0,
            idle_drain: 2.0,
            max_dt: 0.1,
        }
    }
}

impl Tuning {
    /// Adversary speed for a difficulty level: +5% per level above 1,
    /// never reaching sprint speed.
    pub fn pursuit_speed(&self, difficulty: u32) -> f64 {
        let scale = 1.0 + 0.05 * difficulty.saturating_sub(1) as f64;
        (self.enemy_speed * scale).min(self.run_speed * 0.95)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        check_loop_chance(self.loop_chance)?;
        if !(self.unit_size > 0.0) || !(self.max_dt > 0.0) {
            return Err(LevelError::config(
                "unit size and max dt must be positive",
            ));
        }
        if self.placement_attempts == 0 {
            return Err(LevelError::config("placement attempts must be non-zero"));
        }
        Ok(())
    }
}

/// `loop_chance` must be a probability. NaN is rejected.
pub(crate) fn check_loop_chance(loop_chance: f64) -> Result<(), LevelError> {
    if !(0.0..=1.0).contains(&loop_chance) {
        return Err(LevelError::config(format!(
            "loop chance {} is outside [0, 1]",
            loop_chance
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&LevelConfig::default()).is_empty());
        assert!(ensure_valid(&LevelConfig::default()).is_ok());
    }

    #[test]
    fn even_dimensions_round_up() {
        let c = LevelConfig::new(20, 4, 1, 0);
        assert_eq!(c.odd_dimensions(), (21, 5));
        assert!(validate_config(&c).is_empty());
    }

    #[test]
    fn degenerate_dimensions_rejected() {
        let errors = validate_config(&LevelConfig::new(3, 2, 1, 0));
        assert_eq!(
            errors,
            vec![ConfigError::TooNarrow(3), ConfigError::TooShort(3)]
        );
        let err = ensure_valid(&LevelConfig::new(1, 21, 1, 0)).unwrap_err();
        assert!(matches!(err, LevelError::Config { .. }));
        assert!(err.to_string().contains("width 1"));
    }

    #[test]
    fn oversized_and_hard_configs_rejected() {
        let errors = validate_config(&LevelConfig::new(2001, 21, 11, 0));
        assert!(errors.contains(&ConfigError::TooWide(2001)));
        assert!(errors.contains(&ConfigError::DifficultyOutOfRange(11)));
    }

    #[test]
    fn default_feature_counts() {
        let counts = FeatureCounts::default();
        assert_eq!(counts.generators, 3);
        assert_eq!(counts.total(), 12);
        assert_eq!(counts.in_placement_order()[0].0, FeatureKind::Start);
        assert_eq!(counts.get(FeatureKind::Note), 2);
    }

    #[test]
    fn pursuit_speed_stays_below_sprint() {
        let t = Tuning::default();
        assert!((t.pursuit_speed(1) - 3.5).abs() < 1e-9);
        assert!((t.pursuit_speed(0) - 3.5).abs() < 1e-9);
        assert!(t.pursuit_speed(5) > t.pursuit_speed(1));
        assert!(t.pursuit_speed(10) < t.run_speed);
        assert!(t.pursuit_speed(1) < t.walk_speed);
    }

    #[test]
    fn partial_tuning_json_keeps_defaults() {
        let t: Tuning = serde_json::from_str(r#"{ "enemy_speed": 5.0 }"#).unwrap();
        assert_eq!(t.enemy_speed, 5.0);
        assert_eq!(t.capture_distance, 1.5);
        assert_eq!(t.max_dt, 0.1);
    }

    #[test]
    fn partial_level_json_keeps_defaults() {
        let c: LevelConfig = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(c.seed, 7);
        assert_eq!(c.width, LevelConfig::default().width);
        let f: FeatureCounts = serde_json::from_str(r#"{ "notes": 0 }"#).unwrap();
        assert_eq!(f.notes, 0);
        assert_eq!(f.generators, FeatureCounts::default().generators);
    }

    #[test]
    fn nan_tuning_rejected() {
        for t in [
            Tuning {
                max_dt: f64::NAN,
                ..Tuning::default()
            },
            Tuning {
                unit_size: f64::NAN,
                ..Tuning::default()
            },
            Tuning {
                loop_chance: f64::NAN,
                ..Tuning::default()
            },
        ] {
            assert!(matches!(t.validate(), Err(LevelError::Config { .. })));
        }
    }

    #[test]
    fn spawn_points_must_be_single() {
        assert!(FeatureCounts::default().validate().is_ok());
        let two_starts = FeatureCounts {
            starts: 2,
            ..FeatureCounts::default()
        };
        let no_spawn = FeatureCounts {
            enemy_spawns: 0,
            ..FeatureCounts::default()
        };
        assert!(two_starts.validate().is_err());
        let err = no_spawn.validate().unwrap_err();
        assert!(err.to_string().contains("got 1 and 0"));
    }

    #[test]
    fn config_error_messages() {
        assert_eq!(
            ConfigError::TooNarrow(3).to_string(),
            "width 3 is below the minimum of 5"
        );
        assert_eq!(
            ConfigError::DifficultyOutOfRange(11).to_string(),
            "difficulty 11 is outside 0..=10"
        );
    }

    #[test]
    fn bad_tuning_rejected() {
        let t = Tuning {
            loop_chance: 1.5,
            ..Tuning::default()
        };
        assert!(t.validate().is_err());
        assert!(Tuning::default().validate().is_ok());
    }
}
