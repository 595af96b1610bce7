//! Game constants: tile codes, world units, event tags, default counts.
//!
//! Plain constants with no engine dependency. Both the session and the
//! headless simtest use these.

/// Small integer tile codes as exchanged with presentation collaborators.
pub mod tile_codes {
    pub const EMPTY: u8 = 0;
    pub const WALL: u8 = 1;
    pub const START: u8 = 2;
    pub const KEY: u8 = 4;
    pub const BATTERY: u8 = 6;
    pub const GENERATOR: u8 = 8;
    pub const NOTE: u8 = 11;
    pub const ENEMY_SPAWN: u8 = 12;
}

/// Event tags consumed verbatim by the presentation layer.
pub mod event_tags {
    pub const INCURSION_STARTED: &str = "INCURSION_STARTED";
    pub const CAUGHT: &str = "CAUGHT";
    pub const KEY_ACQUIRED: &str = "KEY_ACQUIRED";
    pub const POWER_RESTORED: &str = "POWER_RESTORED";
    pub const NOTE_READ: &str = "NOTE_READ";
    pub const BATTERY_COLLECTED: &str = "BATTERY_COLLECTED";
    pub const SANITY_DEPLETED: &str = "SANITY_DEPLETED";
    pub const COMPUTER_FOCUSED: &str = "COMPUTER_FOCUSED";
    pub const LEAVE_ROOM: &str = "LEAVE_ROOM";
}

/// World-space geometry.
pub mod world {
    /// Edge length of one grid cell in world units.
    pub const UNIT_SIZE: f64 = 4.0;
    /// Radius used for the wall-penetration margin.
    pub const COLLISION_RADIUS: f64 = 1.0;
    /// Fraction of the collision radius added to each wall footprint.
    pub const MARGIN_FACTOR: f64 = 0.4;
    /// Carve step between passage cells.
    pub const CARVE_STEP: usize = 2;
    /// Passage carving always starts here.
    pub const CARVE_ORIGIN: (usize, usize) = (1, 1);
    /// Side of the block near the origin kept clear of non-start features.
    pub const SPAWN_GUARD: usize = 3;
}

/// Dimension limits for `LevelConfig`.
pub mod limits {
    pub const MIN_DIMENSION: u32 = 5;
    pub const MAX_DIMENSION: u32 = 1001;
    pub const MAX_DIFFICULTY: u32 = 10;
}

/// Default feature counts per level.
pub mod feature_defaults {
    pub const STARTS: u32 = 1;
    pub const GENERATORS: u32 = 3;
    pub const KEYS: u32 = 1;
    pub const BATTERIES: u32 = 4;
    pub const NOTES: u32 = 2;
    pub const ENEMY_SPAWNS: u32 = 1;
}

/// Stat bounds.
pub mod stat_limits {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;
    /// Below this sanity the HUD enters panic mode.
    pub const PANIC_SANITY: f64 = 40.0;
    /// Below this sanity the HUD shows critical sanity loss.
    pub const CRITICAL_SANITY: f64 = 30.0;
}

/// Text carried by every note feature.
pub const NOTE_TEXT: &str =
    "SURVIVAL RULE #1: If you hear it, CLOSE YOUR EYES. It tracks sight, not sound.";
