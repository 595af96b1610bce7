//! Player survival stats and partial stat updates.
//!
//! Stats change only through [`StatDelta`], a partial record: each present
//! field replaces the current value (clamped to the stat range), absent
//! fields are left alone.

use serde::{Deserialize, Serialize};

use crate::constants::stat_limits::{CRITICAL_SANITY, MAX, MIN, PANIC_SANITY};
use crate::pose::Pose;

/// Player pose plus survival stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub pose: Pose,
    pub sanity: f64,
    pub battery: f64,
    pub stamina: f64,
    pub is_crouching: bool,
    pub eyes_closed: bool,
    pub held_key: bool,
    pub generators_activated: u32,
    /// Current camera height; eased toward the stance target each tick.
    #[serde(default)]
    pub eye_height: f64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::at(Pose::default())
    }
}

impl PlayerState {
    /// Fresh stats at `pose`.
    pub fn at(pose: Pose) -> Self {
        Self {
            pose,
            sanity: MAX,
            battery: MAX,
            stamina: MAX,
            is_crouching: false,
            eyes_closed: false,
            held_key: false,
            generators_activated: 0,
            eye_height: 0.0,
        }
    }

    /// Merge a partial update.
    pub fn apply(&mut self, delta: &StatDelta) {
        if let Some(v) = delta.sanity {
            self.sanity = clamp_stat(v);
        }
        if let Some(v) = delta.battery {
            self.battery = clamp_stat(v);
        }
        if let Some(v) = delta.stamina {
            self.stamina = clamp_stat(v);
        }
        if let Some(v) = delta.generators_activated {
            self.generators_activated = v;
        }
        if let Some(v) = delta.held_key {
            self.held_key = v;
        }
        if let Some(v) = delta.is_crouching {
            self.is_crouching = v;
        }
    }

    pub fn condition(&self) -> Condition {
        Condition::from_sanity(self.sanity)
    }
}

/// Clamp into the stat range. NaN collapses to the minimum.
pub fn clamp_stat(v: f64) -> f64 {
    if v.is_nan() {
        return MIN;
    }
    v.clamp(MIN, MAX)
}

/// Partial stat update. Present fields are absolute new values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamina: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generators_activated: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub held_key: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_crouching: Option<bool>,
}

impl StatDelta {
    pub fn sanity(v: f64) -> Self {
        Self {
            sanity: Some(v),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fold `later` into `self`; fields `later` sets win.
    pub fn merge(&mut self, later: &StatDelta) {
        if later.sanity.is_some() {
            self.sanity = later.sanity;
        }
        if later.battery.is_some() {
            self.battery = later.battery;
        }
        if later.stamina.is_some() {
            self.stamina = later.stamina;
        }
        if later.generators_activated.is_some() {
            self.generators_activated = later.generators_activated;
        }
        if later.held_key.is_some() {
            self.held_key = later.held_key;
        }
        if later.is_crouching.is_some() {
            self.is_crouching = later.is_crouching;
        }
    }
}

/// Sanity-derived HUD state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Stable,
    Panic,
    Critical,
}

impl Condition {
    pub fn from_sanity(sanity: f64) -> Self {
        if sanity < CRITICAL_SANITY {
            Condition::Critical
        } else if sanity < PANIC_SANITY {
            Condition::Panic
        } else {
            Condition::Stable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Condition::Stable => "STABLE",
            Condition::Panic => "PANIC",
            Condition::Critical => "CRITICAL",
        }
    }
}
