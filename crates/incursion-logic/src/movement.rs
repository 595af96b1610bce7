//! Player movement: input intent to a resolved step, plus stamina and
//! camera height.
//!
//! Algorithm:
//! 1. Apply the yaw change and crouch flag
//! 2. Pick a speed: crouch overrides run, run needs stamina, else walk
//! 3. Sum the pressed directions (forward −z, back +z, left −x, right +x)
//!    and normalize so diagonals are not faster
//! 4. Scale by speed·dt and rotate by yaw onto the world plane
//! 5. Resolve against the collider (full step, then slide)
//! 6. Drain stamina while sprinting and moving, regenerate otherwise

use serde::{Deserialize, Serialize};

use crate::collision::{resolve_move, Collider, MoveResult};
use crate::config::Tuning;
use crate::pose::normalize_angle;
use crate::stats::{clamp_stat, PlayerState};

/// Bob frequency in radians per second of elapsed time.
const BOB_RATE: f64 = 12.0;
const BOB_AMPLITUDE: f64 = 0.05;
/// Eye height easing factor per second.
const EYE_EASE: f64 = 10.0;

/// Movement flags for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub run: bool,
    pub crouch: bool,
    /// Yaw change to apply before moving.
    pub yaw_delta: f64,
}

impl MoveIntent {
    /// Whether any direction key is held.
    pub fn wants_to_move(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Local-space direction, unit length or zero.
    fn local_direction(&self) -> (f64, f64) {
        let mut x: f64 = 0.0;
        let mut z: f64 = 0.0;
        if self.forward {
            z -= 1.0;
        }
        if self.backward {
            z += 1.0;
        }
        if self.left {
            x -= 1.0;
        }
        if self.right {
            x += 1.0;
        }
        let len = (x * x + z * z).sqrt();
        if len == 0.0 {
            return (0.0, 0.0);
        }
        (x / len, z / len)
    }
}

/// Rotate a local offset by `yaw` onto the world x/z plane.
pub fn rotate(x: f64, z: f64, yaw: f64) -> (f64, f64) {
    let (s, c) = yaw.sin_cos();
    (x * c + z * s, -x * s + z * c)
}

/// Speed for this tick given the intent and remaining stamina.
pub fn movement_speed(intent: &MoveIntent, stamina: f64, tuning: &Tuning) -> f64 {
    if intent.crouch {
        tuning.crouch_speed
    } else if intent.run && stamina > 0.0 {
        tuning.run_speed
    } else {
        tuning.walk_speed
    }
}

/// Advance the player by one tick of `intent`.
pub fn step<C: Collider + ?Sized>(
    player: &mut PlayerState,
    intent: &MoveIntent,
    dt: f64,
    collider: &C,
    tuning: &Tuning,
) -> MoveResult {
    step_with_speed(player, intent, dt, collider, tuning, None)
}

/// As [`step`], with an optional speed override (used by the hub room,
/// which walks at a fixed pace).
pub fn step_with_speed<C: Collider + ?Sized>(
    player: &mut PlayerState,
    intent: &MoveIntent,
    dt: f64,
    collider: &C,
    tuning: &Tuning,
    speed_override: Option<f64>,
) -> MoveResult {
    player.pose.yaw = normalize_angle(player.pose.yaw + intent.yaw_delta);
    player.is_crouching = intent.crouch;

    let sprinting = !intent.crouch && intent.run && player.stamina > 0.0;
    let speed = speed_override.unwrap_or_else(|| movement_speed(intent, player.stamina, tuning));
    let (lx, lz) = intent.local_direction();
    let (dx, dz) = rotate(lx * speed * dt, lz * speed * dt, player.pose.yaw);

    let result = resolve_move(collider, player.pose.x, player.pose.z, dx, dz);
    let (x, z) = result.position();
    player.pose.x = x;
    player.pose.z = z;

    let stamina = if sprinting && result.moved() && speed_override.is_none() {
        player.stamina - tuning.stamina_drain * dt
    } else {
        player.stamina + tuning.stamina_regen * dt
    };
    player.stamina = clamp_stat(stamina);

    result
}

/// Ease the camera height toward the stance target, with head bob while
/// moving. `elapsed` is total simulation time.
pub fn eye_height(
    current: f64,
    crouching: bool,
    moving: bool,
    elapsed: f64,
    dt: f64,
    tuning: &Tuning,
) -> f64 {
    let base = if crouching {
        tuning.crouch_eye_height
    } else {
        tuning.stand_eye_height
    };
    let bob = if moving {
        (elapsed * BOB_RATE).sin() * BOB_AMPLITUDE
    } else {
        0.0
    };
    let t = (dt * EYE_EASE).clamp(0.0, 1.0);
    current + (base + bob - current) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Aabb, BoxCollider};
    use crate::pose::Pose;
    use std::f64::consts::FRAC_PI_2;

    fn open_field() -> BoxCollider {
        BoxCollider::new(Aabb::new(0.0, 0.0, 1000.0, 1000.0), vec![])
    }

    fn forward() -> MoveIntent {
        MoveIntent {
            forward: true,
            ..MoveIntent::default()
        }
    }

    #[test]
    fn forward_at_zero_yaw_moves_negative_z() {
        let mut p = PlayerState::default();
        let res = step(&mut p, &forward(), 0.1, &open_field(), &Tuning::default());
        assert!(matches!(res, MoveResult::Free { .. }));
        assert!(p.pose.x.abs() < 1e-9);
        assert!((p.pose.z + 0.6).abs() < 1e-9);
    }

    #[test]
    fn yaw_rotates_direction() {
        let mut p = PlayerState::at(Pose::new(0.0, 0.0, FRAC_PI_2));
        step(&mut p, &forward(), 0.1, &open_field(), &Tuning::default());
        assert!((p.pose.x + 0.6).abs() < 1e-9, "x={}", p.pose.x);
        assert!(p.pose.z.abs() < 1e-9);
    }

    #[test]
    fn diagonal_is_not_faster() {
        let mut p = PlayerState::default();
        let intent = MoveIntent {
            forward: true,
            right: true,
            ..MoveIntent::default()
        };
        step(&mut p, &intent, 0.1, &open_field(), &Tuning::default());
        let d = (p.pose.x.powi(2) + p.pose.z.powi(2)).sqrt();
        assert!((d - 0.6).abs() < 1e-9);
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut p = PlayerState::default();
        let intent = MoveIntent {
            forward: true,
            backward: true,
            ..MoveIntent::default()
        };
        let res = step(&mut p, &intent, 0.1, &open_field(), &Tuning::default());
        assert!(!res.moved());
    }

    #[test]
    fn speed_priority() {
        let t = Tuning::default();
        let run = MoveIntent {
            run: true,
            ..forward()
        };
        let crouch_run = MoveIntent {
            crouch: true,
            ..run
        };
        assert_eq!(movement_speed(&run, 50.0, &t), 9.0);
        assert_eq!(movement_speed(&run, 0.0, &t), 6.0);
        assert_eq!(movement_speed(&crouch_run, 50.0, &t), 3.0);
        assert_eq!(movement_speed(&forward(), 50.0, &t), 6.0);
    }

    #[test]
    fn sprinting_drains_and_walking_regenerates() {
        let t = Tuning::default();
        let mut p = PlayerState::default();
        let run = MoveIntent {
            run: true,
            ..forward()
        };
        step(&mut p, &run, 0.1, &open_field(), &t);
        assert!((p.stamina - 98.0).abs() < 1e-9);

        step(&mut p, &forward(), 0.1, &open_field(), &t);
        assert!((p.stamina - 99.0).abs() < 1e-9);
    }

    #[test]
    fn sprinting_into_a_wall_does_not_drain() {
        let t = Tuning::default();
        let wall = BoxCollider::new(Aabb::new(0.0, 0.0, 2.0, 2.0), vec![]);
        let mut p = PlayerState::at(Pose::new(0.0, -1.0, 0.0));
        p.stamina = 50.0;
        let run = MoveIntent {
            run: true,
            ..forward()
        };
        let res = step(&mut p, &run, 0.1, &wall, &t);
        assert!(!res.moved());
        assert!(p.stamina > 50.0);
    }

    #[test]
    fn exhausted_player_walks() {
        let t = Tuning::default();
        let mut p = PlayerState::default();
        p.stamina = 0.0;
        let run = MoveIntent {
            run: true,
            ..forward()
        };
        step(&mut p, &run, 0.1, &open_field(), &t);
        assert!((p.pose.z + 0.6).abs() < 1e-9);
    }

    #[test]
    fn eye_height_eases_toward_stance() {
        let t = Tuning::default();
        let h = eye_height(1.7, true, false, 0.0, 0.1, &t);
        assert!((h - 1.0).abs() < 1e-9);
        let h = eye_height(1.7, true, false, 0.0, 0.05, &t);
        assert!((h - 1.35).abs() < 1e-9);
        let still = eye_height(1.7, false, false, 0.3, 0.1, &t);
        assert!((still - 1.7).abs() < 1e-9);
    }
}
