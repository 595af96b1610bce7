//! Adversary pursuit: a two-state machine driven by whether the player
//! is watching.
//!
//! Each tick the mode is recomputed from the observed flag:
//! - `Pursuing` (observed): face the player, step toward them through the
//!   collider, capture inside `capture_distance`, drain sanity inside
//!   `proximity_radius`
//! - `Idle` (not observed): hold position, drain sanity at the idle rate
//!
//! Capture fires once; the latch stays set for the life of the state.

use serde::{Deserialize, Serialize};

use crate::collision::{resolve_move, Collider};
use crate::config::Tuning;
use crate::pose::Pose;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdversaryMode {
    Idle,
    Pursuing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdversaryState {
    pub pose: Pose,
    pub mode: AdversaryMode,
    caught: bool,
}

impl AdversaryState {
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            mode: AdversaryMode::Idle,
            caught: false,
        }
    }

    /// Whether the player has been caught.
    pub fn has_caught(&self) -> bool {
        self.caught
    }
}

/// What one pursuit tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PursuitOutcome {
    /// Sanity lost this tick (non-negative).
    pub sanity_drain: f64,
    /// True only on the tick the capture happens.
    pub caught: bool,
    /// Distance to the player after moving.
    pub distance: f64,
}

/// Pursuit parameters resolved for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PursuitAi {
    pub speed: f64,
    pub capture_distance: f64,
    pub proximity_radius: f64,
    pub pursuit_drain: f64,
    pub idle_drain: f64,
}

impl PursuitAi {
    pub fn new(tuning: &Tuning, difficulty: u32) -> Self {
        Self {
            speed: tuning.pursuit_speed(difficulty),
            capture_distance: tuning.capture_distance,
            proximity_radius: tuning.proximity_radius,
            pursuit_drain: tuning.pursuit_drain,
            idle_drain: tuning.idle_drain,
        }
    }

    /// Advance the adversary by `dt` toward `player`.
    pub fn update<C: Collider + ?Sized>(
        &self,
        state: &mut AdversaryState,
        player: &Pose,
        observed: bool,
        dt: f64,
        collider: &C,
    ) -> PursuitOutcome {
        let mode = if observed {
            AdversaryMode::Pursuing
        } else {
            AdversaryMode::Idle
        };
        if mode != state.mode {
            log::debug!("adversary {:?} -> {:?}", state.mode, mode);
            state.mode = mode;
        }

        match mode {
            AdversaryMode::Idle => PursuitOutcome {
                sanity_drain: self.idle_drain * dt,
                caught: false,
                distance: state.pose.distance_to(player),
            },
            AdversaryMode::Pursuing => self.pursue(state, player, dt, collider),
        }
    }

    fn pursue<C: Collider + ?Sized>(
        &self,
        state: &mut AdversaryState,
        player: &Pose,
        dt: f64,
        collider: &C,
    ) -> PursuitOutcome {
        let dist = state.pose.distance_to(player);
        if dist > 0.0 {
            state.pose.yaw = state.pose.yaw_towards(player.x, player.z);
            let travel = (self.speed * dt).min(dist);
            let dx = (player.x - state.pose.x) / dist * travel;
            let dz = (player.z - state.pose.z) / dist * travel;
            let (x, z) = resolve_move(collider, state.pose.x, state.pose.z, dx, dz).position();
            state.pose.x = x;
            state.pose.z = z;
        }

        let distance = state.pose.distance_to(player);
        let caught = !state.caught && distance < self.capture_distance;
        if caught {
            state.caught = true;
            log::info!("adversary caught the player at distance {:.2}", distance);
        }
        let sanity_drain = if distance < self.proximity_radius {
            self.pursuit_drain * dt
        } else {
            0.0
        };

        PursuitOutcome {
            sanity_drain,
            caught,
            distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Aabb, BoxCollider};

    fn field() -> BoxCollider {
        BoxCollider::new(Aabb::new(0.0, 0.0, 1000.0, 1000.0), vec![])
    }

    fn ai() -> PursuitAi {
        PursuitAi::new(&Tuning::default(), 1)
    }

    #[test]
    fn unobserved_adversary_holds_still() {
        let mut s = AdversaryState::new(Pose::new(0.0, 0.0, 0.0));
        let player = Pose::new(5.0, 0.0, 0.0);
        let out = ai().update(&mut s, &player, false, 0.1, &field());
        assert_eq!(s.mode, AdversaryMode::Idle);
        assert_eq!((s.pose.x, s.pose.z), (0.0, 0.0));
        assert!((out.sanity_drain - 0.2).abs() < 1e-9);
        assert!(!out.caught);
    }

    #[test]
    fn observed_adversary_closes_distance() {
        let mut s = AdversaryState::new(Pose::new(0.0, 0.0, 0.0));
        let player = Pose::new(20.0, 0.0, 0.0);
        let mut last = 20.0;
        for _ in 0..10 {
            let out = ai().update(&mut s, &player, true, 0.1, &field());
            assert!(out.distance < last);
            last = out.distance;
        }
        assert!((last - 16.5).abs() < 1e-9);
        assert_eq!(s.mode, AdversaryMode::Pursuing);
    }

    #[test]
    fn faces_the_player() {
        let mut s = AdversaryState::new(Pose::new(0.0, 0.0, 0.0));
        let player = Pose::new(-10.0, 0.0, 0.0);
        ai().update(&mut s, &player, true, 0.1, &field());
        let (fx, fz) = s.pose.forward();
        assert!((fx + 1.0).abs() < 1e-9);
        assert!(fz.abs() < 1e-9);
    }

    #[test]
    fn capture_fires_once() {
        let mut s = AdversaryState::new(Pose::new(0.0, 0.0, 0.0));
        let player = Pose::new(0.5, 0.0, 0.0);
        let first = ai().update(&mut s, &player, true, 0.1, &field());
        assert!(first.caught);
        assert!(s.has_caught());
        let second = ai().update(&mut s, &player, true, 0.1, &field());
        assert!(!second.caught);
    }

    #[test]
    fn never_overshoots_the_player() {
        let mut s = AdversaryState::new(Pose::new(0.0, 0.0, 0.0));
        let player = Pose::new(0.2, 0.0, 0.0);
        let out = ai().update(&mut s, &player, true, 0.1, &field());
        assert!(out.distance.abs() < 1e-9);
    }

    #[test]
    fn proximity_drain_only_when_close() {
        let mut s = AdversaryState::new(Pose::new(0.0, 0.0, 0.0));
        let far = ai().update(&mut s, &Pose::new(50.0, 0.0, 0.0), true, 0.1, &field());
        assert_eq!(far.sanity_drain, 0.0);
        let mut s = AdversaryState::new(Pose::new(0.0, 0.0, 0.0));
        let near = ai().update(&mut s, &Pose::new(5.0, 0.0, 0.0), true, 0.1, &field());
        assert!((near.sanity_drain - 0.5).abs() < 1e-9);
    }

    #[test]
    fn walls_stop_the_adversary() {
        let wall = BoxCollider::new(
            Aabb::new(0.0, 0.0, 100.0, 100.0),
            vec![Aabb::new(1.0, 0.0, 1.0, 10.0)],
        );
        let mut s = AdversaryState::new(Pose::new(0.0, 0.0, 0.0));
        let player = Pose::new(5.0, 0.0, 0.0);
        ai().update(&mut s, &player, true, 0.1, &wall);
        // Step of 0.35 lands at 0.35, short of the obstacle at 0.5.
        assert!((s.pose.x - 0.35).abs() < 1e-9);
        for _ in 0..5 {
            ai().update(&mut s, &player, true, 0.1, &wall);
        }
        assert!(s.pose.x < 0.5);
    }
}
