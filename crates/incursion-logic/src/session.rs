//! One incursion run: level, player, adversary and clock, advanced a tick
//! at a time.
//!
//! Per tick, in order:
//! 1. Clamp the frame delta
//! 2. Move the player through the maze collider
//! 3. Probe for an interaction target (gated while eyes are closed)
//! 4. Update the adversary against the new player pose
//! 5. Merge the stat changes and emit events
//!
//! After a terminal event (`Caught`, `SanityDepleted`) the session is
//! finished and further ticks and interactions do nothing.
//!
//! ```
//! use incursion_logic::config::{FeatureCounts, LevelConfig, Tuning};
//! use incursion_logic::session::{Incursion, TickInput};
//!
//! let (mut run, started) =
//!     Incursion::start(LevelConfig::default(), FeatureCounts::default(), Tuning::default())
//!         .unwrap();
//! assert_eq!(started.tag(), "INCURSION_STARTED");
//! let report = run.tick(&TickInput::default(), 1.0 / 60.0);
//! assert!(report.dt > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::clock::SimulationClock;
use crate::collision::{GridCollider, MoveResult};
use crate::config::{FeatureCounts, LevelConfig, Tuning};
use crate::error::LevelError;
use crate::events::GameEvent;
use crate::interaction::{
    self, interactables_for, label_for, Interactable, InteractableId, InteractableKind,
};
use crate::level::{generate_level, Level};
use crate::movement::{self, MoveIntent};
use crate::placement::FeatureId;
use crate::pose::Pose;
use crate::pursuit::{AdversaryState, PursuitAi};
use crate::stats::{clamp_stat, PlayerState, StatDelta};

/// Caller input for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickInput {
    pub intent: MoveIntent,
    /// Player is holding their eyes shut: the adversary loses track and
    /// nothing can be targeted.
    pub eyes_closed: bool,
}

/// Everything one tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Clamped delta actually simulated.
    pub dt: f64,
    pub movement: MoveResult,
    pub target: Option<InteractableId>,
    pub label: Option<&'static str>,
    /// Stat values changed this tick.
    pub delta: StatDelta,
    pub events: Vec<GameEvent>,
}

pub struct Incursion {
    tuning: Tuning,
    level: Level,
    player: PlayerState,
    adversary: AdversaryState,
    ai: PursuitAi,
    interactables: Vec<Interactable>,
    clock: SimulationClock,
    target: Option<InteractableId>,
    outcome: Option<GameEvent>,
}

impl Incursion {
    /// Generate a level and place the player and adversary on it.
    pub fn start(
        config: LevelConfig,
        counts: FeatureCounts,
        tuning: Tuning,
    ) -> Result<(Self, GameEvent), LevelError> {
        let level = generate_level(&config, &counts, &tuning)?;
        Ok((Self::on_level(level, tuning), GameEvent::IncursionStarted))
    }

    /// Start a run on an existing level. Without a start cell the player
    /// begins at the carve origin; without a spawn the adversary begins at
    /// the far corner.
    pub fn on_level(level: Level, tuning: Tuning) -> Self {
        let unit = tuning.unit_size;
        let (sx, sz) = level.start_cell().unwrap_or((1, 1));
        let (ex, ez) = level.enemy_spawn_cell().unwrap_or((
            level.grid().width().saturating_sub(2),
            level.grid().height().saturating_sub(2),
        ));

        let mut player = PlayerState::at(Pose::at_cell(sx, sz, unit));
        player.eye_height = tuning.stand_eye_height;
        let adversary = AdversaryState::new(Pose::at_cell(ex, ez, unit));
        let ai = PursuitAi::new(&tuning, level.config().difficulty);
        let interactables = interactables_for(&level, &tuning);

        log::info!(
            "incursion started: player at ({}, {}), adversary at ({}, {}), speed {:.2}",
            sx,
            sz,
            ex,
            ez,
            ai.speed
        );

        Self {
            clock: SimulationClock::new(tuning.max_dt),
            tuning,
            level,
            player,
            adversary,
            ai,
            interactables,
            target: None,
            outcome: None,
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Direct stat access for callers applying external changes.
    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    pub fn adversary(&self) -> &AdversaryState {
        &self.adversary
    }

    /// Move the adversary, e.g. for scripted encounters.
    pub fn place_adversary(&mut self, pose: Pose) {
        self.adversary.pose = pose;
    }

    pub fn interactables(&self) -> &[Interactable] {
        &self.interactables
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Target from the most recent tick.
    pub fn target(&self) -> Option<InteractableId> {
        self.target
    }

    /// The terminal event, once the run is over.
    pub fn outcome(&self) -> Option<&GameEvent> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn generators_remaining(&self) -> usize {
        self.interactables
            .iter()
            .filter(|i| i.kind == InteractableKind::Generator && i.active)
            .count()
    }

    fn idle_report(&self) -> TickReport {
        TickReport {
            dt: 0.0,
            movement: MoveResult::Blocked {
                x: self.player.pose.x,
                z: self.player.pose.z,
            },
            target: None,
            label: None,
            delta: StatDelta::default(),
            events: Vec::new(),
        }
    }

    /// Advance the run by one frame of `raw_dt` seconds.
    pub fn tick(&mut self, input: &TickInput, raw_dt: f64) -> TickReport {
        if self.is_over() {
            return self.idle_report();
        }
        let dt = self.clock.advance(raw_dt);
        self.player.eyes_closed = input.eyes_closed;

        let collider = GridCollider::new(
            self.level.grid(),
            self.tuning.unit_size,
            self.tuning.collision_radius,
        );

        // Movement
        let stamina_before = self.player.stamina;
        let movement = movement::step(
            &mut self.player,
            &input.intent,
            dt,
            &collider,
            &self.tuning,
        );
        self.player.eye_height = movement::eye_height(
            self.player.eye_height,
            self.player.is_crouching,
            input.intent.wants_to_move(),
            self.clock.elapsed(),
            dt,
            &self.tuning,
        );

        // Interaction
        self.target = interaction::probe(
            &self.player.pose,
            &self.interactables,
            self.tuning.interact_distance,
            input.eyes_closed,
        );
        let label = self
            .target
            .and_then(|id| interaction::find(&self.interactables, id))
            .and_then(|i| label_for(i.kind));

        // Pursuit
        let pursuit = self.ai.update(
            &mut self.adversary,
            &self.player.pose,
            !input.eyes_closed,
            dt,
            &collider,
        );

        let mut delta = StatDelta::default();
        if self.player.stamina != stamina_before {
            delta.stamina = Some(self.player.stamina);
        }
        let sanity_before = self.player.sanity;
        if pursuit.sanity_drain > 0.0 {
            delta.sanity = Some(clamp_stat(sanity_before - pursuit.sanity_drain));
        }
        self.player.apply(&delta);

        let mut events = Vec::new();
        if pursuit.caught {
            events.push(GameEvent::Caught);
        }
        if sanity_before > 0.0 && self.player.sanity <= 0.0 {
            events.push(GameEvent::SanityDepleted);
        }
        if let Some(end) = events.iter().find(|e| e.is_terminal()) {
            log::info!(
                "incursion over after {} ticks ({:.1}s): {}",
                self.clock.ticks(),
                self.clock.elapsed(),
                end
            );
            self.outcome = Some(end.clone());
        }

        TickReport {
            dt,
            movement,
            target: self.target,
            label,
            delta,
            events,
        }
    }

    /// Use whatever the player is looking at right now.
    pub fn interact(&mut self) -> Vec<GameEvent> {
        if self.is_over() {
            return Vec::new();
        }
        let Some(id) = interaction::probe(
            &self.player.pose,
            &self.interactables,
            self.tuning.interact_distance,
            self.player.eyes_closed,
        ) else {
            return Vec::new();
        };
        self.interact_with(id)
    }

    /// Use a specific interactable regardless of aim. Inactive or unknown
    /// ids do nothing.
    pub fn interact_with(&mut self, id: InteractableId) -> Vec<GameEvent> {
        if self.is_over() {
            return Vec::new();
        }
        let total = self.level.generator_count() as u32;
        let kind = match interaction::find(&self.interactables, id) {
            Some(item) if item.active => item.kind,
            _ => return Vec::new(),
        };

        let event = match kind {
            InteractableKind::Key => {
                self.player.apply(&StatDelta {
                    held_key: Some(true),
                    ..StatDelta::default()
                });
                GameEvent::KeyAcquired
            }
            InteractableKind::Generator => {
                let activated = self.player.generators_activated + 1;
                self.player.apply(&StatDelta {
                    generators_activated: Some(activated),
                    ..StatDelta::default()
                });
                GameEvent::PowerRestored { activated, total }
            }
            InteractableKind::Note => {
                let text = self
                    .level
                    .feature(FeatureId(id.0))
                    .and_then(|f| f.payload.clone())
                    .unwrap_or_default();
                GameEvent::NoteRead { text }
            }
            InteractableKind::Battery => {
                let battery = clamp_stat(self.player.battery + self.tuning.battery_restore);
                self.player.apply(&StatDelta {
                    battery: Some(battery),
                    ..StatDelta::default()
                });
                GameEvent::BatteryCollected { battery }
            }
            // Hub room fixtures never appear in the maze.
            _ => return Vec::new(),
        };
        if let Some(item) = interaction::find_mut(&mut self.interactables, id) {
            item.active = false;
        }
        log::debug!("interacted with {:?} #{}: {}", kind, id.0, event);
        vec![event]
    }
}
