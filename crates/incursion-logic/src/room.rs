//! Hub room: the bedroom the player returns to between incursions.
//!
//! An 18×18 box (bounds ±9) with three solid pieces of furniture and a
//! handful of interactables. Movement and probing reuse the maze modules
//! with the box collider. In the epilogue the pills are gone, the
//! computer is dead and the door opens.

use serde::{Deserialize, Serialize};

use crate::collision::{Aabb, BoxCollider, MoveResult};
use crate::config::Tuning;
use crate::events::GameEvent;
use crate::interaction::{self, label_for, Interactable, InteractableId, InteractableKind};
use crate::movement::{step_with_speed, MoveIntent};
use crate::pose::Pose;
use crate::stats::{PlayerState, StatDelta};

pub const ROOM_HALF_EXTENT: f64 = 9.0;
pub const ROOM_WALK_SPEED: f64 = 4.0;
pub const ROOM_PROBE_DISTANCE: f64 = 4.0;
pub const PILL_SANITY: f64 = 25.0;
pub const SLEEP_BATTERY_COST: f64 = 20.0;

const COMPUTER: InteractableId = InteractableId(0);
const PILLS: InteractableId = InteractableId(1);
const BED: InteractableId = InteractableId(2);
const WARDROBE: InteractableId = InteractableId(3);
const DOOR: InteractableId = InteractableId(4);

/// Result of using something in the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoomOutcome {
    TookPills { sanity: f64 },
    Slept { stamina: f64, battery: f64 },
    ComputerFocused,
    WardrobeToggled { open: bool },
    LeftRoom,
}

impl RoomOutcome {
    pub fn event(&self) -> Option<GameEvent> {
        match self {
            RoomOutcome::ComputerFocused => Some(GameEvent::ComputerFocused),
            RoomOutcome::LeftRoom => Some(GameEvent::LeaveRoom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubRoom {
    epilogue: bool,
    seated: bool,
    wardrobe_open: bool,
    collider: BoxCollider,
    interactables: Vec<Interactable>,
}

fn fixture(
    id: InteractableId,
    kind: InteractableKind,
    x: f64,
    z: f64,
    radius: f64,
) -> Interactable {
    Interactable {
        id,
        kind,
        active: true,
        x,
        z,
        radius,
    }
}

impl HubRoom {
    pub fn new(epilogue: bool) -> Self {
        let bounds = Aabb::new(0.0, 0.0, ROOM_HALF_EXTENT * 2.0, ROOM_HALF_EXTENT * 2.0);
        let obstacles = vec![
            Aabb::new(0.0, -9.0, 6.0, 2.0), // desk
            Aabb::new(-7.0, 0.0, 4.0, 7.0), // bed
            Aabb::new(7.5, 7.5, 3.0, 2.0), // wardrobe
        ];

        let mut interactables = vec![fixture(
            COMPUTER,
            InteractableKind::Computer,
            0.0,
            -8.5,
            1.0,
        )];
        if !epilogue {
            interactables.push(fixture(PILLS, InteractableKind::Pills, 2.0, -8.5, 0.25));
        }
        interactables.push(fixture(BED, InteractableKind::Bed, -7.0, 0.0, 2.0));
        interactables.push(fixture(WARDROBE, InteractableKind::Wardrobe, 7.5, 7.5, 1.5));
        let door = if epilogue { (-1.5, 8.5) } else { (0.0, 9.9) };
        interactables.push(fixture(DOOR, InteractableKind::Door, door.0, door.1, 1.5));

        Self {
            epilogue,
            seated: !epilogue,
            wardrobe_open: false,
            collider: BoxCollider::new(bounds, obstacles),
            interactables,
        }
    }

    /// Where the player begins: at the desk, or standing facing the door
    /// in the epilogue.
    pub fn spawn_pose(&self) -> Pose {
        if self.epilogue {
            Pose::new(0.0, -4.0, std::f64::consts::PI)
        } else {
            seat_pose()
        }
    }

    pub fn is_epilogue(&self) -> bool {
        self.epilogue
    }

    pub fn is_seated(&self) -> bool {
        self.seated
    }

    pub fn wardrobe_open(&self) -> bool {
        self.wardrobe_open
    }

    pub fn collider(&self) -> &BoxCollider {
        &self.collider
    }

    pub fn interactables(&self) -> &[Interactable] {
        &self.interactables
    }

    /// Get up from the desk, stepping back from it.
    pub fn stand_up(&mut self, player: &mut PlayerState) {
        if !self.seated {
            return;
        }
        self.seated = false;
        player.pose = Pose::new(0.0, -5.0, player.pose.yaw);
    }

    /// Walk at room pace. A seated player stays put.
    pub fn step(
        &self,
        player: &mut PlayerState,
        intent: &MoveIntent,
        dt: f64,
        tuning: &Tuning,
    ) -> MoveResult {
        if self.seated {
            return MoveResult::Blocked {
                x: player.pose.x,
                z: player.pose.z,
            };
        }
        step_with_speed(player, intent, dt, &self.collider, tuning, Some(ROOM_WALK_SPEED))
    }

    pub fn probe(&self, player: &PlayerState) -> Option<InteractableId> {
        interaction::probe(
            &player.pose,
            &self.interactables,
            ROOM_PROBE_DISTANCE,
            player.eyes_closed,
        )
    }

    /// Prompt for a targeted fixture.
    pub fn label(&self, target: InteractableId) -> Option<&'static str> {
        let item = interaction::find(&self.interactables, target)?;
        match (item.kind, self.epilogue) {
            (InteractableKind::Computer, true) => Some("SYSTEM PURGED."),
            (InteractableKind::Door, true) => Some("LEAVE ROOM [E]"),
            (InteractableKind::Wardrobe, _) if self.wardrobe_open => Some("Close Wardrobe [E]"),
            (kind, _) => label_for(kind),
        }
    }

    /// Use the targeted fixture.
    pub fn act(&mut self, target: InteractableId, player: &mut PlayerState) -> Option<RoomOutcome> {
        let kind = interaction::find(&self.interactables, target)
            .filter(|i| i.active)?
            .kind;
        let outcome = match kind {
            InteractableKind::Pills if player.sanity < 100.0 => {
                player.apply(&StatDelta::sanity(player.sanity + PILL_SANITY));
                RoomOutcome::TookPills {
                    sanity: player.sanity,
                }
            }
            InteractableKind::Bed => {
                player.apply(&StatDelta {
                    stamina: Some(100.0),
                    battery: Some(player.battery - SLEEP_BATTERY_COST),
                    ..StatDelta::default()
                });
                RoomOutcome::Slept {
                    stamina: player.stamina,
                    battery: player.battery,
                }
            }
            InteractableKind::Computer if !self.epilogue => {
                self.seated = true;
                player.pose = seat_pose();
                RoomOutcome::ComputerFocused
            }
            InteractableKind::Wardrobe => {
                self.wardrobe_open = !self.wardrobe_open;
                RoomOutcome::WardrobeToggled {
                    open: self.wardrobe_open,
                }
            }
            InteractableKind::Door if self.epilogue => RoomOutcome::LeftRoom,
            _ => return None,
        };
        log::debug!("room action {:?} -> {:?}", kind, outcome);
        Some(outcome)
    }
}

/// Desk chair, facing the monitor.
fn seat_pose() -> Pose {
    Pose::new(0.0, -6.0, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(room: &mut HubRoom) -> PlayerState {
        let mut p = PlayerState::at(room.spawn_pose());
        room.stand_up(&mut p);
        p
    }

    #[test]
    fn starts_seated_facing_the_computer() {
        let room = HubRoom::new(false);
        let p = PlayerState::at(room.spawn_pose());
        assert!(room.is_seated());
        assert_eq!(room.probe(&p), Some(COMPUTER));
        assert_eq!(room.label(COMPUTER), Some("Use Computer [E]"));
    }

    #[test]
    fn seated_player_cannot_move() {
        let room = HubRoom::new(false);
        let mut p = PlayerState::at(room.spawn_pose());
        let intent = MoveIntent {
            backward: true,
            ..MoveIntent::default()
        };
        let res = room.step(&mut p, &intent, 0.1, &Tuning::default());
        assert!(!res.moved());
        assert_eq!(p.pose, room.spawn_pose());
    }

    #[test]
    fn walks_at_room_pace() {
        let mut room = HubRoom::new(false);
        let mut p = standing(&mut room);
        let intent = MoveIntent {
            backward: true,
            run: true,
            ..MoveIntent::default()
        };
        room.step(&mut p, &intent, 0.1, &Tuning::default());
        assert!((p.pose.z - (-4.6)).abs() < 1e-9, "z={}", p.pose.z);
    }

    #[test]
    fn slides_along_the_bed() {
        let mut room = HubRoom::new(false);
        let mut p = standing(&mut room);
        // Right next to the bed's east face (x = -5), heading north-west.
        p.pose = Pose::new(-4.9, 0.0, std::f64::consts::FRAC_PI_4);
        let intent = MoveIntent {
            forward: true,
            ..MoveIntent::default()
        };
        let res = room.step(&mut p, &intent, 0.1, &Tuning::default());
        assert!(matches!(res, MoveResult::Slide { .. }));
        assert!((p.pose.x + 4.9).abs() < 1e-9);
        assert!(p.pose.z < 0.0);
    }

    #[test]
    fn pills_restore_sanity_capped() {
        let mut room = HubRoom::new(false);
        let mut p = standing(&mut room);
        p.sanity = 90.0;
        let out = room.act(PILLS, &mut p);
        assert_eq!(out, Some(RoomOutcome::TookPills { sanity: 100.0 }));
        assert_eq!(room.act(PILLS, &mut p), None);
    }

    #[test]
    fn sleep_restores_stamina_and_costs_battery() {
        let mut room = HubRoom::new(false);
        let mut p = standing(&mut room);
        p.stamina = 10.0;
        p.battery = 15.0;
        let out = room.act(BED, &mut p);
        assert_eq!(
            out,
            Some(RoomOutcome::Slept {
                stamina: 100.0,
                battery: 0.0
            })
        );
    }

    #[test]
    fn computer_focuses_and_seats() {
        let mut room = HubRoom::new(false);
        let mut p = standing(&mut room);
        let out = room.act(COMPUTER, &mut p);
        assert_eq!(out.and_then(|o| o.event()), Some(GameEvent::ComputerFocused));
        assert!(room.is_seated());
    }

    #[test]
    fn wardrobe_toggles() {
        let mut room = HubRoom::new(false);
        let mut p = standing(&mut room);
        assert_eq!(
            room.act(WARDROBE, &mut p),
            Some(RoomOutcome::WardrobeToggled { open: true })
        );
        assert_eq!(room.label(WARDROBE), Some("Close Wardrobe [E]"));
        assert_eq!(
            room.act(WARDROBE, &mut p),
            Some(RoomOutcome::WardrobeToggled { open: false })
        );
    }

    #[test]
    fn door_is_locked_until_the_epilogue() {
        let mut room = HubRoom::new(false);
        let mut p = standing(&mut room);
        assert_eq!(room.act(DOOR, &mut p), None);
        assert_eq!(room.label(DOOR), Some("LOCKED. They are waiting outside."));

        let mut epilogue = HubRoom::new(true);
        let mut p = PlayerState::at(epilogue.spawn_pose());
        assert!(!epilogue.is_seated());
        assert_eq!(epilogue.label(DOOR), Some("LEAVE ROOM [E]"));
        let out = epilogue.act(DOOR, &mut p);
        assert_eq!(out.and_then(|o| o.event()), Some(GameEvent::LeaveRoom));
    }

    #[test]
    fn epilogue_room_has_no_pills_and_a_dead_computer() {
        let mut room = HubRoom::new(true);
        let mut p = PlayerState::at(room.spawn_pose());
        p.sanity = 10.0;
        assert_eq!(room.act(PILLS, &mut p), None);
        assert_eq!(room.label(COMPUTER), Some("SYSTEM PURGED."));
        assert_eq!(room.act(COMPUTER, &mut p), None);
    }
}
