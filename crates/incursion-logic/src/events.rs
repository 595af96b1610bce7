//! Game events emitted to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::constants::event_tags;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    IncursionStarted,
    Caught,
    KeyAcquired,
    PowerRestored { activated: u32, total: u32 },
    NoteRead { text: String },
    BatteryCollected { battery: f64 },
    SanityDepleted,
    ComputerFocused,
    LeaveRoom,
}

impl GameEvent {
    /// Tag string consumed verbatim by the presentation layer.
    pub fn tag(&self) -> &'static str {
        match self {
            GameEvent::IncursionStarted => event_tags::INCURSION_STARTED,
            GameEvent::Caught => event_tags::CAUGHT,
            GameEvent::KeyAcquired => event_tags::KEY_ACQUIRED,
            GameEvent::PowerRestored { .. } => event_tags::POWER_RESTORED,
            GameEvent::NoteRead { .. } => event_tags::NOTE_READ,
            GameEvent::BatteryCollected { .. } => event_tags::BATTERY_COLLECTED,
            GameEvent::SanityDepleted => event_tags::SANITY_DEPLETED,
            GameEvent::ComputerFocused => event_tags::COMPUTER_FOCUSED,
            GameEvent::LeaveRoom => event_tags::LEAVE_ROOM,
        }
    }

    /// Whether the run ends with this event.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::Caught | GameEvent::SanityDepleted)
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
