//! Interaction probe: what the player is looking at.
//!
//! Interactables are a flat list of circles on the x/z plane. The probe
//! casts a ray along the player's forward vector and returns the nearest
//! active circle it hits within reach. Acting on the target is the
//! caller's job.

use serde::{Deserialize, Serialize};

use crate::config::Tuning;
use crate::level::Level;
use crate::placement::{FeatureId, FeatureKind};
use crate::pose::{grid_to_world, Pose};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InteractableId(pub u32);

impl From<FeatureId> for InteractableId {
    fn from(id: FeatureId) -> Self {
        InteractableId(id.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractableKind {
    // Maze
    Key,
    Generator,
    Note,
    Battery,
    // Hub room
    Computer,
    Pills,
    Bed,
    Wardrobe,
    Door,
}

impl InteractableKind {
    /// Interactable kind for a maze feature, if players can use it.
    pub fn from_feature(kind: FeatureKind) -> Option<Self> {
        match kind {
            FeatureKind::Key => Some(InteractableKind::Key),
            FeatureKind::Generator => Some(InteractableKind::Generator),
            FeatureKind::Note => Some(InteractableKind::Note),
            FeatureKind::Battery => Some(InteractableKind::Battery),
            FeatureKind::Start | FeatureKind::EnemySpawn => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interactable {
    pub id: InteractableId,
    pub kind: InteractableKind,
    pub active: bool,
    pub x: f64,
    pub z: f64,
    /// Hit radius around (x, z).
    pub radius: f64,
}

/// Prompt shown while `kind` is targeted.
pub fn label_for(kind: InteractableKind) -> Option<&'static str> {
    match kind {
        InteractableKind::Key => Some("PICK UP KEY [E]"),
        InteractableKind::Generator => Some("ACTIVATE GENERATOR [E]"),
        InteractableKind::Note => Some("READ NOTE [E]"),
        InteractableKind::Battery => Some("COLLECT BATTERY [E]"),
        InteractableKind::Computer => Some("Use Computer [E]"),
        InteractableKind::Pills => Some("Take Xanax (Restore Sanity) [E]"),
        InteractableKind::Bed => Some("Sleep (Pass Time / Restore Stamina) [E]"),
        InteractableKind::Wardrobe => Some("Open Wardrobe [E]"),
        InteractableKind::Door => Some("LOCKED. They are waiting outside."),
    }
}

/// Usable features of a level, placed at their cell centres. Ids match
/// the feature ids.
pub fn interactables_for(level: &Level, tuning: &Tuning) -> Vec<Interactable> {
    level
        .features()
        .iter()
        .filter_map(|f| {
            let kind = InteractableKind::from_feature(f.kind)?;
            let (x, z) = grid_to_world(f.grid_x, f.grid_z, tuning.unit_size);
            Some(Interactable {
                id: f.id.into(),
                kind,
                active: f.active,
                x,
                z,
                radius: tuning.interact_radius,
            })
        })
        .collect()
}

/// Distance along a unit ray from `(ox, oz)` in direction `(dx, dz)` to
/// the first point of the circle. Zero when the origin is inside it.
fn ray_circle(ox: f64, oz: f64, dx: f64, dz: f64, cx: f64, cz: f64, r: f64) -> Option<f64> {
    let (lx, lz) = (cx - ox, cz - oz);
    let to_centre_sq = lx * lx + lz * lz;
    if to_centre_sq <= r * r {
        return Some(0.0);
    }
    let along = lx * dx + lz * dz;
    if along < 0.0 {
        return None;
    }
    let miss_sq = to_centre_sq - along * along;
    if miss_sq > r * r {
        return None;
    }
    Some(along - (r * r - miss_sq).sqrt())
}

/// Nearest active interactable hit by the forward ray of `origin` closer
/// than `max_distance`. Always `None` while `gated`.
pub fn probe(
    origin: &Pose,
    interactables: &[Interactable],
    max_distance: f64,
    gated: bool,
) -> Option<InteractableId> {
    if gated {
        return None;
    }
    let (dx, dz) = origin.forward();
    interactables
        .iter()
        .filter(|i| i.active)
        .filter_map(|i| {
            ray_circle(origin.x, origin.z, dx, dz, i.x, i.z, i.radius).map(|d| (d, i.id))
        })
        .filter(|&(d, _)| d < max_distance)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, id)| id)
}

pub fn find(interactables: &[Interactable], id: InteractableId) -> Option<&Interactable> {
    interactables.iter().find(|i| i.id == id)
}

pub fn find_mut(
    interactables: &mut [Interactable],
    id: InteractableId,
) -> Option<&mut Interactable> {
    interactables.iter_mut().find(|i| i.id == id)
}
