//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a scene actor that owns interactables or interactors
///
/// Only used for comparisons (ignored-actor filtering, ownership checks);
/// the engine never manages actor lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to an interactable registered in a [`crate::world::World`]
///
/// Handles are never reused, so a handle that outlives its entity simply
/// stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InteractableId(pub u32);

/// Handle to an interactor registered in a [`crate::world::World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InteractorId(pub u32);

/// Handle to a collision shape owned by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u32);

/// Handle to a highlightable mesh owned by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(pub u32);

/// Simulation time in seconds
pub type Seconds = f32;

/// Trace/overlap channel an interactable listens on and an interactor responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CollisionChannel {
    WorldStatic,
    WorldDynamic,
    Pawn,
    #[default]
    Visibility,
    Camera,
    Interaction,
}

/// How a collision shape reacts to a given channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CollisionResponse {
    Ignore,
    Overlap,
    #[default]
    Block,
}

/// Which collision features a shape has enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CollisionEnabled {
    NoCollision,
    #[default]
    QueryOnly,
    PhysicsOnly,
    QueryAndPhysics,
}

/// Monotonic handle allocator; ids are never handed out twice
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn allocate(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Result of a named state request such as activate or wake up
///
/// `reason` is a human-readable explanation meant for logs and UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOutcome {
    pub accepted: bool,
    pub reason: String,
}

impl RequestOutcome {
    pub fn accepted(reason: impl Into<String>) -> Self {
        Self {
            accepted: true,
            reason: reason.into(),
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_never_repeats() {
        let mut ids = IdAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        let c = ids.allocate();
        assert_eq!((a, b, c), (0, 1, 2));
    }

    #[test]
    fn test_actor_ids_are_distinct() {
        assert_ne!(ActorId::new(), ActorId::new());
    }
}
