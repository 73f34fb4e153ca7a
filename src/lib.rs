//! Interaction Engine - state machines for interactable objects and the
//! interactors that select and drive them
//!
//! Interactables and interactors live in a [`world::World`], which arbitrates
//! between candidates by weight, runs lifecycles and cooldowns on a
//! [`timing::Scheduler`], and propagates suppression along dependency edges.

pub mod core;
pub mod dependency;
pub mod events;
pub mod interactable;
pub mod interactor;
pub mod presets;
pub mod surfaces;
pub mod timing;
pub mod world;

pub use crate::core::{EngineConfig, InteractionError, RequestOutcome, Result};
pub use crate::interactable::{InteractableState, LifecycleMode};
pub use crate::interactor::InteractorState;
pub use crate::presets::{InteractableConfig, InteractorConfig, PresetCatalog};
pub use crate::world::World;
