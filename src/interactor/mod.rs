//! Interactor entities
//!
//! An interactor detects interactables, picks one through weight arbitration
//! and drives the interaction on it. Cross-entity behavior lives on
//! [`crate::world::World`].

pub mod arbitration;
pub mod state;

use crate::core::types::{ActorId, CollisionChannel, InteractableId, InteractorId};
use crate::events::{EventRegistry, InteractorEvent};
use crate::presets::InteractorConfig;

pub use arbitration::{arbitrate, Arbitration, Contender};
pub use state::InteractorState;

/// Clamp a requested interactor default state; Active is never a resting state
pub fn clamp_default_state(requested: InteractorState) -> InteractorState {
    if requested == InteractorState::Active {
        tracing::warn!("Interactor default state cannot be Active, using Awake");
        InteractorState::Awake
    } else {
        requested
    }
}

#[derive(Debug)]
pub struct Interactor {
    pub id: InteractorId,
    pub owner: ActorId,
    pub name: String,
    pub(crate) state: InteractorState,
    default_state: InteractorState,
    pub(crate) active_interactable: Option<InteractableId>,
    ignored_actors: Vec<ActorId>,
    response_channel: CollisionChannel,
    /// Interactors suppressed while this one is busy
    pub(crate) dependencies: Vec<InteractorId>,
    pub events: EventRegistry<InteractorEvent>,
}

impl Interactor {
    /// Build an interactor from a preset; it starts Asleep and ignores its owner
    pub fn new(id: InteractorId, owner: ActorId, preset: &InteractorConfig) -> Self {
        Self {
            id,
            owner,
            name: preset.name.clone(),
            state: InteractorState::Asleep,
            default_state: clamp_default_state(preset.default_state),
            active_interactable: None,
            ignored_actors: vec![owner],
            response_channel: preset.response_channel,
            dependencies: Vec::new(),
            events: EventRegistry::new(),
        }
    }

    pub fn state(&self) -> InteractorState {
        self.state
    }

    pub fn default_state(&self) -> InteractorState {
        self.default_state
    }

    pub fn active_interactable(&self) -> Option<InteractableId> {
        self.active_interactable
    }

    pub fn response_channel(&self) -> CollisionChannel {
        self.response_channel
    }

    pub fn dependencies(&self) -> &[InteractorId] {
        &self.dependencies
    }

    pub fn can_interact(&self) -> bool {
        self.state.can_interact()
    }

    pub fn is_valid(&self) -> bool {
        self.state.is_valid()
    }

    pub fn ignored_actors(&self) -> &[ActorId] {
        &self.ignored_actors
    }

    pub fn ignores(&self, actor: ActorId) -> bool {
        self.ignored_actors.contains(&actor)
    }

    pub fn set_default_state(&mut self, requested: InteractorState) {
        self.default_state = clamp_default_state(requested);
    }

    pub fn set_response_channel(&mut self, channel: CollisionChannel) {
        self.response_channel = channel;
        self.events
            .emit(&InteractorEvent::ResponseChannelChanged(channel));
    }

    /// Returns false if the actor was already ignored
    pub fn add_ignored_actor(&mut self, actor: ActorId) -> bool {
        if self.ignores(actor) {
            return false;
        }
        self.ignored_actors.push(actor);
        self.events.emit(&InteractorEvent::IgnoredActorAdded(actor));
        true
    }

    pub fn remove_ignored_actor(&mut self, actor: ActorId) -> bool {
        let before = self.ignored_actors.len();
        self.ignored_actors.retain(|a| *a != actor);
        if self.ignored_actors.len() == before {
            return false;
        }
        self.events.emit(&InteractorEvent::IgnoredActorRemoved(actor));
        true
    }
}
