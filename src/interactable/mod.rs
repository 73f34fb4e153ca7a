//! Interactable entities
//!
//! An [`Interactable`] holds the per-entity data: state, weight, lifecycle,
//! timer periods, surfaces and its event registry. Operations that touch
//! other entities (transitions, dependencies, interaction flow) live on
//! [`crate::world::World`], which owns every entity.

pub mod lifecycle;
pub mod state;

use crate::core::config::EngineConfig;
use crate::core::types::{ActorId, CollisionChannel, InteractableId, InteractorId, MeshId, Seconds, ShapeId};
use crate::events::{EventRegistry, InteractableEvent};
use crate::presets::InteractableConfig;
use crate::surfaces::ShapeCache;

pub use lifecycle::{Lifecycle, LifecycleMode, UNLIMITED_CYCLES};
pub use state::{InteractableState, Transition, TransitionEffect};

/// Interaction period meaning "no progress timer"
pub const NO_PROGRESS_TIMER: Seconds = -1.0;

/// Lowest weight accepted by the setters
///
/// Leaves room below for a dependent, which must weigh less than its master.
pub const MIN_WEIGHT: i32 = i32::MIN + 1;

pub fn clamp_weight(requested: i32) -> i32 {
    requested.max(MIN_WEIGHT)
}

/// Clamp a requested default state to one an interactable may rest in
pub fn clamp_default_state(requested: InteractableState) -> InteractableState {
    if requested.is_valid_default() {
        requested
    } else {
        tracing::warn!(
            requested = requested.label(),
            "Default state cannot be {}, using Awake",
            requested.label()
        );
        InteractableState::Awake
    }
}

/// Clamp an interaction period: below -1 becomes -1, tiny values become the minimum
pub fn clamp_interaction_period(requested: Seconds, config: &EngineConfig) -> Seconds {
    if requested <= NO_PROGRESS_TIMER {
        NO_PROGRESS_TIMER
    } else if requested < config.min_interaction_period {
        config.min_interaction_period
    } else {
        requested
    }
}

pub fn clamp_cooldown_period(requested: Seconds, config: &EngineConfig) -> Seconds {
    requested.max(config.min_cooldown_period)
}

/// An object that can be interacted with
#[derive(Debug)]
pub struct Interactable {
    pub id: InteractableId,
    pub owner: ActorId,
    pub name: String,
    pub(crate) state: InteractableState,
    default_state: InteractableState,
    /// Effective weight used by arbitration
    pub(crate) weight: i32,
    /// Weight to restore once every master stops
    pub(crate) cached_weight: i32,
    /// Masters currently holding this interactable's weight down
    pub(crate) masters: Vec<InteractableId>,
    pub(crate) lifecycle: Lifecycle,
    interaction_period: Seconds,
    cooldown_period: Seconds,
    progress_expiration: Seconds,
    can_persist: bool,
    collision_channel: CollisionChannel,
    pub(crate) interactor: Option<InteractorId>,
    pub(crate) collision_shapes: Vec<ShapeId>,
    pub(crate) highlight_meshes: Vec<MeshId>,
    pub(crate) shape_cache: ShapeCache,
    /// Dependents driven by this interactable's state
    pub(crate) dependencies: Vec<InteractableId>,
    pub events: EventRegistry<InteractableEvent>,
}

impl Interactable {
    /// Build an interactable from a preset
    ///
    /// The entity starts Awake; the world moves it to its default state on spawn.
    pub fn new(id: InteractableId, owner: ActorId, preset: &InteractableConfig, config: &EngineConfig) -> Self {
        let mut lifecycle = Lifecycle::new(preset.lifecycle_mode);
        lifecycle.set_count(preset.lifecycle_count, config.min_cycled_lifecycle_count);

        Self {
            id,
            owner,
            name: preset.name.clone(),
            state: InteractableState::Awake,
            default_state: clamp_default_state(preset.default_state),
            weight: clamp_weight(preset.weight),
            cached_weight: clamp_weight(preset.weight),
            masters: Vec::new(),
            lifecycle,
            interaction_period: clamp_interaction_period(preset.interaction_period, config),
            cooldown_period: clamp_cooldown_period(preset.cooldown_period, config),
            progress_expiration: preset.progress_expiration.max(0.0),
            can_persist: preset.can_persist,
            collision_channel: preset.collision_channel,
            interactor: None,
            collision_shapes: Vec::new(),
            highlight_meshes: Vec::new(),
            shape_cache: ShapeCache::new(),
            dependencies: Vec::new(),
            events: EventRegistry::new(),
        }
    }

    // === Queries ===

    pub fn state(&self) -> InteractableState {
        self.state
    }

    pub fn default_state(&self) -> InteractableState {
        self.default_state
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Weight the interactable returns to when no master holds it down
    pub fn base_weight(&self) -> i32 {
        if self.masters.is_empty() {
            self.weight
        } else {
            self.cached_weight
        }
    }

    pub fn masters(&self) -> &[InteractableId] {
        &self.masters
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn lifecycle_mode(&self) -> LifecycleMode {
        self.lifecycle.mode()
    }

    pub fn lifecycle_count(&self) -> i32 {
        self.lifecycle.count()
    }

    pub fn remaining_lifecycle_count(&self) -> i32 {
        self.lifecycle.remaining()
    }

    pub fn interaction_period(&self) -> Seconds {
        self.interaction_period
    }

    pub fn has_progress_timer(&self) -> bool {
        self.interaction_period > 0.0
    }

    pub fn cooldown_period(&self) -> Seconds {
        self.cooldown_period
    }

    pub fn progress_expiration(&self) -> Seconds {
        self.progress_expiration
    }

    pub fn can_persist(&self) -> bool {
        self.can_persist
    }

    pub fn collision_channel(&self) -> CollisionChannel {
        self.collision_channel
    }

    pub fn interactor(&self) -> Option<InteractorId> {
        self.interactor
    }

    pub fn collision_shapes(&self) -> &[ShapeId] {
        &self.collision_shapes
    }

    pub fn highlight_meshes(&self) -> &[MeshId] {
        &self.highlight_meshes
    }

    pub fn dependencies(&self) -> &[InteractableId] {
        &self.dependencies
    }

    pub fn can_be_triggered(&self) -> bool {
        self.state.can_be_triggered()
    }

    /// Triggerable and bound to an interactor
    pub fn can_interact(&self) -> bool {
        self.can_be_triggered() && self.interactor.is_some()
    }

    // === Local setters ===

    pub fn set_default_state(&mut self, requested: InteractableState) {
        self.default_state = clamp_default_state(requested);
    }

    pub fn set_lifecycle_mode(&mut self, mode: LifecycleMode, config: &EngineConfig) {
        let count = self.lifecycle.count();
        self.lifecycle
            .set_mode(mode, config.min_cycled_lifecycle_count);
        self.events.emit(&InteractableEvent::LifecycleModeChanged(mode));
        if self.lifecycle.count() != count {
            self.events
                .emit(&InteractableEvent::LifecycleCountChanged(self.lifecycle.count()));
        }
    }

    /// Set the cycle count; ignored for one-shot interactables
    pub fn set_lifecycle_count(&mut self, requested: i32, config: &EngineConfig) {
        match self
            .lifecycle
            .set_count(requested, config.min_cycled_lifecycle_count)
        {
            Some(count) => self.events.emit(&InteractableEvent::LifecycleCountChanged(count)),
            None => tracing::debug!(
                interactable = self.id.0,
                "Ignoring lifecycle count for one-shot interactable"
            ),
        }
    }

    pub fn set_cooldown_period(&mut self, requested: Seconds, config: &EngineConfig) {
        self.cooldown_period = clamp_cooldown_period(requested, config);
        self.events
            .emit(&InteractableEvent::CooldownPeriodChanged(self.cooldown_period));
    }

    pub fn set_interaction_period(&mut self, requested: Seconds, config: &EngineConfig) {
        self.interaction_period = clamp_interaction_period(requested, config);
    }

    pub fn set_progress_expiration(&mut self, expiration: Seconds) {
        self.progress_expiration = expiration.max(0.0);
    }

    pub fn set_can_persist(&mut self, can_persist: bool) {
        self.can_persist = can_persist;
    }

    pub(crate) fn set_collision_channel(&mut self, channel: CollisionChannel) {
        self.collision_channel = channel;
        self.events
            .emit(&InteractableEvent::CollisionChannelChanged(channel));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(preset: InteractableConfig) -> Interactable {
        Interactable::new(InteractableId(0), ActorId::new(), &preset, &EngineConfig::default())
    }

    #[test]
    fn test_forbidden_default_states_become_awake() {
        for forbidden in [
            InteractableState::Active,
            InteractableState::Completed,
            InteractableState::Cooldown,
        ] {
            let entity = build(InteractableConfig::default().with_default_state(forbidden));
            assert_eq!(entity.default_state(), InteractableState::Awake);
        }

        let mut entity = build(InteractableConfig::default());
        entity.set_default_state(InteractableState::Asleep);
        assert_eq!(entity.default_state(), InteractableState::Asleep);
        entity.set_default_state(InteractableState::Active);
        assert_eq!(entity.default_state(), InteractableState::Awake);
    }

    #[test]
    fn test_interaction_period_clamps() {
        let config = EngineConfig::default();
        assert_eq!(clamp_interaction_period(-5.0, &config), -1.0);
        assert_eq!(clamp_interaction_period(-1.0, &config), -1.0);
        assert_eq!(clamp_interaction_period(-0.5, &config), 0.01);
        assert_eq!(clamp_interaction_period(0.0, &config), 0.01);
        assert_eq!(clamp_interaction_period(2.0, &config), 2.0);
    }

    #[test]
    fn test_cooldown_period_floor() {
        let mut entity = build(InteractableConfig::default().with_cooldown_period(0.0));
        assert_eq!(entity.cooldown_period(), 0.1);

        entity.set_cooldown_period(4.0, &EngineConfig::default());
        assert_eq!(entity.cooldown_period(), 4.0);
        // The cooldown period never touches the cycle count
        assert_eq!(entity.lifecycle_count(), UNLIMITED_CYCLES);
    }

    #[test]
    fn test_lifecycle_count_from_preset() {
        let entity = build(InteractableConfig::default().with_lifecycle(LifecycleMode::Cycled, 1));
        assert_eq!(entity.lifecycle_count(), 2);
        assert_eq!(entity.remaining_lifecycle_count(), 2);

        let once = build(InteractableConfig::default().with_lifecycle(LifecycleMode::OnlyOnce, 9));
        assert_eq!(once.lifecycle_count(), 1);
    }

    #[test]
    fn test_can_interact_needs_interactor() {
        let mut entity = build(InteractableConfig::default());
        assert!(entity.can_be_triggered());
        assert!(!entity.can_interact());

        entity.interactor = Some(InteractorId(1));
        assert!(entity.can_interact());

        entity.state = InteractableState::Cooldown;
        assert!(!entity.can_interact());
    }
}
