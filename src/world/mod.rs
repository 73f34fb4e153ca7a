//! World registry - owns every interactable, interactor and collision shape
//!
//! Entities refer to each other by handle. Every cross-entity operation is a
//! method on [`World`] so that one entity's transition can drive another's
//! without shared ownership. Handles are never reused: an operation on a
//! stale handle does nothing.

mod dependencies;
mod detection;
mod interactable_ops;
mod interactor_ops;
mod surfaces;

use ahash::AHashMap;

use crate::core::config::EngineConfig;
use crate::core::error::{InteractionError, Result};
use crate::core::types::{
    ActorId, IdAllocator, InteractableId, InteractorId, Seconds, ShapeId,
};
use crate::events::{
    InteractableEvent, InteractableEventKind, InteractorEvent, InteractorEventKind, ListenerId,
};
use crate::interactable::{Interactable, InteractableState};
use crate::interactor::{Interactor, InteractorState};
use crate::presets::{InteractableConfig, InteractorConfig};
use crate::surfaces::{CollisionShape, Highlighter, NullHighlighter};
use crate::timing::{Scheduler, TimerKey, TimerPurpose, TimerQueue};

pub struct World {
    interactables: AHashMap<InteractableId, Interactable>,
    interactors: AHashMap<InteractorId, Interactor>,
    shapes: AHashMap<ShapeId, CollisionShape>,
    interactable_ids: IdAllocator,
    interactor_ids: IdAllocator,
    shape_ids: IdAllocator,
    /// `None` when the host provides no timing context
    scheduler: Option<Box<dyn Scheduler>>,
    highlighter: Box<dyn Highlighter>,
    config: EngineConfig,
    /// Current nesting of dependency propagation
    cascade_depth: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// World with its own timer queue and no presentation layer
    pub fn new() -> Self {
        Self::with_parts(Some(Box::new(TimerQueue::new())), EngineConfig::default())
    }

    /// World without a scheduling context
    ///
    /// Timer-dependent operations log and return their safe defaults.
    pub fn headless() -> Self {
        Self::with_parts(None, EngineConfig::default())
    }

    fn with_parts(scheduler: Option<Box<dyn Scheduler>>, config: EngineConfig) -> Self {
        Self {
            interactables: AHashMap::new(),
            interactors: AHashMap::new(),
            shapes: AHashMap::new(),
            interactable_ids: IdAllocator::new(),
            interactor_ids: IdAllocator::new(),
            shape_ids: IdAllocator::new(),
            scheduler,
            highlighter: Box::new(NullHighlighter),
            config,
            cascade_depth: 0,
        }
    }

    pub fn with_scheduler(mut self, scheduler: Box<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn with_highlighter(mut self, highlighter: Box<dyn Highlighter>) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn has_scheduler(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Current time of the scheduler, 0 without one
    pub fn now(&self) -> Seconds {
        self.scheduler.as_ref().map_or(0.0, |s| s.now())
    }

    // === Spawning ===

    /// Register an interactable and move it to its default state
    pub fn spawn_interactable(&mut self, owner: ActorId, preset: &InteractableConfig) -> InteractableId {
        let id = InteractableId(self.interactable_ids.allocate());
        let entity = Interactable::new(id, owner, preset, &self.config);
        let default_state = entity.default_state();
        self.interactables.insert(id, entity);

        self.set_interactable_state(id, default_state);
        tracing::debug!(interactable = id.0, name = %preset.name, "Spawned interactable");
        id
    }

    /// Register an interactor and move it to its default state
    pub fn spawn_interactor(&mut self, owner: ActorId, preset: &InteractorConfig) -> InteractorId {
        let id = InteractorId(self.interactor_ids.allocate());
        let entity = Interactor::new(id, owner, preset);
        let default_state = entity.default_state();
        self.interactors.insert(id, entity);

        self.set_interactor_state(id, default_state);
        tracing::debug!(interactor = id.0, name = %preset.name, "Spawned interactor");
        id
    }

    /// Remove an interactable, releasing everything it holds
    ///
    /// Timers are canceled, collision shapes restored, the bound interactor
    /// told the target is gone, and every dependency edge touching the
    /// entity removed (restoring dependents' weights).
    pub fn despawn_interactable(&mut self, id: InteractableId) -> bool {
        if !self.interactables.contains_key(&id) {
            return false;
        }

        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.cancel_owner(id);
        }
        self.release_interactor(id);
        self.unbind_collisions(id);

        let dependents = self
            .interactables
            .get(&id)
            .map(|e| e.dependencies.clone())
            .unwrap_or_default();
        for dependent in dependents {
            self.remove_interactable_dependency(id, dependent);
        }
        let masters: Vec<InteractableId> = self
            .interactables
            .values()
            .filter(|e| e.dependencies.contains(&id))
            .map(|e| e.id)
            .collect();
        for master in masters {
            self.remove_interactable_dependency(master, id);
        }

        self.interactables.remove(&id);
        tracing::debug!(interactable = id.0, "Despawned interactable");
        true
    }

    /// Remove an interactor; every interactable bound to it loses it
    pub fn despawn_interactor(&mut self, id: InteractorId) -> bool {
        if !self.interactors.contains_key(&id) {
            return false;
        }

        for interactable in self.bound_interactables(id) {
            self.interactor_lost(interactable, id);
        }
        for other in self.interactors.values_mut() {
            other.dependencies.retain(|d| *d != id);
        }

        self.interactors.remove(&id);
        tracing::debug!(interactor = id.0, "Despawned interactor");
        true
    }

    // === Lookup ===

    pub fn interactable(&self, id: InteractableId) -> Result<&Interactable> {
        self.interactables
            .get(&id)
            .ok_or(InteractionError::InteractableNotFound(id))
    }

    /// Mutable access for the local setters
    pub fn interactable_mut(&mut self, id: InteractableId) -> Result<&mut Interactable> {
        self.interactables
            .get_mut(&id)
            .ok_or(InteractionError::InteractableNotFound(id))
    }

    pub fn interactor(&self, id: InteractorId) -> Result<&Interactor> {
        self.interactors
            .get(&id)
            .ok_or(InteractionError::InteractorNotFound(id))
    }

    pub fn interactor_mut(&mut self, id: InteractorId) -> Result<&mut Interactor> {
        self.interactors
            .get_mut(&id)
            .ok_or(InteractionError::InteractorNotFound(id))
    }

    pub fn interactable_state(&self, id: InteractableId) -> Option<InteractableState> {
        self.interactables.get(&id).map(|e| e.state)
    }

    pub fn interactor_state(&self, id: InteractorId) -> Option<InteractorState> {
        self.interactors.get(&id).map(|e| e.state)
    }

    /// Handles of every live interactable, ascending
    pub fn interactable_ids(&self) -> Vec<InteractableId> {
        let mut ids: Vec<_> = self.interactables.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn interactor_ids(&self) -> Vec<InteractorId> {
        let mut ids: Vec<_> = self.interactors.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Interactables currently bound to `interactor`, ascending
    pub fn bound_interactables(&self, interactor: InteractorId) -> Vec<InteractableId> {
        let mut ids: Vec<_> = self
            .interactables
            .values()
            .filter(|e| e.interactor == Some(interactor))
            .map(|e| e.id)
            .collect();
        ids.sort();
        ids
    }

    // === Events ===

    pub fn subscribe_interactable<F>(
        &mut self,
        id: InteractableId,
        kind: InteractableEventKind,
        listener: F,
    ) -> Result<ListenerId>
    where
        F: FnMut(&InteractableEvent) + 'static,
    {
        Ok(self.interactable_mut(id)?.events.subscribe(kind, listener))
    }

    pub fn subscribe_interactor<F>(
        &mut self,
        id: InteractorId,
        kind: InteractorEventKind,
        listener: F,
    ) -> Result<ListenerId>
    where
        F: FnMut(&InteractorEvent) + 'static,
    {
        Ok(self.interactor_mut(id)?.events.subscribe(kind, listener))
    }

    pub(crate) fn emit_interactable(&mut self, id: InteractableId, event: InteractableEvent) {
        if let Some(entity) = self.interactables.get_mut(&id) {
            entity.events.emit(&event);
        }
    }

    pub(crate) fn emit_interactor(&mut self, id: InteractorId, event: InteractorEvent) {
        if let Some(entity) = self.interactors.get_mut(&id) {
            entity.events.emit(&event);
        }
    }

    // === Time ===

    /// Advance the scheduler and dispatch every timer that expired
    ///
    /// Returns the expired keys in firing order.
    pub fn advance(&mut self, dt: Seconds) -> Vec<TimerKey> {
        let Some(scheduler) = self.scheduler.as_mut() else {
            tracing::debug!("advance() without a scheduler");
            return Vec::new();
        };
        let fired = scheduler.advance(dt);

        for key in &fired {
            if !self.interactables.contains_key(&key.owner) {
                continue;
            }
            tracing::trace!(interactable = key.owner.0, purpose = ?key.purpose, "Timer fired");
            match key.purpose {
                TimerPurpose::Interaction => self.interaction_completed(key.owner),
                TimerPurpose::ProgressExpiration => self.progress_expired(key.owner),
                TimerPurpose::Cooldown => self.cooldown_completed(key.owner),
            }
        }
        fired
    }

    pub(crate) fn schedule(&mut self, owner: InteractableId, purpose: TimerPurpose, duration: Seconds) -> bool {
        match self.scheduler.as_mut() {
            Some(scheduler) => {
                scheduler.schedule(TimerKey::new(owner, purpose), duration);
                true
            }
            None => false,
        }
    }

    pub(crate) fn cancel_timer(&mut self, owner: InteractableId, purpose: TimerPurpose) {
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.cancel(TimerKey::new(owner, purpose));
        }
    }

    /// Is a timer for `owner` scheduled (paused or not)?
    pub fn timer_exists(&self, owner: InteractableId, purpose: TimerPurpose) -> bool {
        self.scheduler
            .as_ref()
            .is_some_and(|s| s.exists(TimerKey::new(owner, purpose)))
    }

    pub fn timer_active(&self, owner: InteractableId, purpose: TimerPurpose) -> bool {
        self.scheduler
            .as_ref()
            .is_some_and(|s| s.is_active(TimerKey::new(owner, purpose)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_moves_to_default_state() {
        let mut world = World::new();
        let asleep = world.spawn_interactable(
            ActorId::new(),
            &InteractableConfig::default().with_default_state(InteractableState::Asleep),
        );
        let player = world.spawn_interactor(
            ActorId::new(),
            &InteractorConfig::default().with_default_state(InteractorState::Awake),
        );

        assert_eq!(world.interactable_state(asleep), Some(InteractableState::Asleep));
        assert_eq!(world.interactor_state(player), Some(InteractorState::Awake));
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut world = World::new();
        let a = world.spawn_interactable(ActorId::new(), &InteractableConfig::default());
        assert!(world.despawn_interactable(a));
        let b = world.spawn_interactable(ActorId::new(), &InteractableConfig::default());

        assert_ne!(a, b);
        assert!(world.interactable(a).is_err());
        assert!(!world.despawn_interactable(a));
    }

    #[test]
    fn test_headless_world_has_no_time() {
        let mut world = World::headless();
        assert!(!world.has_scheduler());
        assert!(world.advance(1.0).is_empty());
        assert_eq!(world.now(), 0.0);
    }
}
