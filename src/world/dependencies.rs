//! Dependency edges between interactables and between interactors

use super::World;
use crate::core::types::{InteractableId, InteractorId};
use crate::dependency::{clamped_weight, would_form_cycle};
use crate::events::InteractableEvent;
use crate::interactable::InteractableState;
use crate::interactor::InteractorState;

impl World {
    // === Interactables ===

    /// Make `dependent` follow `master`'s state
    ///
    /// Returns false for unknown handles, duplicate edges and edges that
    /// would close a cycle.
    pub fn add_interactable_dependency(&mut self, master: InteractableId, dependent: InteractableId) -> bool {
        let (Some(master_entity), true) = (
            self.interactables.get(&master),
            self.interactables.contains_key(&dependent),
        ) else {
            return false;
        };
        if master_entity.dependencies.contains(&dependent) {
            return false;
        }

        let cyclic = would_form_cycle(master, dependent, |node| {
            self.interactables
                .get(&node)
                .map(|e| e.dependencies.clone())
                .unwrap_or_default()
        });
        if cyclic {
            tracing::warn!(
                master = master.0,
                dependent = dependent.0,
                "Refusing dependency that would form a cycle"
            );
            return false;
        }

        if let Some(entity) = self.interactables.get_mut(&master) {
            entity.dependencies.push(dependent);
            entity
                .events
                .emit(&InteractableEvent::DependencyChanged(dependent));
        }
        self.dependency_started(dependent, master);
        true
    }

    /// Drop the edge and restore the dependent's weight
    pub fn remove_interactable_dependency(&mut self, master: InteractableId, dependent: InteractableId) -> bool {
        let Some(entity) = self.interactables.get_mut(&master) else {
            return false;
        };
        if !entity.dependencies.contains(&dependent) {
            return false;
        }
        entity.dependencies.retain(|d| *d != dependent);
        entity
            .events
            .emit(&InteractableEvent::DependencyChanged(dependent));

        self.dependency_stopped(dependent, master);
        true
    }

    /// Push this interactable's state onto its dependents
    ///
    /// Active or Suppressed masters suppress their dependents. Idle masters
    /// release them to their default state. Finished masters release them
    /// and drop the edge.
    pub fn process_dependencies(&mut self, id: InteractableId) {
        let Some(entity) = self.interactables.get(&id) else {
            return;
        };
        if entity.dependencies.is_empty() {
            return;
        }
        let master_state = entity.state;
        let dependents = entity.dependencies.clone();

        if self.cascade_depth >= self.config.max_cascade_depth {
            tracing::warn!(
                interactable = id.0,
                depth = self.cascade_depth,
                "Dependency cascade too deep, stopping propagation"
            );
            return;
        }
        self.cascade_depth += 1;

        for dependent in dependents {
            let Some(dependent_state) = self.interactable_state(dependent) else {
                continue;
            };

            match master_state {
                InteractableState::Active | InteractableState::Suppressed => {
                    self.dependency_started(dependent, id);
                    if matches!(
                        dependent_state,
                        InteractableState::Active
                            | InteractableState::Awake
                            | InteractableState::Asleep
                            | InteractableState::Cooldown
                    ) {
                        self.set_interactable_state(dependent, InteractableState::Suppressed);
                    }
                }
                InteractableState::Cooldown | InteractableState::Awake | InteractableState::Asleep => {
                    self.dependency_started(dependent, id);
                    if matches!(
                        dependent_state,
                        InteractableState::Awake
                            | InteractableState::Asleep
                            | InteractableState::Suppressed
                    ) {
                        self.release_dependent(dependent);
                    }
                }
                InteractableState::Disabled | InteractableState::Completed => {
                    self.release_dependent(dependent);
                    self.remove_interactable_dependency(id, dependent);
                }
                InteractableState::Paused => {}
            }
        }

        self.cascade_depth -= 1;
    }

    fn release_dependent(&mut self, dependent: InteractableId) {
        if let Some(default_state) = self.interactables.get(&dependent).map(|e| e.default_state()) {
            self.set_interactable_state(dependent, default_state);
        }
    }

    /// `master` started holding `dependent`'s weight down
    fn dependency_started(&mut self, dependent: InteractableId, master: InteractableId) {
        let Some(entity) = self.interactables.get_mut(&dependent) else {
            return;
        };
        if !entity.masters.contains(&master) {
            if entity.masters.is_empty() {
                entity.cached_weight = entity.weight;
            }
            entity.masters.push(master);
        }
        entity
            .events
            .emit(&InteractableEvent::DependencyStarted { master });

        self.refresh_dependency_weight(dependent);
    }

    /// `master` no longer holds `dependent` down; restore once no master is left
    fn dependency_stopped(&mut self, dependent: InteractableId, master: InteractableId) {
        let Some(entity) = self.interactables.get_mut(&dependent) else {
            return;
        };
        if !entity.masters.contains(&master) {
            return;
        }
        entity.masters.retain(|m| *m != master);
        entity
            .events
            .emit(&InteractableEvent::DependencyStopped { master });

        self.refresh_dependency_weight(dependent);
    }

    /// Recompute an interactable's effective weight from its masters
    pub(crate) fn refresh_dependency_weight(&mut self, id: InteractableId) {
        let Some(entity) = self.interactables.get(&id) else {
            return;
        };
        let base = entity.cached_weight;
        let master_weights: Vec<i32> = entity
            .masters
            .iter()
            .filter_map(|m| self.interactables.get(m).map(|e| e.weight))
            .collect();
        let target = clamped_weight(base, master_weights);

        if let Some(entity) = self.interactables.get_mut(&id) {
            if entity.weight != target {
                entity.weight = target;
                entity.events.emit(&InteractableEvent::WeightChanged(target));
            }
        }
    }

    // === Interactors ===

    /// Make `dependent` follow `master`; refused for cycles and duplicates
    pub fn add_interactor_dependency(&mut self, master: InteractorId, dependent: InteractorId) -> bool {
        let (Some(master_entity), true) = (
            self.interactors.get(&master),
            self.interactors.contains_key(&dependent),
        ) else {
            return false;
        };
        if master_entity.dependencies.contains(&dependent) {
            return false;
        }

        let cyclic = would_form_cycle(master, dependent, |node| {
            self.interactors
                .get(&node)
                .map(|e| e.dependencies.clone())
                .unwrap_or_default()
        });
        if cyclic {
            tracing::warn!(
                master = master.0,
                dependent = dependent.0,
                "Refusing interactor dependency that would form a cycle"
            );
            return false;
        }

        if let Some(entity) = self.interactors.get_mut(&master) {
            entity.dependencies.push(dependent);
        }
        true
    }

    pub fn remove_interactor_dependency(&mut self, master: InteractorId, dependent: InteractorId) -> bool {
        let Some(entity) = self.interactors.get_mut(&master) else {
            return false;
        };
        let before = entity.dependencies.len();
        entity.dependencies.retain(|d| *d != dependent);
        entity.dependencies.len() != before
    }

    /// Push this interactor's state onto its dependents
    ///
    /// Only runs when called; interactor transitions never trigger it.
    pub fn process_interactor_dependencies(&mut self, id: InteractorId) {
        let Some(entity) = self.interactors.get(&id) else {
            return;
        };
        let master_state = entity.state;
        let dependents = entity.dependencies.clone();

        for dependent in dependents {
            match master_state {
                InteractorState::Active | InteractorState::Suppressed => {
                    self.set_interactor_state(dependent, InteractorState::Suppressed);
                }
                InteractorState::Disabled | InteractorState::Awake | InteractorState::Asleep => {
                    self.set_interactor_state(dependent, InteractorState::Awake);
                    self.remove_interactor_dependency(id, dependent);
                }
            }
        }
    }
}
