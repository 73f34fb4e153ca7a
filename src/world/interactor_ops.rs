//! Interactor state machine, arbitration and interaction requests

use super::World;
use crate::core::types::{InteractableId, InteractorId, RequestOutcome};
use crate::events::InteractorEvent;
use crate::interactor::{arbitrate, state, Arbitration, Contender, InteractorState};

impl World {
    /// Request an interactor transition; disallowed requests are ignored
    ///
    /// Interactor dependencies are not propagated here, see
    /// [`World::process_interactor_dependencies`].
    pub fn set_interactor_state(&mut self, id: InteractorId, requested: InteractorState) {
        let Some(entity) = self.interactors.get_mut(&id) else {
            return;
        };
        let current = entity.state;
        if !state::is_allowed(current, requested) {
            return;
        }

        entity.state = requested;
        entity.events.emit(&InteractorEvent::StateChanged(requested));
        tracing::debug!(
            interactor = id.0,
            from = current.label(),
            to = requested.label(),
            "Interactor state changed"
        );
    }

    fn interactor_request(&mut self, id: InteractorId, target: InteractorState, verb: &str) -> RequestOutcome {
        let Some(before) = self.interactor_state(id) else {
            return RequestOutcome::rejected(format!("Interactor {} does not exist", id.0));
        };
        if before == target {
            return RequestOutcome::rejected(format!("Interactor is already {}", target.label()));
        }

        self.set_interactor_state(id, target);

        if self.interactor_state(id) == Some(target) {
            RequestOutcome::accepted(format!("Interactor has been {}", verb))
        } else {
            RequestOutcome::rejected(format!(
                "Interactor cannot be {} from {}",
                verb,
                before.label()
            ))
        }
    }

    pub fn activate_interactor(&mut self, id: InteractorId) -> RequestOutcome {
        self.interactor_request(id, InteractorState::Active, "Activated")
    }

    pub fn wake_up_interactor(&mut self, id: InteractorId) -> RequestOutcome {
        self.interactor_request(id, InteractorState::Awake, "Awakened")
    }

    pub fn snooze_interactor(&mut self, id: InteractorId) -> RequestOutcome {
        self.interactor_request(id, InteractorState::Asleep, "Snoozed")
    }

    pub fn suppress_interactor(&mut self, id: InteractorId) -> RequestOutcome {
        self.interactor_request(id, InteractorState::Suppressed, "Suppressed")
    }

    pub fn deactivate_interactor(&mut self, id: InteractorId) -> RequestOutcome {
        self.interactor_request(id, InteractorState::Disabled, "Deactivated")
    }

    // === Arbitration ===

    fn contender(&self, id: Option<InteractableId>) -> Option<Contender> {
        let id = id?;
        self.interactables
            .get(&id)
            .map(|e| Contender::new(id, e.weight()))
    }

    /// Weigh `candidate` against the current target
    ///
    /// `None` means the current target is gone; a handle to a despawned
    /// interactable is ignored. A selection is broadcast once and every
    /// interactable bound to this interactor is told who won.
    pub fn evaluate_interactable(&mut self, id: InteractorId, candidate: Option<InteractableId>) {
        let Some(entity) = self.interactors.get(&id) else {
            return;
        };
        if !entity.is_valid() {
            return;
        }
        let active = self.contender(entity.active_interactable);
        let candidate = match candidate {
            Some(handle) => match self.contender(Some(handle)) {
                Some(contender) => Some(contender),
                // Stale handle: nothing to weigh
                None => return,
            },
            None => None,
        };

        match arbitrate(active, candidate) {
            Arbitration::Adopt(winner) => self.select_interactable(id, winner),
            Arbitration::Release(lost) => self.interactable_lost(id, lost),
            Arbitration::Keep | Arbitration::Idle => {}
        }
    }

    fn select_interactable(&mut self, id: InteractorId, winner: InteractableId) {
        if let Some(entity) = self.interactors.get_mut(&id) {
            entity.active_interactable = Some(winner);
            entity
                .events
                .emit(&InteractorEvent::InteractableSelected(winner));
        }
        tracing::debug!(interactor = id.0, interactable = winner.0, "Interactable selected");

        for bound in self.bound_interactables(id) {
            self.interactable_selected(bound, winner, id);
        }
    }

    /// An interactable was detected
    ///
    /// Dependent interactors are suppressed before arbitration runs.
    pub fn interactable_found(&mut self, id: InteractorId, found: InteractableId) {
        let Some(entity) = self.interactors.get(&id) else {
            return;
        };
        for dependency in entity.dependencies.clone() {
            self.set_interactor_state(dependency, InteractorState::Suppressed);
        }

        self.evaluate_interactable(id, Some(found));
        self.emit_interactor(id, InteractorEvent::InteractableFound(found));
    }

    /// An interactable is no longer available
    ///
    /// Only the active target matters: the interactor returns to Awake and
    /// its dependents take on its state again.
    pub fn interactable_lost(&mut self, id: InteractorId, lost: InteractableId) {
        let Some(entity) = self.interactors.get(&id) else {
            return;
        };

        if entity.active_interactable == Some(lost) {
            self.set_interactor_state(id, InteractorState::Awake);

            let Some(entity) = self.interactors.get_mut(&id) else {
                return;
            };
            entity.active_interactable = None;
            let restored = entity.state;
            for dependency in entity.dependencies.clone() {
                self.set_interactor_state(dependency, restored);
            }
        }

        self.emit_interactor(id, InteractorEvent::InteractableLost(lost));
    }

    // === Interaction requests ===

    /// Start interacting with the active target
    pub fn start_interaction(&mut self, id: InteractorId) -> bool {
        let Some((target, time)) = self.interaction_target(id) else {
            return false;
        };
        self.emit_interactor(id, InteractorEvent::InteractionRequested { time });
        self.interaction_started(target, id);
        true
    }

    /// Release the interaction with the active target
    pub fn stop_interaction(&mut self, id: InteractorId) -> bool {
        let Some((target, time)) = self.interaction_target(id) else {
            return false;
        };
        self.emit_interactor(id, InteractorEvent::InteractionReleased { time });
        self.interaction_stopped(target);
        true
    }

    fn interaction_target(&self, id: InteractorId) -> Option<(InteractableId, f32)> {
        let entity = self.interactors.get(&id)?;
        if !entity.can_interact() {
            return None;
        }
        entity.active_interactable.map(|target| (target, self.now()))
    }
}
