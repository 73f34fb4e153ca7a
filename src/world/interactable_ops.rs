//! Interactable state machine, requests and interaction flow

use super::World;
use crate::core::types::{InteractableId, InteractorId, RequestOutcome, Seconds};
use crate::events::InteractableEvent;
use crate::interactable::{clamp_weight, state, InteractableState, LifecycleMode, TransitionEffect};
use crate::timing::{TimerKey, TimerPurpose};

impl World {
    // === State machine ===

    /// Request a transition
    ///
    /// Disallowed requests leave the state untouched. Dependency propagation
    /// runs afterwards either way.
    pub fn set_interactable_state(&mut self, id: InteractableId, requested: InteractableState) {
        let Some(current) = self.interactable_state(id) else {
            return;
        };

        if let Some(transition) = state::transition(current, requested) {
            for effect in transition.pre {
                self.apply_effect(id, *effect);
            }

            if let Some(entity) = self.interactables.get_mut(&id) {
                entity.state = requested;
                entity
                    .events
                    .emit(&InteractableEvent::StateChanged(requested));
            }
            tracing::debug!(
                interactable = id.0,
                from = current.label(),
                to = requested.label(),
                "Interactable state changed"
            );

            for effect in transition.post {
                self.apply_effect(id, *effect);
            }
        } else {
            tracing::trace!(
                interactable = id.0,
                from = current.label(),
                to = requested.label(),
                "Transition not allowed"
            );
        }

        self.process_dependencies(id);
    }

    fn apply_effect(&mut self, id: InteractableId, effect: TransitionEffect) {
        match effect {
            TransitionEffect::CancelInteraction => {
                self.emit_interactable(id, InteractableEvent::InteractionCanceled)
            }
            TransitionEffect::StopHighlight => self.stop_highlight(id),
            TransitionEffect::RebindCollisions => self.bind_collisions(id),
            TransitionEffect::UnbindCollisions => self.unbind_collisions(id),
            TransitionEffect::ClearTimers => {
                if let Some(scheduler) = self.scheduler.as_mut() {
                    scheduler.cancel_owner(id);
                }
            }
            TransitionEffect::ClearProgressTimers => self.clear_progress_timers(id),
            TransitionEffect::ClearCooldownTimer => self.cancel_timer(id, TimerPurpose::Cooldown),
            TransitionEffect::ReleaseInteractor => self.release_interactor(id),
            TransitionEffect::ReleaseSurfaces => self.release_surfaces(id),
        }
    }

    fn clear_progress_timers(&mut self, id: InteractableId) {
        self.cancel_timer(id, TimerPurpose::Interaction);
        self.cancel_timer(id, TimerPurpose::ProgressExpiration);
    }

    fn default_state_of(&self, id: InteractableId) -> Option<InteractableState> {
        self.interactables.get(&id).map(|e| e.default_state())
    }

    fn return_to_default(&mut self, id: InteractableId) {
        if let Some(default_state) = self.default_state_of(id) {
            self.set_interactable_state(id, default_state);
        }
    }

    /// Unbind the interactor and tell it this interactable is gone
    ///
    /// The interactable's own state is left alone.
    pub(crate) fn release_interactor(&mut self, id: InteractableId) {
        let Some(interactor) = self
            .interactables
            .get_mut(&id)
            .and_then(|e| e.interactor.take())
        else {
            return;
        };

        self.set_widget_visible(id, false);
        self.emit_interactable(id, InteractableEvent::InteractorChanged(None));
        self.emit_interactable(id, InteractableEvent::InteractorLost(interactor));
        self.interactable_lost(interactor, id);
    }

    // === Named requests ===

    fn request(
        &mut self,
        id: InteractableId,
        target: InteractableState,
        verb: &str,
    ) -> RequestOutcome {
        let Some(before) = self.interactable_state(id) else {
            return RequestOutcome::rejected(format!("Interactable {} does not exist", id.0));
        };

        if before == target {
            return RequestOutcome::rejected(format!(
                "Interactable is already {}",
                target.label()
            ));
        }

        self.set_interactable_state(id, target);

        if self.interactable_state(id) == Some(target) {
            RequestOutcome::accepted(format!("Interactable has been {}", verb))
        } else {
            RequestOutcome::rejected(format!(
                "Interactable cannot be {} from {}",
                verb,
                before.label()
            ))
        }
    }

    pub fn activate_interactable(&mut self, id: InteractableId) -> RequestOutcome {
        self.request(id, InteractableState::Active, "Activated")
    }

    pub fn wake_up_interactable(&mut self, id: InteractableId) -> RequestOutcome {
        self.request(id, InteractableState::Awake, "Awakened")
    }

    pub fn snooze_interactable(&mut self, id: InteractableId) -> RequestOutcome {
        self.request(id, InteractableState::Asleep, "Snoozed")
    }

    pub fn suppress_interactable(&mut self, id: InteractableId) -> RequestOutcome {
        self.request(id, InteractableState::Suppressed, "Suppressed")
    }

    pub fn complete_interactable(&mut self, id: InteractableId) -> RequestOutcome {
        self.request(id, InteractableState::Completed, "Completed")
    }

    /// Disable unconditionally (except when already disabled)
    pub fn deactivate_interactable(&mut self, id: InteractableId) -> RequestOutcome {
        self.request(id, InteractableState::Disabled, "Deactivated")
    }

    // === Attributes ===

    /// Set the arbitration weight
    ///
    /// While masters hold the interactable down the new value is remembered
    /// and the clamp reapplied. Dependents are re-clamped against the new
    /// weight.
    pub fn set_interactable_weight(&mut self, id: InteractableId, weight: i32) {
        let weight = clamp_weight(weight);
        let Some(entity) = self.interactables.get_mut(&id) else {
            return;
        };
        if entity.masters.is_empty() {
            entity.weight = weight;
            entity.cached_weight = weight;
            entity.events.emit(&InteractableEvent::WeightChanged(weight));
        } else {
            entity.cached_weight = weight;
            self.refresh_dependency_weight(id);
        }

        let dependents = self
            .interactables
            .get(&id)
            .map(|e| e.dependencies.clone())
            .unwrap_or_default();
        for dependent in dependents {
            self.refresh_dependency_weight(dependent);
        }
    }

    // === Interactor binding ===

    /// An interactor detected this interactable
    ///
    /// Binds it when the interactable can be triggered and is not held by
    /// another interactor, then lets the interactor evaluate it.
    pub fn interactor_found(&mut self, id: InteractableId, interactor: InteractorId) {
        let Some(entity) = self.interactables.get(&id) else {
            return;
        };
        if !entity.can_be_triggered() || !self.interactors.contains_key(&interactor) {
            return;
        }
        // Already engaged by someone else
        if entity
            .interactor
            .is_some_and(|bound| bound != interactor && self.interactors.contains_key(&bound))
        {
            return;
        }

        self.set_widget_visible(id, true);
        if let Some(entity) = self.interactables.get_mut(&id) {
            entity.interactor = Some(interactor);
            entity
                .events
                .emit(&InteractableEvent::InteractorChanged(Some(interactor)));
        }
        self.interactable_found(interactor, id);
        self.emit_interactable(id, InteractableEvent::InteractorFound(interactor));
    }

    /// The bound interactor stopped detecting this interactable
    ///
    /// Ignored for any interactor other than the bound one.
    pub fn interactor_lost(&mut self, id: InteractableId, interactor: InteractorId) {
        let Some(entity) = self.interactables.get(&id) else {
            return;
        };
        if entity.interactor != Some(interactor) {
            return;
        }
        let current = entity.state;

        self.clear_progress_timers(id);
        self.set_widget_visible(id, false);

        match current {
            InteractableState::Asleep
            | InteractableState::Suppressed
            | InteractableState::Awake
            | InteractableState::Active
            | InteractableState::Paused => self.return_to_default(id),
            InteractableState::Cooldown
            | InteractableState::Completed
            | InteractableState::Disabled => {}
        }

        // The transition above may already have released the binding
        let still_bound = self
            .interactables
            .get(&id)
            .is_some_and(|e| e.interactor == Some(interactor));
        if still_bound {
            self.stop_highlight(id);
            self.release_interactor(id);
        }
        self.emit_interactable(id, InteractableEvent::InteractionCanceled);
    }

    /// The bound interactor picked `selected` in its arbitration
    pub(crate) fn interactable_selected(
        &mut self,
        id: InteractableId,
        selected: InteractableId,
        interactor: InteractorId,
    ) {
        if id == selected {
            self.start_highlight(id);
            self.set_interactable_state(id, InteractableState::Active);
            self.emit_interactable(id, InteractableEvent::Selected(interactor));
            return;
        }

        self.emit_interactable(id, InteractableEvent::InteractionCanceled);
        self.stop_highlight(id);
        self.return_to_default(id);
        // Drop the binding without notifying; the interactor already moved on
        if let Some(entity) = self.interactables.get_mut(&id) {
            if entity.interactor.take().is_some() {
                entity
                    .events
                    .emit(&InteractableEvent::InteractorChanged(None));
                entity
                    .events
                    .emit(&InteractableEvent::InteractorLost(interactor));
            }
        }
        self.set_widget_visible(id, false);
    }

    // === Interaction flow ===

    /// The interactor started interacting; starts the progress timer
    pub fn interaction_started(&mut self, id: InteractableId, interactor: InteractorId) {
        let Some(entity) = self.interactables.get(&id) else {
            return;
        };
        if !entity.can_interact() {
            tracing::debug!(interactable = id.0, state = entity.state.label(), "Cannot start interaction");
            return;
        }
        let period = entity.interaction_period();
        let has_timer = entity.has_progress_timer();
        let resuming = entity.state == InteractableState::Paused;

        self.cancel_timer(id, TimerPurpose::ProgressExpiration);
        self.set_interactable_state(id, InteractableState::Active);

        if has_timer {
            if resuming && self.timer_exists(id, TimerPurpose::Interaction) {
                if let Some(scheduler) = self.scheduler.as_mut() {
                    scheduler.resume(TimerKey::new(id, TimerPurpose::Interaction));
                }
            } else if !self.schedule(id, TimerPurpose::Interaction, period) {
                tracing::warn!(interactable = id.0, "No scheduler, interaction progress will not run");
            }
        }

        let time = self.now();
        self.emit_interactable(id, InteractableEvent::InteractionStarted { time, interactor });
    }

    /// The interactor released the interaction before it completed
    ///
    /// Persistent interactables pause and keep progress; others cancel.
    pub fn interaction_stopped(&mut self, id: InteractableId) {
        if !self.has_scheduler() {
            tracing::debug!(interactable = id.0, "interaction_stopped() without a scheduler");
            return;
        }
        let Some(entity) = self.interactables.get(&id) else {
            return;
        };
        if entity.can_persist() {
            self.pause_interaction(id);
        } else {
            self.interaction_canceled(id);
        }
    }

    /// Pause the running interaction
    ///
    /// Persistent interactables freeze their progress timer and get a grace
    /// window; others discard progress at once.
    pub fn pause_interaction(&mut self, id: InteractableId) {
        if !self.has_scheduler() {
            tracing::debug!(interactable = id.0, "pause_interaction() without a scheduler");
            return;
        }
        self.set_interactable_state(id, InteractableState::Paused);

        let Some(entity) = self.interactables.get(&id) else {
            return;
        };
        if entity.state != InteractableState::Paused {
            return;
        }

        if entity.can_persist() {
            let expiration = entity
                .progress_expiration()
                .max(self.config.min_progress_expiration);
            if let Some(scheduler) = self.scheduler.as_mut() {
                scheduler.pause(TimerKey::new(id, TimerPurpose::Interaction));
            }
            self.schedule(id, TimerPurpose::ProgressExpiration, expiration);
        } else {
            self.progress_expired(id);
        }
    }

    /// Grace window ran out while paused; progress is discarded
    pub(crate) fn progress_expired(&mut self, id: InteractableId) {
        let Some(entity) = self.interactables.get(&id) else {
            return;
        };
        if entity.state != InteractableState::Paused {
            return;
        }
        let interactor = entity.interactor;

        self.clear_progress_timers(id);

        let still_targeted = interactor
            .and_then(|i| self.interactors.get(&i))
            .is_some_and(|i| i.active_interactable == Some(id));
        if still_targeted {
            self.set_interactable_state(id, InteractableState::Active);
        } else {
            let time = self.now();
            self.emit_interactable(id, InteractableEvent::InteractionStopped { time, interactor });
            self.return_to_default(id);
        }
    }

    /// Abort the interaction and return to the default state
    pub fn interaction_canceled(&mut self, id: InteractableId) {
        let Some(entity) = self.interactables.get(&id) else {
            return;
        };
        if !entity.can_interact() {
            return;
        }

        self.set_widget_visible(id, false);
        self.clear_progress_timers(id);
        self.return_to_default(id);
        self.emit_interactable(id, InteractableEvent::InteractionCanceled);
    }

    /// The progress timer ran out
    ///
    /// Cycled interactables try to enter cooldown; when no cycles remain
    /// (or the interactable is one-shot) it completes for good.
    pub(crate) fn interaction_completed(&mut self, id: InteractableId) {
        let Some(entity) = self.interactables.get(&id) else {
            return;
        };
        if entity.state != InteractableState::Active {
            return;
        }
        let interactor = entity.interactor;
        let mode = entity.lifecycle_mode();
        let time = self.now();

        self.set_widget_visible(id, false);

        if mode == LifecycleMode::Cycled && self.trigger_cooldown(id) {
            return;
        }

        let outcome = self.complete_interactable(id);
        if outcome.accepted {
            self.emit_interactable(id, InteractableEvent::InteractionCompleted { time, interactor });
            self.emit_interactable(id, InteractableEvent::LifecycleCompleted);
            tracing::info!(interactable = id.0, "Lifecycle completed");
        } else {
            tracing::debug!(interactable = id.0, reason = %outcome.reason, "Completion refused");
        }
    }

    /// Finish the interaction early, as if its progress timer expired
    pub fn finish_interaction(&mut self, id: InteractableId) {
        let Some(entity) = self.interactables.get(&id) else {
            return;
        };
        if entity.state != InteractableState::Active {
            return;
        }
        self.cancel_timer(id, TimerPurpose::Interaction);
        self.interaction_completed(id);
    }

    // === Lifecycle ===

    /// Spend one cycle and, if any remain, request Cooldown
    ///
    /// Returns false without a scheduler or once the last cycle is spent.
    /// Otherwise the cooldown timer is scheduled, shapes are unbound and true
    /// is returned even when the current state refuses Cooldown (for example
    /// Asleep or Completed); check the state to know whether it was entered.
    pub fn trigger_cooldown(&mut self, id: InteractableId) -> bool {
        let Some(entity) = self.interactables.get_mut(&id) else {
            return false;
        };
        let has_remaining = entity.lifecycle.consume();
        let remaining = entity.lifecycle.remaining();
        let cooldown = entity.cooldown_period();
        let interactor = entity.interactor;

        if !self.has_scheduler() {
            tracing::debug!(interactable = id.0, "trigger_cooldown() without a scheduler");
            return false;
        }
        if !has_remaining {
            return false;
        }

        self.set_interactable_state(id, InteractableState::Cooldown);
        self.schedule(id, TimerPurpose::Cooldown, cooldown);
        self.unbind_collisions(id);

        let time = self.now();
        self.emit_interactable(
            id,
            InteractableEvent::CycleCompleted {
                time,
                remaining,
                interactor,
            },
        );
        tracing::debug!(interactable = id.0, remaining, "Cycle completed, cooling down");
        true
    }

    /// The cooldown timer ran out; the interactable becomes available again
    pub(crate) fn cooldown_completed(&mut self, id: InteractableId) {
        if self.interactable_state(id) != Some(InteractableState::Cooldown) {
            return;
        }
        self.bind_collisions(id);
        self.emit_interactable(id, InteractableEvent::CooldownCompleted);

        let interactor = self.interactables.get(&id).and_then(|e| e.interactor);
        let still_targeted = interactor
            .and_then(|i| self.interactors.get(&i))
            .is_some_and(|i| i.active_interactable == Some(id));

        if still_targeted {
            self.start_highlight(id);
            self.return_to_default(id);
            self.set_interactable_state(id, InteractableState::Active);
        } else {
            self.stop_highlight(id);
            self.return_to_default(id);
        }
    }

    // === Progress ===

    /// Fraction of the current interaction's progress timer that has elapsed
    ///
    /// -1 without a scheduler; 0 when no progress timer is running.
    pub fn interaction_progress(&self, id: InteractableId) -> f32 {
        let Some(scheduler) = self.scheduler.as_ref() else {
            return -1.0;
        };
        let Some(entity) = self.interactables.get(&id) else {
            return 0.0;
        };
        let key = TimerKey::new(id, TimerPurpose::Interaction);
        if !entity.has_progress_timer() || !scheduler.exists(key) {
            return 0.0;
        }
        let elapsed: Seconds = scheduler.elapsed(key);
        (elapsed / entity.interaction_period()).clamp(0.0, 1.0)
    }
}
