use serde::{Deserialize, Serialize};

use crate::core::types::{InteractableId, Seconds};

/// What a timer is counting down to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerPurpose {
    /// Progress of the current interaction; expiry completes it
    Interaction,
    /// Grace window while paused; expiry discards progress
    ProgressExpiration,
    /// Cooldown between cycles; expiry makes the interactable available again
    Cooldown,
}

/// One timer slot: at most one timer per owner and purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerKey {
    pub owner: InteractableId,
    pub purpose: TimerPurpose,
}

impl TimerKey {
    pub fn new(owner: InteractableId, purpose: TimerPurpose) -> Self {
        Self { owner, purpose }
    }
}

/// Scheduled, cancelable, single-fire timers
///
/// Expired keys are handed back from [`Scheduler::advance`] and dispatched
/// by the world, so implementations never call back into entity code.
pub trait Scheduler {
    /// Start (or restart) the timer for `key`; negative durations count as 0
    fn schedule(&mut self, key: TimerKey, duration: Seconds);

    /// Stop the timer; inactive keys are a no-op
    fn cancel(&mut self, key: TimerKey);

    /// Stop every timer belonging to `owner`
    fn cancel_owner(&mut self, owner: InteractableId);

    /// Freeze the timer, keeping its elapsed time
    fn pause(&mut self, key: TimerKey);

    fn resume(&mut self, key: TimerKey);

    /// Scheduled and not paused
    fn is_active(&self, key: TimerKey) -> bool;

    /// Scheduled, paused or not
    fn exists(&self, key: TimerKey) -> bool;

    /// Seconds elapsed on the timer, or 0 when it does not exist
    fn elapsed(&self, key: TimerKey) -> Seconds;

    /// Current clock reading
    fn now(&self) -> Seconds;

    /// Move the clock forward and return the keys that fired, earliest first
    fn advance(&mut self, dt: Seconds) -> Vec<TimerKey>;
}
