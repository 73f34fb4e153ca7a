//! Interactable states and the legal-transition table
//!
//! Every (current, requested) pair maps to either `None` (the request is a
//! no-op) or a [`Transition`] listing the side effects to run around the
//! state commit. The table is the single source of truth for `set_state`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InteractableState {
    #[default]
    Awake,
    Asleep,
    Active,
    Paused,
    Cooldown,
    Suppressed,
    Completed,
    Disabled,
}

impl InteractableState {
    pub const ALL: [InteractableState; 8] = [
        InteractableState::Awake,
        InteractableState::Asleep,
        InteractableState::Active,
        InteractableState::Paused,
        InteractableState::Cooldown,
        InteractableState::Suppressed,
        InteractableState::Completed,
        InteractableState::Disabled,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, InteractableState::Completed | InteractableState::Disabled)
    }

    /// Can an interactor select this interactable right now?
    pub fn can_be_triggered(&self) -> bool {
        matches!(
            self,
            InteractableState::Awake | InteractableState::Active | InteractableState::Paused
        )
    }

    /// States an interactable may rest in between interactions
    pub fn is_valid_default(&self) -> bool {
        !matches!(
            self,
            InteractableState::Active | InteractableState::Completed | InteractableState::Cooldown
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            InteractableState::Awake => "Awake",
            InteractableState::Asleep => "Asleep",
            InteractableState::Active => "Active",
            InteractableState::Paused => "Paused",
            InteractableState::Cooldown => "Cooldown",
            InteractableState::Suppressed => "Suppressed",
            InteractableState::Completed => "Completed",
            InteractableState::Disabled => "Disabled",
        }
    }
}

/// A side effect of an allowed transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionEffect {
    /// Broadcast interaction-canceled
    CancelInteraction,
    StopHighlight,
    /// Bind every collision shape again
    RebindCollisions,
    /// Restore every collision shape to its pre-bind configuration
    UnbindCollisions,
    /// Cancel every timer the interactable owns
    ClearTimers,
    /// Cancel the progress and progress-expiration timers
    ClearProgressTimers,
    ClearCooldownTimer,
    /// Drop the bound interactor and tell it the interactable is gone
    ReleaseInteractor,
    /// Remove every collision shape and highlightable mesh
    ReleaseSurfaces,
}

use TransitionEffect::*;

/// Effects of one allowed transition
///
/// `pre` runs before the new state is committed, `post` after the
/// state-changed broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub pre: &'static [TransitionEffect],
    pub post: &'static [TransitionEffect],
}

const PLAIN: Transition = Transition { pre: &[], post: &[] };

const SHUTDOWN: Transition = Transition {
    pre: &[],
    post: &[StopHighlight, ClearTimers, ReleaseInteractor, UnbindCollisions],
};

/// Look up the transition from `from` to `to`; `None` means not allowed
pub fn transition(from: InteractableState, to: InteractableState) -> Option<Transition> {
    use InteractableState::*;

    match (to, from) {
        (Active, Awake | Paused) => Some(PLAIN),

        (Awake, Active | Paused) => Some(Transition {
            pre: &[],
            post: &[ClearProgressTimers, RebindCollisions],
        }),
        (Awake, Asleep | Suppressed | Cooldown | Disabled) => Some(Transition {
            pre: &[],
            post: &[RebindCollisions],
        }),

        (Asleep, Active | Paused | Awake | Suppressed | Cooldown | Disabled) => Some(SHUTDOWN),

        (Cooldown, Awake | Active) => Some(Transition {
            pre: &[],
            post: &[StopHighlight],
        }),
        (Cooldown, Suppressed | Disabled) => Some(SHUTDOWN),

        (Completed, Active) => Some(Transition {
            pre: &[],
            post: &[StopHighlight, ClearTimers, ReleaseInteractor, ReleaseSurfaces],
        }),

        (Disabled, Awake | Asleep | Active | Paused | Cooldown | Suppressed | Completed) => {
            Some(SHUTDOWN)
        }

        (Suppressed, Active | Paused) => Some(Transition {
            pre: &[CancelInteraction],
            post: &[StopHighlight, ClearProgressTimers],
        }),
        (Suppressed, Awake | Asleep | Disabled) => Some(Transition {
            pre: &[CancelInteraction],
            post: &[StopHighlight],
        }),
        (Suppressed, Cooldown) => Some(Transition {
            pre: &[CancelInteraction],
            post: &[StopHighlight, ClearCooldownTimer],
        }),

        (Paused, Active) => Some(PLAIN),

        _ => None,
    }
}

pub fn is_allowed(from: InteractableState, to: InteractableState) -> bool {
    transition(from, to).is_some()
}

#[cfg(test)]
mod tests {
    use super::TransitionEffect::*;
    use super::*;
    use InteractableState::*;

    #[test]
    fn test_self_transitions_are_never_allowed() {
        for state in InteractableState::ALL {
            assert!(!is_allowed(state, state), "{:?} -> itself", state);
        }
    }

    #[test]
    fn test_completed_only_from_active() {
        for from in InteractableState::ALL {
            assert_eq!(is_allowed(from, Completed), from == Active, "{:?}", from);
        }
    }

    #[test]
    fn test_completed_is_terminal_except_disable() {
        for to in InteractableState::ALL {
            assert_eq!(is_allowed(Completed, to), to == Disabled, "{:?}", to);
        }
    }

    #[test]
    fn test_active_requires_awake_or_paused() {
        let sources: Vec<_> = InteractableState::ALL
            .into_iter()
            .filter(|s| is_allowed(*s, Active))
            .collect();
        assert_eq!(sources, vec![Awake, Paused]);
    }

    #[test]
    fn test_suppression_cancels_before_commit() {
        for from in [Active, Awake, Asleep, Disabled, Paused, Cooldown] {
            let t = transition(from, Suppressed).unwrap();
            assert_eq!(t.pre, &[CancelInteraction]);
            assert!(t.post.contains(&StopHighlight));
        }
        assert!(transition(Cooldown, Suppressed)
            .unwrap()
            .post
            .contains(&ClearCooldownTimer));
        assert!(transition(Active, Suppressed)
            .unwrap()
            .post
            .contains(&ClearProgressTimers));
    }

    #[test]
    fn test_shutdown_states_clear_timers() {
        for (from, to) in [(Awake, Asleep), (Active, Disabled), (Suppressed, Cooldown)] {
            let t = transition(from, to).unwrap();
            assert!(t.post.contains(&ClearTimers));
            assert!(t.post.contains(&UnbindCollisions));
        }
        // Cooldown entered from a live interaction keeps the interactor bound
        assert!(!transition(Active, Cooldown).unwrap().post.contains(&ClearTimers));
    }

    #[test]
    fn test_valid_defaults() {
        let valid: Vec<_> = InteractableState::ALL
            .into_iter()
            .filter(InteractableState::is_valid_default)
            .collect();
        assert_eq!(valid, vec![Awake, Asleep, Paused, Suppressed, Disabled]);
    }
}
