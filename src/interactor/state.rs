//! Interactor states and transitions

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InteractorState {
    #[default]
    Asleep,
    Awake,
    Active,
    Suppressed,
    Disabled,
}

impl InteractorState {
    pub const ALL: [InteractorState; 5] = [
        InteractorState::Asleep,
        InteractorState::Awake,
        InteractorState::Active,
        InteractorState::Suppressed,
        InteractorState::Disabled,
    ];

    /// Can this interactor detect and drive interactions?
    pub fn can_interact(&self) -> bool {
        matches!(self, InteractorState::Active | InteractorState::Awake)
    }

    /// Can this interactor evaluate candidates?
    pub fn is_valid(&self) -> bool {
        matches!(
            self,
            InteractorState::Awake | InteractorState::Asleep | InteractorState::Active
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            InteractorState::Asleep => "Asleep",
            InteractorState::Awake => "Awake",
            InteractorState::Active => "Active",
            InteractorState::Suppressed => "Suppressed",
            InteractorState::Disabled => "Disabled",
        }
    }
}

/// Is `from -> to` a legal interactor transition?
pub fn is_allowed(from: InteractorState, to: InteractorState) -> bool {
    use InteractorState::*;

    match (to, from) {
        (Awake, Asleep | Disabled | Suppressed | Active) => true,
        (Asleep, Awake | Suppressed | Active | Disabled) => true,
        (Suppressed, Awake | Asleep | Active) => true,
        (Active, Awake) => true,
        (Disabled, Asleep | Awake | Active | Suppressed) => true,
        _ => false,
    }
}
