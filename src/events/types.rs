//! Event payloads broadcast by interactables and interactors

use serde::{Deserialize, Serialize};

use super::registry::Event;
use crate::core::types::{
    ActorId, CollisionChannel, InteractableId, InteractorId, MeshId, Seconds, ShapeId,
};
use crate::interactable::lifecycle::LifecycleMode;
use crate::interactable::state::InteractableState;
use crate::interactor::state::InteractorState;

/// Notifications broadcast by an interactable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InteractableEvent {
    StateChanged(InteractableState),
    WeightChanged(i32),
    InteractorFound(InteractorId),
    InteractorLost(InteractorId),
    InteractorChanged(Option<InteractorId>),
    /// This interactable won its interactor's arbitration
    Selected(InteractorId),
    InteractionStarted {
        time: Seconds,
        interactor: InteractorId,
    },
    InteractionStopped {
        time: Seconds,
        interactor: Option<InteractorId>,
    },
    InteractionCanceled,
    InteractionCompleted {
        time: Seconds,
        interactor: Option<InteractorId>,
    },
    CycleCompleted {
        time: Seconds,
        remaining: i32,
        interactor: Option<InteractorId>,
    },
    LifecycleCompleted,
    CooldownCompleted,
    DependencyChanged(InteractableId),
    DependencyStarted { master: InteractableId },
    DependencyStopped { master: InteractableId },
    CollisionShapeAdded(ShapeId),
    CollisionShapeRemoved(ShapeId),
    HighlightableAdded(MeshId),
    HighlightableRemoved(MeshId),
    CollisionChannelChanged(CollisionChannel),
    LifecycleModeChanged(LifecycleMode),
    LifecycleCountChanged(i32),
    CooldownPeriodChanged(Seconds),
}

/// Listener grouping for [`InteractableEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractableEventKind {
    StateChanged,
    WeightChanged,
    InteractorFound,
    InteractorLost,
    InteractorChanged,
    Selected,
    InteractionStarted,
    InteractionStopped,
    InteractionCanceled,
    InteractionCompleted,
    CycleCompleted,
    LifecycleCompleted,
    CooldownCompleted,
    DependencyChanged,
    DependencyStarted,
    DependencyStopped,
    CollisionShapeAdded,
    CollisionShapeRemoved,
    HighlightableAdded,
    HighlightableRemoved,
    CollisionChannelChanged,
    LifecycleModeChanged,
    LifecycleCountChanged,
    CooldownPeriodChanged,
}

impl Event for InteractableEvent {
    type Kind = InteractableEventKind;

    fn kind(&self) -> InteractableEventKind {
        use InteractableEvent as E;
        use InteractableEventKind as K;
        match self {
            E::StateChanged(_) => K::StateChanged,
            E::WeightChanged(_) => K::WeightChanged,
            E::InteractorFound(_) => K::InteractorFound,
            E::InteractorLost(_) => K::InteractorLost,
            E::InteractorChanged(_) => K::InteractorChanged,
            E::Selected(_) => K::Selected,
            E::InteractionStarted { .. } => K::InteractionStarted,
            E::InteractionStopped { .. } => K::InteractionStopped,
            E::InteractionCanceled => K::InteractionCanceled,
            E::InteractionCompleted { .. } => K::InteractionCompleted,
            E::CycleCompleted { .. } => K::CycleCompleted,
            E::LifecycleCompleted => K::LifecycleCompleted,
            E::CooldownCompleted => K::CooldownCompleted,
            E::DependencyChanged(_) => K::DependencyChanged,
            E::DependencyStarted { .. } => K::DependencyStarted,
            E::DependencyStopped { .. } => K::DependencyStopped,
            E::CollisionShapeAdded(_) => K::CollisionShapeAdded,
            E::CollisionShapeRemoved(_) => K::CollisionShapeRemoved,
            E::HighlightableAdded(_) => K::HighlightableAdded,
            E::HighlightableRemoved(_) => K::HighlightableRemoved,
            E::CollisionChannelChanged(_) => K::CollisionChannelChanged,
            E::LifecycleModeChanged(_) => K::LifecycleModeChanged,
            E::LifecycleCountChanged(_) => K::LifecycleCountChanged,
            E::CooldownPeriodChanged(_) => K::CooldownPeriodChanged,
        }
    }
}

/// Notifications broadcast by an interactor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InteractorEvent {
    StateChanged(InteractorState),
    InteractableFound(InteractableId),
    InteractableLost(InteractableId),
    InteractableSelected(InteractableId),
    IgnoredActorAdded(ActorId),
    IgnoredActorRemoved(ActorId),
    ResponseChannelChanged(CollisionChannel),
    InteractionRequested { time: Seconds },
    InteractionReleased { time: Seconds },
}

/// Listener grouping for [`InteractorEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractorEventKind {
    StateChanged,
    InteractableFound,
    InteractableLost,
    InteractableSelected,
    IgnoredActorAdded,
    IgnoredActorRemoved,
    ResponseChannelChanged,
    InteractionRequested,
    InteractionReleased,
}

impl Event for InteractorEvent {
    type Kind = InteractorEventKind;

    fn kind(&self) -> InteractorEventKind {
        use InteractorEvent as E;
        use InteractorEventKind as K;
        match self {
            E::StateChanged(_) => K::StateChanged,
            E::InteractableFound(_) => K::InteractableFound,
            E::InteractableLost(_) => K::InteractableLost,
            E::InteractableSelected(_) => K::InteractableSelected,
            E::IgnoredActorAdded(_) => K::IgnoredActorAdded,
            E::IgnoredActorRemoved(_) => K::IgnoredActorRemoved,
            E::ResponseChannelChanged(_) => K::ResponseChannelChanged,
            E::InteractionRequested { .. } => K::InteractionRequested,
            E::InteractionReleased { .. } => K::InteractionReleased,
        }
    }
}
