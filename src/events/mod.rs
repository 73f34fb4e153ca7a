//! Per-entity observer registries
//!
//! Every interactable and interactor owns its own registry. Listeners are
//! grouped by event kind and invoked synchronously, in registration order,
//! when the owning entity broadcasts.

pub mod registry;
pub mod types;

pub use registry::{Event, EventRegistry, ListenerId};
pub use types::{InteractableEvent, InteractableEventKind, InteractorEvent, InteractorEventKind};
