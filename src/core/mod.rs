pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{InteractionError, Result};
pub use types::{
    ActorId, CollisionChannel, InteractableId, InteractorId, MeshId, RequestOutcome, Seconds,
    ShapeId,
};
