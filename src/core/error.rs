use thiserror::Error;

use crate::core::types::{InteractableId, InteractorId, ShapeId};

#[derive(Error, Debug)]
pub enum InteractionError {
    #[error("Interactable not found: {0:?}")]
    InteractableNotFound(InteractableId),

    #[error("Interactor not found: {0:?}")]
    InteractorNotFound(InteractorId),

    #[error("Collision shape not found: {0:?}")]
    ShapeNotFound(ShapeId),

    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    #[error("Invalid preset: {0}")]
    InvalidPreset(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InteractionError>;
