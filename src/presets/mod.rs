//! Spawn-time configuration for interactables and interactors
//!
//! Presets are plain serde snapshots. Every field has a default, so a TOML
//! table only needs to name what differs. Values are clamped when applied to
//! an entity, exactly as the runtime setters clamp them.

pub mod loader;

use serde::{Deserialize, Serialize};

use crate::core::types::{CollisionChannel, Seconds};
use crate::interactable::lifecycle::LifecycleMode;
use crate::interactable::state::InteractableState;
use crate::interactor::state::InteractorState;

pub use loader::PresetCatalog;

/// Settings applied to a freshly spawned interactable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractableConfig {
    pub name: String,
    pub default_state: InteractableState,
    pub weight: i32,
    pub lifecycle_mode: LifecycleMode,
    /// -1 for unlimited cycles
    pub lifecycle_count: i32,
    /// -1 disables the progress timer
    pub interaction_period: Seconds,
    pub cooldown_period: Seconds,
    /// Grace window while paused before progress is discarded
    pub progress_expiration: Seconds,
    /// Keep progress when the interaction is stopped
    pub can_persist: bool,
    pub collision_channel: CollisionChannel,
}

impl Default for InteractableConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            default_state: InteractableState::Awake,
            weight: 1,
            lifecycle_mode: LifecycleMode::Cycled,
            lifecycle_count: -1,
            interaction_period: 1.5,
            cooldown_period: 3.0,
            progress_expiration: 1.0,
            can_persist: false,
            collision_channel: CollisionChannel::Visibility,
        }
    }
}

impl InteractableConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_default_state(mut self, state: InteractableState) -> Self {
        self.default_state = state;
        self
    }

    pub fn with_lifecycle(mut self, mode: LifecycleMode, count: i32) -> Self {
        self.lifecycle_mode = mode;
        self.lifecycle_count = count;
        self
    }

    pub fn with_interaction_period(mut self, period: Seconds) -> Self {
        self.interaction_period = period;
        self
    }

    pub fn with_cooldown_period(mut self, period: Seconds) -> Self {
        self.cooldown_period = period;
        self
    }

    pub fn with_persistence(mut self, can_persist: bool, expiration: Seconds) -> Self {
        self.can_persist = can_persist;
        self.progress_expiration = expiration;
        self
    }

    pub fn with_channel(mut self, channel: CollisionChannel) -> Self {
        self.collision_channel = channel;
        self
    }

    /// Check for values no clamp can repair
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("interaction_period", self.interaction_period),
            ("cooldown_period", self.cooldown_period),
            ("progress_expiration", self.progress_expiration),
        ] {
            if !value.is_finite() {
                return Err(format!("{} must be finite, got {}", field, value));
            }
        }
        Ok(())
    }
}

/// Settings applied to a freshly spawned interactor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractorConfig {
    pub name: String,
    pub default_state: InteractorState,
    pub response_channel: CollisionChannel,
}

impl Default for InteractorConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            default_state: InteractorState::Asleep,
            response_channel: CollisionChannel::Visibility,
        }
    }
}

impl InteractorConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_default_state(mut self, state: InteractorState) -> Self {
        self.default_state = state;
        self
    }

    pub fn with_channel(mut self, channel: CollisionChannel) -> Self {
        self.response_channel = channel;
        self
    }
}
