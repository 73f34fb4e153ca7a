//! Load named presets from TOML

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{InteractableConfig, InteractorConfig};
use crate::core::error::{InteractionError, Result};

/// Named interactable and interactor presets
///
/// ```toml
/// [interactables.lever]
/// weight = 3
/// lifecycle_count = 2
///
/// [interactors.player]
/// default_state = "Awake"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PresetCatalog {
    pub interactables: BTreeMap<String, InteractableConfig>,
    pub interactors: BTreeMap<String, InteractorConfig>,
}

impl PresetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut catalog: PresetCatalog = toml::from_str(content)?;

        for (name, preset) in catalog.interactables.iter_mut() {
            preset
                .validate()
                .map_err(|e| InteractionError::InvalidPreset(format!("{}: {}", name, e)))?;
            if preset.name.is_empty() {
                preset.name = name.clone();
            }
        }
        for (name, preset) in catalog.interactors.iter_mut() {
            if preset.name.is_empty() {
                preset.name = name.clone();
            }
        }

        tracing::debug!(
            interactables = catalog.interactables.len(),
            interactors = catalog.interactors.len(),
            "Parsed preset catalog"
        );
        Ok(catalog)
    }

    /// Load a catalog from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "Loaded preset catalog");
        Ok(catalog)
    }

    pub fn interactable(&self, name: &str) -> Result<&InteractableConfig> {
        self.interactables.get(name).ok_or_else(|| {
            tracing::warn!(preset = name, "Unknown interactable preset");
            InteractionError::PresetNotFound(name.to_string())
        })
    }

    pub fn interactor(&self, name: &str) -> Result<&InteractorConfig> {
        self.interactors.get(name).ok_or_else(|| {
            tracing::warn!(preset = name, "Unknown interactor preset");
            InteractionError::PresetNotFound(name.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CollisionChannel;
    use crate::interactable::lifecycle::LifecycleMode;
    use crate::interactable::state::InteractableState;
    use crate::interactor::state::InteractorState;

    const CATALOG: &str = r#"
[interactables.lever]
weight = 3
lifecycle_mode = "Cycled"
lifecycle_count = 2
cooldown_period = 0.5

[interactables.chest]
lifecycle_mode = "OnlyOnce"
default_state = "Asleep"
collision_channel = "Interaction"

[interactors.player]
default_state = "Awake"
response_channel = "Interaction"
"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = PresetCatalog::from_toml_str(CATALOG).unwrap();

        let lever = catalog.interactable("lever").unwrap();
        assert_eq!(lever.name, "lever");
        assert_eq!(lever.weight, 3);
        assert_eq!(lever.lifecycle_count, 2);
        // Unspecified fields fall back to defaults
        assert_eq!(lever.interaction_period, 1.5);

        let chest = catalog.interactable("chest").unwrap();
        assert_eq!(chest.lifecycle_mode, LifecycleMode::OnlyOnce);
        assert_eq!(chest.default_state, InteractableState::Asleep);
        assert_eq!(chest.collision_channel, CollisionChannel::Interaction);

        let player = catalog.interactor("player").unwrap();
        assert_eq!(player.default_state, InteractorState::Awake);
    }

    #[test]
    fn test_missing_preset() {
        let catalog = PresetCatalog::from_toml_str(CATALOG).unwrap();
        assert!(matches!(
            catalog.interactable("door"),
            Err(InteractionError::PresetNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_toml() {
        let result = PresetCatalog::from_toml_str("[interactables.lever\nweight = ");
        assert!(matches!(result, Err(InteractionError::TomlError(_))));
    }

    #[test]
    fn test_unknown_state_name_is_rejected() {
        let result = PresetCatalog::from_toml_str("[interactables.x]\ndefault_state = \"Sleepy\"\n");
        assert!(result.is_err());
    }
}
