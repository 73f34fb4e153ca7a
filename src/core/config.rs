//! Engine configuration with documented constants
//!
//! Limits and clamps used by the state machines are collected here so the
//! setters and the timer code agree on the same values.

/// Configuration for the interaction engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    // === DEPENDENCY CASCADE ===
    /// Maximum nesting of dependency propagation before the cascade is cut
    ///
    /// Each master → dependent hop adds one level. Edges that would close a
    /// cycle are already refused, so this only trips on very deep chains.
    pub max_cascade_depth: u32,

    // === TIMERS ===
    /// Smallest interaction period accepted by the setters (seconds)
    ///
    /// Values between -1 and this are raised to it; -1 itself means the
    /// interaction has no progress timer.
    pub min_interaction_period: f32,

    /// Smallest cooldown period accepted by the setters (seconds)
    pub min_cooldown_period: f32,

    /// Smallest grace window scheduled while an interaction is paused (seconds)
    pub min_progress_expiration: f32,

    // === LIFECYCLE ===
    /// Smallest finite cycle count for a cycled interactable
    ///
    /// A cycled interactable with fewer cycles is just a one-shot one.
    pub min_cycled_lifecycle_count: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cascade_depth: 16,
            min_interaction_period: 0.01,
            min_cooldown_period: 0.1,
            min_progress_expiration: 0.01,
            min_cycled_lifecycle_count: 2,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.max_cascade_depth == 0 {
            return Err("max_cascade_depth must be at least 1".into());
        }

        if self.min_interaction_period <= 0.0
            || self.min_cooldown_period <= 0.0
            || self.min_progress_expiration <= 0.0
        {
            return Err("Timer minimums must be positive".into());
        }

        if self.min_cycled_lifecycle_count < 2 {
            return Err(format!(
                "min_cycled_lifecycle_count ({}) should be >= 2",
                self.min_cycled_lifecycle_count
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_cascade_depth() {
        let config = EngineConfig {
            max_cascade_depth: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_single_cycle_minimum() {
        let config = EngineConfig {
            min_cycled_lifecycle_count: 1,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
