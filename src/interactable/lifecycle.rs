//! Lifecycle mode and cycle counting

use serde::{Deserialize, Serialize};

/// How many times an interactable can be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LifecycleMode {
    /// Completes after a single interaction
    OnlyOnce,
    /// Re-arms through a cooldown after each interaction
    #[default]
    Cycled,
}

/// Count of -1 means unlimited cycles
pub const UNLIMITED_CYCLES: i32 = -1;

/// Cycle counter for one interactable
///
/// `count` is the configured number of cycles, `remaining` how many are left.
/// Both are [`UNLIMITED_CYCLES`] for an endless interactable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    mode: LifecycleMode,
    count: i32,
    remaining: i32,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            mode: LifecycleMode::Cycled,
            count: UNLIMITED_CYCLES,
            remaining: UNLIMITED_CYCLES,
        }
    }
}

impl Lifecycle {
    pub fn new(mode: LifecycleMode) -> Self {
        match mode {
            LifecycleMode::OnlyOnce => Self {
                mode,
                count: 1,
                remaining: 1,
            },
            LifecycleMode::Cycled => Self::default(),
        }
    }

    pub fn mode(&self) -> LifecycleMode {
        self.mode
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn is_unlimited(&self) -> bool {
        self.count == UNLIMITED_CYCLES
    }

    /// Switch mode; a one-shot lifecycle always holds exactly one cycle
    ///
    /// Switching to cycled re-clamps the current count, so a former one-shot
    /// lifecycle is raised to `min_cycled`.
    pub fn set_mode(&mut self, mode: LifecycleMode, min_cycled: i32) {
        self.mode = mode;
        match mode {
            LifecycleMode::OnlyOnce => {
                self.count = 1;
                self.remaining = 1;
            }
            LifecycleMode::Cycled => {
                self.set_count(self.count, min_cycled);
            }
        }
    }

    /// Set the cycle count, clamped for cycled mode
    ///
    /// Returns the stored count, or `None` when the request was ignored
    /// because the lifecycle is one-shot.
    pub fn set_count(&mut self, requested: i32, min_cycled: i32) -> Option<i32> {
        if self.mode == LifecycleMode::OnlyOnce {
            return None;
        }

        let count = if requested <= UNLIMITED_CYCLES {
            UNLIMITED_CYCLES
        } else if requested < min_cycled {
            min_cycled
        } else {
            requested
        };

        self.count = count;
        self.remaining = count;
        Some(count)
    }

    /// Spend one cycle and report whether any remain
    ///
    /// Unlimited lifecycles never run out.
    pub fn consume(&mut self) -> bool {
        if !self.is_unlimited() {
            self.remaining = (self.remaining - 1).max(0);
        }
        self.has_remaining()
    }

    pub fn has_remaining(&self) -> bool {
        self.remaining != 0
    }
}
