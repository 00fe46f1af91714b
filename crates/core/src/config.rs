//! Laboratory-wide configuration
//!
//! The temperature ceiling used to be a process-wide setting. It is carried
//! explicitly instead: every ingredient type, ingredient and laboratory is
//! created from an [`AlchemyConfig`], and each [`Temperature`] remembers the
//! bound it was built under.
//!
//! [`Temperature`]: crate::core_types::Temperature

use serde::{Deserialize, Serialize};

/// Configuration shared by everything created for one laboratory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlchemyConfig {
    /// Upper bound for both coldness and hotness
    pub max_temperature: i64,
}

impl AlchemyConfig {
    /// Default temperature ceiling
    pub const DEFAULT_MAX_TEMPERATURE: i64 = 10_000;

    /// Create a configuration, clamping the ceiling into `[1, i64::MAX - 1]`
    #[must_use]
    pub fn new(max_temperature: i64) -> Self {
        Self {
            max_temperature: max_temperature.clamp(1, i64::MAX - 1),
        }
    }

    /// Whether `value` is an acceptable temperature ceiling
    pub fn is_valid_max_temperature(value: i64) -> bool {
        0 < value && value < i64::MAX
    }
}

impl Default for AlchemyConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_TEMPERATURE)
    }
}
