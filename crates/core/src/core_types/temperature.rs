//! One-sided saturating temperatures
//!
//! A temperature is a `(coldness, hotness)` pair of which at most one side is
//! nonzero. Heating first eats away coldness and only then adds hotness, and
//! both sides saturate at the configured ceiling instead of wrapping.
//!
//! # Usage
//! ```
//! use alchemy_core::config::AlchemyConfig;
//! use alchemy_core::core_types::temperature::Temperature;
//!
//! let config = AlchemyConfig::default();
//! let mut t = Temperature::new(0, 20, &config);
//! t.cool(30);
//! assert_eq!((t.coldness(), t.hotness()), (10, 0));
//! t.heat(i64::MAX);
//! assert_eq!(t.hotness(), 10_000);
//! ```

use crate::config::AlchemyConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a temperature compares to a reference (usually a type's standard)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureState {
    Heated,
    Cooled,
    Neutral,
}

impl TemperatureState {
    /// Adjective used in ingredient names (empty for neutral)
    pub fn adjective(self) -> &'static str {
        match self {
            TemperatureState::Heated => "Heated",
            TemperatureState::Cooled => "Cooled",
            TemperatureState::Neutral => "",
        }
    }
}

/// A `(coldness, hotness)` pair bounded by a ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Temperature {
    coldness: i64,
    hotness: i64,
    max_temperature: i64,
}

impl Temperature {
    /// Create a temperature bounded by the config's ceiling
    ///
    /// Each side is clamped into `[0, max]`. A two-sided input is netted into
    /// a one-sided one.
    #[must_use]
    pub fn new(coldness: i64, hotness: i64, config: &AlchemyConfig) -> Self {
        Self::with_max(coldness, hotness, config.max_temperature)
    }

    /// Create a temperature bounded by an explicit ceiling
    #[must_use]
    pub fn with_max(coldness: i64, hotness: i64, max_temperature: i64) -> Self {
        let max_temperature = max_temperature.max(1);
        let coldness = coldness.clamp(0, max_temperature);
        let hotness = hotness.clamp(0, max_temperature);
        if coldness > 0 && hotness > 0 {
            return Self::from_signed(hotness - coldness, max_temperature);
        }
        Self {
            coldness,
            hotness,
            max_temperature,
        }
    }

    /// Temperature for a signed value: negative means cold, positive hot
    #[must_use]
    pub fn from_signed(value: i64, max_temperature: i64) -> Self {
        let max_temperature = max_temperature.max(1);
        if value < 0 {
            Self {
                coldness: value.unsigned_abs().min(max_temperature as u64) as i64,
                hotness: 0,
                max_temperature,
            }
        } else {
            Self {
                coldness: 0,
                hotness: value.min(max_temperature),
                max_temperature,
            }
        }
    }

    #[inline]
    pub fn coldness(&self) -> i64 {
        self.coldness
    }

    #[inline]
    pub fn hotness(&self) -> i64 {
        self.hotness
    }

    #[inline]
    pub fn max_temperature(&self) -> i64 {
        self.max_temperature
    }

    /// `hotness - coldness`
    #[inline]
    pub fn signed(&self) -> i64 {
        self.hotness - self.coldness
    }

    /// Whether `(coldness, hotness)` is one-sided and inside `[0, max]`
    pub fn is_valid(coldness: i64, hotness: i64, max_temperature: i64) -> bool {
        (0..=max_temperature).contains(&coldness)
            && (0..=max_temperature).contains(&hotness)
            && (coldness == 0 || hotness == 0)
    }

    /// Signed difference `a - b`
    pub fn difference(a: &Temperature, b: &Temperature) -> i128 {
        i128::from(a.signed()) - i128::from(b.signed())
    }

    /// Raise the temperature by `amount`; non-positive amounts do nothing
    pub fn heat(&mut self, amount: i64) {
        if amount <= 0 {
            return;
        }
        if self.coldness > amount {
            self.coldness -= amount;
            self.hotness = 0;
        } else {
            self.hotness = self
                .hotness
                .saturating_add(amount - self.coldness)
                .min(self.max_temperature);
            self.coldness = 0;
        }
    }

    /// Lower the temperature by `amount`; non-positive amounts do nothing
    pub fn cool(&mut self, amount: i64) {
        if amount <= 0 {
            return;
        }
        if self.hotness > amount {
            self.hotness -= amount;
            self.coldness = 0;
        } else {
            self.coldness = self
                .coldness
                .saturating_add(amount - self.hotness)
                .min(self.max_temperature);
            self.hotness = 0;
        }
    }

    /// Move to `target` by heating or cooling
    ///
    /// Targets outside this temperature's bounds are ignored.
    pub fn change_to(&mut self, target: &Temperature) {
        if !Self::is_valid(target.coldness, target.hotness, self.max_temperature) {
            return;
        }
        let delta = Self::difference(target, self)
            .clamp(-i128::from(i64::MAX), i128::from(i64::MAX)) as i64;
        if delta > 0 {
            self.heat(delta);
        } else {
            self.cool(-delta);
        }
    }

    /// Compare against `standard`: hotter is Heated, colder is Cooled
    pub fn state_relative_to(&self, standard: &Temperature) -> TemperatureState {
        match Self::difference(self, standard).signum() {
            1 => TemperatureState::Heated,
            -1 => TemperatureState::Cooled,
            _ => TemperatureState::Neutral,
        }
    }

    /// Same `(coldness, hotness)` pair, ignoring the ceiling
    pub fn same_reading(&self, other: &Temperature) -> bool {
        self.coldness == other.coldness && self.hotness == other.hotness
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.coldness, self.hotness)
    }
}
