//! Theoretical, characteristic and effective volatility
//!
//! A type carries a theoretical volatility. Each ingredient instance rolls a
//! characteristic volatility within ±10% of it at creation. The effective
//! volatility is derived on demand from the characteristic value and how far
//! the ingredient's hotness sits from its type's standard hotness.

use crate::core_types::temperature::Temperature;
use crate::error::{LabError, LabResult};
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};

/// Relative spread of a characteristic volatility around the theoretical one
pub const VOLATILITY_SPREAD: f64 = 0.1;

/// Characteristic volatilities are clamped just below 1
pub const MAX_CHARACTERISTIC_VOLATILITY: f64 = 0.999_999_9;

/// Effective volatility at or above which an ingredient is dangerous
pub const DANGER_THRESHOLD: f64 = 1000.0;

/// Effective/standard ratio above which an ingredient counts as volatile
pub const VOLATILE_RATIO: f64 = 1.1;

/// Effective/standard ratio below which an ingredient counts as inert
pub const INERT_RATIO: f64 = 0.9;

/// Qualitative volatility of an ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatilityClass {
    Dangerous,
    Volatile,
    Inert,
    Neutral,
}

impl VolatilityClass {
    /// Prefix used in ingredient names (empty for neutral)
    pub fn prefix(self) -> &'static str {
        match self {
            VolatilityClass::Dangerous => "Dangerous",
            VolatilityClass::Volatile => "Volatile",
            VolatilityClass::Inert => "Inert",
            VolatilityClass::Neutral => "",
        }
    }
}

/// Type-level and instance-level volatility of one ingredient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volatility {
    theoretical: f64,
    characteristic: f64,
}

impl Volatility {
    /// Roll a characteristic volatility around `theoretical`
    pub fn roll(theoretical: f64, rng: &mut dyn RandomSource) -> Self {
        let spread = (rng.next_unit() - 0.5) * 2.0 * VOLATILITY_SPREAD;
        Self {
            theoretical,
            characteristic: (theoretical * (1.0 + spread))
                .clamp(0.0, MAX_CHARACTERISTIC_VOLATILITY),
        }
    }

    /// Volatility with a known characteristic value
    pub fn with_characteristic(theoretical: f64, characteristic: f64) -> LabResult<Self> {
        if !Self::is_valid(characteristic) {
            return Err(LabError::invalid_argument(format!(
                "characteristic volatility {characteristic} outside [0, 1)"
            )));
        }
        Ok(Self {
            theoretical,
            characteristic,
        })
    }

    /// Whether `value` is a legal volatility, i.e. in `[0, 1)`
    #[inline]
    pub fn is_valid(value: f64) -> bool {
        (0.0..1.0).contains(&value)
    }

    #[inline]
    pub fn theoretical(&self) -> f64 {
        self.theoretical
    }

    #[inline]
    pub fn characteristic(&self) -> f64 {
        self.characteristic
    }

    pub(crate) fn set_characteristic(&mut self, value: f64) -> LabResult<()> {
        if !Self::is_valid(value) {
            return Err(LabError::invalid_argument(format!(
                "characteristic volatility {value} outside [0, 1)"
            )));
        }
        self.characteristic = value;
        Ok(())
    }

    /// Volatility at the standard temperature
    pub fn standard(&self, standard_hotness: i64) -> f64 {
        self.characteristic * 10.0 * standard_hotness as f64
    }

    /// Volatility at `current`, relative to the type's `standard` temperature
    ///
    /// A standard hotness of zero is treated as one in the divisions so that
    /// cold-standard types still yield a finite value.
    pub fn effective(&self, current: &Temperature, standard: &Temperature) -> f64 {
        let standard_hotness = standard.hotness();
        let base = self.standard(standard_hotness);
        let scale = standard_hotness.max(1) as f64;
        let hotness = current.hotness();
        if hotness > standard_hotness {
            base + 300.0 * self.characteristic * (hotness - standard_hotness) as f64 / scale
        } else if hotness < standard_hotness {
            let exponent = (standard_hotness - current.signed()) as f64 / scale;
            base * self.characteristic.powf(exponent)
        } else {
            base
        }
    }

    /// Classify the effective volatility at `current`
    pub fn classify(&self, current: &Temperature, standard: &Temperature) -> VolatilityClass {
        let effective = self.effective(current, standard);
        let base = self.standard(standard.hotness());
        if effective >= DANGER_THRESHOLD {
            VolatilityClass::Dangerous
        } else if effective > base * VOLATILE_RATIO {
            VolatilityClass::Volatile
        } else if effective < base * INERT_RATIO {
            VolatilityClass::Inert
        } else {
            VolatilityClass::Neutral
        }
    }
}
