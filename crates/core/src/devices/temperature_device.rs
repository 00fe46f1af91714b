//! Ovens and cooling boxes
//!
//! Both hold a setpoint and move a single ingredient towards it. An oven only
//! ever heats and a cooling box only ever cools; an ingredient already past
//! the setpoint in the device's direction is left alone. Ovens are imprecise:
//! every run perturbs the heat applied by up to ±5% of the setpoint.

use crate::core_types::{Ingredient, Temperature};
use crate::error::{LabError, LabResult};
use crate::random::RandomSource;
use tracing::debug;

/// Relative width of the oven's jitter band (±half of this)
pub const OVEN_JITTER_SPAN: f64 = 0.1;

/// Which way a temperature device moves its ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Heat,
    Cool,
}

/// Setpoint-driven heater or cooler
#[derive(Debug)]
pub struct TemperatureDevice {
    direction: Direction,
    setpoint: Temperature,
    rng: Box<dyn RandomSource>,
}

impl TemperatureDevice {
    pub(crate) fn oven(setpoint: Temperature, rng: Box<dyn RandomSource>) -> Self {
        Self {
            direction: Direction::Heat,
            setpoint,
            rng,
        }
    }

    pub(crate) fn cooling_box(setpoint: Temperature, rng: Box<dyn RandomSource>) -> Self {
        Self {
            direction: Direction::Cool,
            setpoint,
            rng,
        }
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn setpoint(&self) -> Temperature {
        self.setpoint
    }

    /// Set the setpoint to `(coldness, hotness)`
    pub fn set_temperature(&mut self, coldness: i64, hotness: i64) -> LabResult<()> {
        let max = self.setpoint.max_temperature();
        if !Temperature::is_valid(coldness, hotness, max) {
            return Err(LabError::invalid_argument(format!(
                "[{coldness}, {hotness}] is not a valid device temperature"
            )));
        }
        self.setpoint = Temperature::with_max(coldness, hotness, max);
        Ok(())
    }

    /// Shift the setpoint by a signed amount, clamped to the ceiling
    pub fn delta_temperature(&mut self, delta: i64) {
        let max = self.setpoint.max_temperature();
        self.setpoint = Temperature::from_signed(self.setpoint.signed().saturating_add(delta), max);
    }

    /// Random perturbation of an oven run
    fn jitter(&mut self) -> i64 {
        let spread = (self.rng.next_unit() - 0.5) * OVEN_JITTER_SPAN;
        (self.setpoint.signed() as f64 * spread).round() as i64
    }

    /// Move `ingredient` towards the setpoint
    pub(crate) fn apply(&mut self, ingredient: &mut Ingredient) {
        let gap = Temperature::difference(&self.setpoint, &ingredient.temperature());
        match self.direction {
            Direction::Heat => {
                let jitter = self.jitter();
                let amount = clamp_to_i64(gap.max(0) + i128::from(jitter));
                debug!(
                    name = %ingredient.name(),
                    amount,
                    jitter,
                    "oven heating ingredient"
                );
                ingredient.heat(amount);
            }
            Direction::Cool => {
                let amount = clamp_to_i64((-gap).max(0));
                debug!(name = %ingredient.name(), amount, "cooling box cooling ingredient");
                ingredient.cool(amount);
            }
        }
    }
}

fn clamp_to_i64(value: i128) -> i64 {
    value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}
