//! Multi-radix ingredient quantities
//!
//! A [`Quantity`] holds one count per unit of its state's chain, index 0 being
//! the smallest unit. Counts are carried after every mutation so that no slot
//! ever holds a full unit of the next slot.
//!
//! # Usage
//! ```
//! use alchemy_core::core_types::quantity::Quantity;
//! use alchemy_core::core_types::units::{LiquidUnit, PhysicalState};
//!
//! let q = Quantity::new(PhysicalState::Liquid, &[9, 0, 0, 0, 0, 0, 0]).unwrap();
//! assert_eq!(q.slots(), &[1, 1, 0, 0, 0, 0, 0]);
//! assert_eq!(q.flatten(), 9);
//! assert!(q.fits(LiquidUnit::Vial.into()));
//! ```

use crate::core_types::units::{PhysicalState, Unit};
use crate::error::{LabError, LabResult};
use serde::{Deserialize, Serialize};

/// Counts per unit of one physical state, kept carried
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    state: PhysicalState,
    slots: Vec<u64>,
}

impl Quantity {
    /// Create a quantity from an arbitrary, possibly non-carried vector
    ///
    /// The vector must have one entry per unit of `state` and pass
    /// [`Quantity::is_valid`].
    pub fn new(state: PhysicalState, raw: &[i64]) -> LabResult<Self> {
        if raw.len() != state.unit_count() {
            return Err(LabError::invalid_argument(format!(
                "a {state} quantity needs {} slots, got {}",
                state.unit_count(),
                raw.len()
            )));
        }
        if !Self::is_valid(state, raw) {
            return Err(LabError::invalid_argument(format!(
                "invalid {state} quantity {raw:?}"
            )));
        }
        let mut quantity = Self {
            state,
            slots: raw.iter().map(|&count| count as u64).collect(),
        };
        quantity.carry();
        Ok(quantity)
    }

    /// `amount` whole units of `unit`
    pub fn of(unit: Unit, amount: u32) -> LabResult<Self> {
        if amount == 0 {
            return Err(LabError::invalid_argument("quantity of zero units"));
        }
        let state = unit.state();
        let mut raw = vec![0_i64; state.unit_count()];
        raw[unit.index()] = i64::from(amount);
        Self::new(state, &raw)
    }

    /// A quantity holding `flat` smallest units, carried
    ///
    /// Unlike [`Quantity::new`] this accepts zero; callers that need a live
    /// quantity check [`Quantity::is_zero`] themselves.
    pub fn from_flat(state: PhysicalState, flat: u64) -> Self {
        let mut quantity = Self {
            state,
            slots: vec![0; state.unit_count()],
        };
        quantity.set_to(flat);
        quantity
    }

    /// Largest count a single slot may hold at construction
    ///
    /// Bounded so that flattening a full vector stays inside `i32` range.
    #[inline]
    #[must_use]
    pub fn max_slot(state: PhysicalState) -> i64 {
        i64::from(i32::MAX) / state.chain_product() as i64
    }

    /// Whether `raw` is acceptable as the input of [`Quantity::new`]
    ///
    /// Rejects negative slots, slots above [`Quantity::max_slot`] and the
    /// all-zero vector.
    pub fn is_valid(state: PhysicalState, raw: &[i64]) -> bool {
        let max = Self::max_slot(state);
        raw.iter().all(|&count| (0..=max).contains(&count)) && raw.iter().any(|&count| count > 0)
    }

    #[inline]
    pub fn state(&self) -> PhysicalState {
        self.state
    }

    /// Counts per unit, smallest first
    #[inline]
    pub fn slots(&self) -> &[u64] {
        &self.slots
    }

    /// Count held in `unit`'s slot (zero for a unit of the other state)
    pub fn number_of(&self, unit: Unit) -> u64 {
        if unit.state() != self.state {
            return 0;
        }
        self.slots[unit.index()]
    }

    /// Propagate overflowing counts into larger units
    pub fn carry(&mut self) {
        let units = self.state.units();
        for index in 0..self.slots.len() - 1 {
            let factor = u64::from(units[index + 1].conversion_factor());
            let overflow = self.slots[index] / factor;
            self.slots[index] %= factor;
            self.slots[index + 1] += overflow;
        }
    }

    /// Whether no slot holds a full unit of the next slot
    pub fn is_carried(&self) -> bool {
        let units = self.state.units();
        self.slots
            .iter()
            .zip(&units[1..])
            .all(|(&count, next)| count < u64::from(next.conversion_factor()))
    }

    /// Total expressed in the smallest unit
    pub fn flatten(&self) -> u64 {
        self.state
            .flat_sizes()
            .iter()
            .zip(&self.slots)
            .map(|(size, count)| size * count)
            .sum()
    }

    /// Replace the whole quantity by `flat` smallest units, then carry
    pub fn set_to(&mut self, flat: u64) {
        self.slots.iter_mut().for_each(|slot| *slot = 0);
        self.slots[0] = flat;
        self.carry();
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.slots.iter().all(|&count| count == 0)
    }

    /// Whether the whole quantity fits in a single `unit`
    pub fn fits(&self, unit: Unit) -> bool {
        unit.state() == self.state && self.flatten() <= unit.flat_size()
    }

    /// Truncate to exactly one `unit` if the quantity does not fit in it
    pub fn can(&mut self, unit: Unit) {
        if unit.state() != self.state || self.fits(unit) {
            return;
        }
        self.set_to(unit.flat_size());
    }

    /// Quantity in spoons of its own state
    pub fn in_spoons(&self) -> f64 {
        self.flatten() as f64 / self.state.spoon_factor() as f64
    }

    /// Quantity in storerooms of its own state
    pub fn in_storerooms(&self) -> f64 {
        self.flatten() as f64 / self.state.chain_product() as f64
    }

    /// Flat amount after re-expressing this quantity in `target`'s units
    ///
    /// Spoons are preserved: `floor(flat / source_spoon * target_spoon)`.
    pub fn transmogrified_flat(&self, target: PhysicalState) -> u64 {
        self.flatten() * target.spoon_factor() / self.state.spoon_factor()
    }
}
