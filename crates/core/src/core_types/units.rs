//! Physical states and their unit chains
//!
//! Each physical state has a fixed, ordered chain of units from smallest to
//! largest. Every unit knows how many of the previous unit it contains, which
//! makes a quantity a multi-radix number over the chain.
//!
//! # Usage
//! ```
//! use alchemy_core::core_types::units::{LiquidUnit, PhysicalState, Unit};
//!
//! let barrel = Unit::from(LiquidUnit::Barrel);
//! assert_eq!(barrel.state(), PhysicalState::Liquid);
//! assert_eq!(barrel.flat_size(), 10_080);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// PHYSICAL STATE
// ============================================================================

/// The state an ingredient can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicalState {
    Liquid,
    Solid,
}

impl PhysicalState {
    /// Units of this state, smallest first
    #[must_use]
    pub fn units(self) -> &'static [Unit] {
        match self {
            PhysicalState::Liquid => &LIQUID_CHAIN,
            PhysicalState::Solid => &SOLID_CHAIN,
        }
    }

    /// Number of units in this state's chain
    #[inline]
    #[must_use]
    pub fn unit_count(self) -> usize {
        self.units().len()
    }

    /// Cumulative conversion factors: entry `i` is the size of one unit `i`
    /// expressed in the smallest unit
    #[must_use]
    pub fn flat_sizes(self) -> Vec<u64> {
        let mut product = 1_u64;
        self.units()
            .iter()
            .map(|unit| {
                product *= u64::from(unit.conversion_factor());
                product
            })
            .collect()
    }

    /// Product of every factor in the chain (size of one storeroom)
    #[must_use]
    pub fn chain_product(self) -> u64 {
        self.units()
            .iter()
            .map(|unit| u64::from(unit.conversion_factor()))
            .product()
    }

    /// Smallest units per spoon in this state
    #[inline]
    #[must_use]
    pub fn spoon_factor(self) -> u64 {
        u64::from(self.spoon().conversion_factor())
    }

    /// The spoon unit of this state
    #[inline]
    #[must_use]
    pub fn spoon(self) -> Unit {
        match self {
            PhysicalState::Liquid => Unit::Liquid(LiquidUnit::Spoon),
            PhysicalState::Solid => Unit::Solid(SolidUnit::Spoon),
        }
    }

    /// The largest unit a container may have in this state
    #[must_use]
    pub fn largest_container_unit(self) -> Unit {
        let units = self.units();
        units[units.len() - 2]
    }

    /// The other state
    #[inline]
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            PhysicalState::Liquid => PhysicalState::Solid,
            PhysicalState::Solid => PhysicalState::Liquid,
        }
    }
}

impl fmt::Display for PhysicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalState::Liquid => write!(f, "liquid"),
            PhysicalState::Solid => write!(f, "solid"),
        }
    }
}

// ============================================================================
// UNITS
// ============================================================================

/// Units for liquids, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiquidUnit {
    Drop,
    Spoon,
    Vial,
    Bottle,
    Jug,
    Barrel,
    Storeroom,
}

impl LiquidUnit {
    /// Number of the previous liquid unit in one of this unit
    #[inline]
    #[must_use]
    pub const fn conversion_factor(self) -> u32 {
        match self {
            LiquidUnit::Drop => 1,
            LiquidUnit::Spoon => 8,
            LiquidUnit::Vial => 5,
            LiquidUnit::Bottle => 3,
            LiquidUnit::Jug => 7,
            LiquidUnit::Barrel => 12,
            LiquidUnit::Storeroom => 5,
        }
    }
}

/// Units for solids, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolidUnit {
    Pinch,
    Spoon,
    Sachet,
    Box,
    Sack,
    Chest,
    Storeroom,
}

impl SolidUnit {
    /// Number of the previous solid unit in one of this unit
    #[inline]
    #[must_use]
    pub const fn conversion_factor(self) -> u32 {
        match self {
            SolidUnit::Pinch => 1,
            SolidUnit::Spoon => 6,
            SolidUnit::Sachet => 7,
            SolidUnit::Box => 6,
            SolidUnit::Sack => 3,
            SolidUnit::Chest => 10,
            SolidUnit::Storeroom => 5,
        }
    }
}

static LIQUID_CHAIN: [Unit; 7] = [
    Unit::Liquid(LiquidUnit::Drop),
    Unit::Liquid(LiquidUnit::Spoon),
    Unit::Liquid(LiquidUnit::Vial),
    Unit::Liquid(LiquidUnit::Bottle),
    Unit::Liquid(LiquidUnit::Jug),
    Unit::Liquid(LiquidUnit::Barrel),
    Unit::Liquid(LiquidUnit::Storeroom),
];

static SOLID_CHAIN: [Unit; 7] = [
    Unit::Solid(SolidUnit::Pinch),
    Unit::Solid(SolidUnit::Spoon),
    Unit::Solid(SolidUnit::Sachet),
    Unit::Solid(SolidUnit::Box),
    Unit::Solid(SolidUnit::Sack),
    Unit::Solid(SolidUnit::Chest),
    Unit::Solid(SolidUnit::Storeroom),
];

/// A unit of either state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Liquid(LiquidUnit),
    Solid(SolidUnit),
}

impl Unit {
    /// State this unit measures
    #[inline]
    #[must_use]
    pub fn state(self) -> PhysicalState {
        match self {
            Unit::Liquid(_) => PhysicalState::Liquid,
            Unit::Solid(_) => PhysicalState::Solid,
        }
    }

    /// Number of the previous unit in one of this unit
    #[inline]
    #[must_use]
    pub fn conversion_factor(self) -> u32 {
        match self {
            Unit::Liquid(unit) => unit.conversion_factor(),
            Unit::Solid(unit) => unit.conversion_factor(),
        }
    }

    /// Position of this unit in its state's chain
    #[must_use]
    pub fn index(self) -> usize {
        self.state()
            .units()
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(0)
    }

    /// Size of one of this unit in its state's smallest unit
    #[must_use]
    pub fn flat_size(self) -> u64 {
        self.state().flat_sizes()[self.index()]
    }

    /// Whether this is the smallest unit of its chain
    #[inline]
    #[must_use]
    pub fn is_smallest(self) -> bool {
        self.index() == 0
    }

    /// Whether this is the largest unit of its chain
    #[inline]
    #[must_use]
    pub fn is_largest(self) -> bool {
        self.index() + 1 == self.state().unit_count()
    }
}

impl From<LiquidUnit> for Unit {
    fn from(unit: LiquidUnit) -> Self {
        Unit::Liquid(unit)
    }
}

impl From<SolidUnit> for Unit {
    fn from(unit: SolidUnit) -> Self {
        Unit::Solid(unit)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Liquid(unit) => write!(f, "{unit:?}"),
            Unit::Solid(unit) => write!(f, "{unit:?}"),
        }
    }
}
