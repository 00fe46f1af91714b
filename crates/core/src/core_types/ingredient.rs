//! Alchemical ingredients
//!
//! An [`Ingredient`] is one batch of some [`IngredientType`]: a quantity in
//! the type's unit chain, a current temperature, a volatility, and the set of
//! types mixed into it. Ingredients are moved between containers, devices and
//! storage; once a device consumes one it is marked terminated.
//!
//! # Usage
//! ```
//! use alchemy_core::config::AlchemyConfig;
//! use alchemy_core::core_types::{Ingredient, IngredientType, PhysicalState, Quantity};
//! use alchemy_core::core_types::units::LiquidUnit;
//! use alchemy_core::random::FixedRandom;
//!
//! let config = AlchemyConfig::default();
//! let water = IngredientType::new("Water", PhysicalState::Liquid, (0, 20), 0.1, &config).unwrap();
//! let quantity = Quantity::of(LiquidUnit::Bottle.into(), 2).unwrap();
//! let batch = Ingredient::new(water, quantity, &mut FixedRandom::NEUTRAL).unwrap();
//! assert_eq!(batch.name(), "Water");
//! assert_eq!(batch.quantity().flatten(), 240);
//! ```

use crate::core_types::ingredient_type::IngredientType;
use crate::core_types::naming;
use crate::core_types::quantity::Quantity;
use crate::core_types::temperature::{Temperature, TemperatureState};
use crate::core_types::units::PhysicalState;
use crate::core_types::volatility::{Volatility, VolatilityClass};
use crate::error::{LabError, LabResult};
use crate::random::RandomSource;
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;

/// One batch of an ingredient type
#[derive(Debug, Clone)]
pub struct Ingredient {
    ty: Arc<IngredientType>,
    quantity: Quantity,
    temperature: Temperature,
    volatility: Volatility,
    special_name: Option<String>,
    mixed_in: Vec<Arc<IngredientType>>,
    terminated: bool,
}

impl Ingredient {
    /// New batch at the type's standard temperature
    ///
    /// The characteristic volatility is rolled from `rng`.
    pub fn new(
        ty: Arc<IngredientType>,
        quantity: Quantity,
        rng: &mut dyn RandomSource,
    ) -> LabResult<Self> {
        let temperature = ty.standard_temperature();
        Self::with_temperature(ty, quantity, temperature, rng)
    }

    /// New batch at an explicit temperature
    pub fn with_temperature(
        ty: Arc<IngredientType>,
        quantity: Quantity,
        temperature: Temperature,
        rng: &mut dyn RandomSource,
    ) -> LabResult<Self> {
        if quantity.state() != ty.state() {
            return Err(LabError::invalid_argument(format!(
                "{} quantity for a {} type",
                quantity.state(),
                ty.state()
            )));
        }
        if quantity.is_zero() {
            return Err(LabError::invalid_argument("ingredient with zero quantity"));
        }
        let volatility = Volatility::roll(ty.theoretical_volatility(), rng);
        let temperature = Temperature::with_max(
            temperature.coldness(),
            temperature.hotness(),
            ty.standard_temperature().max_temperature(),
        );
        Ok(Self::from_parts(
            ty,
            quantity,
            temperature,
            volatility,
            Vec::new(),
        ))
    }

    /// Assemble an ingredient from already-validated parts
    pub(crate) fn from_parts(
        ty: Arc<IngredientType>,
        quantity: Quantity,
        temperature: Temperature,
        volatility: Volatility,
        mixed_in: Vec<Arc<IngredientType>>,
    ) -> Self {
        let mut ingredient = Self {
            ty,
            quantity,
            temperature,
            volatility,
            special_name: None,
            mixed_in: Vec::new(),
            terminated: false,
        };
        for ty in mixed_in {
            ingredient.add_to_mix(ty);
        }
        ingredient
    }

    // ========================================================================
    // IDENTITY
    // ========================================================================

    #[inline]
    pub fn ingredient_type(&self) -> &Arc<IngredientType> {
        &self.ty
    }

    /// Types mixed into this ingredient, without duplicates
    pub fn mixed_in(&self) -> &[Arc<IngredientType>] {
        &self.mixed_in
    }

    pub(crate) fn add_to_mix(&mut self, ty: Arc<IngredientType>) {
        if !self.mixed_in.iter().any(|known| Arc::ptr_eq(known, &ty)) {
            self.mixed_in.push(ty);
        }
    }

    /// Simple name of the type, or the mixed name for nameless mixtures
    pub fn name(&self) -> String {
        match self.ty.name() {
            Some(name) => name.to_string(),
            None => self.mixed_name(),
        }
    }

    /// Sorted names of every named type in this ingredient
    ///
    /// `A`, `A mixed with B`, `A mixed with B, C and D`.
    pub fn mixed_name(&self) -> String {
        let mut seen = FxHashSet::default();
        let mut names: Vec<&str> = self
            .mixed_in
            .iter()
            .chain(std::iter::once(&self.ty))
            .filter(|ty| seen.insert(Arc::as_ptr(ty)))
            .filter_map(|ty| ty.name())
            .collect();
        names.sort_unstable();
        names.dedup();
        match names.as_slice() {
            [] => String::new(),
            [only] => (*only).to_string(),
            [first, second] => format!("{first} mixed with {second}"),
            [first, middle @ .., last] => {
                format!("{first} mixed with {} and {last}", middle.join(", "))
            }
        }
    }

    pub fn special_name(&self) -> Option<&str> {
        self.special_name.as_deref()
    }

    /// Give this ingredient a special name; must be a valid simple name
    pub fn set_special_name(&mut self, name: &str) -> LabResult<()> {
        if !naming::is_valid_simple_name(name) {
            return Err(LabError::invalid_argument(format!(
                "'{name}' is not a valid special name"
            )));
        }
        self.special_name = Some(name.trim().to_string());
        Ok(())
    }

    /// Mixed name prefixed with the volatility class and temperature state,
    /// wrapped in the special name when one is set
    pub fn total_name(&self) -> String {
        let mixed = self.mixed_name();
        let described = [
            self.volatility_class().prefix(),
            self.temperature_state().adjective(),
            mixed.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
        match &self.special_name {
            Some(special) => format!("{special} ({described})"),
            None => described,
        }
    }

    // ========================================================================
    // QUANTITY
    // ========================================================================

    #[inline]
    pub fn state(&self) -> PhysicalState {
        self.quantity.state()
    }

    #[inline]
    pub fn quantity(&self) -> &Quantity {
        &self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }

    /// Quantity in storerooms, the laboratory's capacity unit
    pub fn size_in_storerooms(&self) -> f64 {
        self.quantity.in_storerooms()
    }

    // ========================================================================
    // TEMPERATURE
    // ========================================================================

    #[inline]
    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn heat(&mut self, amount: i64) {
        self.temperature.heat(amount);
    }

    pub fn cool(&mut self, amount: i64) {
        self.temperature.cool(amount);
    }

    pub fn change_temperature_to(&mut self, target: &Temperature) {
        self.temperature.change_to(target);
    }

    /// Heated, Cooled or Neutral relative to the type's standard temperature
    pub fn temperature_state(&self) -> TemperatureState {
        self.temperature
            .state_relative_to(&self.ty.standard_temperature())
    }

    /// Whether this ingredient sits at its type's standard temperature and state
    pub fn is_standard(&self) -> bool {
        self.temperature_state() == TemperatureState::Neutral && self.state() == self.ty.state()
    }

    // ========================================================================
    // VOLATILITY
    // ========================================================================

    #[inline]
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    #[inline]
    pub fn characteristic_volatility(&self) -> f64 {
        self.volatility.characteristic()
    }

    pub(crate) fn set_characteristic_volatility(&mut self, value: f64) -> LabResult<()> {
        self.volatility.set_characteristic(value)
    }

    /// Volatility at the current temperature
    pub fn effective_volatility(&self) -> f64 {
        self.volatility
            .effective(&self.temperature, &self.ty.standard_temperature())
    }

    /// Volatility at the type's standard temperature
    pub fn standard_volatility(&self) -> f64 {
        self.volatility
            .standard(self.ty.standard_temperature().hotness())
    }

    pub fn volatility_class(&self) -> VolatilityClass {
        self.volatility
            .classify(&self.temperature, &self.ty.standard_temperature())
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub(crate) fn terminate(&mut self) {
        self.terminated = true;
    }

    /// Copy of this ingredient holding `flat` smallest units
    pub(crate) fn portion(&self, flat: u64) -> Self {
        let mut portion = self.clone();
        portion.quantity = Quantity::from_flat(self.state(), flat);
        portion
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} spoons at {}",
            self.total_name(),
            self.quantity.in_spoons(),
            self.temperature
        )
    }
}
