//! The laboratory
//!
//! A laboratory stores ingredients sorted by name, at most one entry per
//! name, each at its type's standard temperature and physical state. Storage
//! is bounded by a capacity in storerooms. Ingredients enter through
//! [`Laboratory::add`], which routes them through the laboratory's devices to
//! normalize and merge them, and leave through [`Laboratory::get`].
//!
//! # Usage
//! ```
//! use alchemy_core::config::AlchemyConfig;
//! use alchemy_core::container::IngredientContainer;
//! use alchemy_core::core_types::{Ingredient, IngredientType, PhysicalState, Quantity};
//! use alchemy_core::core_types::units::LiquidUnit;
//! use alchemy_core::laboratory::Laboratory;
//! use alchemy_core::random::FixedRandom;
//!
//! let config = AlchemyConfig::default();
//! let mut lab = Laboratory::new(2, config);
//! let water = IngredientType::new("Water", PhysicalState::Liquid, (0, 20), 0.1, &config).unwrap();
//! let barrel = Quantity::of(LiquidUnit::Barrel.into(), 1).unwrap();
//! let barrel = Ingredient::new(water, barrel, &mut FixedRandom::NEUTRAL).unwrap();
//! lab.add(&mut IngredientContainer::package(barrel)).unwrap();
//!
//! let spoons = lab.get("Water", LiquidUnit::Spoon.into(), 3).unwrap();
//! assert_eq!(spoons.contents().unwrap().quantity().flatten(), 24);
//! assert_eq!(lab.ingredient_at(0).unwrap().quantity().flatten(), 10_080 - 24);
//! ```

pub mod executive;
pub mod recipe;
pub mod registry;

pub use executive::{ExecutiveRecipe, RecipeOutcome, StepFailure};
pub use recipe::{Amount, Instruction, Recipe, RecipeBook};
pub use registry::DeviceRegistry;

use crate::config::AlchemyConfig;
use crate::container::IngredientContainer;
use crate::core_types::{Ingredient, IngredientType, TemperatureState, Unit};
use crate::devices::DeviceKind;
use crate::error::{LabError, LabResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static NEXT_LAB_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a laboratory, carried by its devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LabId(u64);

impl LabId {
    pub(crate) fn next() -> Self {
        LabId(NEXT_LAB_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sorted, capacity-bounded ingredient storage with its devices
#[derive(Debug)]
pub struct Laboratory {
    id: LabId,
    capacity: u32,
    config: AlchemyConfig,
    storage: Vec<Ingredient>,
    devices: DeviceRegistry,
}

impl Laboratory {
    /// Empty laboratory holding up to `capacity` storerooms
    pub fn new(capacity: u32, config: AlchemyConfig) -> Self {
        Self {
            id: LabId::next(),
            capacity,
            config,
            storage: Vec::new(),
            devices: DeviceRegistry::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> LabId {
        self.id
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[inline]
    pub fn config(&self) -> &AlchemyConfig {
        &self.config
    }

    /// Number of stored ingredients
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn ingredient_at(&self, index: usize) -> Option<&Ingredient> {
        self.storage.get(index)
    }

    /// Stored ingredients in name order
    pub fn iter(&self) -> std::slice::Iter<'_, Ingredient> {
        self.storage.iter()
    }

    /// Storerooms currently in use
    pub fn total_storerooms(&self) -> f64 {
        self.storage.iter().map(Ingredient::size_in_storerooms).sum()
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    /// Index of the ingredient called `name`
    pub fn find(&self, name: &str) -> Option<usize> {
        self.storage
            .binary_search_by(|stored| stored.name().as_str().cmp(name))
            .ok()
    }

    /// Index at which an ingredient called `name` would be inserted
    ///
    /// Fails if the name is already stored.
    pub fn insertion_point(&self, name: &str) -> LabResult<usize> {
        match self
            .storage
            .binary_search_by(|stored| stored.name().as_str().cmp(name))
        {
            Ok(_) => Err(LabError::invalid_argument(format!(
                "'{name}' is already stored"
            ))),
            Err(index) => Ok(index),
        }
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Whether `ingredient` may be stored next to what is already here
    ///
    /// False when a different type is stored under the same name.
    pub fn is_valid_new_ingredient(&self, ingredient: &Ingredient) -> bool {
        match self.find(&ingredient.name()) {
            Some(index) => IngredientType::same(
                self.storage[index].ingredient_type(),
                ingredient.ingredient_type(),
            ),
            None => true,
        }
    }

    /// Whether storage is sorted, unique and fully normalized
    pub fn has_proper_ingredients(&self) -> bool {
        let sorted = self
            .storage
            .windows(2)
            .all(|pair| pair[0].name() < pair[1].name());
        sorted && self.storage.iter().all(Ingredient::is_standard)
    }

    // ========================================================================
    // ADMISSION
    // ========================================================================

    /// Store the container's ingredient, emptying the container
    ///
    /// The ingredient is brought to its standard temperature (cooling box
    /// for heated, oven for cooled) and standard state (transmogrifier), then
    /// merged into a stored ingredient of the same name through the kettle or
    /// inserted at its sorted position. Every device this needs must be
    /// installed; otherwise nothing is touched.
    pub fn add(&mut self, container: &mut IngredientContainer) -> LabResult<()> {
        let ingredient = container.contents().ok_or(LabError::EmptyContainer)?;
        if ingredient.is_terminated() {
            return Err(LabError::invalid_state(format!(
                "{} is terminated",
                ingredient.name()
            )));
        }
        let required = self.total_storerooms() + ingredient.size_in_storerooms();
        if required > f64::from(self.capacity) {
            return Err(LabError::StorageCapacity {
                required,
                capacity: self.capacity,
            });
        }
        let name = ingredient.name();
        if !self.is_valid_new_ingredient(ingredient) {
            return Err(LabError::InvalidIngredient { name });
        }

        let standard_state = ingredient.ingredient_type().state();
        let mut needed = Vec::new();
        match ingredient.temperature_state() {
            TemperatureState::Heated => needed.push(DeviceKind::CoolingBox),
            TemperatureState::Cooled => needed.push(DeviceKind::Oven),
            TemperatureState::Neutral => {}
        }
        if ingredient.state() != standard_state {
            if ingredient.quantity().transmogrified_flat(standard_state) == 0 {
                return Err(LabError::EmptyResult);
            }
            needed.push(DeviceKind::Transmogrifier);
        }
        let existing = self.find(&name);
        if existing.is_some() {
            needed.push(DeviceKind::Kettle);
        }
        if let Some(missing) = needed.iter().find(|kind| !self.has_device(**kind)) {
            return Err(LabError::invalid_state(format!(
                "laboratory {} needs a {missing} to store {name}",
                self.id
            )));
        }

        let ingredient = container.take().ok_or(LabError::EmptyContainer)?;
        let ingredient = self.normalize(ingredient)?;
        match existing {
            Some(index) => self.merge(index, ingredient),
            None => {
                let index = self.insertion_point(&name)?;
                debug!(lab = %self.id, %name, index, "storing new ingredient");
                self.storage.insert(index, ingredient);
                Ok(())
            }
        }
    }

    /// Bring an ingredient to its standard temperature and state
    fn normalize(&mut self, ingredient: Ingredient) -> LabResult<Ingredient> {
        let standard = ingredient.ingredient_type().standard_temperature();
        let standard_state = ingredient.ingredient_type().state();
        let device = match ingredient.temperature_state() {
            TemperatureState::Heated => Some(DeviceKind::CoolingBox),
            TemperatureState::Cooled => Some(DeviceKind::Oven),
            TemperatureState::Neutral => None,
        };
        let mut ingredient = match device {
            Some(kind) => {
                self.require_device(kind)?
                    .set_temperature(standard.coldness(), standard.hotness())?;
                self.run(kind, vec![ingredient])?
            }
            None => ingredient,
        };
        if ingredient.state() != standard_state {
            ingredient = self.run(DeviceKind::Transmogrifier, vec![ingredient])?;
        }
        ingredient.change_temperature_to(&standard);
        Ok(ingredient)
    }

    /// Feed `inputs` through a cleared device and collect the raw result
    fn run(&mut self, kind: DeviceKind, inputs: Vec<Ingredient>) -> LabResult<Ingredient> {
        let device = self.require_device(kind)?;
        device.clear();
        for ingredient in inputs {
            device.load(ingredient)?;
        }
        device.execute()?;
        device.take_result()
    }

    /// Merge `incoming` into the stored ingredient at `index`
    ///
    /// The mixture's characteristic volatility is the amount-weighted mean of
    /// both parts rather than the kettle's plain mean.
    fn merge(&mut self, index: usize, incoming: Ingredient) -> LabResult<()> {
        let stored = self.storage.remove(index);
        let stored_flat = stored.quantity().flatten() as f64;
        let incoming_flat = incoming.quantity().flatten() as f64;
        let characteristic = (stored.characteristic_volatility() * stored_flat
            + incoming.characteristic_volatility() * incoming_flat)
            / (stored_flat + incoming_flat);
        let standard = stored.ingredient_type().standard_temperature();
        let mut merged = self.run(DeviceKind::Kettle, vec![stored, incoming])?;
        merged.set_characteristic_volatility(characteristic)?;
        merged.change_temperature_to(&standard);
        let name = merged.name();
        let position = self.insertion_point(&name)?;
        debug!(
            lab = %self.id,
            %name,
            flat = merged.quantity().flatten(),
            characteristic,
            "merged into stored ingredient"
        );
        self.storage.insert(position, merged);
        Ok(())
    }

    // ========================================================================
    // WITHDRAWAL
    // ========================================================================

    /// Take `amount` of `unit` of the ingredient called `name`
    ///
    /// The portion comes packaged in the smallest container it fits in. The
    /// stored entry shrinks, and disappears once nothing is left.
    pub fn get(&mut self, name: &str, unit: Unit, amount: u32) -> LabResult<IngredientContainer> {
        let index = self.find(name).ok_or_else(|| LabError::NameNotFound {
            name: name.to_string(),
        })?;
        let stored = &self.storage[index];
        if unit.state() != stored.state() {
            return Err(LabError::invalid_argument(format!(
                "{name} is {} but {unit} measures {}",
                stored.state(),
                unit.state()
            )));
        }
        if amount == 0 {
            return Err(LabError::invalid_argument("cannot take zero units"));
        }
        let requested = unit.flat_size() * u64::from(amount);
        let limit = stored.state().largest_container_unit().flat_size();
        if requested > limit {
            return Err(LabError::ExceedsContainerCapacity { requested, limit });
        }
        let available = stored.quantity().flatten();
        if requested > available {
            return Err(LabError::ExceedsStorage {
                asked: requested,
                available,
            });
        }

        let portion = stored.portion(requested);
        let remaining = available - requested;
        if remaining == 0 {
            self.storage.remove(index);
        } else {
            let rest = stored.portion(remaining);
            self.storage[index] = rest;
        }
        debug!(lab = %self.id, name, requested, remaining, "withdrew ingredient");
        Ok(IngredientContainer::package(portion))
    }

    // ========================================================================
    // RECIPES
    // ========================================================================

    /// Run `recipe` with every amount multiplied by `factor`
    pub fn execute(&mut self, recipe: &Recipe, factor: u32) -> LabResult<RecipeOutcome> {
        ExecutiveRecipe::new(recipe, factor).run(self)
    }
}

impl<'a> IntoIterator for &'a Laboratory {
    type Item = &'a Ingredient;
    type IntoIter = std::slice::Iter<'a, Ingredient>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Laboratory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Laboratory {} ({:.3}/{} storerooms)",
            self.id,
            self.total_storerooms(),
            self.capacity
        )?;
        for ingredient in &self.storage {
            writeln!(
                f,
                "{}: {} spoons",
                ingredient.name(),
                ingredient.quantity().in_spoons()
            )?;
        }
        Ok(())
    }
}
