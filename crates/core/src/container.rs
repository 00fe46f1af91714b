//! Ingredient containers
//!
//! A container has a capacity unit and holds at most one ingredient that fits
//! in one of that unit. Drops, pinches and storerooms are not container
//! sizes.

use crate::core_types::{Ingredient, PhysicalState, Unit};
use crate::error::{LabError, LabResult};
use std::fmt;
use tracing::debug;

/// A named vessel of one unit's capacity
#[derive(Debug, Clone)]
pub struct IngredientContainer {
    name: String,
    capacity: Unit,
    contents: Option<Ingredient>,
}

impl IngredientContainer {
    /// Empty container of `capacity`
    pub fn new(name: impl Into<String>, capacity: Unit) -> LabResult<Self> {
        if !Self::is_valid_capacity(capacity) {
            return Err(LabError::invalid_argument(format!(
                "{capacity} is not a container size"
            )));
        }
        Ok(Self {
            name: name.into(),
            capacity,
            contents: None,
        })
    }

    /// Container of `capacity` already holding `ingredient`
    pub fn with_contents(
        name: impl Into<String>,
        capacity: Unit,
        ingredient: Ingredient,
    ) -> LabResult<Self> {
        let mut container = Self::new(name, capacity)?;
        if !container.can_have_as_contents(&ingredient) {
            return Err(LabError::ExceedsContainerCapacity {
                requested: ingredient.quantity().flatten(),
                limit: capacity.flat_size(),
            });
        }
        container.contents = Some(ingredient);
        Ok(container)
    }

    /// Whether `unit` can be a container capacity
    pub fn is_valid_capacity(unit: Unit) -> bool {
        !unit.is_smallest() && !unit.is_largest()
    }

    /// Whether `ingredient` fits in one of this container's unit
    pub fn can_have_as_contents(&self, ingredient: &Ingredient) -> bool {
        ingredient.quantity().fits(self.capacity)
    }

    /// Package `ingredient` in the smallest container size it fits in
    ///
    /// Sizes are tried from the second-smallest unit upwards. Content too
    /// large for the biggest container size is truncated to exactly one of
    /// that size.
    pub fn package(mut ingredient: Ingredient) -> Self {
        let state = ingredient.state();
        let capacity = container_sizes(state)
            .iter()
            .copied()
            .find(|unit| ingredient.quantity().fits(*unit))
            .unwrap_or_else(|| {
                let largest = state.largest_container_unit();
                let mut quantity = ingredient.quantity().clone();
                debug!(
                    from = quantity.flatten(),
                    to = largest.flat_size(),
                    "truncating ingredient to fit the largest container"
                );
                quantity.can(largest);
                ingredient.set_quantity(quantity);
                largest
            });
        Self {
            name: capacity.to_string(),
            capacity,
            contents: Some(ingredient),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn capacity(&self) -> Unit {
        self.capacity
    }

    pub fn contents(&self) -> Option<&Ingredient> {
        self.contents.as_ref()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contents.is_none()
    }

    /// Remove and return the contents
    pub fn take(&mut self) -> Option<Ingredient> {
        self.contents.take()
    }

    /// Discard the contents
    pub fn empty(&mut self) {
        self.contents = None;
    }

    pub fn into_contents(self) -> Option<Ingredient> {
        self.contents
    }
}

impl fmt::Display for IngredientContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.contents {
            Some(ingredient) => write!(f, "{} ({}) of {}", self.name, self.capacity, ingredient),
            None => write!(f, "{} ({}), empty", self.name, self.capacity),
        }
    }
}

/// Units usable as container capacities, smallest first
fn container_sizes(state: PhysicalState) -> &'static [Unit] {
    let units = state.units();
    &units[1..units.len() - 1]
}
