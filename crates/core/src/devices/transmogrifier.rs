//! State conversion
//!
//! The transmogrifier turns a liquid into a solid and back. The amount is
//! kept in spoons and re-expressed in the new state's smallest unit, rounding
//! down.

use crate::core_types::{Ingredient, Quantity};
use crate::error::{LabError, LabResult};
use tracing::debug;

/// Stateless liquid/solid converter
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Transmogrifier;

impl Transmogrifier {
    /// Convert `ingredient` to the other physical state
    pub(crate) fn transmogrify(self, mut ingredient: Ingredient) -> LabResult<Ingredient> {
        let target = ingredient.state().toggled();
        let flat = ingredient.quantity().transmogrified_flat(target);
        if flat == 0 {
            return Err(LabError::EmptyResult);
        }
        debug!(
            name = %ingredient.name(),
            from = %ingredient.state(),
            to = %target,
            flat,
            "transmogrifying ingredient"
        );
        ingredient.set_quantity(Quantity::from_flat(target, flat));
        Ok(ingredient)
    }
}
