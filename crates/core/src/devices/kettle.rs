//! Mixing
//!
//! The kettle combines every queued ingredient into one. State and standard
//! temperature come from the input whose standard temperature lies closest
//! to the reference `[0, 20]`. Quantities add up, temperatures average by
//! spoon weight, and volatilities average plainly. Mixing different types
//! synthesizes a nameless type; mixing one type keeps it.
//!
//! Liquids and solids only meet on a spoon basis, and whatever is left below
//! one spoon is lost in the process.

use crate::core_types::{
    Ingredient, IngredientType, PhysicalState, Quantity, Temperature, Volatility,
};
use crate::error::{LabError, LabResult};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// Reference temperature `(coldness, hotness)` the mixed state is chosen by
pub const REFERENCE_TEMPERATURE: (i64, i64) = (0, 20);

/// Stateless mixing rule
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Kettle;

fn distance_to_reference(ingredient: &Ingredient) -> i128 {
    let (coldness, hotness) = REFERENCE_TEMPERATURE;
    let standard = ingredient.ingredient_type().standard_temperature();
    (i128::from(standard.signed()) - i128::from(hotness - coldness)).abs()
}

/// Index of the input whose state the mixture takes
///
/// Scanning in insertion order, a candidate wins on a strictly smaller
/// distance, or on an equal one when the current pick is solid and the
/// candidate is not.
fn state_source(inputs: &[Ingredient]) -> usize {
    let mut best = 0;
    for (index, candidate) in inputs.iter().enumerate() {
        let current = &inputs[best];
        let ordering = distance_to_reference(candidate).cmp(&distance_to_reference(current));
        let replaces = match ordering {
            Ordering::Less => true,
            Ordering::Equal => {
                current.state() == PhysicalState::Solid && candidate.state() != current.state()
            }
            Ordering::Greater => false,
        };
        if replaces {
            best = index;
        }
    }
    best
}

/// Index of the input whose standard temperature the mixture takes
///
/// Ties go to the hotter standard.
fn standard_source(inputs: &[Ingredient]) -> usize {
    let mut best = 0;
    for (index, candidate) in inputs.iter().enumerate() {
        let current = &inputs[best];
        let ordering = distance_to_reference(candidate).cmp(&distance_to_reference(current));
        let hotter = Temperature::difference(
            &candidate.ingredient_type().standard_temperature(),
            &current.ingredient_type().standard_temperature(),
        ) > 0;
        if ordering == Ordering::Less || (ordering == Ordering::Equal && hotter) {
            best = index;
        }
    }
    best
}

/// Flat amount of the mixture in `state`'s smallest unit
fn mixed_flat(inputs: &[Ingredient], state: PhysicalState) -> u64 {
    let flat_of = |wanted: PhysicalState| -> u64 {
        inputs
            .iter()
            .filter(|ingredient| ingredient.state() == wanted)
            .map(|ingredient| ingredient.quantity().flatten())
            .sum()
    };
    let liquid = flat_of(PhysicalState::Liquid);
    let solid = flat_of(PhysicalState::Solid);
    if liquid == 0 || solid == 0 {
        return liquid + solid;
    }
    let liquid_spoon = PhysicalState::Liquid.spoon_factor();
    let solid_spoon = PhysicalState::Solid.spoon_factor();
    let spoons = liquid / liquid_spoon
        + solid / solid_spoon
        + ((liquid % liquid_spoon) * solid_spoon + (solid % solid_spoon) * liquid_spoon)
            / (liquid_spoon * solid_spoon);
    spoons * state.spoon_factor()
}

impl Kettle {
    /// Mix `inputs` into one ingredient, terminating each input
    pub(crate) fn mix(self, mut inputs: Vec<Ingredient>) -> LabResult<Ingredient> {
        if inputs.is_empty() {
            return Err(LabError::EmptyResult);
        }
        let state = inputs[state_source(&inputs)].state();
        let standard = inputs[standard_source(&inputs)]
            .ingredient_type()
            .standard_temperature();

        let flat = mixed_flat(&inputs, state);
        if flat == 0 {
            return Err(LabError::EmptyResult);
        }
        let quantity = Quantity::from_flat(state, flat);

        let weighted: f64 = inputs
            .iter()
            .map(|ingredient| {
                ingredient.quantity().in_spoons() * ingredient.temperature().signed() as f64
            })
            .sum();
        let mean = (weighted / quantity.in_spoons()) as i64;
        let mut temperature = standard;
        temperature.change_to(&Temperature::from_signed(mean, standard.max_temperature()));

        let count = inputs.len() as f64;
        let characteristic = inputs
            .iter()
            .map(Ingredient::characteristic_volatility)
            .sum::<f64>()
            / count;
        let theoretical = inputs
            .iter()
            .map(|ingredient| ingredient.ingredient_type().theoretical_volatility())
            .sum::<f64>()
            / count;
        let volatility = Volatility::with_characteristic(theoretical, characteristic)?;

        let first = Arc::clone(inputs[0].ingredient_type());
        let ty = if inputs
            .iter()
            .all(|ingredient| IngredientType::same(ingredient.ingredient_type(), &first))
        {
            first
        } else {
            IngredientType::mixture(state, standard, theoretical)
        };

        let mut mixed_in = Vec::new();
        for ingredient in &mut inputs {
            mixed_in.extend(ingredient.mixed_in().iter().cloned());
            mixed_in.push(Arc::clone(ingredient.ingredient_type()));
            ingredient.terminate();
        }

        let result = Ingredient::from_parts(ty, quantity, temperature, volatility, mixed_in);
        debug!(
            inputs = inputs.len(),
            name = %result.name(),
            flat,
            temperature = %result.temperature(),
            "kettle mixed ingredients"
        );
        Ok(result)
    }
}
