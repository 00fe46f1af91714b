//! Recipe interpreter
//!
//! [`ExecutiveRecipe`] walks a recipe's instructions against a laboratory,
//! keeping the containers it has withdrawn on a stack. Steps that fail for a
//! missing device, an oversized request or an unknown name are recorded and
//! skipped. Running out of stock stops the recipe and puts everything on the
//! stack back into storage. Any other error also returns the stack before it
//! propagates. Devices work on copies of the withdrawn ingredients, so a
//! failed step never loses what the stack holds.
//!
//! Whatever happened, a final mix consolidates what is left on the stack into
//! the recipe's product.

use super::recipe::{Instruction, Recipe};
use super::Laboratory;
use crate::container::IngredientContainer;
use crate::devices::{Device, DeviceKind};
use crate::error::{LabError, LabResult};
use tracing::{debug, info, warn};

/// Temperature change applied by one `HeatUp` or `CoolDown`
pub const STEP_DELTA: i64 = 50;

/// A recipe step that failed without stopping the recipe
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    /// Position in the instruction list, `None` for the final mix
    pub step: Option<usize>,
    pub instruction: Instruction,
    pub error: LabError,
}

/// What running a recipe produced
#[derive(Debug, Default)]
pub struct RecipeOutcome {
    /// Result of the final mix, if anything was left to mix
    pub product: Option<IngredientContainer>,
    pub failures: Vec<StepFailure>,
    /// Whether the instruction loop stopped early for lack of stock
    pub aborted: bool,
    /// Containers that could not be put back into storage
    pub unreturned: Vec<IngredientContainer>,
}

/// Interpreter state for one run of a recipe
#[derive(Debug)]
pub struct ExecutiveRecipe<'r> {
    recipe: &'r Recipe,
    factor: u32,
    stack: Vec<IngredientContainer>,
    next_amount: usize,
}

impl<'r> ExecutiveRecipe<'r> {
    pub fn new(recipe: &'r Recipe, factor: u32) -> Self {
        Self {
            recipe,
            factor,
            stack: Vec::new(),
            next_amount: 0,
        }
    }

    #[inline]
    pub fn factor(&self) -> u32 {
        self.factor
    }

    /// Containers withdrawn and not yet mixed, oldest first
    pub fn in_flight(&self) -> &[IngredientContainer] {
        &self.stack
    }

    /// Run every instruction and the final mix against `lab`
    pub fn run(mut self, lab: &mut Laboratory) -> LabResult<RecipeOutcome> {
        if self.factor == 0 {
            return Err(LabError::invalid_argument("recipe factor must be at least 1"));
        }
        let recipe = self.recipe;
        info!(
            lab = %lab.id(),
            steps = recipe.instructions().len(),
            factor = self.factor,
            "executing recipe"
        );
        let mut outcome = RecipeOutcome::default();

        for (step, &instruction) in recipe.instructions().iter().enumerate() {
            let error = match self.step(lab, instruction) {
                Ok(()) => continue,
                Err(error) => error,
            };
            match error {
                LabError::ExceedsStorage { .. } => {
                    warn!(
                        step,
                        %instruction,
                        %error,
                        "out of stock, returning in-flight ingredients"
                    );
                    outcome.failures.push(StepFailure {
                        step: Some(step),
                        instruction,
                        error,
                    });
                    outcome.unreturned.extend(self.return_to_storage(lab));
                    outcome.aborted = true;
                    break;
                }
                LabError::InvalidState(_)
                | LabError::ExceedsContainerCapacity { .. }
                | LabError::NameNotFound { .. } => {
                    warn!(step, %instruction, %error, "skipping failed recipe step");
                    outcome.failures.push(StepFailure {
                        step: Some(step),
                        instruction,
                        error,
                    });
                }
                error => {
                    warn!(
                        step,
                        %instruction,
                        %error,
                        "recipe failed, returning in-flight ingredients"
                    );
                    self.return_to_storage(lab);
                    return Err(error);
                }
            }
        }

        if !self.stack.is_empty() {
            match self.mix(lab) {
                Ok(()) => outcome.product = self.stack.pop(),
                Err(error) => {
                    warn!(%error, "final mix failed, returning in-flight ingredients");
                    outcome.failures.push(StepFailure {
                        step: None,
                        instruction: Instruction::Mix,
                        error,
                    });
                    outcome.unreturned.extend(self.return_to_storage(lab));
                }
            }
        }

        info!(
            lab = %lab.id(),
            product = outcome.product.is_some(),
            failures = outcome.failures.len(),
            aborted = outcome.aborted,
            "recipe finished"
        );
        Ok(outcome)
    }

    fn step(&mut self, lab: &mut Laboratory, instruction: Instruction) -> LabResult<()> {
        match instruction {
            Instruction::Add => self.add(lab),
            Instruction::HeatUp => self.change_temperature(lab, DeviceKind::Oven, STEP_DELTA),
            Instruction::CoolDown => {
                self.change_temperature(lab, DeviceKind::CoolingBox, -STEP_DELTA)
            }
            Instruction::Mix => self.mix(lab),
        }
    }

    /// Withdraw the next amount, scaled by the factor
    ///
    /// The amount only counts as used once it is withdrawn; after a failed
    /// withdrawal the next `Add` tries the same amount again.
    fn add(&mut self, lab: &mut Laboratory) -> LabResult<()> {
        let amount = self
            .recipe
            .amounts()
            .get(self.next_amount)
            .ok_or_else(|| LabError::invalid_state("recipe has no amount left for this add"))?;
        let count = amount.quantity().saturating_mul(self.factor);
        let container = lab.get(amount.name(), amount.unit(), count)?;
        self.next_amount += 1;
        debug!(name = amount.name(), count, unit = %amount.unit(), "recipe withdrew ingredient");
        self.stack.push(container);
        Ok(())
    }

    /// Run the latest container through a temperature device set `delta`
    /// away from its current temperature
    fn change_temperature(
        &mut self,
        lab: &mut Laboratory,
        kind: DeviceKind,
        delta: i64,
    ) -> LabResult<()> {
        let current = self
            .stack
            .last()
            .and_then(IngredientContainer::contents)
            .map(|ingredient| ingredient.temperature())
            .ok_or(LabError::EmptyResult)?;
        let device = lab.require_device(kind)?;
        device.clear();
        device.set_temperature(current.coldness(), current.hotness())?;
        device.delta_temperature(delta)?;

        let outcome = Self::process_copy(device, &self.stack);
        device.clear();
        let processed = outcome?;
        self.stack.pop();
        self.stack.push(processed);
        Ok(())
    }

    /// Run a copy of the latest container's ingredient through `device`
    fn process_copy(
        device: &mut Device,
        stack: &[IngredientContainer],
    ) -> LabResult<IngredientContainer> {
        let ingredient = stack
            .last()
            .and_then(IngredientContainer::contents)
            .ok_or(LabError::EmptyResult)?;
        device.load(ingredient.clone())?;
        device.execute()?;
        device.result()
    }

    /// Mix the whole stack in the kettle and push the mixture
    ///
    /// The kettle works on copies, so a failed mix leaves the stack as it was
    /// for the rollback to return.
    fn mix(&mut self, lab: &mut Laboratory) -> LabResult<()> {
        if self.stack.is_empty() {
            return Err(LabError::EmptyResult);
        }
        let kettle = lab.require_device(DeviceKind::Kettle)?;
        kettle.clear();
        let outcome = Self::mix_copies(kettle, &self.stack);
        kettle.clear();
        let mixture = outcome?;
        self.stack.clear();
        self.stack.push(mixture);
        Ok(())
    }

    fn mix_copies(
        kettle: &mut Device,
        stack: &[IngredientContainer],
    ) -> LabResult<IngredientContainer> {
        for ingredient in stack.iter().filter_map(IngredientContainer::contents) {
            kettle.load(ingredient.clone())?;
        }
        kettle.execute()?;
        kettle.result()
    }

    /// Put every in-flight container back into `lab`, newest first
    ///
    /// Returns the containers the laboratory refused.
    fn return_to_storage(&mut self, lab: &mut Laboratory) -> Vec<IngredientContainer> {
        let mut refused = Vec::new();
        while let Some(mut container) = self.stack.pop() {
            if container.is_empty() {
                continue;
            }
            if let Err(error) = lab.add(&mut container) {
                warn!(
                    %error,
                    container = %container.name(),
                    "could not return ingredient to storage"
                );
                refused.push(container);
            }
        }
        refused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AlchemyConfig;
    use crate::core_types::units::{LiquidUnit, SolidUnit};
    use crate::core_types::{Ingredient, IngredientType, PhysicalState, Quantity};
    use crate::laboratory::recipe::Amount;
    use crate::random::FixedRandom;
    use std::sync::Arc;

    fn liquid(name: &str, hot: i64) -> Arc<IngredientType> {
        IngredientType::new(name, PhysicalState::Liquid, (0, hot), 0.2, &AlchemyConfig::default())
            .unwrap()
    }

    fn stocked_lab(types: &[&Arc<IngredientType>]) -> Laboratory {
        let mut lab = Laboratory::new(10, AlchemyConfig::default());
        lab.install_oven_with_rng((0, 20), Box::new(FixedRandom::NEUTRAL))
            .unwrap();
        lab.install_cooling_box((0, 20)).unwrap();
        lab.install_kettle().unwrap();
        for ty in types {
            let barrel = Ingredient::new(
                Arc::clone(ty),
                Quantity::of(LiquidUnit::Bottle.into(), 1).unwrap(),
                &mut FixedRandom::NEUTRAL,
            )
            .unwrap();
            lab.add(&mut IngredientContainer::package(barrel)).unwrap();
        }
        lab
    }

    fn amount(ty: &Arc<IngredientType>, spoons: u32) -> Amount {
        Amount::new(Arc::clone(ty), LiquidUnit::Spoon.into(), spoons).unwrap()
    }

    #[test]
    fn test_heat_then_mix() {
        let coke = liquid("Coke", 20);
        let beer = liquid("Beer", 20);
        let mut lab = stocked_lab(&[&coke, &beer]);
        let recipe = Recipe::new(
            vec![
                Instruction::Add,
                Instruction::HeatUp,
                Instruction::Add,
                Instruction::Mix,
            ],
            vec![amount(&coke, 1), amount(&beer, 1)],
        )
        .unwrap();
        let outcome = lab.execute(&recipe, 2).unwrap();
        assert!(outcome.failures.is_empty());
        assert!(!outcome.aborted);
        let product = outcome.product.unwrap();
        let mixture = product.contents().unwrap();
        assert_eq!(mixture.quantity().flatten(), 32);
        // (2 spoons at 70 + 2 spoons at 20) / 4
        assert_eq!(mixture.temperature().hotness(), 45);
        assert_eq!(mixture.name(), "Beer mixed with Coke");
        assert_eq!(lab.ingredient_at(0).unwrap().quantity().flatten(), 120 - 16);
    }

    #[test]
    fn test_cool_down() {
        let coke = liquid("Coke", 20);
        let mut lab = stocked_lab(&[&coke]);
        let recipe = Recipe::new(
            vec![Instruction::Add, Instruction::CoolDown],
            vec![amount(&coke, 1)],
        )
        .unwrap();
        let outcome = lab.execute(&recipe, 1).unwrap();
        let product = outcome.product.unwrap();
        assert_eq!(product.contents().unwrap().temperature().coldness(), 30);
    }

    #[test]
    fn test_out_of_stock_rolls_back() {
        let coke = liquid("Coke", 20);
        let beer = liquid("Beer", 20);
        let mut lab = stocked_lab(&[&coke, &beer]);
        let recipe = Recipe::new(
            vec![Instruction::Add, Instruction::Add, Instruction::Mix],
            vec![amount(&coke, 2), amount(&beer, 20)],
        )
        .unwrap();
        let outcome = lab.execute(&recipe, 1).unwrap();
        assert!(outcome.aborted);
        assert!(outcome.product.is_none());
        assert!(outcome.unreturned.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert!(matches!(
            outcome.failures[0].error,
            LabError::ExceedsStorage { .. }
        ));
        assert_eq!(lab.ingredient_at(1).unwrap().quantity().flatten(), 120);
        assert_eq!(lab.ingredient_at(0).unwrap().quantity().flatten(), 120);
    }

    #[test]
    fn test_missing_device_is_skipped() {
        let coke = liquid("Coke", 20);
        let mut lab = Laboratory::new(10, AlchemyConfig::default());
        lab.install_kettle().unwrap();
        let bottle = Ingredient::new(
            Arc::clone(&coke),
            Quantity::of(LiquidUnit::Bottle.into(), 1).unwrap(),
            &mut FixedRandom::NEUTRAL,
        )
        .unwrap();
        lab.add(&mut IngredientContainer::package(bottle)).unwrap();
        let recipe = Recipe::new(
            vec![Instruction::Add, Instruction::HeatUp, Instruction::Mix],
            vec![amount(&coke, 1)],
        )
        .unwrap();
        let outcome = lab.execute(&recipe, 1).unwrap();
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].step, Some(1));
        let product = outcome.product.unwrap();
        assert_eq!(product.contents().unwrap().temperature().hotness(), 20);
    }

    #[test]
    fn test_unknown_name_is_skipped() {
        let coke = liquid("Coke", 20);
        let ghost = liquid("Ghost", 20);
        let mut lab = stocked_lab(&[&coke]);
        let recipe = Recipe::new(
            vec![
                Instruction::Add,
                Instruction::Add,
                Instruction::Add,
                Instruction::Mix,
            ],
            vec![amount(&coke, 1), amount(&ghost, 1), amount(&coke, 2)],
        )
        .unwrap();
        let outcome = lab.execute(&recipe, 1).unwrap();
        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(outcome.failures[0].step, Some(1));
        assert!(matches!(
            outcome.failures[0].error,
            LabError::NameNotFound { .. }
        ));
        // Only the first amount was withdrawn
        assert_eq!(
            outcome.product.unwrap().contents().unwrap().quantity().flatten(),
            8
        );
        assert_eq!(lab.ingredient_at(0).unwrap().quantity().flatten(), 112);
    }

    #[test]
    fn test_failed_add_retries_same_amount() {
        let coke = liquid("Coke", 20);
        let ghost = liquid("Ghost", 20);
        let mut lab = stocked_lab(&[&coke]);
        let recipe = Recipe::new(
            vec![Instruction::Add, Instruction::Add],
            vec![amount(&ghost, 1), amount(&coke, 1)],
        )
        .unwrap();
        let outcome = lab.execute(&recipe, 1).unwrap();
        assert_eq!(outcome.failures.len(), 2);
        for failure in &outcome.failures {
            assert_eq!(
                failure.error,
                LabError::NameNotFound {
                    name: "Ghost".into()
                }
            );
        }
        assert!(outcome.product.is_none());
        assert_eq!(lab.ingredient_at(0).unwrap().quantity().flatten(), 120);
    }

    fn salt() -> Arc<IngredientType> {
        IngredientType::new("Salt", PhysicalState::Solid, (0, 20), 0.1, &AlchemyConfig::default())
            .unwrap()
    }

    fn stock(lab: &Laboratory) -> u64 {
        lab.iter().map(|ingredient| ingredient.quantity().flatten()).sum()
    }

    fn drop_and_pinch_lab() -> Laboratory {
        let salt = salt();
        let mut lab = stocked_lab(&[&liquid("Water", 20)]);
        let sachet = Ingredient::new(
            salt,
            Quantity::of(SolidUnit::Sachet.into(), 1).unwrap(),
            &mut FixedRandom::NEUTRAL,
        )
        .unwrap();
        lab.add(&mut IngredientContainer::package(sachet)).unwrap();
        lab
    }

    /// Add one drop of water, run `between`, add one pinch of salt, run `after`
    fn drop_and_pinch(lab: &Laboratory, between: &[Instruction], after: &[Instruction]) -> Recipe {
        let water = Arc::clone(lab.ingredient_at(1).unwrap().ingredient_type());
        let salt = Arc::clone(lab.ingredient_at(0).unwrap().ingredient_type());
        let mut instructions = vec![Instruction::Add];
        instructions.extend_from_slice(between);
        instructions.push(Instruction::Add);
        instructions.extend_from_slice(after);
        Recipe::new(
            instructions,
            vec![
                Amount::new(water, LiquidUnit::Drop.into(), 1).unwrap(),
                Amount::new(salt, SolidUnit::Pinch.into(), 1).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_failed_mix_returns_withdrawn_stock() {
        let mut lab = drop_and_pinch_lab();
        let before = stock(&lab);
        let recipe = drop_and_pinch(&lab, &[], &[Instruction::Mix]);
        // One drop and one pinch make less than a spoon
        assert_eq!(lab.execute(&recipe, 1).unwrap_err(), LabError::EmptyResult);
        assert_eq!(stock(&lab), before);
        assert!(lab.has_proper_ingredients());
        assert!(lab
            .device(DeviceKind::Kettle)
            .unwrap()
            .hopper()
            .is_empty());
    }

    #[test]
    fn test_failed_final_mix_reports_unreturned() {
        let mut lab = drop_and_pinch_lab();
        let before = stock(&lab);
        let cooling_box = lab.remove_device(DeviceKind::CoolingBox).unwrap();
        let recipe = drop_and_pinch(&lab, &[Instruction::HeatUp], &[]);

        let outcome = lab.execute(&recipe, 1).unwrap();
        assert!(outcome.product.is_none());
        assert!(!outcome.aborted);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].step, None);
        assert_eq!(outcome.failures[0].error, LabError::EmptyResult);

        // The heated drop cannot be stored without a cooling box
        assert_eq!(outcome.unreturned.len(), 1);
        let heated = outcome.unreturned[0].contents().unwrap();
        assert_eq!(heated.name(), "Water");
        assert_eq!(heated.quantity().flatten(), 1);
        assert_eq!(stock(&lab), before - 1);

        lab.attach_device(cooling_box).unwrap();
        let mut heated = outcome.unreturned.into_iter().next().unwrap();
        lab.add(&mut heated).unwrap();
        assert_eq!(stock(&lab), before);
    }

    #[test]
    fn test_zero_factor_is_rejected() {
        let coke = liquid("Coke", 20);
        let mut lab = stocked_lab(&[&coke]);
        let recipe = Recipe::new(vec![Instruction::Add], vec![amount(&coke, 1)]).unwrap();
        assert!(matches!(
            lab.execute(&recipe, 0),
            Err(LabError::InvalidArgument(_))
        ));
    }
}
