//! End-to-end laboratory scenarios
//!
//! These tests drive a laboratory only through the public API: stocking it,
//! withdrawing ingredients, running them through devices and executing
//! recipes from a recipe book.

use alchemy_core::core_types::units::{LiquidUnit, PhysicalState, SolidUnit, Unit};
use alchemy_core::core_types::{Ingredient, IngredientType, Quantity, Temperature, VolatilityClass};
use alchemy_core::laboratory::Amount;
use alchemy_core::{
    AlchemyConfig, DeviceKind, FixedRandom, IngredientContainer, Instruction, LabError,
    Laboratory, Recipe, RecipeBook, SeededRandom,
};
use approx::assert_relative_eq;
use std::sync::Arc;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn config() -> AlchemyConfig {
    AlchemyConfig::default()
}

fn equipped_lab(capacity: u32) -> Laboratory {
    let mut lab = Laboratory::new(capacity, config());
    lab.install_oven_with_rng((0, 20), Box::new(FixedRandom::NEUTRAL))
        .unwrap();
    lab.install_cooling_box((0, 20)).unwrap();
    lab.install_kettle().unwrap();
    lab.install_transmogrifier().unwrap();
    lab
}

fn batch(ty: &Arc<IngredientType>, unit: Unit, count: u32) -> IngredientContainer {
    let ingredient = Ingredient::new(
        Arc::clone(ty),
        Quantity::of(unit, count).unwrap(),
        &mut FixedRandom::NEUTRAL,
    )
    .unwrap();
    IngredientContainer::package(ingredient)
}

#[test]
fn test_withdraw_spoons_of_liquid_and_solid() {
    let mut lab = equipped_lab(10);
    let water =
        IngredientType::new("Water", PhysicalState::Liquid, (0, 20), 0.1, &config()).unwrap();
    let salt = IngredientType::new("Salt", PhysicalState::Solid, (0, 20), 0.05, &config()).unwrap();
    lab.add(&mut batch(&water, LiquidUnit::Jug.into(), 1)).unwrap();
    lab.add(&mut batch(&salt, SolidUnit::Box.into(), 1)).unwrap();

    // Stored alphabetically
    assert_eq!(lab.ingredient_at(0).unwrap().name(), "Salt");
    assert_eq!(lab.ingredient_at(1).unwrap().name(), "Water");
    assert!(lab.has_proper_ingredients());

    let salt_before = lab.ingredient_at(0).unwrap().quantity().flatten();
    let water_spoons = lab.get("Water", LiquidUnit::Spoon.into(), 3).unwrap();
    let salt_spoons = lab.get("Salt", SolidUnit::Spoon.into(), 3).unwrap();

    let water_portion = water_spoons.contents().unwrap();
    let salt_portion = salt_spoons.contents().unwrap();
    assert_relative_eq!(water_portion.quantity().in_spoons(), 3.0);
    assert_relative_eq!(salt_portion.quantity().in_spoons(), 3.0);
    assert_eq!(water_spoons.capacity(), Unit::from(LiquidUnit::Vial));
    assert_eq!(
        lab.ingredient_at(0).unwrap().quantity().flatten(),
        salt_before - 3 * PhysicalState::Solid.spoon_factor()
    );

    let listing = lab.to_string();
    let salt_line = listing.find("Salt:").unwrap();
    let water_line = listing.find("Water:").unwrap();
    assert!(salt_line < water_line);
}

#[test]
fn test_merging_weights_volatility_by_amount() {
    let mut lab = equipped_lab(10);
    let water =
        IngredientType::new("Water", PhysicalState::Liquid, (0, 20), 0.5, &config()).unwrap();
    // Draws of 0 and 1 sit at the edges of the ±10% spread
    let low = Ingredient::new(
        Arc::clone(&water),
        Quantity::of(LiquidUnit::Bottle.into(), 1).unwrap(),
        &mut FixedRandom(0.0),
    )
    .unwrap();
    let high = Ingredient::new(
        Arc::clone(&water),
        Quantity::of(LiquidUnit::Bottle.into(), 3).unwrap(),
        &mut FixedRandom(1.0),
    )
    .unwrap();
    assert_relative_eq!(low.characteristic_volatility(), 0.45, epsilon = 1e-12);
    assert_relative_eq!(high.characteristic_volatility(), 0.55, epsilon = 1e-12);

    lab.add(&mut IngredientContainer::package(low)).unwrap();
    lab.add(&mut IngredientContainer::package(high)).unwrap();

    assert_eq!(lab.len(), 1);
    let stored = lab.ingredient_at(0).unwrap();
    assert_eq!(stored.quantity().flatten(), 4 * 120);
    assert!(IngredientType::same(stored.ingredient_type(), &water));
    assert_relative_eq!(
        stored.characteristic_volatility(),
        (0.45 * 120.0 + 0.55 * 360.0) / 480.0,
        epsilon = 1e-12
    );
}

#[test]
fn test_admission_restores_standard_temperature() {
    let mut lab = equipped_lab(10);
    let water =
        IngredientType::new("Water", PhysicalState::Liquid, (0, 20), 0.1, &config()).unwrap();
    let hot = Ingredient::with_temperature(
        Arc::clone(&water),
        Quantity::of(LiquidUnit::Vial.into(), 2).unwrap(),
        Temperature::new(0, 90, &config()),
        &mut FixedRandom::NEUTRAL,
    )
    .unwrap();
    let cold = Ingredient::with_temperature(
        Arc::clone(&water),
        Quantity::of(LiquidUnit::Vial.into(), 1).unwrap(),
        Temperature::new(15, 0, &config()),
        &mut FixedRandom::NEUTRAL,
    )
    .unwrap();

    lab.add(&mut IngredientContainer::package(hot)).unwrap();
    lab.add(&mut IngredientContainer::package(cold)).unwrap();

    let stored = lab.ingredient_at(0).unwrap();
    assert!(stored.is_standard());
    assert!(stored
        .temperature()
        .same_reading(&water.standard_temperature()));
    assert_eq!(stored.quantity().flatten(), 3 * 40);
}

#[test]
fn test_admission_without_needed_device_leaves_container_untouched() {
    let mut lab = Laboratory::new(10, config());
    lab.install_oven((0, 20)).unwrap();
    let water =
        IngredientType::new("Water", PhysicalState::Liquid, (0, 20), 0.1, &config()).unwrap();
    let hot = Ingredient::with_temperature(
        Arc::clone(&water),
        Quantity::of(LiquidUnit::Vial.into(), 1).unwrap(),
        Temperature::new(0, 90, &config()),
        &mut FixedRandom::NEUTRAL,
    )
    .unwrap();
    let mut container = IngredientContainer::package(hot);

    let err = lab.add(&mut container).unwrap_err();
    assert!(matches!(err, LabError::InvalidState(_)));
    assert!(!container.is_empty());
    assert!(lab.is_empty());
}

#[test]
fn test_transmogrified_ingredient_returns_to_standard_state() {
    let mut lab = equipped_lab(10);
    let water =
        IngredientType::new("Water", PhysicalState::Liquid, (0, 20), 0.1, &config()).unwrap();
    lab.add(&mut batch(&water, LiquidUnit::Bottle.into(), 1)).unwrap();

    let mut spoons = lab.get("Water", LiquidUnit::Spoon.into(), 3).unwrap();
    let transmogrifier = lab.device_mut(DeviceKind::Transmogrifier).unwrap();
    transmogrifier.add(&mut spoons).unwrap();
    transmogrifier.execute().unwrap();
    let mut ice = transmogrifier.result().unwrap();
    let frozen = ice.contents().unwrap();
    assert_eq!(frozen.state(), PhysicalState::Solid);
    assert_relative_eq!(frozen.quantity().in_spoons(), 3.0);

    lab.add(&mut ice).unwrap();
    let stored = lab.ingredient_at(0).unwrap();
    assert_eq!(stored.state(), PhysicalState::Liquid);
    assert_eq!(stored.quantity().flatten(), 120);
}

#[test]
fn test_single_slot_device_evicts_oldest() {
    let mut lab = equipped_lab(10);
    let water =
        IngredientType::new("Water", PhysicalState::Liquid, (0, 20), 0.1, &config()).unwrap();
    let oven = lab.device_mut(DeviceKind::Oven).unwrap();
    let mut first = batch(&water, LiquidUnit::Spoon.into(), 1);
    let mut second = batch(&water, LiquidUnit::Spoon.into(), 2);

    assert!(oven.add(&mut first).unwrap().is_none());
    let evicted = oven.add(&mut second).unwrap().unwrap();
    assert!(evicted.is_terminated());
    assert_eq!(evicted.quantity().flatten(), 8);
    assert_eq!(oven.hopper().len(), 1);

    // A terminated ingredient cannot go back into a device
    let mut dead = IngredientContainer::package(evicted);
    assert!(matches!(
        oven.add(&mut dead),
        Err(LabError::InvalidState(_))
    ));
}

#[test]
fn test_oven_heats_cat_into_danger() {
    let mut lab = Laboratory::new(10, config());
    lab.install_oven_with_rng((0, 20), Box::new(FixedRandom::NEUTRAL))
        .unwrap();
    let cat = IngredientType::new("Cat", PhysicalState::Liquid, (0, 37), 0.7, &config()).unwrap();
    let mut rng = SeededRandom::new(42);
    let ingredient = Ingredient::new(
        Arc::clone(&cat),
        Quantity::of(LiquidUnit::Vial.into(), 1).unwrap(),
        &mut rng,
    )
    .unwrap();
    let mut container = IngredientContainer::package(ingredient);

    let oven = lab.device_mut(DeviceKind::Oven).unwrap();
    oven.set_temperature(0, 300).unwrap();
    oven.add(&mut container).unwrap();
    oven.execute().unwrap();
    let heated = oven.result().unwrap();
    let cat = heated.contents().unwrap();

    assert_eq!(cat.temperature().hotness(), 300);
    let effective = cat.effective_volatility();
    assert!((1500.0..2300.0).contains(&effective), "effective {effective}");
    assert_eq!(cat.volatility_class(), VolatilityClass::Dangerous);
    assert!(cat.total_name().starts_with("Dangerous Heated"));
}

#[test]
fn test_recipe_book_shortage_restores_stock() {
    let mut lab = equipped_lab(10);
    let coke = IngredientType::new("Coke", PhysicalState::Liquid, (0, 20), 0.2, &config()).unwrap();
    let sugar =
        IngredientType::new("Sugar", PhysicalState::Solid, (0, 20), 0.1, &config()).unwrap();
    lab.add(&mut batch(&coke, LiquidUnit::Bottle.into(), 2)).unwrap();
    lab.add(&mut batch(&sugar, SolidUnit::Sachet.into(), 1)).unwrap();
    let coke_before = lab.ingredient_at(0).unwrap().quantity().flatten();
    let sugar_before = lab.ingredient_at(1).unwrap().quantity().flatten();

    let mut book = RecipeBook::new();
    let page = book.add(
        Recipe::new(
            vec![
                Instruction::Add,
                Instruction::HeatUp,
                Instruction::Add,
                Instruction::Mix,
            ],
            vec![
                Amount::new(Arc::clone(&coke), LiquidUnit::Spoon.into(), 2).unwrap(),
                Amount::new(Arc::clone(&sugar), SolidUnit::Spoon.into(), 1).unwrap(),
            ],
        )
        .unwrap(),
    );
    let recipe = book.get(page).unwrap();

    // Plenty of both at factor 1
    let outcome = lab.execute(recipe, 1).unwrap();
    assert!(outcome.failures.is_empty());
    let product = outcome.product.unwrap();
    assert_eq!(product.contents().unwrap().name(), "Coke mixed with Sugar");

    // A huge factor drains the sugar: the heated coke goes back into storage
    let coke_mid = lab.ingredient_at(0).unwrap().quantity().flatten();
    assert_eq!(coke_mid, coke_before - 16);
    let sugar_mid = lab.ingredient_at(1).unwrap().quantity().flatten();
    assert!(sugar_mid < sugar_before);

    let outcome = lab.execute(recipe, 10).unwrap();
    assert!(outcome.aborted);
    assert!(outcome.product.is_none());
    assert!(outcome.unreturned.is_empty());
    assert_eq!(lab.ingredient_at(0).unwrap().quantity().flatten(), coke_mid);
    assert_eq!(lab.ingredient_at(1).unwrap().quantity().flatten(), sugar_mid);
    assert!(lab.has_proper_ingredients());
}

#[test]
fn test_sub_spoon_mix_keeps_stock() {
    let mut lab = equipped_lab(10);
    let water =
        IngredientType::new("Water", PhysicalState::Liquid, (0, 20), 0.1, &config()).unwrap();
    let salt = IngredientType::new("Salt", PhysicalState::Solid, (0, 20), 0.05, &config()).unwrap();
    lab.add(&mut batch(&water, LiquidUnit::Bottle.into(), 1)).unwrap();
    lab.add(&mut batch(&salt, SolidUnit::Sachet.into(), 1)).unwrap();
    let total = |lab: &Laboratory| -> u64 {
        lab.iter()
            .map(|ingredient| ingredient.quantity().flatten())
            .sum()
    };
    let before = total(&lab);
    assert_eq!(before, 120 + 42);

    let recipe = Recipe::new(
        vec![Instruction::Add, Instruction::Add, Instruction::Mix],
        vec![
            Amount::new(Arc::clone(&water), LiquidUnit::Drop.into(), 1).unwrap(),
            Amount::new(Arc::clone(&salt), SolidUnit::Pinch.into(), 1).unwrap(),
        ],
    )
    .unwrap();
    assert_eq!(lab.execute(&recipe, 1).unwrap_err(), LabError::EmptyResult);
    assert_eq!(total(&lab), before);
    assert_eq!(lab.len(), 2);
}
