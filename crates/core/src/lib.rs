//! Alchemical Laboratory Core Library
//!
//! A model of an alchemist's laboratory: typed ingredients measured in
//! liquid and solid unit chains, containers to carry them, four devices that
//! transform them (oven, cooling box, kettle, transmogrifier) and a
//! laboratory that stores them by name and runs recipes.
//!
//! ## Laboratory
//!
//! - Ingredients are stored at their standard temperature and state, sorted
//!   by name, one entry per name
//! - Storing an ingredient routes it through the installed devices and merges
//!   it with a stored ingredient of the same name
//! - Recipes withdraw, heat, cool and mix ingredients, and return what they
//!   withdrew when storage runs dry
//!
//! # Usage
//! ```
//! use alchemy_core::{
//!     AlchemyConfig, FixedRandom, Ingredient, IngredientContainer, IngredientType, Instruction,
//!     Laboratory, LiquidUnit, PhysicalState, Quantity, Recipe,
//! };
//! use alchemy_core::laboratory::Amount;
//!
//! let config = AlchemyConfig::default();
//! let mut lab = Laboratory::new(5, config);
//! lab.install_oven_with_rng((0, 20), Box::new(FixedRandom::NEUTRAL)).unwrap();
//! lab.install_cooling_box((0, 20)).unwrap();
//! lab.install_kettle().unwrap();
//!
//! let tea = IngredientType::new("Tea", PhysicalState::Liquid, (0, 20), 0.3, &config).unwrap();
//! let jug = Ingredient::new(
//!     tea.clone(),
//!     Quantity::of(LiquidUnit::Jug.into(), 1).unwrap(),
//!     &mut FixedRandom::NEUTRAL,
//! )
//! .unwrap();
//! lab.add(&mut IngredientContainer::package(jug)).unwrap();
//!
//! let recipe = Recipe::new(
//!     vec![Instruction::Add, Instruction::HeatUp],
//!     vec![Amount::new(tea, LiquidUnit::Vial.into(), 1).unwrap()],
//! )
//! .unwrap();
//! let outcome = lab.execute(&recipe, 1).unwrap();
//! let hot_tea = outcome.product.unwrap();
//! assert_eq!(hot_tea.contents().unwrap().temperature().hotness(), 70);
//! ```

// Configuration, errors and randomness
pub mod config;
pub mod error;
pub mod random;

// Ingredient model
pub mod container;
pub mod core_types;

// Devices and the laboratory
pub mod devices;
pub mod laboratory;

// Re-export core types
pub use core_types::units::{LiquidUnit, PhysicalState, SolidUnit, Unit};
pub use core_types::{
    Ingredient, IngredientType, Quantity, Temperature, TemperatureState, Volatility,
    VolatilityClass,
};

// Re-export laboratory types
pub use config::AlchemyConfig;
pub use container::IngredientContainer;
pub use devices::{Device, DeviceKind};
pub use error::{ErrorCategory, LabError, LabResult};
pub use laboratory::{Instruction, Laboratory, Recipe, RecipeBook, RecipeOutcome};
pub use random::{FixedRandom, RandomSource, SeededRandom, ThreadRandom};
