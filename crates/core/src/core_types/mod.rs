//! Core types: units, quantities, temperatures, volatility and ingredients

pub mod ingredient;
pub mod ingredient_type;
pub mod naming;
pub mod quantity;
pub mod temperature;
pub mod units;
pub mod volatility;

pub use ingredient::Ingredient;
pub use ingredient_type::IngredientType;
pub use quantity::Quantity;
pub use temperature::{Temperature, TemperatureState};
pub use units::*;
pub use volatility::{Volatility, VolatilityClass};
