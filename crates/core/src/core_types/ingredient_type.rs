//! Ingredient types
//!
//! A type fixes everything instances share: name, standard physical state,
//! standard temperature and theoretical volatility. Types are handed around
//! as `Arc<IngredientType>` and compared by pointer, so two types built from
//! identical fields are still different types.

use crate::config::AlchemyConfig;
use crate::core_types::naming;
use crate::core_types::temperature::Temperature;
use crate::core_types::units::PhysicalState;
use crate::core_types::volatility::Volatility;
use crate::error::{LabError, LabResult};
use std::fmt;
use std::sync::Arc;

/// Immutable description shared by all ingredients of one kind
#[derive(Debug, PartialEq)]
pub struct IngredientType {
    name: Option<String>,
    state: PhysicalState,
    standard_temperature: Temperature,
    theoretical_volatility: f64,
}

impl IngredientType {
    /// Create a named type
    ///
    /// `standard` is `(coldness, hotness)` and must be one-sided and within
    /// the config's ceiling.
    pub fn new(
        name: &str,
        state: PhysicalState,
        standard: (i64, i64),
        theoretical_volatility: f64,
        config: &AlchemyConfig,
    ) -> LabResult<Arc<Self>> {
        if !naming::is_valid_simple_name(name) {
            return Err(LabError::invalid_argument(format!(
                "'{name}' is not a valid ingredient name"
            )));
        }
        let (coldness, hotness) = standard;
        if !Temperature::is_valid(coldness, hotness, config.max_temperature) {
            return Err(LabError::invalid_argument(format!(
                "standard temperature [{coldness}, {hotness}] is not valid"
            )));
        }
        if !Volatility::is_valid(theoretical_volatility) {
            return Err(LabError::invalid_argument(format!(
                "theoretical volatility {theoretical_volatility} outside [0, 1)"
            )));
        }
        Ok(Arc::new(Self {
            name: Some(name.trim().to_string()),
            state,
            standard_temperature: Temperature::new(coldness, hotness, config),
            theoretical_volatility,
        }))
    }

    /// Nameless type synthesized for a mixture of different types
    pub(crate) fn mixture(
        state: PhysicalState,
        standard_temperature: Temperature,
        theoretical_volatility: f64,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: None,
            state,
            standard_temperature,
            theoretical_volatility,
        })
    }

    /// Simple name, `None` for mixtures
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn state(&self) -> PhysicalState {
        self.state
    }

    #[inline]
    pub fn standard_temperature(&self) -> Temperature {
        self.standard_temperature
    }

    #[inline]
    pub fn theoretical_volatility(&self) -> f64 {
        self.theoretical_volatility
    }

    /// Whether `a` and `b` are the very same type
    #[inline]
    pub fn same(a: &Arc<Self>, b: &Arc<Self>) -> bool {
        Arc::ptr_eq(a, b)
    }
}

impl fmt::Display for IngredientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "<mixture>"),
        }?;
        write!(f, " ({}, standard {})", self.state, self.standard_temperature)
    }
}
