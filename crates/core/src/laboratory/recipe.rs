//! Recipes and the recipe book
//!
//! A recipe is a list of instructions plus, in the same order as its `Add`
//! instructions, the amount each `Add` withdraws from the laboratory.

use crate::core_types::{IngredientType, Unit};
use crate::error::{LabError, LabResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// One recipe step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    /// Withdraw the next amount from storage
    Add,
    /// Heat the latest ingredient by a fixed step
    HeatUp,
    /// Cool the latest ingredient by a fixed step
    CoolDown,
    /// Mix everything withdrawn so far
    Mix,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Add => write!(f, "add"),
            Instruction::HeatUp => write!(f, "heat"),
            Instruction::CoolDown => write!(f, "cool"),
            Instruction::Mix => write!(f, "mix"),
        }
    }
}

/// How much of which ingredient an `Add` withdraws
#[derive(Debug, Clone)]
pub struct Amount {
    ty: Arc<IngredientType>,
    unit: Unit,
    quantity: u32,
}

impl Amount {
    /// `quantity` of `unit` of a named type
    pub fn new(ty: Arc<IngredientType>, unit: Unit, quantity: u32) -> LabResult<Self> {
        if ty.name().is_none() {
            return Err(LabError::invalid_argument(
                "recipe amounts need a named ingredient type",
            ));
        }
        if unit.state() != ty.state() {
            return Err(LabError::invalid_argument(format!(
                "{unit} cannot measure a {} ingredient",
                ty.state()
            )));
        }
        if quantity == 0 {
            return Err(LabError::invalid_argument("recipe amount of zero"));
        }
        Ok(Self { ty, unit, quantity })
    }

    pub fn ingredient_type(&self) -> &Arc<IngredientType> {
        &self.ty
    }

    /// Name the amount is withdrawn under
    pub fn name(&self) -> &str {
        self.ty.name().unwrap_or_default()
    }

    #[inline]
    pub fn unit(&self) -> Unit {
        self.unit
    }

    #[inline]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Instructions with the amounts their `Add` steps consume
#[derive(Debug, Clone)]
pub struct Recipe {
    instructions: Vec<Instruction>,
    amounts: Vec<Amount>,
}

impl Recipe {
    /// Recipe whose `Add` count matches `amounts`
    pub fn new(instructions: Vec<Instruction>, amounts: Vec<Amount>) -> LabResult<Self> {
        let adds = instructions
            .iter()
            .filter(|instruction| **instruction == Instruction::Add)
            .count();
        if adds != amounts.len() {
            return Err(LabError::invalid_argument(format!(
                "{adds} add instructions but {} amounts",
                amounts.len()
            )));
        }
        Ok(Self {
            instructions,
            amounts,
        })
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn amounts(&self) -> &[Amount] {
        &self.amounts
    }
}

/// Recipes filed under page numbers starting at 1
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    pages: BTreeMap<u32, Recipe>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// File `recipe` on the lowest free page and return that page
    pub fn add(&mut self, recipe: Recipe) -> u32 {
        let mut page = 1;
        for used in self.pages.keys() {
            if *used != page {
                break;
            }
            page += 1;
        }
        self.pages.insert(page, recipe);
        page
    }

    pub fn get(&self, page: u32) -> Option<&Recipe> {
        self.pages.get(&page)
    }

    pub fn remove(&mut self, page: u32) -> Option<Recipe> {
        self.pages.remove(&page)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Used page numbers in ascending order
    pub fn pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().copied()
    }
}
