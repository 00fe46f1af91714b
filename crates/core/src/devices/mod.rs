//! Laboratory devices
//!
//! Every device follows the same protocol: ingredients are [`Device::add`]ed
//! to its hopper, [`Device::execute`] turns the hopper into one pending
//! result, and [`Device::result`] hands that result back in a container.
//! What happens in between depends on the device's [`Mechanism`].
//!
//! Devices belong to exactly one laboratory and are created through it.
//!
//! # Usage
//! ```
//! use alchemy_core::config::AlchemyConfig;
//! use alchemy_core::core_types::{Ingredient, IngredientType, PhysicalState, Quantity};
//! use alchemy_core::core_types::units::LiquidUnit;
//! use alchemy_core::container::IngredientContainer;
//! use alchemy_core::devices::DeviceKind;
//! use alchemy_core::laboratory::Laboratory;
//! use alchemy_core::random::FixedRandom;
//!
//! let config = AlchemyConfig::default();
//! let mut lab = Laboratory::new(10, config);
//! lab.install_transmogrifier().unwrap();
//!
//! let water = IngredientType::new("Water", PhysicalState::Liquid, (0, 20), 0.1, &config).unwrap();
//! let spoons = Quantity::of(LiquidUnit::Spoon.into(), 3).unwrap();
//! let batch = Ingredient::new(water, spoons, &mut FixedRandom::NEUTRAL).unwrap();
//! let mut container = IngredientContainer::package(batch);
//!
//! let device = lab.device_mut(DeviceKind::Transmogrifier).unwrap();
//! device.add(&mut container).unwrap();
//! device.execute().unwrap();
//! let ice = device.result().unwrap();
//! assert_eq!(ice.contents().unwrap().state(), PhysicalState::Solid);
//! ```

pub mod hopper;
pub mod kettle;
pub mod temperature_device;
pub mod transmogrifier;

pub use hopper::{CapacityPolicy, Hopper};
pub use kettle::Kettle;
pub use temperature_device::{Direction, TemperatureDevice};
pub use transmogrifier::Transmogrifier;

use crate::container::IngredientContainer;
use crate::core_types::{naming, Ingredient, Temperature};
use crate::error::{LabError, LabResult};
use crate::laboratory::LabId;
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

// ============================================================================
// KINDS
// ============================================================================

/// The four device kinds a laboratory has one slot for each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    Oven,
    CoolingBox,
    Kettle,
    Transmogrifier,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 4] = [
        DeviceKind::Oven,
        DeviceKind::CoolingBox,
        DeviceKind::Kettle,
        DeviceKind::Transmogrifier,
    ];

    /// How many ingredients this kind of device may hold at once
    pub fn capacity_policy(self) -> CapacityPolicy {
        match self {
            DeviceKind::Kettle => CapacityPolicy::Unbounded,
            DeviceKind::Oven | DeviceKind::CoolingBox | DeviceKind::Transmogrifier => {
                CapacityPolicy::AtMost(1)
            }
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Oven => write!(f, "oven"),
            DeviceKind::CoolingBox => write!(f, "cooling box"),
            DeviceKind::Kettle => write!(f, "kettle"),
            DeviceKind::Transmogrifier => write!(f, "transmogrifier"),
        }
    }
}

/// Device-specific transformation
#[derive(Debug)]
pub enum Mechanism {
    Oven(TemperatureDevice),
    CoolingBox(TemperatureDevice),
    Kettle(Kettle),
    Transmogrifier(Transmogrifier),
}

impl Mechanism {
    pub fn kind(&self) -> DeviceKind {
        match self {
            Mechanism::Oven(_) => DeviceKind::Oven,
            Mechanism::CoolingBox(_) => DeviceKind::CoolingBox,
            Mechanism::Kettle(_) => DeviceKind::Kettle,
            Mechanism::Transmogrifier(_) => DeviceKind::Transmogrifier,
        }
    }

    /// Turn the drained hopper into one ingredient
    fn run(&mut self, mut inputs: Vec<Ingredient>) -> LabResult<Ingredient> {
        match self {
            Mechanism::Kettle(kettle) => kettle.mix(inputs),
            Mechanism::Oven(device) | Mechanism::CoolingBox(device) => {
                let mut ingredient = inputs.pop().ok_or(LabError::EmptyResult)?;
                device.apply(&mut ingredient);
                Ok(ingredient)
            }
            Mechanism::Transmogrifier(transmogrifier) => {
                let ingredient = inputs.pop().ok_or(LabError::EmptyResult)?;
                transmogrifier.transmogrify(ingredient)
            }
        }
    }
}

// ============================================================================
// DEVICE
// ============================================================================

/// A device with its hopper, pending result and owning laboratory
#[derive(Debug)]
pub struct Device {
    mechanism: Mechanism,
    hopper: Hopper,
    result: Option<Ingredient>,
    lab: Option<LabId>,
}

impl Device {
    fn with_mechanism(mechanism: Mechanism, lab: LabId) -> Self {
        Self {
            hopper: Hopper::new(mechanism.kind().capacity_policy()),
            mechanism,
            result: None,
            lab: Some(lab),
        }
    }

    pub(crate) fn oven(lab: LabId, setpoint: Temperature, rng: Box<dyn RandomSource>) -> Self {
        Self::with_mechanism(Mechanism::Oven(TemperatureDevice::oven(setpoint, rng)), lab)
    }

    pub(crate) fn cooling_box(
        lab: LabId,
        setpoint: Temperature,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self::with_mechanism(
            Mechanism::CoolingBox(TemperatureDevice::cooling_box(setpoint, rng)),
            lab,
        )
    }

    pub(crate) fn kettle(lab: LabId) -> Self {
        Self::with_mechanism(Mechanism::Kettle(Kettle), lab)
    }

    pub(crate) fn transmogrifier(lab: LabId) -> Self {
        Self::with_mechanism(Mechanism::Transmogrifier(Transmogrifier), lab)
    }

    #[inline]
    pub fn kind(&self) -> DeviceKind {
        self.mechanism.kind()
    }

    pub fn mechanism(&self) -> &Mechanism {
        &self.mechanism
    }

    /// Laboratory this device is installed in, `None` once removed
    #[inline]
    pub fn lab(&self) -> Option<LabId> {
        self.lab
    }

    pub(crate) fn attach(&mut self, lab: LabId) {
        self.lab = Some(lab);
    }

    pub(crate) fn detach(&mut self) {
        self.lab = None;
    }

    pub fn hopper(&self) -> &Hopper {
        &self.hopper
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    pub fn pending_result(&self) -> Option<&Ingredient> {
        self.result.as_ref()
    }

    fn ensure_attached(&self) -> LabResult<()> {
        match self.lab {
            Some(_) => Ok(()),
            None => Err(LabError::invalid_state(format!(
                "{} is not installed in a laboratory",
                self.kind()
            ))),
        }
    }

    // ========================================================================
    // PROTOCOL
    // ========================================================================

    /// Move the container's ingredient into the hopper
    ///
    /// A full hopper evicts its oldest ingredient, which is returned
    /// terminated. On error the container keeps its contents.
    pub fn add(&mut self, container: &mut IngredientContainer) -> LabResult<Option<Ingredient>> {
        self.ensure_attached()?;
        match container.contents() {
            None => return Err(LabError::EmptyContainer),
            Some(ingredient) if ingredient.is_terminated() => {
                return Err(LabError::invalid_state(format!(
                    "{} is terminated",
                    ingredient.name()
                )));
            }
            Some(_) => {}
        }
        let ingredient = container.take().ok_or(LabError::EmptyContainer)?;
        self.load(ingredient)
    }

    /// Queue an ingredient that is not in a container
    pub(crate) fn load(&mut self, ingredient: Ingredient) -> LabResult<Option<Ingredient>> {
        self.ensure_attached()?;
        if ingredient.is_terminated() {
            return Err(LabError::invalid_state(format!(
                "{} is terminated",
                ingredient.name()
            )));
        }
        debug!(device = %self.kind(), name = %ingredient.name(), "loading ingredient");
        Ok(self.hopper.push(ingredient))
    }

    /// Process the hopper into a pending result
    ///
    /// The hopper is emptied even when the transformation fails.
    pub fn execute(&mut self) -> LabResult<()> {
        self.ensure_attached()?;
        if self.result.is_some() {
            return Err(LabError::invalid_state(format!(
                "{} still holds an uncollected result",
                self.kind()
            )));
        }
        if self.hopper.is_empty() {
            return Err(LabError::EmptyResult);
        }
        if !self.hopper.is_valid_number_of_items() {
            return Err(LabError::invalid_state(format!(
                "{} cannot process {} ingredients",
                self.kind(),
                self.hopper.len()
            )));
        }
        let inputs = self.hopper.drain();
        debug!(device = %self.kind(), inputs = inputs.len(), "executing");
        let result = self.mechanism.run(inputs)?;
        self.result = Some(result);
        Ok(())
    }

    /// Execute a kettle and give the mixture a special name
    pub fn execute_named(&mut self, special_name: &str) -> LabResult<()> {
        if self.kind() != DeviceKind::Kettle {
            return Err(LabError::invalid_state(format!(
                "only a kettle can name its result, not a {}",
                self.kind()
            )));
        }
        if !naming::is_valid_simple_name(special_name) {
            return Err(LabError::invalid_argument(format!(
                "'{special_name}' is not a valid special name"
            )));
        }
        self.execute()?;
        match self.result.as_mut() {
            Some(result) => result.set_special_name(special_name),
            None => Err(LabError::EmptyResult),
        }
    }

    /// Collect the pending result, packaged in the smallest fitting container
    pub fn result(&mut self) -> LabResult<IngredientContainer> {
        self.take_result().map(IngredientContainer::package)
    }

    /// Collect the pending result without packaging (and so without loss)
    pub(crate) fn take_result(&mut self) -> LabResult<Ingredient> {
        self.result.take().ok_or(LabError::EmptyResult)
    }

    /// Drop the hopper contents and any pending result
    pub fn clear(&mut self) {
        if !self.hopper.is_empty() || self.result.is_some() {
            debug!(
                device = %self.kind(),
                queued = self.hopper.len(),
                pending = self.result.is_some(),
                "clearing device"
            );
        }
        self.hopper.clear();
        self.result = None;
    }

    // ========================================================================
    // SETPOINT
    // ========================================================================

    fn temperature_device(&self) -> Option<&TemperatureDevice> {
        match &self.mechanism {
            Mechanism::Oven(device) | Mechanism::CoolingBox(device) => Some(device),
            Mechanism::Kettle(_) | Mechanism::Transmogrifier(_) => None,
        }
    }

    fn temperature_device_mut(&mut self) -> LabResult<&mut TemperatureDevice> {
        let kind = self.kind();
        match &mut self.mechanism {
            Mechanism::Oven(device) | Mechanism::CoolingBox(device) => Ok(device),
            Mechanism::Kettle(_) | Mechanism::Transmogrifier(_) => Err(LabError::invalid_state(
                format!("a {kind} has no temperature setting"),
            )),
        }
    }

    /// Setpoint of an oven or cooling box
    pub fn temperature(&self) -> Option<Temperature> {
        self.temperature_device().map(TemperatureDevice::setpoint)
    }

    /// Set an oven's or cooling box's setpoint
    pub fn set_temperature(&mut self, coldness: i64, hotness: i64) -> LabResult<()> {
        self.temperature_device_mut()?
            .set_temperature(coldness, hotness)
    }

    /// Shift an oven's or cooling box's setpoint
    pub fn delta_temperature(&mut self, delta: i64) -> LabResult<()> {
        self.temperature_device_mut()?.delta_temperature(delta);
        Ok(())
    }
}
