//! Device slots of a laboratory
//!
//! A laboratory has one slot per [`DeviceKind`]. The device in a slot always
//! carries the owning laboratory's id; installing, moving and removing go
//! through [`Laboratory`] methods that update both sides together.

use super::{LabId, Laboratory};
use crate::core_types::Temperature;
use crate::devices::{Device, DeviceKind};
use crate::error::{LabError, LabResult};
use crate::random::{RandomSource, ThreadRandom};
use tracing::debug;

/// One optional device per kind
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    oven: Option<Device>,
    cooling_box: Option<Device>,
    kettle: Option<Device>,
    transmogrifier: Option<Device>,
}

impl DeviceRegistry {

    fn slot_mut(&mut self, kind: DeviceKind) -> &mut Option<Device> {
        match kind {
            DeviceKind::Oven => &mut self.oven,
            DeviceKind::CoolingBox => &mut self.cooling_box,
            DeviceKind::Kettle => &mut self.kettle,
            DeviceKind::Transmogrifier => &mut self.transmogrifier,
        }
    }

    pub fn get(&self, kind: DeviceKind) -> Option<&Device> {
        match kind {
            DeviceKind::Oven => self.oven.as_ref(),
            DeviceKind::CoolingBox => self.cooling_box.as_ref(),
            DeviceKind::Kettle => self.kettle.as_ref(),
            DeviceKind::Transmogrifier => self.transmogrifier.as_ref(),
        }
    }

    pub fn get_mut(&mut self, kind: DeviceKind) -> Option<&mut Device> {
        self.slot_mut(kind).as_mut()
    }

    pub fn contains(&self, kind: DeviceKind) -> bool {
        self.get(kind).is_some()
    }

    /// Kinds with an installed device
    pub fn kinds(&self) -> impl Iterator<Item = DeviceKind> + '_ {
        DeviceKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
    }

    fn put(&mut self, device: Device) -> LabResult<()> {
        let kind = device.kind();
        let slot = self.slot_mut(kind);
        if slot.is_some() {
            return Err(LabError::invalid_state(format!(
                "laboratory already has a {kind}"
            )));
        }
        *slot = Some(device);
        Ok(())
    }

    fn take(&mut self, kind: DeviceKind) -> Option<Device> {
        self.slot_mut(kind).take()
    }
}

impl Laboratory {
    // ========================================================================
    // INSTALLATION
    // ========================================================================

    /// Install an oven at `setpoint` drawing jitter from the thread rng
    pub fn install_oven(&mut self, setpoint: (i64, i64)) -> LabResult<()> {
        self.install_oven_with_rng(setpoint, Box::new(ThreadRandom))
    }

    /// Install an oven with an explicit jitter source
    pub fn install_oven_with_rng(
        &mut self,
        setpoint: (i64, i64),
        rng: Box<dyn RandomSource>,
    ) -> LabResult<()> {
        let setpoint = self.setpoint(setpoint)?;
        self.install(Device::oven(self.id(), setpoint, rng))
    }

    pub fn install_cooling_box(&mut self, setpoint: (i64, i64)) -> LabResult<()> {
        let setpoint = self.setpoint(setpoint)?;
        self.install(Device::cooling_box(
            self.id(),
            setpoint,
            Box::new(ThreadRandom),
        ))
    }

    pub fn install_kettle(&mut self) -> LabResult<()> {
        self.install(Device::kettle(self.id()))
    }

    pub fn install_transmogrifier(&mut self) -> LabResult<()> {
        self.install(Device::transmogrifier(self.id()))
    }

    /// Install a device removed from some laboratory
    pub fn attach_device(&mut self, mut device: Device) -> LabResult<()> {
        if device.lab().is_some() {
            return Err(LabError::invalid_state(format!(
                "{} is still installed elsewhere",
                device.kind()
            )));
        }
        device.attach(self.id());
        self.install(device)
    }

    fn setpoint(&self, (coldness, hotness): (i64, i64)) -> LabResult<Temperature> {
        let max = self.config().max_temperature;
        if !Temperature::is_valid(coldness, hotness, max) {
            return Err(LabError::invalid_argument(format!(
                "[{coldness}, {hotness}] is not a valid device temperature"
            )));
        }
        Ok(Temperature::with_max(coldness, hotness, max))
    }

    fn install(&mut self, device: Device) -> LabResult<()> {
        let kind = device.kind();
        self.devices.put(device)?;
        debug!(lab = %self.id(), device = %kind, "device installed");
        Ok(())
    }

    // ========================================================================
    // ACCESS
    // ========================================================================

    pub fn has_device(&self, kind: DeviceKind) -> bool {
        self.devices.contains(kind)
    }

    pub fn device(&self, kind: DeviceKind) -> Option<&Device> {
        self.devices.get(kind)
    }

    pub fn device_mut(&mut self, kind: DeviceKind) -> Option<&mut Device> {
        self.devices.get_mut(kind)
    }

    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    pub(crate) fn require_device(&mut self, kind: DeviceKind) -> LabResult<&mut Device> {
        let id = self.id();
        self.devices
            .get_mut(kind)
            .ok_or_else(|| LabError::invalid_state(format!("laboratory {id} has no {kind}")))
    }

    // ========================================================================
    // MOVES
    // ========================================================================

    /// Move this laboratory's `kind` device into `other`
    ///
    /// Fails without changing either laboratory if this one has no such
    /// device or `other` already has one.
    pub fn move_device(&mut self, kind: DeviceKind, other: &mut Laboratory) -> LabResult<()> {
        if !self.has_device(kind) {
            return Err(LabError::invalid_state(format!(
                "laboratory {} has no {kind}",
                self.id()
            )));
        }
        if other.has_device(kind) {
            return Err(LabError::invalid_state(format!(
                "laboratory {} already has a {kind}",
                other.id()
            )));
        }
        let mut device = self
            .devices
            .take(kind)
            .ok_or_else(|| LabError::invalid_state(format!("no {kind} to move")))?;
        device.attach(other.id());
        other.devices.put(device)?;
        debug!(from = %self.id(), to = %other.id(), device = %kind, "device moved");
        Ok(())
    }

    /// Uninstall a device; the returned device is detached
    pub fn remove_device(&mut self, kind: DeviceKind) -> Option<Device> {
        let mut device = self.devices.take(kind)?;
        device.detach();
        debug!(lab = %self.id(), device = %kind, "device removed");
        Some(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AlchemyConfig;

    #[test]
    fn test_install_one_per_kind() {
        let mut lab = Laboratory::new(5, AlchemyConfig::default());
        lab.install_kettle().unwrap();
        assert!(lab.install_kettle().is_err());
        assert!(lab.has_device(DeviceKind::Kettle));
        assert_eq!(lab.device(DeviceKind::Kettle).unwrap().lab(), Some(lab.id()));
        assert!(lab.install_oven((5, 5)).is_err());
        assert_eq!(lab.devices().kinds().collect::<Vec<_>>(), [DeviceKind::Kettle]);
    }

    #[test]
    fn test_move_updates_both_sides() {
        let config = AlchemyConfig::default();
        let mut a = Laboratory::new(5, config);
        let mut b = Laboratory::new(5, config);
        a.install_cooling_box((10, 0)).unwrap();
        a.move_device(DeviceKind::CoolingBox, &mut b).unwrap();
        assert!(!a.has_device(DeviceKind::CoolingBox));
        assert_eq!(
            b.device(DeviceKind::CoolingBox).unwrap().lab(),
            Some(b.id())
        );
        assert!(a.move_device(DeviceKind::CoolingBox, &mut b).is_err());

        a.install_cooling_box((0, 0)).unwrap();
        assert!(a.move_device(DeviceKind::CoolingBox, &mut b).is_err());
        assert!(a.has_device(DeviceKind::CoolingBox));
    }

    #[test]
    fn test_remove_and_attach() {
        let config = AlchemyConfig::default();
        let mut a = Laboratory::new(5, config);
        let mut b = Laboratory::new(5, config);
        a.install_transmogrifier().unwrap();
        let device = a.remove_device(DeviceKind::Transmogrifier).unwrap();
        assert_eq!(device.lab(), None);
        assert!(a.remove_device(DeviceKind::Transmogrifier).is_none());
        b.attach_device(device).unwrap();
        assert_eq!(
            b.device(DeviceKind::Transmogrifier).unwrap().lab(),
            Some(b.id())
        );
    }
}
