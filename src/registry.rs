use crate::config::ArmouryConfig;
use crate::detect::SystemInfo;
use crate::detect::dmi::DmiInfo;
use crate::device::DeviceContext;
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::matching;
use crate::sysfs::SysfsRoot;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Attached devices keyed by ACPI device name.
///
/// At most one context exists per name. A context is published only after
/// probing has finished, so no read or write can see a half-probed device.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Mutex<HashMap<String, Arc<DeviceContext>>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify, probe and publish a device.
    ///
    /// Probing runs without the map locked; if another attach for `id`
    /// published first, the freshly probed context is discarded.
    pub fn attach(&self, id: &str, dmi: &DmiInfo, gateway: Gateway) -> Result<Arc<DeviceContext>> {
        if self.is_attached(id) {
            return Err(Error::AlreadyAttached(id.to_string()));
        }

        let device = Arc::new(DeviceContext::attach(id, dmi, gateway));

        let mut devices = self.devices.lock().unwrap_or_else(PoisonError::into_inner);
        if devices.contains_key(id) {
            return Err(Error::AlreadyAttached(id.to_string()));
        }
        devices.insert(id.to_string(), Arc::clone(&device));
        Ok(device)
    }

    fn is_attached(&self, id: &str) -> bool {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Attach the device picked from a detected system, with the transport
    /// the config asks for.
    pub fn attach_detected(
        &self,
        sysfs: &SysfsRoot,
        system: &SystemInfo,
        config: &ArmouryConfig,
    ) -> Result<Arc<DeviceContext>> {
        let name = config.device.name.as_deref();
        let acpi = system
            .select_device(name)
            .ok_or_else(|| Error::DeviceNotFound(name.map(String::from)))?;

        if !matching::dmi_check_system(&system.dmi) {
            tracing::warn!("System not in compatibility list, but trying anyway");
        }

        let path = config.device.acpi_path.as_deref().unwrap_or(&acpi.path);
        let transport = config.backend.transport(sysfs, path)?;
        let device = self.attach(&acpi.name, &system.dmi, Gateway::from_boxed(transport))?;

        tracing::info!(
            "attached {} ({}) for {} {}",
            acpi.name,
            acpi.hid,
            device.identity().vendor.as_deref().unwrap_or("Unknown"),
            device.identity().product.as_deref().unwrap_or("Unknown")
        );
        Ok(device)
    }

    pub fn get(&self, id: &str) -> Option<Arc<DeviceContext>> {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Sorted names of attached devices.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    /// Unpublish a device and wait for its in-flight operations.
    ///
    /// Returns false if nothing was attached under `id`.
    pub fn detach(&self, id: &str) -> bool {
        let removed = self
            .devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        match removed {
            Some(device) => {
                device.detach();
                true
            }
            None => false,
        }
    }
}
