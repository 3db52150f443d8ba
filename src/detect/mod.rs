pub mod acpi;
pub mod dmi;

use crate::sysfs::SysfsRoot;

/// Everything looked up once before a device is attached.
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub dmi: dmi::DmiInfo,
    pub acpi_devices: Vec<acpi::AcpiDevice>,
}

impl SystemInfo {
    pub fn detect(sysfs: &SysfsRoot) -> Self {
        Self {
            dmi: dmi::DmiInfo::detect(sysfs),
            acpi_devices: acpi::scan(sysfs),
        }
    }

    /// Pick the device to attach: the named one if given, otherwise the
    /// first present device in match order.
    pub fn select_device(&self, name: Option<&str>) -> Option<&acpi::AcpiDevice> {
        match name {
            Some(name) => self.acpi_devices.iter().find(|d| d.name == name),
            None => self
                .acpi_devices
                .iter()
                .find(|d| d.is_present())
                .or_else(|| self.acpi_devices.first()),
        }
    }
}
