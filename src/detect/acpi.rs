use crate::matching;
use crate::sysfs::SysfsRoot;
use serde::Serialize;

const ACPI_DEVICES: &str = "sys/bus/acpi/devices";

/// An ACPI device node whose hardware ID is one we attach to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcpiDevice {
    /// Bus name, e.g. `ATK4001:00`. Used as the device identity.
    pub name: String,
    pub hid: String,
    /// Namespace path, e.g. `\_SB_.ATKD`. Empty when the kernel did not
    /// expose one.
    pub path: String,
    /// `_STA` result, when readable.
    pub status: Option<u32>,
}

impl AcpiDevice {
    /// `_STA` bit 0: device present.
    pub fn is_present(&self) -> bool {
        self.status.is_none_or(|s| s & 0x1 != 0)
    }
}

/// Enumerate ACPI devices matching the supported hardware ID list.
///
/// Ordered by the position of their HID in that list, so vendor-specific
/// nodes come before generic ones, then by bus name.
pub fn scan(sysfs: &SysfsRoot) -> Vec<AcpiDevice> {
    let Ok(entries) = sysfs.list_dir(ACPI_DEVICES) else {
        return Vec::new();
    };

    let mut devices: Vec<(usize, AcpiDevice)> = Vec::new();
    for name in entries {
        let base = format!("{}/{}", ACPI_DEVICES, name);
        let Some(hid) = sysfs.read_optional(format!("{}/hid", base)).unwrap_or(None) else {
            continue;
        };
        let Some(rank) = matching::device_id_rank(&hid) else {
            continue;
        };
        let path = sysfs
            .read_optional(format!("{}/path", base))
            .unwrap_or(None)
            .unwrap_or_default();
        let status = sysfs
            .read_optional(format!("{}/status", base))
            .unwrap_or(None)
            .and_then(|s| s.parse().ok());

        devices.push((
            rank,
            AcpiDevice {
                name,
                hid,
                path,
                status,
            },
        ));
    }

    devices.sort_by(|(ra, a), (rb, b)| ra.cmp(rb).then_with(|| a.name.cmp(&b.name)));
    devices.into_iter().map(|(_, d)| d).collect()
}
