//! Hardware and system-identity lists that decide whether we attach at all.
//!
//! Nothing here influences dialect selection; see [`crate::vendor`] for that.

use crate::detect::dmi::DmiInfo;

/// ACPI hardware IDs we attach to. Vendor-specific IDs come first; the
/// trailing generic IDs cover machines that hang the methods off a
/// motherboard-resource or power node.
pub const DEVICE_IDS: &[&str] = &[
    // ASUS
    "ATK4001", "ATK4002", "ASUS0010", "ASUSTEK",
    // MSI
    "MSI0001", "MICRO-STAR", "MSG0001",
    // Dell / Alienware
    "DELL0001", "AWK0001", "ALIW0001",
    // Lenovo
    "LCFC0001", "LEN0001", "IDEA0001",
    // HP
    "HPQ0001", "HPQI0001",
    // Acer
    "ACER0001", "ACR0001",
    // Generic
    "PNP0C02", "ACPI0003",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmiField {
    SysVendor,
    ProductName,
}

/// One entry of the known-systems list: a substring that must appear in
/// the given DMI field.
#[derive(Debug, Clone, Copy)]
pub struct DmiQuirk {
    pub field: DmiField,
    pub substring: &'static str,
}

const fn vendor(substring: &'static str) -> DmiQuirk {
    DmiQuirk {
        field: DmiField::SysVendor,
        substring,
    }
}

const fn product(substring: &'static str) -> DmiQuirk {
    DmiQuirk {
        field: DmiField::ProductName,
        substring,
    }
}

pub const DMI_QUIRKS: &[DmiQuirk] = &[
    vendor("ASUSTeK COMPUTER INC."),
    vendor("ASUS"),
    vendor("Micro-Star International Co., Ltd."),
    vendor("MSI"),
    vendor("Dell Inc."),
    vendor("Alienware"),
    vendor("LENOVO"),
    vendor("Lenovo"),
    vendor("HP"),
    vendor("Hewlett-Packard"),
    vendor("Acer"),
    // Gaming lines sold under other vendor strings
    product("ROG"),
    product("TUF"),
    product("Legion"),
    product("Gaming"),
    product("Predator"),
    product("Nitro"),
];

/// Position of `hid` in [`DEVICE_IDS`], or None if we don't handle it.
pub fn device_id_rank(hid: &str) -> Option<usize> {
    DEVICE_IDS.iter().position(|id| *id == hid)
}

impl DmiQuirk {
    pub fn matches(&self, dmi: &DmiInfo) -> bool {
        let value = match self.field {
            DmiField::SysVendor => dmi.sys_vendor.as_deref(),
            DmiField::ProductName => dmi.product_name.as_deref(),
        };
        value.is_some_and(|v| v.contains(self.substring))
    }
}

/// Whether the system is on the known-systems list.
pub fn dmi_check_system(dmi: &DmiInfo) -> bool {
    DMI_QUIRKS.iter().any(|q| q.matches(dmi))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dmi(vendor: Option<&str>, product: Option<&str>) -> DmiInfo {
        DmiInfo::new(vendor, product)
    }

    #[test]
    fn test_device_id_rank() {
        assert_eq!(device_id_rank("ATK4001"), Some(0));
        assert!(device_id_rank("PNP0C02") > device_id_rank("ACR0001"));
        assert_eq!(device_id_rank("PNP0C0D"), None);
        // HIDs are matched exactly
        assert_eq!(device_id_rank("atk4001"), None);
    }

    #[test]
    fn test_dmi_vendor_match() {
        assert!(dmi_check_system(&dmi(Some("Micro-Star International Co., Ltd."), None)));
        assert!(dmi_check_system(&dmi(Some("Dell Inc."), Some("XPS 15"))));
    }

    #[test]
    fn test_dmi_product_match() {
        assert!(dmi_check_system(&dmi(Some("Clevo"), Some("Predator Helios 300"))));
        assert!(dmi_check_system(&dmi(None, Some("Legion 5 Pro"))));
    }

    #[test]
    fn test_dmi_no_match() {
        assert!(!dmi_check_system(&dmi(Some("Unknown Corp"), Some("Business Laptop"))));
        assert!(!dmi_check_system(&dmi(None, None)));
    }
}
