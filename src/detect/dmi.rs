use crate::sysfs::SysfsRoot;
use serde::Serialize;

/// Longest vendor string kept, in bytes.
pub const VENDOR_NAME_MAX: usize = 31;
/// Longest product string kept, in bytes.
pub const PRODUCT_NAME_MAX: usize = 63;

#[derive(Debug, Clone, Default, Serialize)]
pub struct DmiInfo {
    pub sys_vendor: Option<String>,
    pub product_name: Option<String>,
}

impl DmiInfo {
    pub fn detect(sysfs: &SysfsRoot) -> Self {
        Self {
            sys_vendor: sysfs.read_optional("sys/class/dmi/id/sys_vendor").unwrap_or(None),
            product_name: sysfs.read_optional("sys/class/dmi/id/product_name").unwrap_or(None),
        }
    }

    pub fn new(sys_vendor: Option<&str>, product_name: Option<&str>) -> Self {
        Self {
            sys_vendor: sys_vendor.map(String::from),
            product_name: product_name.map(String::from),
        }
    }

    /// Vendor/product pair as stored on an attached device.
    pub fn identity(&self) -> Identity {
        Identity::new(self.sys_vendor.as_deref(), self.product_name.as_deref())
    }
}

/// The system identification record held by a device for its lifetime.
///
/// Both strings are capped at fixed byte lengths; empty strings are
/// treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub vendor: Option<String>,
    pub product: Option<String>,
}

impl Identity {
    pub fn new(vendor: Option<&str>, product: Option<&str>) -> Self {
        Self {
            vendor: vendor.and_then(|v| truncated(v, VENDOR_NAME_MAX)),
            product: product.and_then(|p| truncated(p, PRODUCT_NAME_MAX)),
        }
    }
}

fn truncated(value: &str, max: usize) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    let mut end = value.len().min(max);
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    Some(value[..end].to_string())
}
