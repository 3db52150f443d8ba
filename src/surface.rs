//! Text attributes over an attached device, shaped like sysfs files:
//! `show` returns a newline-terminated reply, `store` takes the raw
//! written bytes and returns how many were consumed.

use crate::device::DeviceContext;
use crate::dialect::ToggleKind;
use crate::error::{SurfaceError, ToggleError};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    GpuMux,
    DgpuDisable,
    EgpuEnable,
    Vendor,
    Product,
    SupportedFeatures,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::GpuMux,
        Attribute::DgpuDisable,
        Attribute::EgpuEnable,
        Attribute::Vendor,
        Attribute::Product,
        Attribute::SupportedFeatures,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::GpuMux => "gpu_mux",
            Attribute::DgpuDisable => "dgpu_disable",
            Attribute::EgpuEnable => "egpu_enable",
            Attribute::Vendor => "vendor",
            Attribute::Product => "product",
            Attribute::SupportedFeatures => "supported_features",
        }
    }

    /// The toggle behind a read/write attribute.
    pub fn toggle(self) -> Option<ToggleKind> {
        match self {
            Attribute::GpuMux => Some(ToggleKind::GpuMux),
            Attribute::DgpuDisable => Some(ToggleKind::DgpuDisable),
            Attribute::EgpuEnable => Some(ToggleKind::EgpuEnable),
            Attribute::Vendor | Attribute::Product | Attribute::SupportedFeatures => None,
        }
    }

    pub fn is_writable(self) -> bool {
        self.toggle().is_some()
    }
}

impl FromStr for Attribute {
    type Err = SurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| SurfaceError::UnknownAttribute(s.to_string()))
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse written text as a decimal integer: optional sign, at most one
/// trailing newline.
pub fn parse_value(input: &str) -> Option<i64> {
    let digits = input.strip_suffix('\n').unwrap_or(input);
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[derive(Debug, Clone)]
pub struct Surface {
    device: Arc<DeviceContext>,
}

impl Surface {
    pub fn new(device: Arc<DeviceContext>) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &Arc<DeviceContext> {
        &self.device
    }

    pub fn show(&self, attr: Attribute) -> Result<String, SurfaceError> {
        let err = |source: ToggleError| SurfaceError::Toggle {
            attribute: attr.name(),
            source,
        };

        if let Some(kind) = attr.toggle() {
            let value = self.device.read(kind).map_err(err)?;
            return Ok(format!("{}\n", value));
        }

        if !self.device.is_attached() {
            return Err(err(ToggleError::DeviceGone));
        }
        let identity = self.device.identity();
        let text = match attr {
            Attribute::Vendor => identity.vendor.as_deref().unwrap_or("Unknown").to_string(),
            Attribute::Product => identity.product.as_deref().unwrap_or("Unknown").to_string(),
            _ => self.device.supported_features().map_err(err)?.to_string(),
        };
        Ok(format!("{}\n", text))
    }

    /// Write `input` to a toggle attribute.
    ///
    /// An unsupported toggle is reported before the input is looked at.
    pub fn store(&self, attr: Attribute, input: &str) -> Result<usize, SurfaceError> {
        let Some(kind) = attr.toggle() else {
            return Err(SurfaceError::ReadOnly(attr.name()));
        };
        let err = |source: ToggleError| SurfaceError::Toggle {
            attribute: attr.name(),
            source,
        };

        let state = self.device.state(kind).map_err(err)?;
        if !state.supported() || state.set_method().is_none() {
            return Err(err(ToggleError::Unsupported));
        }

        let Some(value) = parse_value(input) else {
            tracing::warn!("invalid input for {}: {:?}", attr, input);
            return Err(SurfaceError::MalformedInput {
                attribute: attr.name(),
                input: input.to_string(),
            });
        };

        self.device.write(kind, value).map_err(err)?;
        Ok(input.len())
    }

    pub fn show_named(&self, name: &str) -> Result<String, SurfaceError> {
        self.show(name.parse()?)
    }

    pub fn store_named(&self, name: &str, input: &str) -> Result<usize, SurfaceError> {
        self.store(name.parse()?, input)
    }
}
