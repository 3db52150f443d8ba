use crate::dialect::ToggleKind;
use serde::Serialize;

/// What we know about one toggle on an attached device.
///
/// Method names are only bound once the toggle has been found to work;
/// [`ToggleState::mark_supported`] is the only way to set them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToggleState {
    supported: bool,
    cached_value: Option<u32>,
    bound_get: Option<&'static str>,
    bound_set: Option<&'static str>,
}

impl ToggleState {
    pub fn supported(&self) -> bool {
        self.supported
    }

    /// Last value read from or written to firmware.
    pub fn cached_value(&self) -> Option<u32> {
        self.cached_value
    }

    pub fn get_method(&self) -> Option<&'static str> {
        self.bound_get
    }

    pub fn set_method(&self) -> Option<&'static str> {
        self.bound_set
    }

    pub(crate) fn mark_supported(
        &mut self,
        get: &'static str,
        set: Option<&'static str>,
        initial: Option<u32>,
    ) {
        self.supported = true;
        self.bound_get = Some(get);
        self.bound_set = set;
        self.cached_value = initial;
    }

    pub(crate) fn cache(&mut self, value: u32) {
        self.cached_value = Some(value);
    }
}

/// Snapshot of the supported flags, rendered as
/// `gpu_mux:<0|1> dgpu_disable:<0|1> egpu_enable:<0|1>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SupportedFeatures {
    pub gpu_mux: bool,
    pub dgpu_disable: bool,
    pub egpu_enable: bool,
}

impl SupportedFeatures {
    pub fn get(&self, kind: ToggleKind) -> bool {
        match kind {
            ToggleKind::GpuMux => self.gpu_mux,
            ToggleKind::DgpuDisable => self.dgpu_disable,
            ToggleKind::EgpuEnable => self.egpu_enable,
        }
    }

    pub fn set(&mut self, kind: ToggleKind, supported: bool) {
        match kind {
            ToggleKind::GpuMux => self.gpu_mux = supported,
            ToggleKind::DgpuDisable => self.dgpu_disable = supported,
            ToggleKind::EgpuEnable => self.egpu_enable = supported,
        }
    }

    pub fn none(&self) -> bool {
        !(self.gpu_mux || self.dgpu_disable || self.egpu_enable)
    }
}

impl std::fmt::Display for SupportedFeatures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "gpu_mux:{} dgpu_disable:{} egpu_enable:{}",
            u8::from(self.gpu_mux),
            u8::from(self.dgpu_disable),
            u8::from(self.egpu_enable)
        )
    }
}
