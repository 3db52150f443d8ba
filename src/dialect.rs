//! Static method-name table per vendor dialect, plus the cross-vendor
//! names tried when none of a dialect's methods answer.

use crate::vendor::VendorDialect;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleKind {
    GpuMux,
    DgpuDisable,
    EgpuEnable,
}

impl ToggleKind {
    pub const ALL: [ToggleKind; 3] = [
        ToggleKind::GpuMux,
        ToggleKind::DgpuDisable,
        ToggleKind::EgpuEnable,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToggleKind::GpuMux => "gpu_mux",
            ToggleKind::DgpuDisable => "dgpu_disable",
            ToggleKind::EgpuEnable => "egpu_enable",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            ToggleKind::GpuMux => 0,
            ToggleKind::DgpuDisable => 1,
            ToggleKind::EgpuEnable => 2,
        }
    }
}

impl fmt::Display for ToggleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Get/set method names for one toggle under one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodBinding {
    pub get: Option<&'static str>,
    pub set: Option<&'static str>,
}

const fn pair(get: &'static str, set: &'static str) -> Option<MethodBinding> {
    Some(MethodBinding {
        get: Some(get),
        set: Some(set),
    })
}

/// One row of the table: mux, dGPU-disable and eGPU-enable bindings.
struct DialectRow {
    gpu_mux: Option<MethodBinding>,
    dgpu_disable: Option<MethodBinding>,
    egpu_enable: Option<MethodBinding>,
}

const ASUS: DialectRow = DialectRow {
    gpu_mux: pair("MXDS", "MXDM"),
    dgpu_disable: pair("DGPU", "SDGP"),
    egpu_enable: pair("EGPU", "SEGP"),
};

const MSI: DialectRow = DialectRow {
    gpu_mux: pair("GMUX", "SMUX"),
    dgpu_disable: pair("GDIS", "SDIS"),
    egpu_enable: None,
};

const DELL_ALIENWARE: DialectRow = DialectRow {
    gpu_mux: pair("GFXS", "SFXS"),
    dgpu_disable: pair("GDDS", "SDDS"),
    egpu_enable: None,
};

const LENOVO: DialectRow = DialectRow {
    gpu_mux: pair("LGPU", "SLGP"),
    dgpu_disable: pair("LDGP", "SLDG"),
    egpu_enable: None,
};

/// Shared by every dialect without a row of its own.
const GENERIC: DialectRow = DialectRow {
    gpu_mux: pair("GMUX", "SMUX"),
    dgpu_disable: pair("_GPU", "SGPU"),
    egpu_enable: None,
};

fn row(dialect: VendorDialect) -> &'static DialectRow {
    match dialect {
        VendorDialect::Asus => &ASUS,
        VendorDialect::Msi => &MSI,
        VendorDialect::DellAlienware => &DELL_ALIENWARE,
        VendorDialect::Lenovo => &LENOVO,
        VendorDialect::Hp
        | VendorDialect::Acer
        | VendorDialect::GenericGaming
        | VendorDialect::Unknown => &GENERIC,
    }
}

/// Known binding for `toggle` under `dialect`, if any.
pub fn bindings_for(dialect: VendorDialect, toggle: ToggleKind) -> Option<MethodBinding> {
    let row = row(dialect);
    match toggle {
        ToggleKind::GpuMux => row.gpu_mux,
        ToggleKind::DgpuDisable => row.dgpu_disable,
        ToggleKind::EgpuEnable => row.egpu_enable,
    }
}

/// Method names tried, in order, when no dialect method answered.
pub const FALLBACK_METHODS: &[&str] = &["GMUX", "_GPU", "DGPU", "SGPU", "MXDS", "MXDM"];

const MUX_FRAGMENTS: &[&str] = &["MUX", "MXD"];
const GPU_FRAGMENTS: &[&str] = &["GPU"];

/// Which toggle a fallback method name most likely reads.
///
/// Mux fragments are checked first. Names matching neither return None.
pub fn classify_fallback(method: &str) -> Option<ToggleKind> {
    if MUX_FRAGMENTS.iter().any(|f| method.contains(f)) {
        Some(ToggleKind::GpuMux)
    } else if GPU_FRAGMENTS.iter().any(|f| method.contains(f)) {
        Some(ToggleKind::DgpuDisable)
    } else {
        None
    }
}
