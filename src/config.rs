use crate::error::{Error, Result};
use crate::gateway::acpi_call::DEFAULT_CALL_PATH;
use crate::gateway::{AcpiCallTransport, MethodTransport, TableTransport};
use crate::sysfs::SysfsRoot;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level armoury configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmouryConfig {
    pub backend: BackendConfig,
    pub device: DeviceConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Real firmware through the acpi_call kernel module.
    #[default]
    AcpiCall,
    /// Emulated firmware loaded from a method table.
    Table,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// acpi_call interface, relative to the sysfs root.
    pub acpi_call_path: PathBuf,
    /// Method table file, used when `kind = "table"`.
    pub table: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::AcpiCall,
            acpi_call_path: PathBuf::from(DEFAULT_CALL_PATH),
            table: None,
        }
    }
}

impl BackendConfig {
    /// Build the transport for a device at ACPI namespace path `device_path`.
    pub fn transport(
        &self,
        sysfs: &SysfsRoot,
        device_path: &str,
    ) -> Result<Box<dyn MethodTransport>> {
        match self.kind {
            BackendKind::AcpiCall => Ok(Box::new(
                AcpiCallTransport::new(sysfs.clone(), device_path)
                    .with_call_path(&self.acpi_call_path),
            )),
            BackendKind::Table => {
                let path = self.table.as_deref().ok_or_else(|| {
                    Error::Config("backend.kind = \"table\" requires backend.table".to_string())
                })?;
                Ok(Box::new(TableTransport::load(path)?))
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// ACPI device to attach to, e.g. `ATK4001:00`.
    pub name: Option<String>,
    /// Namespace path override for machines whose methods live elsewhere
    /// than the matched device node.
    pub acpi_path: Option<String>,
}

const SYSTEM_CONFIG: &str = "/etc/armoury/config.toml";

fn load_system() -> Option<toml::Value> {
    let content = std::fs::read_to_string(Path::new(SYSTEM_CONFIG)).ok()?;
    toml::from_str(&content).ok()
}

/// `~/.config/armoury/config.toml`, if present.
fn load_user() -> Option<toml::Value> {
    let path = dirs::config_dir()?.join("armoury").join("config.toml");
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively merge two TOML values. Tables are merged key-by-key;
/// anything else in `overlay` replaces `base`.
fn merge_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_values(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

fn load_from_path(path: &Path) -> ArmouryConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("failed to parse config at {}: {}", path.display(), e);
            ArmouryConfig::default()
        }),
        Err(e) => {
            tracing::warn!("failed to read config at {}: {}", path.display(), e);
            ArmouryConfig::default()
        }
    }
}

/// System config overlaid with the user's. `override_path` replaces both.
pub fn load(override_path: Option<&PathBuf>) -> ArmouryConfig {
    if let Some(path) = override_path {
        return load_from_path(path);
    }

    let merged = match (load_system(), load_user()) {
        (Some(s), Some(u)) => Some(merge_values(s, u)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    };

    match merged {
        Some(value) => value.try_into().unwrap_or_else(|e| {
            tracing::warn!("failed to deserialize config: {}", e);
            ArmouryConfig::default()
        }),
        None => ArmouryConfig::default(),
    }
}
