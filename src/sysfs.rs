use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Root of the sysfs/procfs tree that DMI, ACPI enumeration and the
/// acpi_call interface are read from.
///
/// Points at `/` on a real machine. Tests point it at a temp directory
/// populated with fixture files.
#[derive(Debug, Clone)]
pub struct SysfsRoot {
    root: PathBuf,
}

impl Default for SysfsRoot {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
        }
    }
}

impl SysfsRoot {
    pub fn system() -> Self {
        Self::default()
    }

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `path("sys/bus/acpi/devices")` -> `/sys/bus/acpi/devices` or `<root>/sys/bus/acpi/devices`
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Read a file, trimming surrounding whitespace.
    pub fn read(&self, relative: impl AsRef<Path>) -> Result<String> {
        let path = self.path(relative);
        std::fs::read_to_string(&path)
            .map(|s| s.trim().to_string())
            .map_err(|source| Error::SysfsRead { path, source })
    }

    /// Read a file, returning None if it is missing or not readable by us.
    ///
    /// DMI attributes such as `product_serial` are root-only, so a
    /// permission error is treated the same as absence.
    pub fn read_optional(&self, relative: impl AsRef<Path>) -> Result<Option<String>> {
        let path = self.path(relative);
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => Ok(None),
            Err(source) => Err(Error::SysfsRead { path, source }),
        }
    }

    pub fn write(&self, relative: impl AsRef<Path>, value: &str) -> Result<()> {
        let path = self.path(relative);
        std::fs::write(&path, value).map_err(|source| Error::SysfsWrite { path, source })
    }

    /// Sorted entry names of a directory.
    pub fn list_dir(&self, relative: impl AsRef<Path>) -> Result<Vec<String>> {
        let path = self.path(relative);
        let entries = std::fs::read_dir(&path).map_err(|source| Error::SysfsRead {
            path: path.clone(),
            source,
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::SysfsRead {
                path: path.clone(),
                source,
            })?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
