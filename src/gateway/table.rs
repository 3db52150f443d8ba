use super::{AcpiObject, MethodTransport};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Behaviour of one emulated firmware method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirmwareMethod {
    /// Returns this integer.
    Value(u64),
    /// Stores its argument as the value of the named method and returns 1.
    Store(String),
    /// Returns a string object.
    Text(String),
    /// Completes without returning an object.
    Empty,
    /// Fails with this status.
    Fail(String),
}

/// On-disk form: a `[methods]` table keyed by method name.
///
/// ```toml
/// [methods]
/// MXDS = { value = 1 }
/// MXDM = { store = "MXDS" }
/// DGPU = { fail = "AE_AML_NO_RETURN_VALUE" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmwareTable {
    pub methods: BTreeMap<String, FirmwareMethod>,
}

/// In-memory firmware: answers calls from a method table and records them.
///
/// Methods missing from the table fail with `AE_NOT_FOUND`, as they would
/// on a machine whose DSDT doesn't define them.
#[derive(Debug, Default)]
pub struct TableTransport {
    methods: Mutex<BTreeMap<String, FirmwareMethod>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl TableTransport {
    pub fn new(methods: impl IntoIterator<Item = (String, FirmwareMethod)>) -> Self {
        Self {
            methods: Mutex::new(methods.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn from_table(table: FirmwareTable) -> Self {
        Self::new(table.methods)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::SysfsRead {
            path: path.to_path_buf(),
            source,
        })?;
        let table: FirmwareTable = toml::from_str(&content).map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Ok(Self::from_table(table))
    }

    /// Replace (or add) a method, e.g. to simulate firmware breaking.
    pub fn set_method(&self, name: &str, method: FirmwareMethod) {
        self.methods
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), method);
    }

    /// Current integer value of a `Value` method.
    pub fn value(&self, name: &str) -> Option<u64> {
        match self
            .methods
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            Some(FirmwareMethod::Value(v)) => Some(*v),
            _ => None,
        }
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MethodTransport for TableTransport {
    fn is_bound(&self) -> bool {
        true
    }

    fn evaluate(&self, method: &str, arg: u32) -> std::result::Result<Option<AcpiObject>, String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((method.to_string(), arg));

        let mut methods = self.methods.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(behaviour) = methods.get(method).cloned() else {
            return Err("AE_NOT_FOUND".to_string());
        };

        match behaviour {
            FirmwareMethod::Value(v) => Ok(Some(AcpiObject::Integer(v))),
            FirmwareMethod::Store(target) => {
                methods.insert(target, FirmwareMethod::Value(u64::from(arg)));
                Ok(Some(AcpiObject::Integer(1)))
            }
            FirmwareMethod::Text(s) => Ok(Some(AcpiObject::String(s))),
            FirmwareMethod::Empty => Ok(None),
            FirmwareMethod::Fail(status) => Err(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_updates_target() {
        let fw = TableTransport::new([
            ("MXDS".to_string(), FirmwareMethod::Value(1)),
            ("MXDM".to_string(), FirmwareMethod::Store("MXDS".to_string())),
        ]);

        assert_eq!(fw.evaluate("MXDM", 0), Ok(Some(AcpiObject::Integer(1))));
        assert_eq!(fw.value("MXDS"), Some(0));
        assert_eq!(fw.evaluate("MXDS", 0), Ok(Some(AcpiObject::Integer(0))));
        assert_eq!(
            fw.calls(),
            vec![("MXDM".to_string(), 0), ("MXDS".to_string(), 0)]
        );
    }

    #[test]
    fn test_missing_method_not_found() {
        let fw = TableTransport::default();
        assert_eq!(fw.evaluate("GMUX", 0), Err("AE_NOT_FOUND".to_string()));
        assert_eq!(fw.calls().len(), 1);
    }

    #[test]
    fn test_load_from_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("fw.toml");
        std::fs::write(
            &path,
            r#"
            [methods]
            GMUX = { value = 0 }
            SMUX = { store = "GMUX" }
            GDIS = { fail = "AE_AML_NO_RETURN_VALUE" }
            GSTR = { text = "dGPU" }
            NOOP = "empty"
            "#,
        )
        .unwrap();

        let fw = TableTransport::load(&path).unwrap();
        assert_eq!(fw.value("GMUX"), Some(0));
        assert_eq!(fw.evaluate("NOOP", 0), Ok(None));
        assert_eq!(
            fw.evaluate("GSTR", 0),
            Ok(Some(AcpiObject::String("dGPU".to_string())))
        );
        assert_eq!(
            fw.evaluate("GDIS", 0),
            Err("AE_AML_NO_RETURN_VALUE".to_string())
        );
    }

    #[test]
    fn test_load_invalid_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("fw.toml");
        std::fs::write(&path, "[methods]\nGMUX = { bogus = 1 }\n").unwrap();
        assert!(matches!(TableTransport::load(&path), Err(Error::Parse { .. })));
    }
}
