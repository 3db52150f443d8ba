use nix::errno::Errno;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sysfs read failed: {path}: {source}")]
    SysfsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("sysfs write failed: {path}: {source}")]
    SysfsWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error for {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("no matching ACPI device found{}", named(.0))]
    DeviceNotFound(Option<String>),

    #[error("device {0} is already attached")]
    AlreadyAttached(String),

    #[error("not running as root (required for {operation})")]
    NotRoot { operation: String },
}

pub type Result<T> = std::result::Result<T, Error>;

fn named(device: &Option<String>) -> String {
    device
        .as_deref()
        .map(|n| format!(" named '{n}'"))
        .unwrap_or_default()
}

/// Failure of a single firmware control-method call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid control-method call: {0}")]
    InvalidArgument(String),

    #[error("method {method} failed: {status}")]
    TransportFailure { method: String, status: String },

    #[error("method {method} returned no object")]
    NoResponse { method: String },

    #[error("method {method} returned {found} instead of an integer")]
    TypeMismatch { method: String, found: &'static str },
}

impl GatewayError {
    pub fn errno(&self) -> Errno {
        match self {
            GatewayError::InvalidArgument(_) => Errno::EINVAL,
            GatewayError::TransportFailure { .. } => Errno::EIO,
            GatewayError::NoResponse { .. } => Errno::ENODATA,
            GatewayError::TypeMismatch { .. } => Errno::EPROTO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToggleError {
    #[error("not supported on this machine")]
    Unsupported,

    #[error("value {0} out of range (expected 0 or 1)")]
    OutOfRange(i64),

    /// A toggle that probed fine stopped answering.
    #[error("firmware call failed: {0}")]
    BackendFailure(GatewayError),

    #[error("device is gone")]
    DeviceGone,
}

impl ToggleError {
    pub fn errno(&self) -> Errno {
        match self {
            ToggleError::Unsupported | ToggleError::DeviceGone => Errno::ENODEV,
            ToggleError::OutOfRange(_) => Errno::EINVAL,
            ToggleError::BackendFailure(e) => e.errno(),
        }
    }
}

/// Errors reported by the textual attribute surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("{attribute}: {source}")]
    Toggle {
        attribute: &'static str,
        source: ToggleError,
    },

    #[error("{attribute}: invalid input '{input}'")]
    MalformedInput {
        attribute: &'static str,
        input: String,
    },

    #[error("{0}: attribute is read-only")]
    ReadOnly(&'static str),

    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),
}

impl SurfaceError {
    /// Host errno for this failure, as a sysfs store/show would return it.
    pub fn errno(&self) -> Errno {
        match self {
            SurfaceError::Toggle { source, .. } => source.errno(),
            SurfaceError::MalformedInput { .. } => Errno::EINVAL,
            SurfaceError::ReadOnly(_) => Errno::EACCES,
            SurfaceError::UnknownAttribute(_) => Errno::ENOENT,
        }
    }
}
