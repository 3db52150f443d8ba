//! Single-shot calls into firmware control methods.
//!
//! A [`MethodTransport`] evaluates a named method with one integer argument
//! and hands back whatever object the firmware produced. [`Gateway`] sits on
//! top and reduces every outcome to either a 32-bit integer or a
//! [`GatewayError`]. Nothing here retries.

pub mod acpi_call;
pub mod table;

use crate::error::GatewayError;
use std::fmt;

pub use acpi_call::AcpiCallTransport;
pub use table::TableTransport;

/// Object returned by a firmware method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcpiObject {
    Integer(u64),
    String(String),
    Buffer(Vec<u8>),
    Package(Vec<AcpiObject>),
}

impl AcpiObject {
    pub fn type_name(&self) -> &'static str {
        match self {
            AcpiObject::Integer(_) => "integer",
            AcpiObject::String(_) => "string",
            AcpiObject::Buffer(_) => "buffer",
            AcpiObject::Package(_) => "package",
        }
    }
}

/// The opaque call primitive.
///
/// `Ok(None)` means the call completed but produced no object. `Err`
/// carries the status text the firmware interface reported.
pub trait MethodTransport: Send + Sync + fmt::Debug {
    /// Whether there is a device handle to evaluate methods against.
    fn is_bound(&self) -> bool;

    fn evaluate(&self, method: &str, arg: u32) -> Result<Option<AcpiObject>, String>;
}

impl<T: MethodTransport + ?Sized> MethodTransport for std::sync::Arc<T> {
    fn is_bound(&self) -> bool {
        (**self).is_bound()
    }

    fn evaluate(&self, method: &str, arg: u32) -> Result<Option<AcpiObject>, String> {
        (**self).evaluate(method, arg)
    }
}

#[derive(Debug)]
pub struct Gateway {
    transport: Box<dyn MethodTransport>,
}

impl Gateway {
    pub fn new(transport: impl MethodTransport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    pub fn from_boxed(transport: Box<dyn MethodTransport>) -> Self {
        Self { transport }
    }

    /// Evaluate `method(arg)` and return its integer result.
    ///
    /// Integers wider than 32 bits are truncated.
    pub fn invoke(&self, method: &str, arg: u32) -> Result<u32, GatewayError> {
        if method.is_empty() || !method.is_ascii() {
            return Err(GatewayError::InvalidArgument(format!(
                "bad method name {:?}",
                method
            )));
        }
        if !self.transport.is_bound() {
            return Err(GatewayError::InvalidArgument(
                "no device handle".to_string(),
            ));
        }

        let result = match self.transport.evaluate(method, arg) {
            Ok(Some(AcpiObject::Integer(value))) => Ok(value as u32),
            Ok(Some(other)) => Err(GatewayError::TypeMismatch {
                method: method.to_string(),
                found: other.type_name(),
            }),
            Ok(None) => Err(GatewayError::NoResponse {
                method: method.to_string(),
            }),
            Err(status) => Err(GatewayError::TransportFailure {
                method: method.to_string(),
                status,
            }),
        };

        match &result {
            Ok(value) => tracing::trace!("{}({:#x}) = {:#x}", method, arg, value),
            Err(e) => tracing::debug!("{}({:#x}): {}", method, arg, e),
        }
        result
    }
}
