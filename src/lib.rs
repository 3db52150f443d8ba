//! Vendor detection and capability negotiation for gaming-laptop GPU
//! firmware toggles.
//!
//! A device attaches by classifying the machine's DMI strings into a
//! [`vendor::VendorDialect`], probing the dialect's control methods
//! through a [`gateway::Gateway`], and recording which toggles answered.
//! Reads and writes then go through [`device::DeviceContext`], or through
//! the text attributes in [`surface`].

pub mod cli;
pub mod config;
pub mod detect;
pub mod device;
pub mod dialect;
pub mod error;
pub mod gateway;
pub mod matching;
pub mod output;
mod probe;
pub mod registry;
pub mod surface;
pub mod sysfs;
pub mod toggle;
pub mod vendor;

pub use error::{Error, GatewayError, Result, SurfaceError, ToggleError};
