use crate::detect::dmi::{DmiInfo, Identity};
use crate::dialect::ToggleKind;
use crate::error::ToggleError;
use crate::gateway::Gateway;
use crate::probe;
use crate::toggle::{SupportedFeatures, ToggleState};
use crate::vendor::{self, VendorDialect};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};

/// One attached hardware instance.
///
/// Holds the identification record, the dialect derived from it and the
/// state of each toggle. Reads and writes may come from several threads:
/// each toggle has its own lock, so two writes to the same toggle are
/// serialized while different toggles proceed independently. A lifecycle
/// lock lets [`DeviceContext::detach`] wait out operations in flight.
#[derive(Debug)]
pub struct DeviceContext {
    id: String,
    identity: Identity,
    dialect: VendorDialect,
    gateway: Gateway,
    toggles: [Mutex<ToggleState>; 3],
    attached: RwLock<bool>,
}

impl DeviceContext {
    /// Classify the machine and probe its toggles.
    ///
    /// The dialect comes from the full DMI strings; only the stored
    /// identity is truncated. Never fails: a machine nothing answers on
    /// attaches with zero supported features.
    pub fn attach(id: impl Into<String>, dmi: &DmiInfo, gateway: Gateway) -> Self {
        let dialect = vendor::classify(dmi.sys_vendor.as_deref(), dmi.product_name.as_deref());
        let device = Self {
            id: id.into(),
            identity: dmi.identity(),
            dialect,
            gateway,
            toggles: Default::default(),
            attached: RwLock::new(true),
        };
        probe::probe(&device);
        device
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn dialect(&self) -> VendorDialect {
        self.dialect
    }

    pub(crate) fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub(crate) fn toggle(&self, kind: ToggleKind) -> MutexGuard<'_, ToggleState> {
        self.toggles[kind.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn enter(&self) -> Result<RwLockReadGuard<'_, bool>, ToggleError> {
        let attached = self.attached.read().unwrap_or_else(PoisonError::into_inner);
        if *attached {
            Ok(attached)
        } else {
            Err(ToggleError::DeviceGone)
        }
    }

    pub fn is_attached(&self) -> bool {
        *self.attached.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of one toggle's state.
    pub fn state(&self, kind: ToggleKind) -> Result<ToggleState, ToggleError> {
        let _live = self.enter()?;
        Ok(self.toggle(kind).clone())
    }

    /// Which toggles probed as working. Does not call firmware.
    pub fn supported_features(&self) -> Result<SupportedFeatures, ToggleError> {
        let _live = self.enter()?;
        let mut features = SupportedFeatures::default();
        for kind in ToggleKind::ALL {
            features.set(kind, self.toggle(kind).supported());
        }
        Ok(features)
    }

    /// Read a toggle's current value from firmware and refresh the cache.
    pub fn read(&self, kind: ToggleKind) -> Result<u32, ToggleError> {
        let _live = self.enter()?;
        let mut state = self.toggle(kind);

        let method = match state.get_method() {
            Some(method) if state.supported() => method,
            _ => return Err(ToggleError::Unsupported),
        };

        match self.gateway.invoke(method, 0) {
            Ok(value) => {
                state.cache(value);
                Ok(value)
            }
            Err(e) => {
                tracing::warn!("{}: reading {} failed: {}", self.id, kind, e);
                Err(ToggleError::BackendFailure(e))
            }
        }
    }

    /// Write 0 or 1 to a toggle. The cache changes only once firmware has
    /// accepted the value.
    pub fn write(&self, kind: ToggleKind, value: i64) -> Result<(), ToggleError> {
        let _live = self.enter()?;
        let mut state = self.toggle(kind);

        let method = match state.set_method() {
            Some(method) if state.supported() => method,
            _ => return Err(ToggleError::Unsupported),
        };

        let value = match value {
            0 => 0,
            1 => 1,
            other => {
                tracing::warn!("{}: {} value must be 0 or 1, got {}", self.id, kind, other);
                return Err(ToggleError::OutOfRange(other));
            }
        };

        match self.gateway.invoke(method, value) {
            Ok(_) => {
                state.cache(value);
                tracing::info!("{}: {} set to {}", self.id, kind, value);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("{}: writing {} failed: {}", self.id, kind, e);
                Err(ToggleError::BackendFailure(e))
            }
        }
    }

    /// Stop accepting operations. Blocks until reads and writes already in
    /// progress have finished; everything after fails with `DeviceGone`.
    pub fn detach(&self) {
        let mut attached = self.attached.write().unwrap_or_else(PoisonError::into_inner);
        if *attached {
            *attached = false;
            tracing::info!("{} detached", self.id);
        }
    }
}
