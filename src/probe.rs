//! Capability probing, run once per device while it attaches.
//!
//! Every toggle the dialect has a binding for gets one read-probe through
//! its get-method. Only when all of those fail do we walk the fallback
//! list, and we stop at its first method that answers. Set-methods are
//! never called here.

use crate::device::DeviceContext;
use crate::dialect::{self, ToggleKind};
use crate::toggle::SupportedFeatures;

pub(crate) fn probe(device: &DeviceContext) -> SupportedFeatures {
    let identity = device.identity();
    tracing::info!(
        "Detected {} laptop: {} {}",
        device.dialect(),
        identity.vendor.as_deref().unwrap_or(""),
        identity.product.as_deref().unwrap_or("")
    );

    let mut features = SupportedFeatures::default();
    for kind in ToggleKind::ALL {
        if probe_binding(device, kind) {
            features.set(kind, true);
        }
    }

    if features.none() {
        tracing::warn!(
            "{}: no supported features found, trying alternative methods",
            device.id()
        );
        if let Some(kind) = probe_fallback(device) {
            features.set(kind, true);
        }
    }

    tracing::info!("{}: {}", device.id(), features);
    features
}

fn probe_binding(device: &DeviceContext, kind: ToggleKind) -> bool {
    let Some(binding) = dialect::bindings_for(device.dialect(), kind) else {
        return false;
    };
    let Some(get) = binding.get else {
        return false;
    };

    match device.gateway().invoke(get, 0) {
        Ok(value) => {
            device.toggle(kind).mark_supported(get, binding.set, Some(value));
            tracing::info!("{}: {} control supported via {}", device.id(), kind, get);
            true
        }
        Err(e) => {
            tracing::debug!("{}: {} not available: {}", device.id(), kind, e);
            false
        }
    }
}

/// Returns the toggle bound from the first answering fallback method, if
/// that method's name says which toggle it reads.
fn probe_fallback(device: &DeviceContext) -> Option<ToggleKind> {
    for &method in dialect::FALLBACK_METHODS {
        let Ok(value) = device.gateway().invoke(method, 0) else {
            continue;
        };
        tracing::info!("{}: found working method {}", device.id(), method);

        let kind = dialect::classify_fallback(method);
        match kind {
            Some(kind) => {
                let set = dialect::bindings_for(device.dialect(), kind).and_then(|b| b.set);
                device.toggle(kind).mark_supported(method, set, Some(value));
            }
            None => {
                tracing::debug!("{}: {} matches no toggle, left unbound", device.id(), method)
            }
        }
        return kind;
    }
    None
}
