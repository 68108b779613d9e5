// Split temperature thresholds
//
// The appliance reports a single target temperature, while the hub's
// heater/cooler model displays a cooling threshold and a heating
// threshold side by side. Both bindings alias the same device field;
// each accepts a snapshot update only while the target-mode capability
// currently shows its own mode, because the hub has no "inactive"
// rendering for the unused threshold.
//
// Under Auto neither gate matches, so both thresholds freeze at their
// last shown value. That aliasing gap is inherent to displaying one
// physical set-point twice; freezing keeps it visible instead of
// guessing which threshold Auto "means".

use thinqlink_api::CommandKind;
use tracing::debug;

use crate::hub::{Capability, CapabilityProps, HubPort, HubValue, TargetMode};
use crate::snapshot::{DeviceSnapshot, fields};

use super::base::FieldBinding;
use super::temperature::CelsiusCodec;
use super::{CapabilityBinding, SetDisposition};

/// Threshold range from the product manual.
const THRESHOLD_PROPS: CapabilityProps = CapabilityProps {
    min: 17.0,
    max: 30.0,
    step: 1.0,
};

/// A temperature threshold gated on the sibling target-mode capability.
pub struct ModeGatedThreshold {
    inner: FieldBinding<CelsiusCodec>,
    /// The target mode this threshold represents; snapshot updates are
    /// dropped unless the hub currently shows it.
    required_mode: TargetMode,
}

impl ModeGatedThreshold {
    fn new(capability: Capability, required_mode: TargetMode) -> Self {
        let inner = FieldBinding::new(
            capability,
            fields::TARGET_TEMP,
            Some(CommandKind::Set),
            CelsiusCodec,
        )
        .with_props(THRESHOLD_PROPS);
        Self {
            inner,
            required_mode,
        }
    }
}

impl CapabilityBinding for ModeGatedThreshold {
    fn capability(&self) -> Capability {
        self.inner.capability()
    }

    fn props(&self) -> Option<CapabilityProps> {
        self.inner.props()
    }

    fn current(&self) -> Option<HubValue> {
        self.inner.current()
    }

    fn apply_snapshot(&mut self, snapshot: &DeviceSnapshot, hub: &mut HubPort) {
        let target = hub.visible(Capability::TargetState);
        if target != Some(self.required_mode.hub_value()) {
            debug!(
                capability = %self.capability(),
                required = ?self.required_mode,
                showing = ?target,
                "target mode does not match; ignoring snapshot update"
            );
            return;
        }
        self.inner.apply_snapshot(snapshot, hub);
    }

    fn prepare_set(&mut self, value: HubValue, hub: &mut HubPort) -> SetDisposition {
        // Writes are not gated: the device applies them to its single
        // physical set-point regardless of mode.
        self.inner.prepare_set(value, hub)
    }

    fn commit_set(&mut self, value: HubValue) {
        self.inner.commit_set(value);
    }
}

/// Cooling threshold; accepts snapshot updates only in Cool mode.
pub fn cooling_threshold() -> ModeGatedThreshold {
    ModeGatedThreshold::new(Capability::CoolingThreshold, TargetMode::Cool)
}

/// Heating threshold; accepts snapshot updates only in Heat mode.
pub fn heating_threshold() -> ModeGatedThreshold {
    ModeGatedThreshold::new(Capability::HeatingThreshold, TargetMode::Heat)
}
