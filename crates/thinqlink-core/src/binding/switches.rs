// Mutually exclusive mode switches
//
// Energy-saver and jet mode are separately-addressable hub switches, but
// activating either operating mode on the appliance implicitly deactivates
// the other. Turning one on optimistically pushes "off" to the partner's
// hub-visible value -- without issuing a device command for the partner --
// and the next snapshot reconciles both to the device's truth. The push is
// non-authoritative, so no rollback is needed when the primary set fails.

use crate::hub::{Capability, CapabilityProps, HubPort, HubValue};
use crate::snapshot::{DeviceSnapshot, fields};

use super::base::FieldBinding;
use super::toggle::{self, ToggleCodec};
use super::{CapabilityBinding, SetDisposition};

/// An on/off switch paired with a mutually exclusive partner capability.
pub struct ExclusiveSwitch {
    inner: FieldBinding<ToggleCodec>,
    partner: Capability,
}

impl ExclusiveSwitch {
    fn new(capability: Capability, field: &'static str, partner: Capability) -> Self {
        Self {
            inner: toggle::switch(capability, field),
            partner,
        }
    }
}

impl CapabilityBinding for ExclusiveSwitch {
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
        self.inner.apply_snapshot(snapshot, hub);
    }

    fn prepare_set(&mut self, value: HubValue, hub: &mut HubPort) -> SetDisposition {
        if matches!(value, HubValue::Bool(true) | HubValue::Int(1)) {
            hub.push(self.partner, HubValue::Bool(false));
        }
        self.inner.prepare_set(value, hub)
    }

    fn commit_set(&mut self, value: HubValue) {
        self.inner.commit_set(value);
    }
}

/// Energy-saver mode switch, exclusive with jet mode.
pub fn energy_saver_switch() -> ExclusiveSwitch {
    ExclusiveSwitch::new(
        Capability::EnergySaver,
        fields::POWER_SAVE,
        Capability::JetMode,
    )
}

/// Jet (turbo) mode switch, exclusive with energy saver.
pub fn jet_mode_switch() -> ExclusiveSwitch {
    ExclusiveSwitch::new(Capability::JetMode, fields::JET_MODE, Capability::EnergySaver)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use thinqlink_api::CommandKind;
    use tokio::sync::mpsc;

    use super::*;
    use crate::device::DeviceId;
    use crate::hub::HubUpdate;

    fn port() -> (HubPort, mpsc::UnboundedReceiver<HubUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (HubPort::new(DeviceId::from("dev-1"), tx), rx)
    }

    #[test]
    fn turning_one_on_pushes_the_partner_off_synchronously() {
        let mut jet = jet_mode_switch();
        let (mut hub, mut rx) = port();
        hub.record(Capability::EnergySaver, HubValue::Bool(true));

        let disposition = jet.prepare_set(HubValue::Bool(true), &mut hub);

        // Partner pushed off before any device command is even staged.
        let update = rx.try_recv().unwrap();
        assert_eq!(update.capability, Capability::EnergySaver);
        assert_eq!(update.value, HubValue::Bool(false));
        assert_eq!(hub.visible(Capability::EnergySaver), Some(HubValue::Bool(false)));

        // The device command targets the jet field only.
        match disposition {
            SetDisposition::Dispatch { command, field, api_value } => {
                assert_eq!(command, CommandKind::Set);
                assert_eq!(field, fields::JET_MODE);
                assert_eq!(api_value, json!(1));
            }
            other => panic!("expected Dispatch, got {other:?}"),
        }
    }

    #[test]
    fn turning_off_leaves_the_partner_alone() {
        let mut saver = energy_saver_switch();
        let (mut hub, mut rx) = port();
        hub.record(Capability::JetMode, HubValue::Bool(true));

        saver.prepare_set(HubValue::Bool(false), &mut hub);

        assert!(rx.try_recv().is_err());
        assert_eq!(hub.visible(Capability::JetMode), Some(HubValue::Bool(true)));
    }

    #[test]
    fn partner_push_happens_even_when_the_set_is_idempotent() {
        let mut jet = jet_mode_switch();
        let (mut hub, mut rx) = port();

        // Jet already on per the last snapshot.
        let snap = DeviceSnapshot::new(
            [(fields::JET_MODE.to_owned(), json!(1))].into_iter().collect(),
        );
        jet.apply_snapshot(&snap, &mut hub);
        rx.try_recv().unwrap();

        let disposition = jet.prepare_set(HubValue::Bool(true), &mut hub);

        assert!(matches!(disposition, SetDisposition::Unchanged));
        let update = rx.try_recv().unwrap();
        assert_eq!(update.capability, Capability::EnergySaver);
        assert_eq!(update.value, HubValue::Bool(false));
    }
}
