// Base field binding
//
// The reusable translation unit: one capability, one field key, one
// command kind, one codec, one cached state. Every concrete capability
// is either a `FieldBinding` with the right codec or a thin decorator
// over one.

use thinqlink_api::CommandKind;
use tracing::{debug, warn};

use crate::error::TranslationError;
use crate::hub::{Capability, CapabilityProps, HubPort, HubValue};
use crate::snapshot::DeviceSnapshot;

use super::{CapabilityBinding, SetDisposition};

/// Bidirectional translation between raw device values and hub states.
///
/// `decode` and `encode` are inverses up to each codec's declared
/// bucketing policy; `from_hub` narrows an untyped hub value into the
/// codec's state domain.
pub trait ValueCodec: Send {
    type State: Copy + PartialEq + std::fmt::Debug + Into<HubValue> + Send;

    /// Raw device value → state. Total over the codec's declared table;
    /// anything else is a [`TranslationError::Unmapped`].
    fn decode(&self, raw: &serde_json::Value) -> Result<Self::State, TranslationError>;

    /// State → raw device value. Total over every state `decode` can
    /// produce.
    fn encode(&self, state: Self::State) -> serde_json::Value;

    /// Untyped hub value → state.
    fn from_hub(&self, value: HubValue) -> Result<Self::State, TranslationError>;
}

/// One hub capability bound to one device-API field.
pub struct FieldBinding<C: ValueCodec> {
    capability: Capability,
    field: &'static str,
    /// `None` marks a read-only capability (no hub-originated writes).
    command: Option<CommandKind>,
    codec: C,
    props: Option<CapabilityProps>,
    cached: Option<C::State>,
}

impl<C: ValueCodec> FieldBinding<C> {
    pub fn new(
        capability: Capability,
        field: &'static str,
        command: Option<CommandKind>,
        codec: C,
    ) -> Self {
        Self {
            capability,
            field,
            command,
            codec,
            props: None,
            cached: None,
        }
    }

    pub fn with_props(mut self, props: CapabilityProps) -> Self {
        self.props = Some(props);
        self
    }
}

impl<C: ValueCodec> CapabilityBinding for FieldBinding<C> {
    fn capability(&self) -> Capability {
        self.capability
    }

    fn props(&self) -> Option<CapabilityProps> {
        self.props
    }

    fn current(&self) -> Option<HubValue> {
        self.cached.map(Into::into)
    }

    fn apply_snapshot(&mut self, snapshot: &DeviceSnapshot, hub: &mut HubPort) {
        let decoded = snapshot
            .get(self.field)
            .ok_or(TranslationError::MissingField { field: self.field })
            .and_then(|raw| self.codec.decode(raw));

        match decoded {
            Ok(state) => {
                self.cached = Some(state);
                hub.push(self.capability, state.into());
            }
            Err(e @ TranslationError::MissingField { .. }) => {
                // Routine for capabilities whose fragment didn't arrive
                // this cycle (e.g. filter counters on some backends).
                debug!(capability = %self.capability, error = %e, "snapshot field absent; keeping previous state");
            }
            Err(e) => {
                warn!(
                    capability = %self.capability,
                    field = self.field,
                    error = %e,
                    "snapshot value not translatable; keeping previous state"
                );
            }
        }
    }

    fn prepare_set(&mut self, value: HubValue, _hub: &mut HubPort) -> SetDisposition {
        let Some(command) = self.command else {
            return SetDisposition::ReadOnly;
        };

        let state = match self.codec.from_hub(value) {
            Ok(state) => state,
            Err(e) => return SetDisposition::Rejected(e),
        };

        if self.cached == Some(state) {
            debug!(
                capability = %self.capability,
                state = ?state,
                "state equals cached state; skipping device command"
            );
            return SetDisposition::Unchanged;
        }

        SetDisposition::Dispatch {
            command,
            field: self.field,
            api_value: self.codec.encode(state),
        }
    }

    fn commit_set(&mut self, value: HubValue) {
        // `prepare_set` already validated this value; a failure here
        // would mean the codec changed under us mid-request.
        match self.codec.from_hub(value) {
            Ok(state) => self.cached = Some(state),
            Err(e) => warn!(capability = %self.capability, error = %e, "cannot commit set value"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use tokio::sync::mpsc;

    use super::*;
    use crate::device::DeviceId;
    use crate::snapshot::fields;

    /// Identity codec over small integers, strict on the 0–9 range.
    struct DigitCodec;

    impl ValueCodec for DigitCodec {
        type State = i64;

        fn decode(&self, raw: &serde_json::Value) -> Result<i64, TranslationError> {
            raw.as_i64()
                .filter(|v| (0..10).contains(v))
                .ok_or_else(|| TranslationError::Unmapped { value: raw.clone() })
        }

        fn encode(&self, state: i64) -> serde_json::Value {
            json!(state)
        }

        fn from_hub(&self, value: HubValue) -> Result<i64, TranslationError> {
            match value {
                HubValue::Int(v) if (0..10).contains(&v) => Ok(v),
                other => Err(TranslationError::InvalidHubValue { value: other }),
            }
        }
    }

    fn binding() -> FieldBinding<DigitCodec> {
        FieldBinding::new(
            Capability::RotationSpeed,
            fields::WIND_STRENGTH,
            Some(CommandKind::Set),
            DigitCodec,
        )
    }

    fn port() -> (HubPort, mpsc::UnboundedReceiver<crate::hub::HubUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (HubPort::new(DeviceId::from("dev-1"), tx), rx)
    }

    fn snapshot_with(value: serde_json::Value) -> DeviceSnapshot {
        DeviceSnapshot::new([(fields::WIND_STRENGTH.to_owned(), value)].into_iter().collect())
    }

    #[test]
    fn snapshot_updates_cache_and_pushes_to_hub() {
        let mut b = binding();
        let (mut hub, mut rx) = port();

        b.apply_snapshot(&snapshot_with(json!(4)), &mut hub);

        assert_eq!(b.current(), Some(HubValue::Int(4)));
        assert_eq!(rx.try_recv().unwrap().value, HubValue::Int(4));
    }

    #[test]
    fn untranslatable_snapshot_keeps_previous_state() {
        let mut b = binding();
        let (mut hub, mut rx) = port();

        b.apply_snapshot(&snapshot_with(json!(4)), &mut hub);
        rx.try_recv().unwrap();

        b.apply_snapshot(&snapshot_with(json!(42)), &mut hub);

        assert_eq!(b.current(), Some(HubValue::Int(4)));
        assert!(rx.try_recv().is_err(), "no hub push for a failed decode");
    }

    #[test]
    fn set_matching_cache_skips_the_device_command() {
        let mut b = binding();
        let (mut hub, _rx) = port();

        b.apply_snapshot(&snapshot_with(json!(4)), &mut hub);

        assert!(matches!(
            b.prepare_set(HubValue::Int(4), &mut hub),
            SetDisposition::Unchanged
        ));
    }

    #[test]
    fn set_with_new_state_dispatches_and_commits() {
        let mut b = binding();
        let (mut hub, _rx) = port();

        b.apply_snapshot(&snapshot_with(json!(4)), &mut hub);

        match b.prepare_set(HubValue::Int(7), &mut hub) {
            SetDisposition::Dispatch {
                command,
                field,
                api_value,
            } => {
                assert_eq!(command, CommandKind::Set);
                assert_eq!(field, fields::WIND_STRENGTH);
                assert_eq!(api_value, json!(7));
            }
            other => panic!("expected Dispatch, got {other:?}"),
        }

        // Cache is untouched until the command is confirmed.
        assert_eq!(b.current(), Some(HubValue::Int(4)));

        b.commit_set(HubValue::Int(7));
        assert_eq!(b.current(), Some(HubValue::Int(7)));
    }

    #[test]
    fn read_only_binding_rejects_sets() {
        let mut b = FieldBinding::new(
            Capability::CurrentState,
            fields::OP_MODE,
            None,
            DigitCodec,
        );
        let (mut hub, _rx) = port();

        assert!(matches!(
            b.prepare_set(HubValue::Int(1), &mut hub),
            SetDisposition::ReadOnly
        ));
    }

    #[test]
    fn get_before_first_snapshot_is_unknown() {
        let b = binding();
        assert_eq!(b.current(), None);
    }
}
