// On/off toggles
//
// The power relay and the operating-mode switches all speak the same
// 0/1 field encoding; they differ only in field key and command kind.

use serde_json::json;
use thinqlink_api::CommandKind;

use crate::error::TranslationError;
use crate::hub::{Capability, HubValue};
use crate::snapshot::fields;

use super::base::{FieldBinding, ValueCodec};

/// 0/1 device field ⇄ boolean hub state.
pub struct ToggleCodec;

impl ValueCodec for ToggleCodec {
    type State = bool;

    fn decode(&self, raw: &serde_json::Value) -> Result<bool, TranslationError> {
        raw.as_f64()
            .map(|v| v > 0.0)
            .ok_or_else(|| TranslationError::Unmapped { value: raw.clone() })
    }

    fn encode(&self, state: bool) -> serde_json::Value {
        json!(i64::from(state))
    }

    fn from_hub(&self, value: HubValue) -> Result<bool, TranslationError> {
        match value {
            HubValue::Bool(v) => Ok(v),
            // Hubs that model switches as 0/1 integers.
            HubValue::Int(0) => Ok(false),
            HubValue::Int(1) => Ok(true),
            other => Err(TranslationError::InvalidHubValue { value: other }),
        }
    }
}

/// Whole-appliance power, driven through the `Operation` command kind
/// (the only field the relay accepts).
pub fn active() -> FieldBinding<ToggleCodec> {
    FieldBinding::new(
        Capability::Active,
        fields::OPERATION,
        Some(CommandKind::Operation),
        ToggleCodec,
    )
}

/// A plain writable 0/1 switch over the given field.
pub(super) fn switch(capability: Capability, field: &'static str) -> FieldBinding<ToggleCodec> {
    FieldBinding::new(capability, field, Some(CommandKind::Set), ToggleCodec)
}
