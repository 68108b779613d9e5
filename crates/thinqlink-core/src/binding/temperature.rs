// Temperature values
//
// Celsius on both sides; the codec only narrows types.

use serde_json::json;

use crate::error::TranslationError;
use crate::hub::{Capability, HubValue};
use crate::snapshot::fields;

use super::base::{FieldBinding, ValueCodec};

/// Identity codec for celsius temperatures.
pub struct CelsiusCodec;

impl ValueCodec for CelsiusCodec {
    type State = f64;

    fn decode(&self, raw: &serde_json::Value) -> Result<f64, TranslationError> {
        raw.as_f64()
            .ok_or_else(|| TranslationError::Unmapped { value: raw.clone() })
    }

    fn encode(&self, state: f64) -> serde_json::Value {
        json!(state)
    }

    fn from_hub(&self, value: HubValue) -> Result<f64, TranslationError> {
        match value {
            HubValue::Float(v) => Ok(v),
            #[allow(clippy::cast_precision_loss)]
            HubValue::Int(v) => Ok(v as f64),
            other => Err(TranslationError::InvalidHubValue { value: other }),
        }
    }
}

/// Measured room temperature. Read-only by nature.
pub fn current_temperature() -> FieldBinding<CelsiusCodec> {
    FieldBinding::new(
        Capability::CurrentTemperature,
        fields::CURRENT_TEMP,
        None,
        CelsiusCodec,
    )
}
