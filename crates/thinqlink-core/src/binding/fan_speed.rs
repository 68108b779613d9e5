// Fan speed
//
// The device knows four discrete wind-strength codes; the hub shows a
// 0–100 slider with a step of 25. The quantization is declared lossy:
// decode snaps each code to its bucket's percentage, encode picks the
// first bucket (ascending) whose upper boundary covers the requested
// percentage.

use serde_json::json;
use thinqlink_api::CommandKind;

use crate::error::TranslationError;
use crate::hub::{Capability, CapabilityProps, HubValue};
use crate::snapshot::fields;

use super::base::{FieldBinding, ValueCodec};

/// `(upper bucket boundary, wind-strength code)`, ascending. Percentages
/// are matched exclusive on the lower bound, inclusive on the upper.
const BUCKETS: [(i64, i64); 4] = [(25, 2), (50, 4), (75, 6), (100, 8)];

/// Wind-strength code ⇄ quantized percentage.
pub struct FanSpeedCodec;

impl ValueCodec for FanSpeedCodec {
    type State = i64;

    fn decode(&self, raw: &serde_json::Value) -> Result<i64, TranslationError> {
        let code = raw
            .as_i64()
            .ok_or_else(|| TranslationError::Unmapped { value: raw.clone() })?;
        BUCKETS
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(pct, _)| *pct)
            .ok_or_else(|| TranslationError::Unmapped { value: raw.clone() })
    }

    fn encode(&self, state: i64) -> serde_json::Value {
        // A 0 percentage is the hub's "off" sentinel; power-off travels
        // through the Active capability, so 0 falls through to the
        // residual default along with anything above the last boundary.
        let code = BUCKETS
            .iter()
            .find(|(upper, _)| state > 0 && state <= *upper)
            .map_or(8, |(_, code)| *code);
        json!(code)
    }

    fn from_hub(&self, value: HubValue) -> Result<i64, TranslationError> {
        match value {
            HubValue::Int(v) if (0..=100).contains(&v) => Ok(v),
            other => Err(TranslationError::InvalidHubValue { value: other }),
        }
    }
}

/// Rotation speed, advertised with a step of 25 so the hub slider lands
/// on the four real speeds.
pub fn rotation_speed() -> FieldBinding<FanSpeedCodec> {
    FieldBinding::new(
        Capability::RotationSpeed,
        fields::WIND_STRENGTH,
        Some(CommandKind::Set),
        FanSpeedCodec,
    )
    .with_props(CapabilityProps {
        min: 0.0,
        max: 100.0,
        step: 25.0,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decode_snaps_codes_to_bucket_percentages() {
        let codec = FanSpeedCodec;
        assert_eq!(codec.decode(&json!(2)).unwrap(), 25);
        assert_eq!(codec.decode(&json!(4)).unwrap(), 50);
        assert_eq!(codec.decode(&json!(6)).unwrap(), 75);
        assert_eq!(codec.decode(&json!(8)).unwrap(), 100);
    }

    #[test]
    fn decode_rejects_unknown_codes() {
        let codec = FanSpeedCodec;
        assert!(codec.decode(&json!(3)).is_err());
        assert!(codec.decode(&json!("low")).is_err());
    }

    #[test]
    fn round_trip_is_identity_on_bucket_percentages() {
        let codec = FanSpeedCodec;
        for pct in [25, 50, 75, 100] {
            assert_eq!(codec.decode(&codec.encode(pct)).unwrap(), pct);
        }
    }

    #[test]
    fn encode_picks_first_covering_bucket() {
        let codec = FanSpeedCodec;
        for p in 1..=25 {
            assert_eq!(codec.encode(p), json!(2), "p={p}");
        }
        for p in 26..=50 {
            assert_eq!(codec.encode(p), json!(4), "p={p}");
        }
        for p in 51..=75 {
            assert_eq!(codec.encode(p), json!(6), "p={p}");
        }
        for p in 76..=100 {
            assert_eq!(codec.encode(p), json!(8), "p={p}");
        }
    }

    #[test]
    fn encode_residuals_default_to_the_highest_code() {
        let codec = FanSpeedCodec;
        // 0 is the off sentinel, owned by the Active capability.
        assert_eq!(codec.encode(0), json!(8));
    }
}
