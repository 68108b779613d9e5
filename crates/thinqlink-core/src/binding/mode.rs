// Operating-mode tables
//
// One 4-valued device code (`airState.opMode`) backs two hub
// capabilities with different, deliberately non-injective tables. The
// lossy directions pick one canonical code each and never vary.

use serde_json::json;
use thinqlink_api::CommandKind;

use crate::error::TranslationError;
use crate::hub::{Capability, CurrentMode, HubValue, TargetMode};
use crate::snapshot::fields;

use super::base::{FieldBinding, ValueCodec};

// ── Target state ─────────────────────────────────────────────────────

/// Device mode code ⇄ hub target heater/cooler state.
///
/// Codes 2 and 3 both decode to `Auto`; the canonical encode for `Auto`
/// is 3 (the device's plain auto program, not auto-dry).
pub struct TargetModeCodec;

impl ValueCodec for TargetModeCodec {
    type State = TargetMode;

    fn decode(&self, raw: &serde_json::Value) -> Result<TargetMode, TranslationError> {
        match raw.as_i64() {
            Some(0) => Ok(TargetMode::Cool),
            Some(1) => Ok(TargetMode::Heat),
            Some(2 | 3) => Ok(TargetMode::Auto),
            _ => Err(TranslationError::Unmapped { value: raw.clone() }),
        }
    }

    fn encode(&self, state: TargetMode) -> serde_json::Value {
        match state {
            TargetMode::Cool => json!(0),
            TargetMode::Heat => json!(1),
            TargetMode::Auto => json!(3),
        }
    }

    fn from_hub(&self, value: HubValue) -> Result<TargetMode, TranslationError> {
        match value {
            HubValue::Int(code) => TargetMode::from_code(code)
                .ok_or(TranslationError::InvalidHubValue { value }),
            other => Err(TranslationError::InvalidHubValue { value: other }),
        }
    }
}

/// User-selected operating mode.
pub fn target_state() -> FieldBinding<TargetModeCodec> {
    FieldBinding::new(
        Capability::TargetState,
        fields::OP_MODE,
        Some(CommandKind::Set),
        TargetModeCodec,
    )
}

// ── Current state ────────────────────────────────────────────────────

/// Device mode code → hub current heater/cooler state.
///
/// Codes 0 and 1 both decode to `Cooling` (the compressor families this
/// bridge targets report both while cooling); the canonical encode for
/// `Cooling` is 0. The binding is read-only, so the encode direction
/// exists only to keep the table total.
pub struct CurrentModeCodec;

impl ValueCodec for CurrentModeCodec {
    type State = CurrentMode;

    fn decode(&self, raw: &serde_json::Value) -> Result<CurrentMode, TranslationError> {
        match raw.as_i64() {
            Some(0 | 1) => Ok(CurrentMode::Cooling),
            Some(2) => Ok(CurrentMode::Inactive),
            Some(3) => Ok(CurrentMode::Idle),
            _ => Err(TranslationError::Unmapped { value: raw.clone() }),
        }
    }

    fn encode(&self, state: CurrentMode) -> serde_json::Value {
        match state {
            CurrentMode::Cooling | CurrentMode::Heating => json!(0),
            CurrentMode::Inactive => json!(2),
            CurrentMode::Idle => json!(3),
        }
    }

    fn from_hub(&self, value: HubValue) -> Result<CurrentMode, TranslationError> {
        Err(TranslationError::InvalidHubValue { value })
    }
}

/// Reported operating state. Read-only.
pub fn current_state() -> FieldBinding<CurrentModeCodec> {
    FieldBinding::new(Capability::CurrentState, fields::OP_MODE, None, CurrentModeCodec)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn target_decode_table() {
        let codec = TargetModeCodec;
        assert_eq!(codec.decode(&json!(0)).unwrap(), TargetMode::Cool);
        assert_eq!(codec.decode(&json!(1)).unwrap(), TargetMode::Heat);
        assert_eq!(codec.decode(&json!(2)).unwrap(), TargetMode::Auto);
        assert_eq!(codec.decode(&json!(3)).unwrap(), TargetMode::Auto);
        assert!(codec.decode(&json!(4)).is_err());
    }

    #[test]
    fn target_encode_is_total_and_canonical() {
        let codec = TargetModeCodec;
        assert_eq!(codec.encode(TargetMode::Cool), json!(0));
        assert_eq!(codec.encode(TargetMode::Heat), json!(1));
        // Lossy: Auto decodes from 2 or 3, always re-encodes to 3.
        assert_eq!(codec.encode(TargetMode::Auto), json!(3));
    }

    #[test]
    fn target_round_trips_through_the_canonical_codes() {
        let codec = TargetModeCodec;
        for mode in [TargetMode::Cool, TargetMode::Heat, TargetMode::Auto] {
            assert_eq!(codec.decode(&codec.encode(mode)).unwrap(), mode);
        }
    }

    #[test]
    fn current_decode_table() {
        let codec = CurrentModeCodec;
        assert_eq!(codec.decode(&json!(0)).unwrap(), CurrentMode::Cooling);
        assert_eq!(codec.decode(&json!(1)).unwrap(), CurrentMode::Cooling);
        assert_eq!(codec.decode(&json!(2)).unwrap(), CurrentMode::Inactive);
        assert_eq!(codec.decode(&json!(3)).unwrap(), CurrentMode::Idle);
        assert!(codec.decode(&json!(7)).is_err());
    }

    #[test]
    fn current_state_never_accepts_hub_writes() {
        let codec = CurrentModeCodec;
        assert!(codec.from_hub(HubValue::Int(3)).is_err());
    }
}
