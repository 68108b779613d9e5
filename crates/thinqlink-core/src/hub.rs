// Hub-side vocabulary
//
// Value types, capability identifiers, and the per-device `HubPort` the
// bindings talk through. The hub's own service/accessory registry lives
// with the embedder; this module only models what the engine needs --
// which value each capability is currently showing, and a channel to
// push out-of-band updates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::device::DeviceId;

// ── Values ───────────────────────────────────────────────────────────

/// A hub-side capability value.
///
/// Deep equality on this type backs the idempotent-set skip: a set whose
/// value equals the committed cache never reaches the device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HubValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl std::fmt::Display for HubValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for HubValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for HubValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for HubValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

// ── Capabilities ─────────────────────────────────────────────────────

/// One user-visible controllable or readable attribute exposed to the hub.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Active,
    RotationSpeed,
    CoolingThreshold,
    HeatingThreshold,
    TargetState,
    CurrentState,
    CurrentTemperature,
    FilterLife,
    FilterChange,
    EnergySaver,
    JetMode,
}

/// Hub enumeration for the target heater/cooler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMode {
    Auto,
    Heat,
    Cool,
}

impl TargetMode {
    /// The hub-side numeric code.
    pub fn code(self) -> i64 {
        match self {
            Self::Auto => 0,
            Self::Heat => 1,
            Self::Cool => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Auto),
            1 => Some(Self::Heat),
            2 => Some(Self::Cool),
            _ => None,
        }
    }

    pub fn hub_value(self) -> HubValue {
        HubValue::Int(self.code())
    }
}

impl From<TargetMode> for HubValue {
    fn from(mode: TargetMode) -> Self {
        mode.hub_value()
    }
}

/// Hub enumeration for the current heater/cooler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentMode {
    Inactive,
    Idle,
    Heating,
    Cooling,
}

impl CurrentMode {
    /// The hub-side numeric code.
    pub fn code(self) -> i64 {
        match self {
            Self::Inactive => 0,
            Self::Idle => 1,
            Self::Heating => 2,
            Self::Cooling => 3,
        }
    }

    pub fn hub_value(self) -> HubValue {
        HubValue::Int(self.code())
    }
}

impl From<CurrentMode> for HubValue {
    fn from(mode: CurrentMode) -> Self {
        mode.hub_value()
    }
}

/// Recognized value range for a capability, advertised to the hub at
/// service setup (e.g. rotation speed steps of 25, thresholds 17–30).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapabilityProps {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

// ── Hub port ─────────────────────────────────────────────────────────

/// An out-of-band value update pushed to the hub.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubUpdate {
    pub device: DeviceId,
    pub capability: Capability,
    pub value: HubValue,
}

/// Per-device view of what the hub is currently showing, plus the sender
/// for out-of-band updates.
///
/// This is the engine's only window onto the hub: bindings `push` fresh
/// values through it, and coupled bindings read a sibling capability's
/// live value via [`visible`](Self::visible) -- a lookup, never ownership.
/// Owned by the device worker; all access is interleaved on its single
/// task, so plain sequential mutation is sound.
#[derive(Debug)]
pub struct HubPort {
    device: DeviceId,
    visible: HashMap<Capability, HubValue>,
    updates: mpsc::UnboundedSender<HubUpdate>,
}

impl HubPort {
    pub fn new(device: DeviceId, updates: mpsc::UnboundedSender<HubUpdate>) -> Self {
        Self {
            device,
            visible: HashMap::new(),
            updates,
        }
    }

    /// The value the hub currently shows for a capability, if any has
    /// ever been asserted.
    pub fn visible(&self, capability: Capability) -> Option<HubValue> {
        self.visible.get(&capability).copied()
    }

    /// Assert a new value on a capability: record it and notify the hub
    /// without waiting for a get.
    pub fn push(&mut self, capability: Capability, value: HubValue) {
        self.visible.insert(capability, value);
        // A gone receiver means the accessory is being torn down; the
        // update is moot.
        let _ = self.updates.send(HubUpdate {
            device: self.device.clone(),
            capability,
            value,
        });
    }

    /// Record a value the hub already knows about (a successful
    /// hub-originated set) without emitting an update.
    pub fn record(&mut self, capability: Capability, value: HubValue) {
        self.visible.insert(capability, value);
    }
}
