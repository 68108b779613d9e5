// Device snapshot
//
// A flat point-in-time read of the appliance's `airState.*` key space,
// enriched with the filter-status fragment before dispatch. One snapshot
// per refresh cycle; never retained past the dispatch pass.

use std::collections::HashMap;

use thinqlink_api::{DeviceData, FilterStatus};

/// Field keys of the vendor status vocabulary consumed by the engine.
pub mod fields {
    /// Power relay: 0 = off, 1 = on.
    pub const OPERATION: &str = "airState.operation";
    /// Operating mode code (4-valued; interpretation differs between the
    /// target-mode and current-mode capability tables).
    pub const OP_MODE: &str = "airState.opMode";
    /// Fan strength code: 2 = low, 4 = mid, 6 = high, 8 = auto.
    pub const WIND_STRENGTH: &str = "airState.windStrength";
    /// Target temperature in celsius. One physical set-point, shared by
    /// both hub-side threshold capabilities.
    pub const TARGET_TEMP: &str = "airState.tempState.target";
    /// Measured room temperature in celsius.
    pub const CURRENT_TEMP: &str = "airState.tempState.current";
    /// Energy-saver operating mode: 0 = off, 1 = on.
    pub const POWER_SAVE: &str = "airState.powerSave.basic";
    /// Jet (turbo) operating mode: 0 = off, 1 = on.
    pub const JET_MODE: &str = "airState.wMode.jet";
    /// Filter hours in use (merged from the filter-status fragment).
    pub const FILTER_USE_TIME: &str = "airState.filterMngStates.useTime";
    /// Rated filter life in hours (merged from the filter-status fragment).
    pub const FILTER_MAX_TIME: &str = "airState.filterMngStates.maxTime";
}

/// Flat field-key → raw-value map for one refresh cycle.
#[derive(Debug, Clone, Default)]
pub struct DeviceSnapshot {
    values: HashMap<String, serde_json::Value>,
}

impl DeviceSnapshot {
    pub fn new(values: HashMap<String, serde_json::Value>) -> Self {
        Self { values }
    }

    /// Raw value for a field key.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Numeric view of a field. The vendor encodes almost everything as
    /// JSON numbers, but some backends stringify them.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.values.get(key)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Fold the filter-status fragment into the snapshot under the same
    /// keys the device would use, so filter capabilities dispatch like
    /// any other.
    pub fn merge_filter_status(&mut self, status: FilterStatus) {
        self.values.insert(
            fields::FILTER_USE_TIME.to_owned(),
            serde_json::json!(status.use_time),
        );
        self.values.insert(
            fields::FILTER_MAX_TIME.to_owned(),
            serde_json::json!(status.max_time),
        );
    }
}

impl From<DeviceData> for DeviceSnapshot {
    fn from(data: DeviceData) -> Self {
        Self::new(data.snapshot)
    }
}
