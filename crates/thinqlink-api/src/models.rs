// ThinQ API response types
//
// Models for the ThinQ cloud JSON API. Every endpoint wraps its payload in
// the `ThinqResponse<T>` envelope. Fields use `#[serde(default)]` liberally
// because payloads vary across device firmware and regional backends.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ── Response envelope ────────────────────────────────────────────────

/// Standard ThinQ API response envelope.
///
/// Every endpoint wraps its payload:
/// ```json
/// { "resultCode": "0000", "result": { ... } }
/// ```
/// `"0000"` means success; any other code is a vendor-side error.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ThinqResponse<T> {
    #[serde(rename = "resultCode")]
    pub result_code: String,
    #[serde(default)]
    pub result: Option<T>,
}

/// The success result code.
pub const RESULT_OK: &str = "0000";

// ── Dashboard (device discovery) ─────────────────────────────────────

/// Dashboard payload: every appliance registered to the account.
#[derive(Debug, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub item: Vec<DashboardDevice>,
}

/// One appliance from the account dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardDevice {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default, rename = "modelName")]
    pub model_name: Option<String>,
    /// Vendor device category code. Air conditioners are 401.
    #[serde(default, rename = "deviceType")]
    pub device_type: Option<i64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DashboardDevice {
    /// Vendor category code for air conditioners.
    pub const AIR_CONDITIONER: i64 = 401;

    pub fn is_air_conditioner(&self) -> bool {
        self.device_type == Some(Self::AIR_CONDITIONER)
    }
}

// ── Device status ────────────────────────────────────────────────────

/// Device detail payload from `service/devices/{deviceId}`.
///
/// The `snapshot` is the flat `"airState.*"` key space the sync engine
/// consumes; everything else (model JSON URL, network info, ...) lands
/// in `extra`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceData {
    #[serde(default)]
    pub snapshot: HashMap<String, serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Filter status payload: a `data` map carrying the filter counters.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterStatusData {
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
}

/// Filter wear counters, extracted from [`FilterStatusData`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterStatus {
    /// Hours the filter has been in use.
    pub use_time: f64,
    /// Hours of rated filter life.
    pub max_time: f64,
}

impl FilterStatusData {
    const USE_TIME: &'static str = "airState.filterMngStates.useTime";
    const MAX_TIME: &'static str = "airState.filterMngStates.maxTime";

    /// Extract the two filter counters. Returns `None` when either key
    /// is absent or non-numeric -- callers treat that as "no filter data
    /// this cycle", not as an error.
    pub fn status(&self) -> Option<FilterStatus> {
        let number = |key: &str| self.data.get(key).and_then(serde_json::Value::as_f64);
        Some(FilterStatus {
            use_time: number(Self::USE_TIME)?,
            max_time: number(Self::MAX_TIME)?,
        })
    }
}
