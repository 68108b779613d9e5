// Device identity
//
// ThinQ device ids are opaque vendor strings; models are free-form names
// like "RAC_056905_WW". Both are carried verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque vendor device identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Identity and naming for one bridged appliance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: DeviceId,
    pub alias: Option<String>,
    pub model: Option<String>,
}

impl From<&thinqlink_api::DashboardDevice> for DeviceInfo {
    fn from(d: &thinqlink_api::DashboardDevice) -> Self {
        Self {
            id: DeviceId::new(d.device_id.clone()),
            alias: d.alias.clone(),
            model: d.model_name.clone(),
        }
    }
}
