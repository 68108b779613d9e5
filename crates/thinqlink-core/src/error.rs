use thiserror::Error;

use crate::hub::{Capability, HubValue};

/// A raw device value (or hub value) with no entry in a capability's
/// translation tables.
///
/// Always recovered locally: the owning binding logs it and keeps its
/// previous committed state. One capability's translation failure never
/// reaches its siblings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslationError {
    /// The bound field key was absent from the snapshot.
    #[error("field `{field}` missing from snapshot")]
    MissingField { field: &'static str },

    /// The raw device value has no mapping in the decode table.
    #[error("no mapping for raw value {value}")]
    Unmapped { value: serde_json::Value },

    /// A hub-originated value is outside this capability's domain.
    #[error("hub value {value:?} not valid for this capability")]
    InvalidHubValue { value: HubValue },
}

/// Failure modes of a hub-originated set request.
///
/// A set failure aborts only that one request; the binding's cache is
/// left untouched and the hub keeps displaying the prior committed value.
#[derive(Debug, Error)]
pub enum SetError {
    #[error("capability {capability} is read-only")]
    ReadOnly { capability: Capability },

    #[error("capability {capability} is not present on this device")]
    UnknownCapability { capability: Capability },

    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// The vendor command call failed (transport or API error).
    #[error("device command failed: {0}")]
    Device(#[from] thinqlink_api::Error),

    /// The device worker has been torn down.
    #[error("device worker has shut down")]
    WorkerGone,
}

/// Errors surfaced from engine construction and configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}
