//! Command handlers.

pub mod control;
pub mod devices;
pub mod watch;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use thinqlink_config::BridgeConfig;
use thinqlink_core::{Capability, DeviceApi, DeviceHandle, DeviceInfo, HubUpdate, HubValue};

use crate::error::CliError;

/// How long to wait for a freshly-spawned worker's first snapshot.
const FIRST_SNAPSHOT_TIMEOUT: Duration = Duration::from_secs(30);

/// Look up one device on the account dashboard.
pub(crate) async fn find_device(
    client: &thinqlink_api::ThinqClient,
    device_id: &str,
) -> Result<DeviceInfo, CliError> {
    client
        .list_devices()
        .await?
        .iter()
        .find(|d| d.device_id == device_id)
        .map(DeviceInfo::from)
        .ok_or_else(|| CliError::NoSuchDevice {
            device: device_id.to_owned(),
        })
}

/// Spawn a worker for one device and wait for its first snapshot to
/// dispatch, so the committed caches are populated before we touch them.
/// The actor applies a whole snapshot before the next request, so one
/// update from any capability is enough.
pub(crate) async fn spawn_and_sync(
    config: &BridgeConfig,
    device: DeviceInfo,
) -> Result<(DeviceHandle, mpsc::UnboundedReceiver<HubUpdate>), CliError> {
    let client = config.client()?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = thinqlink_core::worker::spawn(
        device,
        Arc::new(client) as Arc<dyn DeviceApi>,
        config.sync_config()?,
        tx,
    );

    let first = tokio::time::timeout(FIRST_SNAPSHOT_TIMEOUT, rx.recv()).await;

    match first {
        Ok(Some(_)) => Ok((handle, rx)),
        _ => {
            handle.shutdown();
            Err(CliError::SnapshotTimeout)
        }
    }
}

pub(crate) fn parse_capability(name: &str) -> Result<Capability, CliError> {
    Capability::from_str(name).map_err(|_| CliError::UnknownCapability {
        name: name.to_owned(),
    })
}

pub(crate) fn parse_value(raw: &str) -> Result<HubValue, CliError> {
    match raw {
        "on" | "true" => return Ok(HubValue::Bool(true)),
        "off" | "false" => return Ok(HubValue::Bool(false)),
        _ => {}
    }
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(HubValue::Int(v));
    }
    if let Ok(v) = raw.parse::<f64>() {
        return Ok(HubValue::Float(v));
    }
    Err(CliError::InvalidValue {
        value: raw.to_owned(),
    })
}
