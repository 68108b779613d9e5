// Vendor API port
//
// The engine consumes the cloud through this trait so workers can be
// exercised against an in-memory fake. `ThinqClient` is the production
// implementation.

use async_trait::async_trait;
use thinqlink_api::{CommandKind, FilterStatus, ThinqClient};

use crate::device::DeviceId;
use crate::snapshot::DeviceSnapshot;

/// The slice of the vendor cloud the synchronization engine needs.
#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// Auth-state precondition for scheduled cycles. `false` is not an
    /// error: the cycle is skipped silently (debug log only).
    fn is_logged_in(&self) -> bool;

    /// Fetch the device's full status snapshot.
    async fn get_device(&self, device: &DeviceId) -> Result<DeviceSnapshot, thinqlink_api::Error>;

    /// Fetch the filter-status fragment merged into each snapshot.
    async fn get_filter_status(
        &self,
        device: &DeviceId,
    ) -> Result<Option<FilterStatus>, thinqlink_api::Error>;

    /// Write one status field.
    async fn send_command(
        &self,
        device: &DeviceId,
        command: CommandKind,
        data_key: &str,
        data_value: serde_json::Value,
    ) -> Result<(), thinqlink_api::Error>;

    /// Re-arm server-side status monitoring.
    async fn send_all_event_enable(&self, device: &DeviceId) -> Result<(), thinqlink_api::Error>;
}

#[async_trait]
impl DeviceApi for ThinqClient {
    fn is_logged_in(&self) -> bool {
        ThinqClient::is_logged_in(self)
    }

    async fn get_device(&self, device: &DeviceId) -> Result<DeviceSnapshot, thinqlink_api::Error> {
        let data = ThinqClient::get_device(self, device.as_str()).await?;
        Ok(DeviceSnapshot::from(data))
    }

    async fn get_filter_status(
        &self,
        device: &DeviceId,
    ) -> Result<Option<FilterStatus>, thinqlink_api::Error> {
        ThinqClient::get_filter_status(self, device.as_str()).await
    }

    async fn send_command(
        &self,
        device: &DeviceId,
        command: CommandKind,
        data_key: &str,
        data_value: serde_json::Value,
    ) -> Result<(), thinqlink_api::Error> {
        ThinqClient::send_command(self, device.as_str(), command, data_key, data_value).await
    }

    async fn send_all_event_enable(&self, device: &DeviceId) -> Result<(), thinqlink_api::Error> {
        ThinqClient::send_all_event_enable(self, device.as_str()).await
    }
}
