// Capability bindings
//
// One binding ties one hub capability to one device-API field through a
// bidirectional codec. Coupled behaviors (mode-gated thresholds, paired
// exclusive switches) are decorators over the base binding, not subclasses;
// sibling reads go through the `HubPort`, never through direct references.

mod base;
mod fan_speed;
mod filter;
mod mode;
mod switches;
mod temperature;
mod thresholds;
mod toggle;

pub use base::{FieldBinding, ValueCodec};
pub use fan_speed::{FanSpeedCodec, rotation_speed};
pub use filter::{FilterChange, FilterLife, filter_change, filter_life};
pub use mode::{CurrentModeCodec, TargetModeCodec, current_state, target_state};
pub use switches::{ExclusiveSwitch, energy_saver_switch, jet_mode_switch};
pub use temperature::{CelsiusCodec, current_temperature};
pub use thresholds::{ModeGatedThreshold, cooling_threshold, heating_threshold};
pub use toggle::{ToggleCodec, active};

use thinqlink_api::CommandKind;

use crate::error::TranslationError;
use crate::hub::{Capability, CapabilityProps, HubPort, HubValue};
use crate::snapshot::DeviceSnapshot;

/// What the worker should do with a hub-originated set request, decided
/// synchronously by the binding before any network I/O.
#[derive(Debug)]
pub enum SetDisposition {
    /// The requested state equals the committed cache. The appliance
    /// chimes on every accepted command, so redundant writes are
    /// suppressed and reported as an immediate success.
    Unchanged,
    /// Issue the device command; on success the worker commits via
    /// [`CapabilityBinding::commit_set`].
    Dispatch {
        command: CommandKind,
        field: &'static str,
        api_value: serde_json::Value,
    },
    /// This capability never accepts writes.
    ReadOnly,
    /// The requested value is outside the capability's domain.
    Rejected(TranslationError),
}

/// A single hub capability bound to the device-API vocabulary.
///
/// All methods are synchronous; the async command send lives in the
/// worker. Implementations own a last-committed state cache and must
/// recover locally from translation failures -- nothing here may abort
/// a sibling's processing.
pub trait CapabilityBinding: Send {
    /// Which hub capability this binding serves.
    fn capability(&self) -> Capability;

    /// Recognized value range advertised to the hub, if constrained.
    fn props(&self) -> Option<CapabilityProps> {
        None
    }

    /// The committed state, or `None` before the first accepted snapshot.
    /// The hub treats `None` as "unknown", not as a failure.
    fn current(&self) -> Option<HubValue>;

    /// Apply one merged device snapshot: decode the bound field, replace
    /// the cache, push the fresh value to the hub. Translation failures
    /// are logged and swallowed, leaving cache and hub value unchanged.
    fn apply_snapshot(&mut self, snapshot: &DeviceSnapshot, hub: &mut HubPort);

    /// Stage a hub-originated set. May synchronously push values to
    /// sibling capabilities through the port (mutual exclusion).
    fn prepare_set(&mut self, value: HubValue, hub: &mut HubPort) -> SetDisposition;

    /// Commit a staged set after the device confirmed the command. Never
    /// called on failure -- there is no optimistic cache mutation.
    fn commit_set(&mut self, value: HubValue);
}
