//! Device-state synchronization engine between the ThinQ appliance cloud
//! and a local smart-home hub.
//!
//! This crate owns the bridging semantics; the hub's accessory registry
//! and the vendor auth flow stay with the embedder:
//!
//! - **[`binding`]** — Capability bindings: one hub capability bound to
//!   one device-API field through a bidirectional [`ValueCodec`], with a
//!   committed-state cache backing idempotent sets. Coupled behaviors
//!   (mode-gated thresholds, mutually exclusive switches) are decorators
//!   over the base binding.
//!
//! - **[`catalog`]** — Assembles the ordered capability set for a device
//!   model.
//!
//! - **[`worker`]** — The per-device synchronization driver: a
//!   timer-driven refresh cycle (fetch + filter merge + fan-out), a fixed
//!   60-second monitoring keep-alive, and a single actor loop that owns
//!   all mutable state so cache access is interleaved, never concurrent.
//!
//! - **[`hub`]** — The hub-side vocabulary ([`HubValue`], [`Capability`])
//!   and the [`HubPort`] bindings push through; sibling coupling reads
//!   committed hub-visible values via the port, never other bindings.
//!
//! - **[`api`]** — The [`DeviceApi`] port onto `thinqlink-api`, faked in
//!   tests.

pub mod api;
pub mod binding;
pub mod catalog;
pub mod config;
pub mod device;
pub mod error;
pub mod hub;
pub mod snapshot;
pub mod worker;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::DeviceApi;
pub use binding::{CapabilityBinding, SetDisposition, ValueCodec};
pub use catalog::{ModelProfile, bindings_for_model};
pub use config::{KEEPALIVE_INTERVAL, SyncConfig};
pub use device::{DeviceId, DeviceInfo};
pub use error::{CoreError, SetError, TranslationError};
pub use hub::{Capability, CapabilityProps, CurrentMode, HubPort, HubUpdate, HubValue, TargetMode};
pub use snapshot::{DeviceSnapshot, fields};
pub use worker::{DeviceHandle, spawn};
