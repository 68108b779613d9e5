// Per-device synchronization worker
//
// Three tasks hang off one cancellation token per device:
//
//   refresh task    -- timer-driven snapshot fetch + merge
//   keep-alive task -- timer-driven monitoring re-arm (fixed 60s)
//   actor loop      -- owns the bindings and the hub port; processes
//                      hub requests, snapshots, and command completions
//                      strictly one at a time
//
// Fetches and command sends run outside the actor, so a slow cloud call
// never blocks hub gets/sets or a later cycle's scheduling; cache
// mutation happens only on the actor, so state is interleaved but never
// concurrent. There is no retry and no backoff anywhere: the next
// scheduled tick is the retry mechanism.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::DeviceApi;
use crate::binding::{CapabilityBinding, SetDisposition};
use crate::catalog;
use crate::config::{KEEPALIVE_INTERVAL, SyncConfig};
use crate::device::{DeviceId, DeviceInfo};
use crate::error::SetError;
use crate::hub::{Capability, CapabilityProps, HubPort, HubUpdate, HubValue};
use crate::snapshot::DeviceSnapshot;

// ── Messages ─────────────────────────────────────────────────────────

enum WorkerMsg {
    /// Hub-originated read of a capability's committed state.
    Get {
        capability: Capability,
        reply: oneshot::Sender<Option<HubValue>>,
    },
    /// Hub-originated write.
    Set {
        capability: Capability,
        value: HubValue,
        reply: oneshot::Sender<Result<HubValue, SetError>>,
    },
    /// A merged snapshot from the refresh task.
    Snapshot(DeviceSnapshot),
    /// A device command completed successfully; commit and reply.
    Committed {
        capability: Capability,
        value: HubValue,
        reply: oneshot::Sender<Result<HubValue, SetError>>,
    },
}

// ── Handle ───────────────────────────────────────────────────────────

/// Cloneable handle to a running device worker.
///
/// Dropping handles does not stop the worker; call
/// [`shutdown`](Self::shutdown) to cancel its timers. In-flight cloud
/// calls are never force-cancelled -- their completions no-op once the
/// worker is gone.
#[derive(Clone)]
pub struct DeviceHandle {
    device: DeviceInfo,
    capabilities: Arc<Vec<(Capability, Option<CapabilityProps>)>>,
    inbox: mpsc::UnboundedSender<WorkerMsg>,
    cancel: CancellationToken,
}

impl DeviceHandle {
    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    /// The capabilities this device exposes, with their advertised value
    /// ranges, in catalog order.
    pub fn capabilities(&self) -> &[(Capability, Option<CapabilityProps>)] {
        &self.capabilities
    }

    /// Read a capability's committed state. `Ok(None)` means no snapshot
    /// has been accepted yet -- "unknown", not a failure.
    pub async fn get(&self, capability: Capability) -> Result<Option<HubValue>, SetError> {
        let (reply, rx) = oneshot::channel();
        self.inbox
            .send(WorkerMsg::Get { capability, reply })
            .map_err(|_| SetError::WorkerGone)?;
        rx.await.map_err(|_| SetError::WorkerGone)
    }

    /// Write a capability. Resolves once the device confirmed the command
    /// (or immediately, when the value matches the committed cache).
    pub async fn set(&self, capability: Capability, value: HubValue) -> Result<HubValue, SetError> {
        let (reply, rx) = oneshot::channel();
        self.inbox
            .send(WorkerMsg::Set {
                capability,
                value,
                reply,
            })
            .map_err(|_| SetError::WorkerGone)?;
        rx.await.map_err(|_| SetError::WorkerGone)?
    }

    /// Cancel the worker's timers and actor. Only future scheduling
    /// stops; nothing in flight is interrupted.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Spawning ─────────────────────────────────────────────────────────

/// Spawn the synchronization worker for one device.
///
/// `updates` receives every out-of-band value push (snapshot-driven
/// changes and mutual-exclusion nudges); the embedder forwards them to
/// its hub.
pub fn spawn(
    device: DeviceInfo,
    api: Arc<dyn DeviceApi>,
    config: SyncConfig,
    updates: mpsc::UnboundedSender<HubUpdate>,
) -> DeviceHandle {
    let bindings = catalog::bindings_for_model(device.model.as_deref());
    let capabilities: Vec<_> = bindings
        .iter()
        .map(|b| (b.capability(), b.props()))
        .collect();

    let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    let hub = HubPort::new(device.id.clone(), updates);
    let actor = Actor {
        device: device.id.clone(),
        api: Arc::clone(&api),
        bindings,
        hub,
        inbox: inbox_tx.clone(),
    };

    tokio::spawn(actor_task(actor, inbox_rx, cancel.clone()));
    tokio::spawn(refresh_task(
        Arc::clone(&api),
        device.id.clone(),
        inbox_tx.clone(),
        config,
        cancel.clone(),
    ));
    tokio::spawn(keepalive_task(api, device.id.clone(), cancel.clone()));

    debug!(
        device = %device.id,
        interval_minutes = config.refresh_interval_minutes(),
        "device worker started"
    );

    DeviceHandle {
        device,
        capabilities: Arc::new(capabilities),
        inbox: inbox_tx,
        cancel,
    }
}

// ── Actor ────────────────────────────────────────────────────────────

struct Actor {
    device: DeviceId,
    api: Arc<dyn DeviceApi>,
    bindings: Vec<Box<dyn CapabilityBinding>>,
    hub: HubPort,
    /// Command completions are fed back through the same inbox so cache
    /// commits interleave with everything else instead of racing it.
    inbox: mpsc::UnboundedSender<WorkerMsg>,
}

async fn actor_task(
    mut actor: Actor,
    mut rx: mpsc::UnboundedReceiver<WorkerMsg>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            msg = rx.recv() => {
                let Some(msg) = msg else { break };
                actor.handle(msg);
            }
        }
    }
    debug!(device = %actor.device, "device worker stopped");
}

impl Actor {
    fn binding_mut(&mut self, capability: Capability) -> Option<&mut Box<dyn CapabilityBinding>> {
        self.bindings
            .iter_mut()
            .find(|b| b.capability() == capability)
    }

    fn handle(&mut self, msg: WorkerMsg) {
        match msg {
            WorkerMsg::Get { capability, reply } => {
                let value = self
                    .bindings
                    .iter()
                    .find(|b| b.capability() == capability)
                    .and_then(|b| b.current());
                let _ = reply.send(value);
            }
            WorkerMsg::Set {
                capability,
                value,
                reply,
            } => self.handle_set(capability, value, reply),
            WorkerMsg::Snapshot(snapshot) => {
                debug!(device = %self.device, "dispatching merged snapshot");
                for binding in &mut self.bindings {
                    // Each binding recovers from its own translation
                    // failures; one bad field never aborts the pass.
                    binding.apply_snapshot(&snapshot, &mut self.hub);
                }
            }
            WorkerMsg::Committed {
                capability,
                value,
                reply,
            } => {
                if let Some(binding) = self.binding_mut(capability) {
                    binding.commit_set(value);
                }
                // The hub already shows this value after a successful
                // set; record it for sibling gating without re-pushing.
                self.hub.record(capability, value);
                let _ = reply.send(Ok(value));
            }
        }
    }

    fn handle_set(
        &mut self,
        capability: Capability,
        value: HubValue,
        reply: oneshot::Sender<Result<HubValue, SetError>>,
    ) {
        debug!(device = %self.device, capability = %capability, value = %value, "hub set request");

        let device = self.device.clone();
        // Split borrow: the binding and the hub port are disjoint fields.
        let Some(idx) = self
            .bindings
            .iter()
            .position(|b| b.capability() == capability)
        else {
            let _ = reply.send(Err(SetError::UnknownCapability { capability }));
            return;
        };
        let binding = &mut self.bindings[idx];

        match binding.prepare_set(value, &mut self.hub) {
            SetDisposition::Unchanged => {
                let _ = reply.send(Ok(value));
            }
            SetDisposition::ReadOnly => {
                let _ = reply.send(Err(SetError::ReadOnly { capability }));
            }
            SetDisposition::Rejected(e) => {
                warn!(device = %device, capability = %capability, error = %e, "set request rejected");
                let _ = reply.send(Err(e.into()));
            }
            SetDisposition::Dispatch {
                command,
                field,
                api_value,
            } => {
                let api = Arc::clone(&self.api);
                let inbox = self.inbox.clone();
                tokio::spawn(async move {
                    match api.send_command(&device, command, field, api_value).await {
                        Ok(()) => {
                            // Worker may have been torn down meanwhile;
                            // the commit (and the reply with it) just
                            // evaporates.
                            let _ = inbox.send(WorkerMsg::Committed {
                                capability,
                                value,
                                reply,
                            });
                        }
                        Err(e) => {
                            warn!(
                                device = %device,
                                capability = %capability,
                                error = %e,
                                "device command failed; cache untouched"
                            );
                            let _ = reply.send(Err(SetError::Device(e)));
                        }
                    }
                });
            }
        }
    }
}

// ── Timer tasks ──────────────────────────────────────────────────────

/// Fetch and merge the device snapshot on a fixed cadence.
///
/// The first tick fires immediately so a freshly-added device populates
/// without waiting a full interval. Each cycle runs as its own task:
/// a hung fetch stalls only that cycle's dispatch, never the scheduling
/// of later ticks, and overlapping completions apply in arrival order
/// (last write wins).
async fn refresh_task(
    api: Arc<dyn DeviceApi>,
    device: DeviceId,
    inbox: mpsc::UnboundedSender<WorkerMsg>,
    config: SyncConfig,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(config.refresh_interval());

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if !api.is_logged_in() {
                    debug!(device = %device, "not logged in; skipping refresh cycle");
                    continue;
                }

                let api = Arc::clone(&api);
                let device = device.clone();
                let inbox = inbox.clone();
                tokio::spawn(async move {
                    match fetch_snapshot(api.as_ref(), &device).await {
                        Ok(snapshot) => {
                            // Actor gone means teardown; the cycle no-ops.
                            let _ = inbox.send(WorkerMsg::Snapshot(snapshot));
                        }
                        Err(e) => {
                            warn!(device = %device, error = %e, "refresh cycle failed; waiting for next tick");
                        }
                    }
                });
            }
        }
    }
}

/// One full fetch: device snapshot plus the filter-status fragment,
/// merged into a single dispatchable snapshot. A failure of either query
/// fails the whole cycle.
async fn fetch_snapshot(
    api: &dyn DeviceApi,
    device: &DeviceId,
) -> Result<DeviceSnapshot, thinqlink_api::Error> {
    let mut snapshot = api.get_device(device).await?;
    if let Some(status) = api.get_filter_status(device).await? {
        snapshot.merge_filter_status(status);
    }
    Ok(snapshot)
}

/// Re-arm server-side monitoring every 60 seconds so the backend keeps
/// refreshing the device's snapshot between polls.
async fn keepalive_task(api: Arc<dyn DeviceApi>, device: DeviceId, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(KEEPALIVE_INTERVAL);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if !api.is_logged_in() {
                    debug!(device = %device, "not logged in; skipping monitoring renewal");
                    continue;
                }

                let api = Arc::clone(&api);
                let device = device.clone();
                tokio::spawn(async move {
                    if let Err(e) = api.send_all_event_enable(&device).await {
                        warn!(device = %device, error = %e, "monitoring renewal failed");
                    }
                });
            }
        }
    }
}
