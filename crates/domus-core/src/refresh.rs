// ── Dashboard refresh orchestration ──
//
// One cycle fetches rooms, devices, thermostats and security concurrently.
// Each fetch owns its slice: a success replaces it, a failure leaves the
// previous value and is reported on its own. The cycle ends when all four
// have answered, whatever the outcome.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use domus_api::SessionGateway;

use crate::error::CoreError;
use crate::snapshot::{DashboardSnapshot, Slice};

const EVENT_CHANNEL_SIZE: usize = 64;

/// Refresh lifecycle, observable through [`DashboardRefreshOrchestrator::watch_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RefreshState {
    Idle,
    Refreshing,
}

/// Notifications for UI collaborators.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// A new snapshot was published.
    SnapshotUpdated(Arc<DashboardSnapshot>),
    /// One slice could not be fetched during a refresh.
    SliceFailed { slice: Slice, error: Arc<CoreError> },
    /// A refresh cycle finished; the orchestrator is idle again.
    RefreshComplete(RefreshReport),
}

/// Per-slice outcome of one refresh cycle.
#[derive(Debug, Clone, Default)]
pub struct RefreshReport {
    pub refreshed: Vec<Slice>,
    pub failed: Vec<(Slice, Arc<CoreError>)>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of asking for a refresh.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Completed(RefreshReport),
    /// A cycle was already running; this request was folded into it.
    AlreadyRunning,
}

/// Returns the orchestrator to `Idle` when a cycle ends or is cancelled.
struct CycleGuard<'a>(&'a watch::Sender<RefreshState>);

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.send_replace(RefreshState::Idle);
    }
}

/// Drives the `Idle → Refreshing → Idle` cycle and owns the published snapshot.
pub struct DashboardRefreshOrchestrator {
    gateway: Arc<SessionGateway>,
    state: watch::Sender<RefreshState>,
    snapshot: watch::Sender<Arc<DashboardSnapshot>>,
    events: broadcast::Sender<DashboardEvent>,
}

impl DashboardRefreshOrchestrator {
    pub fn new(gateway: Arc<SessionGateway>) -> Self {
        let (state, _) = watch::channel(RefreshState::Idle);
        let (snapshot, _) = watch::channel(Arc::new(DashboardSnapshot::default()));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self {
            gateway,
            state,
            snapshot,
            events,
        }
    }

    pub fn state(&self) -> RefreshState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<RefreshState> {
        self.state.subscribe()
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Arc<DashboardSnapshot> {
        Arc::clone(&self.snapshot.borrow())
    }

    pub fn watch_snapshot(&self) -> watch::Receiver<Arc<DashboardSnapshot>> {
        self.snapshot.subscribe()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Run one refresh cycle, or report that one is already running.
    pub async fn refresh(&self) -> RefreshOutcome {
        let started = self.state.send_if_modified(|state| {
            if *state == RefreshState::Idle {
                *state = RefreshState::Refreshing;
                true
            } else {
                false
            }
        });
        if !started {
            debug!("refresh already in progress, coalescing");
            return RefreshOutcome::AlreadyRunning;
        }
        // Back to Idle even if this future is dropped mid-cycle.
        let cycle = CycleGuard(&self.state);

        let gw = &self.gateway;
        let (rooms, devices, thermostats, security) = tokio::join!(
            gw.list_rooms(),
            gw.list_devices(),
            gw.list_thermostats(),
            gw.security_state(),
        );

        let mut report = RefreshReport::default();
        let rooms = self.settle(Slice::Rooms, rooms, &mut report);
        let devices = self.settle(Slice::Devices, devices, &mut report);
        let thermostats = self.settle(Slice::Thermostats, thermostats, &mut report);
        let security = self.settle(Slice::Security, security, &mut report);

        self.snapshot.send_modify(|current| {
            let snap = Arc::make_mut(current);
            if let Some(rooms) = rooms {
                snap.rooms = rooms;
            }
            if let Some(devices) = devices {
                snap.devices = devices;
            }
            if let Some(thermostats) = thermostats {
                snap.thermostats = thermostats;
            }
            if let Some(Some(state)) = security {
                snap.security_state = state.label().to_owned();
            }
            snap.refreshed_at = Some(Utc::now());
        });
        let _ = self
            .events
            .send(DashboardEvent::SnapshotUpdated(self.snapshot()));

        drop(cycle);

        info!(
            refreshed = report.refreshed.len(),
            failed = report.failed.len(),
            "dashboard refresh complete"
        );
        let _ = self
            .events
            .send(DashboardEvent::RefreshComplete(report.clone()));

        RefreshOutcome::Completed(report)
    }

    /// Record one slice's outcome; hand back the value on success.
    fn settle<T>(
        &self,
        slice: Slice,
        result: Result<T, domus_api::Error>,
        report: &mut RefreshReport,
    ) -> Option<T> {
        match result {
            Ok(value) => {
                report.refreshed.push(slice);
                Some(value)
            }
            Err(e) => {
                let error = Arc::new(CoreError::from(e));
                warn!(%slice, error = %error, "dashboard slice failed, keeping previous value");
                report.failed.push((slice, Arc::clone(&error)));
                let _ = self
                    .events
                    .send(DashboardEvent::SliceFailed { slice, error });
                None
            }
        }
    }

    /// Apply a confirmed change to the published snapshot.
    ///
    /// `apply` returns whether it changed anything; only then is a new
    /// snapshot published.
    pub(crate) fn update(&self, apply: impl FnOnce(&mut DashboardSnapshot) -> bool) -> bool {
        let changed = self
            .snapshot
            .send_if_modified(|current| apply(Arc::make_mut(current)));
        if changed {
            let _ = self
                .events
                .send(DashboardEvent::SnapshotUpdated(self.snapshot()));
        }
        changed
    }
}
