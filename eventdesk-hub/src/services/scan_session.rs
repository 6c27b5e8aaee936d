//! Live scan sessions
//!
//! Each owner has at most one session. While Active, a background task
//! polls the device bridge on a fixed period and feeds tags into the
//! session's attendance feed.
//!
//! Polls run one at a time: the next tick is only awaited after the previous
//! poll returned, and ticks missed meanwhile are skipped. Stopping cancels
//! the task and waits for it, so nothing is recorded once `stop` returns.
//! Manual scans recheck the session's cancellation token after taking the
//! feed lock for the same reason.

use crate::services::attendance::{AttendanceCounts, AttendanceFeed, ScanOutcome};
use crate::services::device_bridge::DeviceBridge;
use chrono::{DateTime, Utc};
use eventdesk_common::events::{DeskEvent, EventBus};
use eventdesk_common::models::AttendanceEntry;
use eventdesk_common::{time, Error, OwnerId, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub type SharedFeed = Arc<Mutex<AttendanceFeed>>;

/// Handle to a running poll task
pub struct ScanPoller {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ScanPoller {
    pub fn spawn(
        bridge: Arc<dyn DeviceBridge>,
        feed: SharedFeed,
        period: Duration,
    ) -> Self {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_loop(bridge, feed, period, cancel.clone()));
        Self { cancel, task }
    }

    fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel and wait for the task to finish
    pub async fn cancel(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!("Scan poll task ended abnormally: {}", e);
        }
    }
}

async fn poll_loop(
    bridge: Arc<dyn DeviceBridge>,
    feed: SharedFeed,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut timer = tokio::time::interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = timer.tick() => {}
        }

        let polled = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = bridge.scan_tag() => result,
        };

        match polled {
            Ok(Some(tag_id)) => {
                let mut feed = feed.lock().await;
                if cancel.is_cancelled() {
                    debug!(tag_id = %tag_id, "Discarding scan that arrived after stop");
                    break;
                }
                match feed.on_tag_scanned(tag_id.as_str()).await {
                    Ok(outcome) => debug!(tag_id = %tag_id, ?outcome, "Processed scan"),
                    Err(e) => warn!(tag_id = %tag_id, "Failed to process scan: {}", e),
                }
            }
            Ok(None) => debug!("No tag on the reader"),
            Err(e) if e.is_network() => warn!("Device bridge unreachable: {}", e),
            Err(e) => debug!("Scan poll returned nothing usable: {}", e),
        }
    }

    debug!("Scan poll loop stopped");
}

/// Snapshot of one owner's session
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub active: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub counts: AttendanceCounts,
    pub entries: Vec<AttendanceEntry>,
}

struct OwnerSession {
    feed: SharedFeed,
    poller: Option<ScanPoller>,
    started_at: DateTime<Utc>,
}

/// Per-owner scan sessions
pub struct ScanRegistry {
    db: SqlitePool,
    event_bus: EventBus,
    bridge: Arc<dyn DeviceBridge>,
    poll_interval: Duration,
    sessions: Mutex<HashMap<OwnerId, OwnerSession>>,
}

/// Shortest accepted poll period
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

impl ScanRegistry {
    /// A zero `poll_interval` is raised to [`MIN_POLL_INTERVAL`]
    pub fn new(
        db: SqlitePool,
        event_bus: EventBus,
        bridge: Arc<dyn DeviceBridge>,
        poll_interval: Duration,
    ) -> Self {
        if poll_interval < MIN_POLL_INTERVAL {
            warn!(
                requested_ms = poll_interval.as_millis() as u64,
                "Poll interval too short, using {}ms",
                MIN_POLL_INTERVAL.as_millis()
            );
        }
        let poll_interval = poll_interval.max(MIN_POLL_INTERVAL);

        Self {
            db,
            event_bus,
            bridge,
            poll_interval,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Idle -> Active with a fresh, empty feed
    pub async fn start(&self, owner: &OwnerId) -> Result<SessionStatus> {
        let mut sessions = self.sessions.lock().await;
        if sessions.get(owner).is_some_and(|s| s.poller.is_some()) {
            return Err(Error::Conflict("scan session already active".to_string()));
        }

        let feed: SharedFeed = Arc::new(Mutex::new(AttendanceFeed::new(
            owner.clone(),
            self.db.clone(),
            self.event_bus.clone(),
        )));
        let started_at = time::now();
        self.event_bus.emit(DeskEvent::ScanSessionChanged {
            owner_id: owner.clone(),
            active: true,
            timestamp: started_at,
        });

        let poller = ScanPoller::spawn(self.bridge.clone(), feed.clone(), self.poll_interval);
        sessions.insert(
            owner.clone(),
            OwnerSession {
                feed,
                poller: Some(poller),
                started_at,
            },
        );
        drop(sessions);

        info!(
            owner = %owner,
            interval_ms = self.poll_interval.as_millis() as u64,
            "Scan session started"
        );

        Ok(SessionStatus {
            active: true,
            started_at: Some(started_at),
            counts: AttendanceCounts::default(),
            entries: Vec::new(),
        })
    }

    /// Active -> Idle; a no-op when already Idle
    ///
    /// The session's entries stay readable until the next start.
    pub async fn stop(&self, owner: &OwnerId) -> SessionStatus {
        let mut sessions = self.sessions.lock().await;
        let poller = sessions.get_mut(owner).and_then(|s| s.poller.take());

        if let Some(poller) = poller {
            poller.cancel().await;
            info!(owner = %owner, "Scan session stopped");
            self.event_bus.emit(DeskEvent::ScanSessionChanged {
                owner_id: owner.clone(),
                active: false,
                timestamp: time::now(),
            });
        }

        let session = sessions.get(owner);
        snapshot(session).await
    }

    pub async fn status(&self, owner: &OwnerId) -> SessionStatus {
        let sessions = self.sessions.lock().await;
        snapshot(sessions.get(owner)).await
    }

    /// Feed of the owner's current (or most recent) session
    pub async fn feed(&self, owner: &OwnerId) -> Option<SharedFeed> {
        let sessions = self.sessions.lock().await;
        sessions.get(owner).map(|s| s.feed.clone())
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Push a tag into the active session as if the bridge had read it
    pub async fn submit_scan(&self, owner: &OwnerId, raw_tag_id: &str) -> Result<ScanOutcome> {
        let (feed, session_token) = {
            let sessions = self.sessions.lock().await;
            match sessions.get(owner) {
                Some(OwnerSession {
                    feed,
                    poller: Some(poller),
                    ..
                }) => (feed.clone(), poller.token()),
                _ => return Err(inactive()),
            }
        };

        let mut feed = feed.lock().await;
        if session_token.is_cancelled() {
            debug!(owner = %owner, "Discarding manual scan that arrived after stop");
            return Err(inactive());
        }
        feed.on_tag_scanned(raw_tag_id).await
    }

    /// Stop every active session (shutdown)
    pub async fn stop_all(&self) {
        let mut sessions = self.sessions.lock().await;
        let pollers: Vec<(OwnerId, ScanPoller)> = sessions
            .iter_mut()
            .filter_map(|(owner, s)| s.poller.take().map(|p| (owner.clone(), p)))
            .collect();
        drop(sessions);

        for (owner, poller) in pollers {
            poller.cancel().await;
            info!(owner = %owner, "Scan session stopped for shutdown");
        }
    }
}

fn inactive() -> Error {
    Error::Conflict("no active scan session".to_string())
}

async fn snapshot(session: Option<&OwnerSession>) -> SessionStatus {
    let Some(session) = session else {
        return SessionStatus {
            active: false,
            started_at: None,
            counts: AttendanceCounts::default(),
            entries: Vec::new(),
        };
    };

    let feed = session.feed.lock().await;
    SessionStatus {
        active: session.poller.is_some(),
        started_at: Some(session.started_at),
        counts: feed.counts(),
        entries: feed.entries().to_vec(),
    }
}
