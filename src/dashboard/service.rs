//! Dashboard refresh and snapshot publication.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::DashboardSnapshot;
use crate::source::{Collection, RecordSource};

use super::aggregator::{DashboardInputs, aggregate};

/// What a call to [`Dashboard::refresh`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new snapshot was built and published.
    Completed(Arc<DashboardSnapshot>),
    /// Another refresh was already running; nothing was fetched.
    Skipped,
}

/// Clears the in-flight flag when the refresh ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The executive dashboard over a record source.
///
/// Each [`refresh`](Dashboard::refresh) fetches the six collections
/// concurrently, aggregates them, and publishes an immutable
/// [`DashboardSnapshot`] that replaces the previous one. Readers either
/// poll [`latest`](Dashboard::latest) or [`subscribe`](Dashboard::subscribe)
/// to be woken on every publication.
///
/// # Example
///
/// ```
/// use attendance_engine::config::EngineConfig;
/// use attendance_engine::dashboard::{Dashboard, RefreshOutcome};
/// use attendance_engine::source::{Collection, StaticSource};
/// use serde_json::json;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let source = StaticSource::new()
///         .with(Collection::Employees, vec![json!({"department": "Eng", "salary": 5000})]);
///     let dashboard = Dashboard::new(source, EngineConfig::default());
///
///     let RefreshOutcome::Completed(snapshot) = dashboard.refresh().await else {
///         panic!("refresh should run");
///     };
///     assert_eq!(snapshot.summary.employee_count, 1);
///     assert_eq!(snapshot.summary.unavailable.len(), 5);
///     assert_eq!(dashboard.latest().unwrap().id, snapshot.id);
/// });
/// ```
pub struct Dashboard<S> {
    source: S,
    config: EngineConfig,
    refreshing: AtomicBool,
    snapshot: watch::Sender<Option<Arc<DashboardSnapshot>>>,
}

impl<S: RecordSource> Dashboard<S> {
    /// Creates a dashboard with no snapshot published yet.
    pub fn new(source: S, config: EngineConfig) -> Self {
        let (snapshot, _) = watch::channel(None);
        Self {
            source,
            config,
            refreshing: AtomicBool::new(false),
            snapshot,
        }
    }

    /// The record source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The most recently published snapshot, if any.
    pub fn latest(&self) -> Option<Arc<DashboardSnapshot>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribes to snapshot publications.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<DashboardSnapshot>>> {
        self.snapshot.subscribe()
    }

    /// Returns true while a refresh is running.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    /// Fetches all collections and publishes a new snapshot.
    ///
    /// Collections that fail to load, or do not answer within the
    /// configured fetch timeout, are logged and listed in the snapshot's
    /// `unavailable`; the rest of the summary is still built.
    /// If a refresh is already running this returns
    /// [`RefreshOutcome::Skipped`] immediately.
    pub async fn refresh(&self) -> RefreshOutcome {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Dashboard refresh already in flight, skipping");
            return RefreshOutcome::Skipped;
        }
        let _in_flight = InFlight(&self.refreshing);

        let started = Instant::now();
        let inputs = self.fetch_all().await;

        for collection in Collection::ALL {
            if let Err(err) = inputs.get(collection) {
                warn!(
                    collection = %collection,
                    error = %err,
                    "Collection unavailable"
                );
            }
        }

        let summary = aggregate(&inputs, &self.config);
        let snapshot = Arc::new(DashboardSnapshot {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            summary,
        });

        info!(
            snapshot_id = %snapshot.id,
            employees = snapshot.summary.employee_count,
            attendance_rows = snapshot.summary.attendance_table.len(),
            unavailable = snapshot.summary.unavailable.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Dashboard refreshed"
        );

        self.snapshot.send_replace(Some(Arc::clone(&snapshot)));
        RefreshOutcome::Completed(snapshot)
    }

    async fn fetch_all(&self) -> DashboardInputs {
        let (employees, leave_requests, projects, meeting_rooms, payrolls, attendance) = tokio::join!(
            self.fetch_bounded(Collection::Employees),
            self.fetch_bounded(Collection::LeaveRequests),
            self.fetch_bounded(Collection::Projects),
            self.fetch_bounded(Collection::MeetingRooms),
            self.fetch_bounded(Collection::Payrolls),
            self.fetch_bounded(Collection::Attendance),
        );

        DashboardInputs {
            employees,
            leave_requests,
            projects,
            meeting_rooms,
            payrolls,
            attendance,
        }
    }

    async fn fetch_bounded(&self, collection: Collection) -> EngineResult<Vec<Value>> {
        let limit = self.config.fetch_timeout();
        match timeout(limit, self.source.fetch(collection)).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::SourceUnavailable {
                collection,
                message: format!("no response within {}s", limit.as_secs()),
            }),
        }
    }
}
