//! Periodic dashboard refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::source::RecordSource;

use super::service::{Dashboard, RefreshOutcome};

/// Drives [`Dashboard::refresh`] on a fixed period.
///
/// The first refresh runs as soon as the scheduler starts. Refreshes run
/// inline in the loop, so ticks never overlap; a tick that falls due while
/// a refresh is still running is skipped rather than queued.
pub struct RefreshScheduler;

impl RefreshScheduler {
    /// Spawns the refresh loop on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// `ValidationError` if `period` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// use attendance_engine::config::EngineConfig;
    /// use attendance_engine::dashboard::{Dashboard, RefreshScheduler};
    /// use attendance_engine::source::StaticSource;
    ///
    /// let rt = tokio::runtime::Runtime::new().unwrap();
    /// rt.block_on(async {
    ///     let dashboard = Arc::new(Dashboard::new(StaticSource::new(), EngineConfig::default()));
    ///     let mut updates = dashboard.subscribe();
    ///
    ///     let handle = RefreshScheduler::start(Arc::clone(&dashboard), Duration::from_secs(600)).unwrap();
    ///     updates.changed().await.unwrap();
    ///     assert!(dashboard.latest().is_some());
    ///
    ///     handle.stop().await;
    /// });
    /// ```
    pub fn start<S: RecordSource>(
        dashboard: Arc<Dashboard<S>>,
        period: Duration,
    ) -> EngineResult<SchedulerHandle> {
        if period.is_zero() {
            return Err(EngineError::validation(
                "refresh_interval",
                "must be greater than zero",
            ));
        }

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            info!(period_secs = period.as_secs(), "Refresh scheduler started");
            loop {
                tokio::select! {
                    // Fires on stop() and when the handle is dropped.
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        if dashboard.refresh().await == RefreshOutcome::Skipped {
                            debug!("Scheduled refresh skipped, previous refresh still running");
                        }
                    }
                }
            }
            info!("Refresh scheduler stopped");
        });

        Ok(SchedulerHandle {
            stop: stop_tx,
            task,
        })
    }
}

/// Controls a running [`RefreshScheduler`] loop.
///
/// Dropping the handle also ends the loop.
pub struct SchedulerHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stops the loop and waits for it to exit.
    ///
    /// A refresh already under way finishes first.
    pub async fn stop(self) {
        // The loop may already be gone; there is nothing left to stop then.
        let _ = self.stop.send(());
        if let Err(err) = self.task.await {
            warn!(error = %err, "Refresh scheduler task failed");
        }
    }

    /// Returns true once the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
