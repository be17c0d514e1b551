//! Periodic expiry of unanswered permission prompts.
//!
//! Calls parked behind a prompt the user never answers would otherwise wait
//! forever. When a pending-request TTL is configured, this sweeper resolves
//! them as denials on a fixed interval. Join handles are tracked,
//! cancellation is explicit, and shutdown waits with a timeout.

use std::sync::Arc;
use std::time::Duration;

use calbridge_core::PermissionResultRouter;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Configuration for the pending-request sweeper.
#[derive(Debug, Clone)]
pub struct PendingSweeperConfig {
    /// Requests parked longer than this are expired.
    pub ttl: Duration,
    /// Time between sweeps.
    pub interval: Duration,
    /// Timeout for awaiting the sweep task on stop.
    pub join_timeout: Duration,
}

impl PendingSweeperConfig {
    pub fn new(ttl: Duration, interval: Duration) -> Self {
        Self { ttl, interval, join_timeout: Duration::from_secs(5) }
    }
}

/// Background task expiring stale pending requests.
pub struct PendingRequestSweeper {
    router: Arc<PermissionResultRouter>,
    config: PendingSweeperConfig,
    cancellation: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
}

impl PendingRequestSweeper {
    pub fn new(router: Arc<PermissionResultRouter>, config: PendingSweeperConfig) -> Self {
        Self { router, config, cancellation: CancellationToken::new(), task_handle: None }
    }

    /// Spawn the sweep loop.
    ///
    /// # Errors
    /// Returns `SchedulerError::AlreadyRunning` if the loop is active.
    #[instrument(skip(self), fields(ttl_secs = self.config.ttl.as_secs()))]
    pub fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        // Fresh token so the sweeper can be restarted after stop.
        self.cancellation = CancellationToken::new();

        let router = Arc::clone(&self.router);
        let config = self.config.clone();
        let cancel = self.cancellation.clone();
        self.task_handle = Some(tokio::spawn(async move {
            Self::sweep_loop(router, config, cancel).await;
        }));

        info!("Pending request sweeper started");
        Ok(())
    }

    /// Cancel the sweep loop and wait for it to finish.
    ///
    /// # Errors
    /// Returns `SchedulerError::NotRunning` if the loop was never started,
    /// or a timeout/join error if it does not shut down cleanly.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        let Some(handle) = self.task_handle.take() else {
            return Err(SchedulerError::NotRunning);
        };

        self.cancellation.cancel();

        let join_timeout = self.config.join_timeout;
        tokio::time::timeout(join_timeout, handle)
            .await
            .map_err(|source| SchedulerError::Timeout { duration: join_timeout, source })??;

        info!("Pending request sweeper stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.task_handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    async fn sweep_loop(
        router: Arc<PermissionResultRouter>,
        config: PendingSweeperConfig,
        cancel: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Pending request sweep loop cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    let expired = router.expire_stale(config.ttl);
                    if expired > 0 {
                        debug!(expired, "expired stale pending requests");
                    }
                }
            }
        }
    }
}

impl Drop for PendingRequestSweeper {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("PendingRequestSweeper dropped while running; cancelling task");
            self.cancellation.cancel();
        }
    }
}
