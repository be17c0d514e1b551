//! Plugin context - wires the calendar bridge together from configuration

use std::sync::Arc;
use std::time::Instant;

use calbridge_core::{
    CalendarDelegate, PendingRequestCache, PermissionGate, PermissionResultRouter, RequestCode,
};
use calbridge_domain::{BridgeConfig, Result};
use calbridge_infra::config::resolve_time_zone;
use calbridge_infra::{
    DbManager, HostPermissionGate, PendingRequestSweeper, PendingSweeperConfig, PermissionPrompt,
    PermissionResult, SqliteCalendarStore,
};
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{info, instrument};

use crate::channel::{ChannelReply, MethodCall, OneshotResult};
use crate::commands;
use crate::utils::logging::{log_method_execution, MethodOutcome};

/// What the host keeps to drive permission prompts.
pub struct HostBinding {
    /// Grant state the host updates from the OS.
    pub gate: HostPermissionGate,
    /// Prompts the host must show, in request order.
    pub prompts: mpsc::UnboundedReceiver<PermissionPrompt>,
}

/// Reply to a method call that may still be waiting on a permission prompt.
pub struct PendingReply {
    request_code: Option<RequestCode>,
    receiver: oneshot::Receiver<ChannelReply>,
}

impl PendingReply {
    /// The prompt this call is parked behind, if any.
    pub fn request_code(&self) -> Option<RequestCode> {
        self.request_code
    }

    pub fn is_deferred(&self) -> bool {
        self.request_code.is_some()
    }

    /// The reply if it has already been delivered.
    pub fn try_reply(&mut self) -> Option<ChannelReply> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the reply.
    ///
    /// Returns `None` if the call can no longer be answered, which happens
    /// when the plugin is dropped while the call is parked.
    pub async fn wait(self) -> Option<ChannelReply> {
        self.receiver.await.ok()
    }
}

/// The calendar bridge as seen by a host runtime.
pub struct CalendarPlugin {
    config: BridgeConfig,
    db: Arc<DbManager>,
    store: Arc<SqliteCalendarStore>,
    delegate: Arc<CalendarDelegate>,
    router: Arc<PermissionResultRouter>,
    sweeper: Mutex<Option<PendingRequestSweeper>>,
}

impl CalendarPlugin {
    /// Load configuration from the environment or a config file and create a
    /// host-driven plugin from it.
    pub async fn load() -> Result<(Self, HostBinding)> {
        let config = calbridge_infra::config::load()?;
        Self::with_host_gate(config).await
    }

    /// Create a plugin whose permissions are driven by the host.
    ///
    /// Must be called inside a Tokio runtime when a pending-request TTL is
    /// configured, since the expiry sweep is spawned here.
    pub async fn with_host_gate(config: BridgeConfig) -> Result<(Self, HostBinding)> {
        let (gate, prompts) = HostPermissionGate::new();
        let plugin = Self::new(config, Arc::new(gate.clone())).await?;
        Ok((plugin, HostBinding { gate, prompts }))
    }

    /// Create a plugin around an arbitrary permission gate.
    #[instrument(skip_all, fields(store_path = %config.store.path))]
    pub async fn new(config: BridgeConfig, gate: Arc<dyn PermissionGate>) -> Result<Self> {
        let time_zone = resolve_time_zone(&config)?;

        let db = Arc::new(DbManager::new(&config.store.path, config.store.pool_size)?);
        db.run_migrations()?;

        let store = Arc::new(SqliteCalendarStore::new(Arc::clone(&db)));
        let pending = Arc::new(PendingRequestCache::new());
        let delegate = Arc::new(
            CalendarDelegate::new(store.clone(), gate, pending).with_time_zone(time_zone.as_str()),
        );
        let router = Arc::new(PermissionResultRouter::new(Arc::clone(&delegate)));

        let sweeper = match config.permissions.pending_request_ttl() {
            Some(ttl) => {
                let sweep_config = PendingSweeperConfig::new(ttl, config.permissions.sweep_interval());
                let mut sweeper = PendingRequestSweeper::new(Arc::clone(&router), sweep_config);
                sweeper.start()?;
                Some(sweeper)
            }
            None => None,
        };

        info!(time_zone = %time_zone, expiry = sweeper.is_some(), "calendar plugin ready");

        Ok(Self { config, db, store, delegate, router, sweeper: Mutex::new(sweeper) })
    }

    /// Handle one method call.
    ///
    /// The returned reply is already resolved unless the call was parked
    /// behind a permission prompt.
    pub async fn handle(&self, call: MethodCall) -> PendingReply {
        let started = Instant::now();
        let (sink, receiver) = OneshotResult::channel(&call.method);

        let request = match commands::decode(&call) {
            Ok(request) => request,
            Err(err) => {
                let reply = ChannelReply::from(err);
                log_method_execution(&call.method, MethodOutcome::of_reply(&reply), started.elapsed());
                sink.send(reply);
                return PendingReply { request_code: None, receiver };
            }
        };

        let dispatch = commands::execute(&self.delegate, request, sink.handle()).await;
        log_method_execution(&call.method, MethodOutcome::of_dispatch(&dispatch), started.elapsed());

        PendingReply { request_code: dispatch.request_code(), receiver }
    }

    /// Feed the answer to a permission prompt back into the bridge.
    ///
    /// Always `true`; results for prompts this plugin never issued are
    /// ignored.
    pub async fn on_request_permissions_result(&self, result: PermissionResult) -> bool {
        self.router.on_permission_result(result.request_code, &result.grant_results).await
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The backing store, for hosts that seed calendars.
    pub fn store(&self) -> &Arc<SqliteCalendarStore> {
        &self.store
    }

    pub fn router(&self) -> &Arc<PermissionResultRouter> {
        &self.router
    }

    pub fn time_zone(&self) -> &str {
        self.delegate.time_zone()
    }

    /// Number of calls currently waiting on a prompt.
    pub fn pending_count(&self) -> usize {
        self.router.pending_requests().len()
    }

    pub async fn is_expiring_prompts(&self) -> bool {
        self.sweeper.lock().await.as_ref().is_some_and(PendingRequestSweeper::is_running)
    }

    pub fn health_check(&self) -> Result<()> {
        self.db.health_check()
    }

    /// Stop the expiry sweep. Parked calls stay parked.
    pub async fn shutdown(&self) -> Result<()> {
        info!(pending = self.pending_count(), "shutting down calendar plugin");

        if let Some(mut sweeper) = self.sweeper.lock().await.take() {
            sweeper.stop().await?;
        }
        Ok(())
    }
}
