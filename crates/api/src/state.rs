use std::sync::Arc;

use orgdesk_directory::DirectoryGateway;
use orgdesk_events::EventBus;

use crate::chart_store::ChartStore;
use crate::config::ServerConfig;
use crate::workflow_store::WorkflowStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Builds directory clients bound to a caller's access token.
    pub directory: Arc<dyn DirectoryGateway>,
    /// Per-tenant organization chart snapshots.
    pub charts: Arc<ChartStore>,
    /// Per-caller wizard sessions.
    pub workflows: Arc<WorkflowStore>,
    /// Directory change notifications.
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    pub fn new(config: ServerConfig, directory: Arc<dyn DirectoryGateway>) -> Self {
        Self {
            config: Arc::new(config),
            directory,
            charts: Arc::new(ChartStore::new()),
            workflows: Arc::new(WorkflowStore::new()),
            event_bus: Arc::new(EventBus::default()),
        }
    }
}
