//! Invalidates cached org charts when the directory changes.
//!
//! Listens on the [`EventBus`](orgdesk_events::EventBus) and drops the
//! affected tenant's snapshot for every event. The next
//! chart view then runs a full resolution pass.

use std::sync::Arc;

use orgdesk_events::DirectoryEvent;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;

use crate::chart_store::ChartStore;

/// Run the invalidation loop until `cancel` fires or the bus closes.
pub async fn run(
    charts: Arc<ChartStore>,
    mut events: broadcast::Receiver<DirectoryEvent>,
    cancel: CancellationToken,
) {
    tracing::info!("Chart invalidation listener started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Chart invalidation listener stopping");
                break;
            }
            received = events.recv() => match received {
                Ok(event) => {
                    tracing::debug!(
                        tenant = %event.tenant,
                        kind = ?event.kind,
                        employee_id = event.employee_id,
                        "Invalidating chart after directory change"
                    );
                    charts.invalidate(&event.tenant).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    // Missed events could have touched any tenant.
                    tracing::warn!(skipped, "Chart invalidation listener lagged, clearing all charts");
                    charts.invalidate_all().await;
                }
                Err(RecvError::Closed) => {
                    tracing::info!("Event bus closed, chart invalidation listener stopping");
                    break;
                }
            }
        }
    }
}
