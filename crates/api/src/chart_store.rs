//! Per-tenant organization chart snapshots.
//!
//! Each tenant has at most one cached [`ChartSnapshot`]. Resolution passes
//! are numbered; only the most recently issued pass may commit its result,
//! so a slow pass that finishes after a newer one (or after an
//! invalidation) is discarded instead of overwriting fresher data.

use std::collections::HashMap;
use std::sync::Arc;

use orgdesk_core::org_chart::ChartSnapshot;
use orgdesk_core::pagination::PaginationParams;
use orgdesk_directory::resolver::LoadTracker;
use tokio::sync::RwLock;

/// Cache state of one tenant's chart.
#[derive(Debug, Clone)]
pub enum ChartStatus {
    /// Nothing usable is cached; the next view triggers a full pass.
    Idle,
    Ready(Arc<ChartSnapshot>),
}

/// The top-level query a snapshot was built from.
///
/// `search` narrows the top-level fetch, so a filtered snapshot never
/// answers an unfiltered view of the same page.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PageKey {
    page_number: u32,
    page_size: u32,
    search: Option<String>,
}

impl From<&PaginationParams> for PageKey {
    fn from(params: &PaginationParams) -> Self {
        Self {
            page_number: params.page_number,
            page_size: params.page_size,
            search: params.search.clone(),
        }
    }
}

struct ChartEntry {
    status: ChartStatus,
    page: Option<PageKey>,
    latest_sequence: u64,
    tracker: Arc<LoadTracker>,
}

impl Default for ChartEntry {
    fn default() -> Self {
        Self {
            status: ChartStatus::Idle,
            page: None,
            latest_sequence: 0,
            tracker: Arc::new(LoadTracker::new()),
        }
    }
}

/// A resolution pass that has been issued but not yet committed.
#[derive(Debug, Clone)]
pub struct ChartPass {
    pub sequence: u64,
    /// Shared in-flight counter for the tenant.
    pub tracker: Arc<LoadTracker>,
}

#[derive(Default)]
pub struct ChartStore {
    entries: RwLock<HashMap<String, ChartEntry>>,
}

impl ChartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached snapshot for `tenant`, if it was built for the same page
    /// and search.
    pub async fn snapshot(&self, tenant: &str, page: &PaginationParams) -> Option<Arc<ChartSnapshot>> {
        let entries = self.entries.read().await;
        let entry = entries.get(tenant)?;
        match &entry.status {
            ChartStatus::Ready(snapshot) if entry.page.as_ref() == Some(&PageKey::from(page)) => {
                Some(Arc::clone(snapshot))
            }
            _ => None,
        }
    }

    pub async fn status(&self, tenant: &str) -> ChartStatus {
        self.entries
            .read()
            .await
            .get(tenant)
            .map(|entry| entry.status.clone())
            .unwrap_or(ChartStatus::Idle)
    }

    /// Issue the next pass number for `tenant`.
    pub async fn begin_pass(&self, tenant: &str) -> ChartPass {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(tenant.to_string()).or_default();
        entry.latest_sequence += 1;
        tracing::debug!(tenant, sequence = entry.latest_sequence, "Chart resolution pass started");
        ChartPass {
            sequence: entry.latest_sequence,
            tracker: Arc::clone(&entry.tracker),
        }
    }

    /// Store `snapshot` if its pass is still the latest for `tenant`.
    ///
    /// Returns whether the snapshot was committed.
    pub async fn commit(
        &self,
        tenant: &str,
        page: &PaginationParams,
        snapshot: Arc<ChartSnapshot>,
    ) -> bool {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(tenant.to_string()).or_default();
        if snapshot.sequence != entry.latest_sequence {
            tracing::info!(
                tenant,
                sequence = snapshot.sequence,
                latest = entry.latest_sequence,
                "Discarding superseded chart pass"
            );
            return false;
        }
        entry.status = ChartStatus::Ready(snapshot);
        entry.page = Some(PageKey::from(page));
        true
    }

    /// Drop the cached snapshot and supersede any pass still in flight.
    pub async fn invalidate(&self, tenant: &str) {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(tenant.to_string()).or_default();
        entry.status = ChartStatus::Idle;
        entry.page = None;
        entry.latest_sequence += 1;
        tracing::debug!(tenant, "Chart snapshot invalidated");
    }

    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.write().await;
        for entry in entries.values_mut() {
            entry.status = ChartStatus::Idle;
            entry.page = None;
            entry.latest_sequence += 1;
        }
        tracing::debug!(tenants = entries.len(), "All chart snapshots invalidated");
    }

    /// Whether any directory fetch for `tenant`'s chart is outstanding.
    pub async fn is_loading(&self, tenant: &str) -> bool {
        self.entries
            .read()
            .await
            .get(tenant)
            .is_some_and(|entry| entry.tracker.is_loading())
    }
}
