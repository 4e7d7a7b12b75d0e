//! Organization chart resolution.
//!
//! [`OrgChartResolver`] turns the paginated directory into a flat working
//! set of employees ready for [`build_forest`](orgdesk_core::org_chart::build_forest):
//!
//! 1. Fetch one page of top-level employees.
//! 2. For every discovered employee fetch its direct subordinates. Siblings
//!    are fetched concurrently; a child level waits for its parent level.
//! 3. Concatenate everything into one flat set.
//!
//! Failures degrade locally: a failed top-level fetch yields an empty chart,
//! a failed subordinate fetch drops that lineage. Nothing is retried.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use orgdesk_core::employee::Employee;
use orgdesk_core::org_chart::{ChartSnapshot, RootPage};
use orgdesk_core::pagination::{merge_by_id, Page, PaginationParams};
use orgdesk_core::types::DbId;

use crate::source::{collect_all_employees, DirectoryError, DirectorySource, EmployeeQuery};

/// Default page size used when walking a manager's subordinates.
pub const DEFAULT_SUBORDINATE_PAGE_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// LoadTracker
// ---------------------------------------------------------------------------

/// Counts outstanding directory fetches across a whole resolution pass.
///
/// The chart is "loading" until every recursive fetch has settled, not just
/// the top-level one.
#[derive(Debug, Default)]
pub struct LoadTracker {
    in_flight: AtomicUsize,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fetch; it is released when the guard drops.
    pub fn begin(self: &Arc<Self>) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            tracker: Arc::clone(self),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }
}

/// RAII handle for one in-flight fetch.
pub struct InFlightGuard {
    tracker: Arc<LoadTracker>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.tracker.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// OrgChartResolver
// ---------------------------------------------------------------------------

pub struct OrgChartResolver {
    source: Arc<dyn DirectorySource>,
    subordinate_page_size: u32,
    tracker: Arc<LoadTracker>,
}

impl OrgChartResolver {
    pub fn new(source: Arc<dyn DirectorySource>) -> Self {
        Self {
            source,
            subordinate_page_size: DEFAULT_SUBORDINATE_PAGE_SIZE,
            tracker: Arc::new(LoadTracker::new()),
        }
    }

    pub fn with_subordinate_page_size(mut self, page_size: u32) -> Self {
        self.subordinate_page_size = page_size.max(1);
        self
    }

    /// Share an externally owned tracker (e.g. one per tenant).
    pub fn with_tracker(mut self, tracker: Arc<LoadTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn tracker(&self) -> Arc<LoadTracker> {
        Arc::clone(&self.tracker)
    }

    /// Run a full resolution pass for one page of top-level employees.
    ///
    /// `sequence` is stamped onto the snapshot so the caller can discard
    /// passes superseded while they were in flight.
    pub async fn resolve(&self, page: &PaginationParams, sequence: u64) -> ChartSnapshot {
        let top = {
            let _guard = self.tracker.begin();
            self.source
                .list_employees(&EmployeeQuery::top_level(page.clone()))
                .await
        };

        let top = match top {
            Ok(top) => top,
            Err(e) => {
                tracing::warn!(error = %e, sequence, "Top-level employee fetch failed, rendering empty chart");
                Page::empty(page)
            }
        };

        let root_page = RootPage {
            page_number: top.page_number,
            page_size: top.page_size,
            total_items: top.total_items,
            total_pages: top.total_pages,
        };

        let roots: Vec<Employee> = top.items.into_iter().filter(Employee::is_top_level).collect();

        let subtrees = join_all(
            roots
                .iter()
                .map(|root| self.descend(root.id, vec![root.id])),
        )
        .await;

        let mut employees = roots;
        for subtree in subtrees {
            merge_by_id(&mut employees, subtree);
        }

        tracing::debug!(
            sequence,
            employees = employees.len(),
            page_number = root_page.page_number,
            "Organization chart resolved"
        );

        ChartSnapshot {
            employees,
            root_page,
            sequence,
        }
    }

    /// Fetch the subordinates of `manager_id` and, recursively, theirs.
    ///
    /// `lineage` holds every id on the path from the root to `manager_id`;
    /// a subordinate already on that path is not descended into again.
    fn descend(&self, manager_id: DbId, lineage: Vec<DbId>) -> BoxFuture<'_, Vec<Employee>> {
        Box::pin(async move {
            let subordinates = match self.fetch_subordinates(manager_id).await {
                Ok(subordinates) => subordinates,
                Err(e) => {
                    tracing::warn!(manager_id, error = %e, "Subordinate fetch failed, dropping subtree");
                    return Vec::new();
                }
            };

            let children: Vec<Employee> = subordinates
                .into_iter()
                .filter(|e| {
                    let seen = lineage.contains(&e.id);
                    if seen {
                        tracing::warn!(manager_id, employee_id = e.id, "reportsTo cycle detected, not descending");
                    }
                    !seen
                })
                .collect();

            let nested = join_all(children.iter().map(|child| {
                let mut path = lineage.clone();
                path.push(child.id);
                self.descend(child.id, path)
            }))
            .await;

            let mut collected = children;
            for subtree in nested {
                collected.extend(subtree);
            }
            collected
        })
    }

    async fn fetch_subordinates(&self, manager_id: DbId) -> Result<Vec<Employee>, DirectoryError> {
        let _guard = self.tracker.begin();
        let query = EmployeeQuery::subordinates(
            manager_id,
            PaginationParams::new(1, self.subordinate_page_size),
        );
        collect_all_employees(self.source.as_ref(), query).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
