//! Handlers for the organization chart.
//!
//! A chart view reuses the tenant's cached snapshot when it was built for
//! the same page and search; otherwise it runs a full resolution pass against the
//! directory and commits the result if no newer pass superseded it.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use orgdesk_core::org_chart::{forest_size, ChartSnapshot, OrgNode, RootPage};
use orgdesk_core::pagination::PaginationParams;
use orgdesk_directory::resolver::OrgChartResolver;
use orgdesk_events::{DirectoryEvent, DirectoryEventKind};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Render-ready chart payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgChartView {
    pub roots: Vec<OrgNode>,
    pub page: RootPage,
    pub sequence: u64,
    pub node_count: usize,
    /// Whether another pass for this tenant is still fetching.
    pub loading: bool,
}

impl OrgChartView {
    fn new(snapshot: &ChartSnapshot, loading: bool) -> Self {
        let roots = snapshot.forest();
        Self {
            node_count: forest_size(&roots),
            roots,
            page: snapshot.root_page.clone(),
            sequence: snapshot.sequence,
            loading,
        }
    }
}

// ---------------------------------------------------------------------------
// GET /org-chart
// ---------------------------------------------------------------------------

pub async fn get_org_chart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let params = params.validated()?.normalized();

    if let Some(snapshot) = state.charts.snapshot(&user.tenant, &params).await {
        tracing::debug!(tenant = %user.tenant, sequence = snapshot.sequence, "Serving cached chart");
        let loading = state.charts.is_loading(&user.tenant).await;
        return Ok(Json(DataResponse {
            data: OrgChartView::new(&snapshot, loading),
        }));
    }

    let pass = state.charts.begin_pass(&user.tenant).await;
    let resolver = OrgChartResolver::new(user.directory(&state))
        .with_subordinate_page_size(state.config.subordinate_page_size)
        .with_tracker(pass.tracker);

    let snapshot = Arc::new(resolver.resolve(&params, pass.sequence).await);
    let committed = state
        .charts
        .commit(&user.tenant, &params, Arc::clone(&snapshot))
        .await;

    tracing::info!(
        tenant = %user.tenant,
        sequence = snapshot.sequence,
        employees = snapshot.employees.len(),
        committed,
        "Organization chart resolved"
    );

    let loading = state.charts.is_loading(&user.tenant).await;
    Ok(Json(DataResponse {
        data: OrgChartView::new(&snapshot, loading),
    }))
}

// ---------------------------------------------------------------------------
// POST /org-chart/invalidate
// ---------------------------------------------------------------------------

/// Force a full refetch on the next chart view.
pub async fn invalidate_org_chart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<impl IntoResponse> {
    state.charts.invalidate(&user.tenant).await;
    state
        .event_bus
        .publish(DirectoryEvent::new(DirectoryEventKind::HierarchyReset, user.tenant.clone()));

    tracing::info!(tenant = %user.tenant, "Organization chart invalidated");
    Ok(StatusCode::NO_CONTENT)
}
