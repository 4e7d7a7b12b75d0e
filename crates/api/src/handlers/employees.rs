//! Handlers for employee listings and manager changes.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use orgdesk_core::error::CoreError;
use orgdesk_core::pagination::PaginationParams;
use orgdesk_core::types::DbId;
use orgdesk_directory::references::ReferenceResolver;
use orgdesk_directory::EmployeeQuery;
use orgdesk_events::{DirectoryEvent, DirectoryEventKind};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `PUT /employees/{id}/reports-to`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsToRequest {
    /// New manager; `null` makes the employee top-level.
    pub reports_to_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// GET /employees
// ---------------------------------------------------------------------------

/// A page of employees with branch, department path and manager resolved.
pub async fn list_employees(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let params = params.validated()?.normalized();
    let directory = user.directory(&state);

    let page = directory.list_employees(&EmployeeQuery::all(params)).await?;
    let details = ReferenceResolver::new(directory).resolve(&page.items).await;

    Ok(Json(DataResponse {
        data: page.map_items(details),
    }))
}

// ---------------------------------------------------------------------------
// PUT /employees/{id}/reports-to
// ---------------------------------------------------------------------------

/// Change an employee's manager upstream and invalidate the tenant's chart.
pub async fn update_reports_to(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(body): Json<ReportsToRequest>,
) -> AppResult<impl IntoResponse> {
    if body.reports_to_id == Some(id) {
        return Err(CoreError::Validation("An employee cannot report to themselves".into()).into());
    }

    let updated = user
        .directory(&state)
        .update_reports_to(id, body.reports_to_id)
        .await?;

    // Invalidate before responding so the caller's next view refetches.
    state.charts.invalidate(&user.tenant).await;
    state.event_bus.publish(
        DirectoryEvent::new(DirectoryEventKind::ReportsToChanged, user.tenant.clone())
            .with_employee(id),
    );

    tracing::info!(
        tenant = %user.tenant,
        employee_id = id,
        reports_to_id = body.reports_to_id,
        "Manager changed"
    );

    Ok(Json(DataResponse { data: updated }))
}
