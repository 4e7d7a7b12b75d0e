//! Handlers for the company and employee offboarding wizards.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use orgdesk_core::workflow::offboarding::{resolve_company_offboarding, resolve_employee_offboarding};
use orgdesk_core::workflow::WorkflowKind;
use orgdesk_directory::probe::{probe_company_offboarding, probe_employee_offboarding};

use super::StepResponse;
use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::CurrentRouteParams;
use crate::response::DataResponse;
use crate::state::AppState;

const COMPANY: WorkflowKind = WorkflowKind::CompanyOffboarding;

// ---------------------------------------------------------------------------
// POST /offboarding/company/session
// ---------------------------------------------------------------------------

pub async fn start_company_session(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
) -> AppResult<impl IntoResponse> {
    let session = state.workflows.enter(&user.session_owner(), COMPANY).await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

// ---------------------------------------------------------------------------
// DELETE /offboarding/company/session
// ---------------------------------------------------------------------------

pub async fn end_company_session(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
) -> AppResult<impl IntoResponse> {
    state.workflows.exit(&user.session_owner(), COMPANY).await;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /offboarding/company/step
// ---------------------------------------------------------------------------

pub async fn get_company_step(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(route): Query<CurrentRouteParams>,
) -> AppResult<impl IntoResponse> {
    let directory = user.directory(&state);
    let existence = probe_company_offboarding(directory.as_ref()).await;

    let view = state
        .workflows
        .with_session(&user.session_owner(), COMPANY, |session| {
            resolve_company_offboarding(&existence, session, route.as_deref())
        })
        .await;

    tracing::debug!(
        subject = %user.subject,
        step = ?view.step,
        loading = view.loading,
        "Company offboarding step derived"
    );

    Ok(Json(DataResponse {
        data: StepResponse { view, existence },
    }))
}

// ---------------------------------------------------------------------------
// POST /offboarding/company/instructions/acknowledge
// ---------------------------------------------------------------------------

/// Pass the instructions step.
pub async fn acknowledge_instructions(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
) -> AppResult<impl IntoResponse> {
    let session = state
        .workflows
        .with_session(&user.session_owner(), COMPANY, |session| {
            session.acknowledge_instructions();
            session.clone()
        })
        .await;

    tracing::info!(
        tenant = %user.tenant,
        subject = %user.subject,
        "Offboarding instructions acknowledged"
    );
    Ok(Json(DataResponse { data: session }))
}

// ---------------------------------------------------------------------------
// GET /offboarding/employee/step
// ---------------------------------------------------------------------------

/// Employee offboarding has no session state; any caller may query it.
pub async fn get_employee_step(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(route): Query<CurrentRouteParams>,
) -> AppResult<impl IntoResponse> {
    let directory = user.directory(&state);
    let existence = probe_employee_offboarding(directory.as_ref()).await;
    let view = resolve_employee_offboarding(&existence, route.as_deref());

    Ok(Json(DataResponse {
        data: StepResponse { view, existence },
    }))
}
