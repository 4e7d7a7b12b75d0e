//! Handlers for the onboarding wizard.
//!
//! The current step is never stored: every step query probes the directory
//! and re-derives it from what exists, combined with the caller's session
//! (skip flags and the open step page).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use orgdesk_core::error::CoreError;
use orgdesk_core::workflow::onboarding::{resolve_onboarding, OnboardingStep};
use orgdesk_core::workflow::{WizardStep, WorkflowKind};
use orgdesk_directory::probe::probe_onboarding;

use super::StepResponse;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::CurrentRouteParams;
use crate::response::DataResponse;
use crate::state::AppState;

const KIND: WorkflowKind = WorkflowKind::Onboarding;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_step(slug: &str) -> AppResult<OnboardingStep> {
    OnboardingStep::from_slug(slug).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown onboarding step '{slug}'"
        )))
    })
}

// ---------------------------------------------------------------------------
// POST /onboarding/session
// ---------------------------------------------------------------------------

/// Enter the onboarding route group.
pub async fn start_session(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
) -> AppResult<impl IntoResponse> {
    let session = state.workflows.enter(&user.session_owner(), KIND).await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

// ---------------------------------------------------------------------------
// DELETE /onboarding/session
// ---------------------------------------------------------------------------

/// Leave the onboarding route group; skip flags are forgotten.
pub async fn end_session(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
) -> AppResult<impl IntoResponse> {
    state.workflows.exit(&user.session_owner(), KIND).await;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /onboarding/step
// ---------------------------------------------------------------------------

pub async fn get_step(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(route): Query<CurrentRouteParams>,
) -> AppResult<impl IntoResponse> {
    let directory = user.directory(&state);
    let existence = probe_onboarding(directory.as_ref()).await;

    let view = state
        .workflows
        .with_session(&user.session_owner(), KIND, |session| {
            resolve_onboarding(&existence, session, route.as_deref())
        })
        .await;

    tracing::debug!(
        subject = %user.subject,
        step = ?view.step,
        loading = view.loading,
        redirect = view.navigation.as_ref().map(|n| n.path),
        "Onboarding step derived"
    );

    Ok(Json(DataResponse {
        data: StepResponse { view, existence },
    }))
}

// ---------------------------------------------------------------------------
// POST /onboarding/steps/{step}/visit
// ---------------------------------------------------------------------------

pub async fn visit_step(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(step): Path<String>,
) -> AppResult<impl IntoResponse> {
    let step = parse_step(&step)?;
    let session = state
        .workflows
        .with_session(&user.session_owner(), KIND, |session| {
            session.visit_step(step);
            session.clone()
        })
        .await;
    Ok(Json(DataResponse { data: session }))
}

// ---------------------------------------------------------------------------
// POST /onboarding/steps/{step}/leave
// ---------------------------------------------------------------------------

pub async fn leave_step(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(step): Path<String>,
) -> AppResult<impl IntoResponse> {
    let step = parse_step(&step)?;
    let session = state
        .workflows
        .with_session(&user.session_owner(), KIND, |session| {
            session.leave_step(step);
            session.clone()
        })
        .await;
    Ok(Json(DataResponse { data: session }))
}

// ---------------------------------------------------------------------------
// POST /onboarding/steps/{step}/skip
// ---------------------------------------------------------------------------

/// Bypass a skippable step. Non-skippable steps are rejected with 400.
pub async fn skip_step(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(step): Path<String>,
) -> AppResult<impl IntoResponse> {
    let step = parse_step(&step)?;
    let session = state
        .workflows
        .with_session(&user.session_owner(), KIND, |session| {
            session.skip_step(step).map(|()| session.clone())
        })
        .await?;

    tracing::info!(
        tenant = %user.tenant,
        subject = %user.subject,
        step = step.slug(),
        "Onboarding step skipped"
    );
    Ok(Json(DataResponse { data: session }))
}
