//! Route definitions for the onboarding wizard.
//!
//! Mounted at `/onboarding` by `api_routes()`.
//!
//! ```text
//! POST   /session                       start_session
//! DELETE /session                       end_session
//! GET    /step                          get_step (?currentRoute)
//! POST   /steps/{step}/visit            visit_step
//! POST   /steps/{step}/leave            leave_step
//! POST   /steps/{step}/skip             skip_step
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// Onboarding routes -- mounted at `/onboarding`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/session",
            post(onboarding::start_session).delete(onboarding::end_session),
        )
        .route("/step", get(onboarding::get_step))
        .route("/steps/{step}/visit", post(onboarding::visit_step))
        .route("/steps/{step}/leave", post(onboarding::leave_step))
        .route("/steps/{step}/skip", post(onboarding::skip_step))
}
