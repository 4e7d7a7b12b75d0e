//! Route definitions for the offboarding wizards.
//!
//! Mounted at `/offboarding` by `api_routes()`.
//!
//! ```text
//! POST   /company/session                       start_company_session
//! DELETE /company/session                       end_company_session
//! GET    /company/step                          get_company_step (?currentRoute)
//! POST   /company/instructions/acknowledge      acknowledge_instructions
//! GET    /employee/step                         get_employee_step (?currentRoute)
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::offboarding;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/company/session",
            post(offboarding::start_company_session).delete(offboarding::end_company_session),
        )
        .route("/company/step", get(offboarding::get_company_step))
        .route(
            "/company/instructions/acknowledge",
            post(offboarding::acknowledge_instructions),
        )
        .route("/employee/step", get(offboarding::get_employee_step))
}
