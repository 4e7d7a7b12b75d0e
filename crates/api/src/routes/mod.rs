pub mod employees;
pub mod health;
pub mod offboarding;
pub mod onboarding;
pub mod org_chart;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /org-chart                                        chart for one root page (GET)
/// /org-chart/invalidate                             force refetch (POST)
///
/// /employees                                        enriched employee page (GET)
/// /employees/{id}/reports-to                        change manager (PUT)
///
/// /onboarding/session                               enter, exit (POST, DELETE; admin)
/// /onboarding/step                                  derive step (GET; admin)
/// /onboarding/steps/{step}/visit                    step page opened (POST; admin)
/// /onboarding/steps/{step}/leave                    step page closed (POST; admin)
/// /onboarding/steps/{step}/skip                     skip step (POST; admin)
///
/// /offboarding/company/session                      enter, exit (POST, DELETE; admin)
/// /offboarding/company/step                         derive step (GET; admin)
/// /offboarding/company/instructions/acknowledge     pass instructions (POST; admin)
/// /offboarding/employee/step                        derive step (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/org-chart", org_chart::router())
        .nest("/employees", employees::router())
        .nest("/onboarding", onboarding::router())
        .nest("/offboarding", offboarding::router())
}
