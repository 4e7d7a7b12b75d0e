//! Route definitions for employees.
//!
//! Mounted at `/employees` by `api_routes()`.
//!
//! ```text
//! GET    /                              list_employees (?pageNumber, pageSize, search)
//! PUT    /{id}/reports-to               update_reports_to
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::employees;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(employees::list_employees))
        .route("/{id}/reports-to", put(employees::update_reports_to))
}
