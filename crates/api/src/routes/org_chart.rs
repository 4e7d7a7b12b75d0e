//! Route definitions for the organization chart.
//!
//! Mounted at `/org-chart` by `api_routes()`.
//!
//! ```text
//! GET    /                              get_org_chart (?pageNumber, pageSize)
//! POST   /invalidate                    invalidate_org_chart
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::org_chart;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(org_chart::get_org_chart))
        .route("/invalidate", post(org_chart::invalidate_org_chart))
}
