//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?currentRoute=` sent by the UI with every step query so the engine can
/// tell whether a redirect is needed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRouteParams {
    pub current_route: Option<String>,
}

impl CurrentRouteParams {
    pub fn as_deref(&self) -> Option<&str> {
        self.current_route.as_deref().filter(|r| !r.is_empty())
    }
}
