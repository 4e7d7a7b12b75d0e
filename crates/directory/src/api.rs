//! REST client for the upstream directory backend.
//!
//! Wraps the backend's JSON endpoints using [`reqwest`]. Every request
//! carries the caller's bearer token and is bounded by the timeout of the
//! shared [`reqwest::Client`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use orgdesk_core::employee::{
    Branch, Company, CompanyLicense, CompanySettings, Department, Employee, EmployeeProfile,
    UpdateReportsTo,
};
use orgdesk_core::pagination::{Page, PaginationParams};
use orgdesk_core::types::DbId;
use reqwest::StatusCode;

use crate::source::{DirectoryError, DirectoryGateway, DirectorySource, EmployeeQuery};

/// HTTP client for the directory backend, bound to one access token.
pub struct DirectoryApi {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl DirectoryApi {
    /// Create a client reusing an existing [`reqwest::Client`] (connection
    /// pooling is shared across callers).
    pub fn with_client(client: reqwest::Client, base_url: String, access_token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, DirectoryError> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        Self::parse_response(response, path).await
    }

    // ---- private helpers ----

    /// Map non-success statuses onto [`DirectoryError`] variants.
    async fn ensure_success(
        response: reqwest::Response,
        path: &str,
    ) -> Result<reqwest::Response, DirectoryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status {
            StatusCode::NOT_FOUND => Err(DirectoryError::NotFound(path.to_string())),
            StatusCode::UNAUTHORIZED => Err(DirectoryError::Unauthorized),
            _ => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<unreadable body>".to_string());
                Err(DirectoryError::Api {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        path: &str,
    ) -> Result<T, DirectoryError> {
        let response = Self::ensure_success(response, path).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| DirectoryError::Decode(format!("{path}: {e}")))
    }
}

/// Query-string pairs for a pagination request.
fn page_query(page: &PaginationParams) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        ("pageNumber", page.page_number.to_string()),
        ("pageSize", page.page_size.to_string()),
    ];
    if let Some(search) = page.search.as_deref().filter(|s| !s.is_empty()) {
        pairs.push(("search", search.to_string()));
    }
    pairs
}

/// Query-string pairs for `GET /Employees`.
pub fn employee_query_pairs(query: &EmployeeQuery) -> Vec<(&'static str, String)> {
    let mut pairs = page_query(&query.page);
    pairs.push(("topLevelOnly", query.top_level_only.to_string()));
    if let Some(manager_id) = query.reports_to_id {
        pairs.push(("reportsToId", manager_id.to_string()));
    }
    pairs
}

#[async_trait]
impl DirectorySource for DirectoryApi {
    async fn list_employees(&self, query: &EmployeeQuery) -> Result<Page<Employee>, DirectoryError> {
        self.get_json("/Employees", &employee_query_pairs(query)).await
    }

    async fn get_employee(&self, id: DbId) -> Result<Employee, DirectoryError> {
        self.get_json(&format!("/Employees/{id}"), &[]).await
    }

    async fn update_reports_to(
        &self,
        id: DbId,
        reports_to_id: Option<DbId>,
    ) -> Result<Employee, DirectoryError> {
        let path = format!("/Employees/{id}/ReportsTo");
        let response = self
            .client
            .put(self.url(&path))
            .bearer_auth(&self.access_token)
            .json(&UpdateReportsTo { reports_to_id })
            .send()
            .await?;

        Self::parse_response(response, &path).await
    }

    async fn get_company(&self) -> Result<Company, DirectoryError> {
        self.get_json("/Company", &[]).await
    }

    async fn get_company_license(&self) -> Result<CompanyLicense, DirectoryError> {
        self.get_json("/Company/License", &[]).await
    }

    async fn get_company_settings(&self) -> Result<CompanySettings, DirectoryError> {
        self.get_json("/CompanySettings", &[]).await
    }

    async fn list_branches(&self, page: &PaginationParams) -> Result<Page<Branch>, DirectoryError> {
        self.get_json("/Branches", &page_query(page)).await
    }

    async fn get_branch(&self, id: DbId) -> Result<Branch, DirectoryError> {
        self.get_json(&format!("/Branches/{id}"), &[]).await
    }

    async fn get_department(&self, id: DbId) -> Result<Department, DirectoryError> {
        self.get_json(&format!("/Departments/{id}"), &[]).await
    }

    async fn get_employee_profile(&self) -> Result<EmployeeProfile, DirectoryError> {
        self.get_json("/Employees/Profile", &[]).await
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Builds [`DirectoryApi`] clients that share one connection pool and one
/// global request timeout.
#[derive(Clone)]
pub struct HttpDirectoryGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDirectoryGateway {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }
}

impl DirectoryGateway for HttpDirectoryGateway {
    fn scoped(&self, access_token: &str) -> Arc<dyn DirectorySource> {
        Arc::new(DirectoryApi::with_client(
            self.client.clone(),
            self.base_url.clone(),
            access_token.to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subordinate_query_pairs() {
        let query = EmployeeQuery::subordinates(333333333335, PaginationParams::new(2, 50));
        let pairs = employee_query_pairs(&query);
        assert!(pairs.contains(&("pageNumber", "2".to_string())));
        assert!(pairs.contains(&("pageSize", "50".to_string())));
        assert!(pairs.contains(&("topLevelOnly", "false".to_string())));
        assert!(pairs.contains(&("reportsToId", "333333333335".to_string())));
    }

    #[test]
    fn top_level_query_omits_manager() {
        let mut page = PaginationParams::default();
        page.search = Some(String::new());
        let pairs = employee_query_pairs(&EmployeeQuery::top_level(page));
        assert!(pairs.contains(&("topLevelOnly", "true".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "reportsToId"));
        assert!(!pairs.iter().any(|(k, _)| *k == "search"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = DirectoryApi::with_client(
            reqwest::Client::new(),
            "http://directory.local/api/".to_string(),
            "token".to_string(),
        );
        assert_eq!(api.url("/Company"), "http://directory.local/api/Company");
    }
}
