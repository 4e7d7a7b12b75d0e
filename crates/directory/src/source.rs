//! The directory boundary: what the engines need from the REST backend.

use std::sync::Arc;

use async_trait::async_trait;
use orgdesk_core::employee::{
    Branch, Company, CompanyLicense, CompanySettings, Department, Employee, EmployeeProfile,
};
use orgdesk_core::pagination::{Page, PaginationParams};
use orgdesk_core::types::DbId;

/// Errors from the directory layer.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The backend answered 404. For existence checks this is the expected
    /// "absent" signal rather than a failure.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend rejected the caller's token.
    #[error("Unauthorized by directory backend")]
    Unauthorized,

    /// The backend returned a non-2xx status other than 401/404.
    #[error("Directory API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("Could not decode directory response: {0}")]
    Decode(String),
}

impl DirectoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Query for `GET /Employees`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeQuery {
    pub page: PaginationParams,
    /// Only employees without a manager.
    pub top_level_only: bool,
    /// Only direct subordinates of this manager.
    pub reports_to_id: Option<DbId>,
}

impl EmployeeQuery {
    /// A page of top-level employees.
    pub fn top_level(page: PaginationParams) -> Self {
        Self {
            page,
            top_level_only: true,
            reports_to_id: None,
        }
    }

    /// A page of direct subordinates of `manager_id`.
    pub fn subordinates(manager_id: DbId, page: PaginationParams) -> Self {
        Self {
            page,
            top_level_only: false,
            reports_to_id: Some(manager_id),
        }
    }

    /// A plain listing page.
    pub fn all(page: PaginationParams) -> Self {
        Self {
            page,
            top_level_only: false,
            reports_to_id: None,
        }
    }

    pub fn next_page(&self) -> Self {
        Self {
            page: self.page.next_page(),
            ..self.clone()
        }
    }
}

/// Read/write access to the tenant's directory, scoped to one caller.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn list_employees(&self, query: &EmployeeQuery) -> Result<Page<Employee>, DirectoryError>;

    async fn get_employee(&self, id: DbId) -> Result<Employee, DirectoryError>;

    async fn update_reports_to(
        &self,
        id: DbId,
        reports_to_id: Option<DbId>,
    ) -> Result<Employee, DirectoryError>;

    async fn get_company(&self) -> Result<Company, DirectoryError>;

    async fn get_company_license(&self) -> Result<CompanyLicense, DirectoryError>;

    async fn get_company_settings(&self) -> Result<CompanySettings, DirectoryError>;

    async fn list_branches(&self, page: &PaginationParams) -> Result<Page<Branch>, DirectoryError>;

    async fn get_branch(&self, id: DbId) -> Result<Branch, DirectoryError>;

    async fn get_department(&self, id: DbId) -> Result<Department, DirectoryError>;

    async fn get_employee_profile(&self) -> Result<EmployeeProfile, DirectoryError>;
}

/// Hands out [`DirectorySource`]s bound to a caller's access token so that
/// upstream calls are made on the caller's behalf.
pub trait DirectoryGateway: Send + Sync {
    fn scoped(&self, access_token: &str) -> Arc<dyn DirectorySource>;
}

/// Read every page of a query, stopping at the last or first empty page.
pub async fn collect_all_employees(
    source: &dyn DirectorySource,
    query: EmployeeQuery,
) -> Result<Vec<Employee>, DirectoryError> {
    let mut query = query;
    let mut collected = Vec::new();
    loop {
        let page = source.list_employees(&query).await?;
        let last = page.is_last();
        orgdesk_core::pagination::merge_by_id(&mut collected, page.items);
        if last {
            return Ok(collected);
        }
        query = query.next_page();
    }
}
