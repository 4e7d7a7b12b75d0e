//! In-process directory used by tests and local development.
//!
//! [`MemoryDirectory`] answers the same calls as the REST backend from
//! in-memory collections, including 404 semantics for missing entities. It
//! can be told to fail specific calls and records every call it receives so
//! tests can assert on fetch counts.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use orgdesk_core::employee::{
    Branch, Company, CompanyLicense, CompanySettings, Department, Employee, EmployeeProfile,
};
use orgdesk_core::pagination::{Page, PaginationParams};
use orgdesk_core::types::DbId;

use crate::source::{DirectoryError, DirectoryGateway, DirectorySource, EmployeeQuery};

/// A call that can be made to fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    TopLevel,
    Subordinates(DbId),
    Company,
    CompanyLicense,
    CompanySettings,
    Branches,
    Department(DbId),
    EmployeeProfile,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListEmployees(EmployeeQuery),
    GetEmployee(DbId),
    UpdateReportsTo(DbId),
    Company,
    CompanyLicense,
    CompanySettings,
    ListBranches,
    Branch(DbId),
    Department(DbId),
    EmployeeProfile,
}

#[derive(Default)]
struct State {
    employees: Vec<Employee>,
    company: Option<Company>,
    license: Option<CompanyLicense>,
    settings: Option<CompanySettings>,
    branches: Vec<Branch>,
    departments: Vec<Department>,
    profile: Option<EmployeeProfile>,
}

#[derive(Default)]
struct Inner {
    state: RwLock<State>,
    failures: RwLock<HashSet<FailurePoint>>,
    calls: Mutex<Vec<Call>>,
}

/// Cheaply cloneable handle; clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryDirectory {
    inner: Arc<Inner>,
}

fn injected() -> DirectoryError {
    DirectoryError::Api {
        status: 500,
        body: "injected failure".to_string(),
    }
}

fn not_found(what: &str) -> DirectoryError {
    DirectoryError::NotFound(what.to_string())
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- seeding ----

    pub fn with_employees(self, employees: Vec<Employee>) -> Self {
        self.write(|s| s.employees = employees);
        self
    }

    pub fn set_company(&self, company: Option<Company>) {
        self.write(|s| s.company = company);
    }

    pub fn set_license(&self, license: Option<CompanyLicense>) {
        self.write(|s| s.license = license);
    }

    pub fn set_settings(&self, settings: Option<CompanySettings>) {
        self.write(|s| s.settings = settings);
    }

    pub fn set_profile(&self, profile: Option<EmployeeProfile>) {
        self.write(|s| s.profile = profile);
    }

    pub fn add_branch(&self, branch: Branch) {
        self.write(|s| s.branches.push(branch));
    }

    pub fn add_department(&self, department: Department) {
        self.write(|s| s.departments.push(department));
    }

    pub fn upsert_employee(&self, employee: Employee) {
        self.write(|s| orgdesk_core::pagination::merge_by_id(&mut s.employees, [employee]));
    }

    // ---- failure injection ----

    pub fn fail(&self, point: FailurePoint) {
        if let Ok(mut failures) = self.inner.failures.write() {
            failures.insert(point);
        }
    }

    pub fn heal(&self, point: &FailurePoint) {
        if let Ok(mut failures) = self.inner.failures.write() {
            failures.remove(point);
        }
    }

    // ---- call log ----

    pub fn calls(&self) -> Vec<Call> {
        self.inner
            .calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn clear_calls(&self) {
        if let Ok(mut calls) = self.inner.calls.lock() {
            calls.clear();
        }
    }

    // ---- private helpers ----

    fn write(&self, f: impl FnOnce(&mut State)) {
        if let Ok(mut state) = self.inner.state.write() {
            f(&mut state);
        }
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> T) -> Result<T, DirectoryError> {
        self.inner
            .state
            .read()
            .map(|state| f(&state))
            .map_err(|_| injected())
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.inner.calls.lock() {
            calls.push(call);
        }
    }

    fn check(&self, point: FailurePoint) -> Result<(), DirectoryError> {
        let failing = self
            .inner
            .failures
            .read()
            .map(|failures| failures.contains(&point))
            .unwrap_or(false);
        if failing {
            Err(injected())
        } else {
            Ok(())
        }
    }
}

fn paginate<T: Clone>(items: Vec<T>, page: &PaginationParams) -> Page<T> {
    let total = items.len() as u64;
    let start = (page.page_number.saturating_sub(1) as usize).saturating_mul(page.page_size as usize);
    let slice = items
        .into_iter()
        .skip(start)
        .take(page.page_size as usize)
        .collect();
    Page::from_items(slice, page, total)
}

#[async_trait]
impl DirectorySource for MemoryDirectory {
    async fn list_employees(&self, query: &EmployeeQuery) -> Result<Page<Employee>, DirectoryError> {
        self.record(Call::ListEmployees(query.clone()));
        match query.reports_to_id {
            Some(manager_id) => self.check(FailurePoint::Subordinates(manager_id))?,
            None if query.top_level_only => self.check(FailurePoint::TopLevel)?,
            None => {}
        }

        let search = query
            .page
            .search
            .as_deref()
            .map(str::to_lowercase)
            .filter(|s| !s.is_empty());

        let matching = self.read(|s| {
            s.employees
                .iter()
                .filter(|e| !query.top_level_only || e.reports_to_id.is_none())
                .filter(|e| query.reports_to_id.is_none() || e.reports_to_id == query.reports_to_id)
                .filter(|e| match &search {
                    Some(term) => e.display_name().to_lowercase().contains(term),
                    None => true,
                })
                .cloned()
                .collect::<Vec<_>>()
        })?;

        Ok(paginate(matching, &query.page))
    }

    async fn get_employee(&self, id: DbId) -> Result<Employee, DirectoryError> {
        self.record(Call::GetEmployee(id));
        self.read(|s| s.employees.iter().find(|e| e.id == id).cloned())?
            .ok_or_else(|| not_found(&format!("/Employees/{id}")))
    }

    async fn update_reports_to(
        &self,
        id: DbId,
        reports_to_id: Option<DbId>,
    ) -> Result<Employee, DirectoryError> {
        self.record(Call::UpdateReportsTo(id));
        let mut updated = None;
        self.write(|s| {
            if let Some(e) = s.employees.iter_mut().find(|e| e.id == id) {
                e.reports_to_id = reports_to_id;
                updated = Some(e.clone());
            }
        });
        updated.ok_or_else(|| not_found(&format!("/Employees/{id}")))
    }

    async fn get_company(&self) -> Result<Company, DirectoryError> {
        self.record(Call::Company);
        self.check(FailurePoint::Company)?;
        self.read(|s| s.company.clone())?
            .ok_or_else(|| not_found("/Company"))
    }

    async fn get_company_license(&self) -> Result<CompanyLicense, DirectoryError> {
        self.record(Call::CompanyLicense);
        self.check(FailurePoint::CompanyLicense)?;
        self.read(|s| s.license.clone())?
            .ok_or_else(|| not_found("/Company/License"))
    }

    async fn get_company_settings(&self) -> Result<CompanySettings, DirectoryError> {
        self.record(Call::CompanySettings);
        self.check(FailurePoint::CompanySettings)?;
        self.read(|s| s.settings.clone())?
            .ok_or_else(|| not_found("/CompanySettings"))
    }

    async fn list_branches(&self, page: &PaginationParams) -> Result<Page<Branch>, DirectoryError> {
        self.record(Call::ListBranches);
        self.check(FailurePoint::Branches)?;
        let branches = self.read(|s| s.branches.clone())?;
        Ok(paginate(branches, page))
    }

    async fn get_branch(&self, id: DbId) -> Result<Branch, DirectoryError> {
        self.record(Call::Branch(id));
        self.read(|s| s.branches.iter().find(|b| b.id == id).cloned())?
            .ok_or_else(|| not_found(&format!("/Branches/{id}")))
    }

    async fn get_department(&self, id: DbId) -> Result<Department, DirectoryError> {
        self.record(Call::Department(id));
        self.check(FailurePoint::Department(id))?;
        self.read(|s| s.departments.iter().find(|d| d.id == id).cloned())?
            .ok_or_else(|| not_found(&format!("/Departments/{id}")))
    }

    async fn get_employee_profile(&self) -> Result<EmployeeProfile, DirectoryError> {
        self.record(Call::EmployeeProfile);
        self.check(FailurePoint::EmployeeProfile)?;
        self.read(|s| s.profile.clone())?
            .ok_or_else(|| not_found("/Employees/Profile"))
    }
}

impl DirectoryGateway for MemoryDirectory {
    fn scoped(&self, _access_token: &str) -> Arc<dyn DirectorySource> {
        Arc::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn employee(id: DbId, reports_to_id: Option<DbId>, name: &str) -> Employee {
        Employee {
            id,
            reports_to_id,
            assigned_branch_id: None,
            assigned_department_id: None,
            first_name: name.to_string(),
            last_name: String::new(),
            full_name: name.to_string(),
            job_title: None,
            is_draft: false,
        }
    }

    #[tokio::test]
    async fn filters_top_level_and_subordinates() {
        let directory = MemoryDirectory::new().with_employees(vec![
            employee(1, None, "Ana"),
            employee(2, Some(1), "Bruno"),
            employee(3, Some(1), "Carla"),
            employee(4, None, "Davi"),
        ]);

        let top = directory
            .list_employees(&EmployeeQuery::top_level(PaginationParams::default()))
            .await
            .unwrap();
        assert_eq!(top.items.len(), 2);
        assert_eq!(top.total_items, 2);

        let subs = directory
            .list_employees(&EmployeeQuery::subordinates(1, PaginationParams::new(1, 1)))
            .await
            .unwrap();
        assert_eq!(subs.items.len(), 1);
        assert_eq!(subs.total_pages, 2);
    }

    #[tokio::test]
    async fn missing_entities_are_not_found() {
        let directory = MemoryDirectory::new();
        assert_matches!(directory.get_company().await, Err(DirectoryError::NotFound(_)));
        assert_matches!(directory.get_employee(9).await, Err(DirectoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn injected_failures_are_api_errors() {
        let directory = MemoryDirectory::new();
        directory.set_company(Some(Company { id: 1, name: "Acme".into() }));
        directory.fail(FailurePoint::Company);
        assert_matches!(
            directory.get_company().await,
            Err(DirectoryError::Api { status: 500, .. })
        );
        directory.heal(&FailurePoint::Company);
        assert!(directory.get_company().await.is_ok());
    }
}
