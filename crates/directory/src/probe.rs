//! Existence probes for the wizard engines.
//!
//! Each probe issues the existence checks one wizard needs, concurrently,
//! and folds the results into a [`TenantExistence`]. A 404 is the normal
//! "absent" answer; any other failure leaves the flag `Unknown` so the
//! engine waits instead of routing on a guess.

use orgdesk_core::pagination::PaginationParams;
use orgdesk_core::workflow::{ExistenceFlag, TenantExistence};

use crate::source::{DirectoryError, DirectorySource};

/// Fold one existence check into a flag.
pub fn flag_from<T>(entity: &'static str, result: Result<T, DirectoryError>) -> ExistenceFlag {
    match result {
        Ok(_) => ExistenceFlag::Present,
        Err(e) if e.is_not_found() => {
            tracing::debug!(entity, "Entity absent");
            ExistenceFlag::Absent
        }
        Err(e) => {
            tracing::warn!(entity, error = %e, "Existence check failed");
            ExistenceFlag::Unknown
        }
    }
}

/// Whether the tenant has any branch, judged from the first listing page.
async fn branch_flag(source: &dyn DirectorySource) -> ExistenceFlag {
    match source.list_branches(&PaginationParams::new(1, 1)).await {
        Ok(page) if page.total_items > 0 || !page.items.is_empty() => ExistenceFlag::Present,
        Ok(_) => ExistenceFlag::Absent,
        Err(e) => flag_from::<()>("branch", Err(e)),
    }
}

/// Company, license, and branch.
pub async fn probe_onboarding(source: &dyn DirectorySource) -> TenantExistence {
    let (company, license, branch) = tokio::join!(
        source.get_company(),
        source.get_company_license(),
        branch_flag(source),
    );

    TenantExistence {
        company: flag_from("company", company),
        company_license: flag_from("company_license", license),
        branch,
        ..TenantExistence::default()
    }
}

/// Company and company settings.
pub async fn probe_company_offboarding(source: &dyn DirectorySource) -> TenantExistence {
    let (company, settings) = tokio::join!(source.get_company(), source.get_company_settings());

    TenantExistence {
        company: flag_from("company", company),
        company_settings: flag_from("company_settings", settings),
        ..TenantExistence::default()
    }
}

pub async fn probe_employee_offboarding(source: &dyn DirectorySource) -> TenantExistence {
    TenantExistence {
        employee_profile: flag_from("employee_profile", source.get_employee_profile().await),
        ..TenantExistence::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{FailurePoint, MemoryDirectory};
    use orgdesk_core::employee::{Branch, Company, CompanyLicense, CompanySettings, EmployeeProfile};
    use ExistenceFlag::{Absent, Present, Unknown};

    #[tokio::test]
    async fn empty_tenant_is_all_absent() {
        let directory = MemoryDirectory::new();
        let state = probe_onboarding(&directory).await;
        assert_eq!(state.company, Absent);
        assert_eq!(state.company_license, Absent);
        assert_eq!(state.branch, Absent);
        assert_eq!(state.company_settings, Unknown);
    }

    #[tokio::test]
    async fn seeded_tenant_is_present() {
        let directory = MemoryDirectory::new();
        directory.set_company(Some(Company { id: 1, name: "Acme".into() }));
        directory.set_license(Some(CompanyLicense { id: 2, expires_at: None }));
        directory.add_branch(Branch { id: 3, name: "HQ".into() });

        let state = probe_onboarding(&directory).await;
        assert_eq!(state.company, Present);
        assert_eq!(state.company_license, Present);
        assert_eq!(state.branch, Present);
    }

    #[tokio::test]
    async fn non_404_failures_stay_unknown() {
        let directory = MemoryDirectory::new();
        directory.set_company(Some(Company { id: 1, name: "Acme".into() }));
        directory.fail(FailurePoint::CompanyLicense);
        directory.fail(FailurePoint::Branches);

        let state = probe_onboarding(&directory).await;
        assert_eq!(state.company, Present);
        assert_eq!(state.company_license, Unknown);
        assert_eq!(state.branch, Unknown);
    }

    #[tokio::test]
    async fn offboarding_probes() {
        let directory = MemoryDirectory::new();
        directory.set_company(Some(Company { id: 1, name: "Acme".into() }));
        directory.set_settings(Some(CompanySettings { id: 4 }));
        directory.set_profile(Some(EmployeeProfile { id: 5, employee_id: Some(6) }));

        let company = probe_company_offboarding(&directory).await;
        assert_eq!(company.company, Present);
        assert_eq!(company.company_settings, Present);

        let employee = probe_employee_offboarding(&directory).await;
        assert_eq!(employee.employee_profile, Present);

        directory.set_profile(None);
        assert_eq!(probe_employee_offboarding(&directory).await.employee_profile, Absent);
    }
}
