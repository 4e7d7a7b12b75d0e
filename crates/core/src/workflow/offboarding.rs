//! Offboarding wizards.
//!
//! The mirror of onboarding: steps are driven by whether an entity *still*
//! exists. Company offboarding walks instructions -> delete settings ->
//! delete company; employee offboarding is a single delete-profile step.
//! Both finish on the flows landing page.

use serde::{Deserialize, Serialize};

use super::session::WorkflowSession;
use super::{routes, ExistenceFlag, StepResolution, TenantExistence, WizardStep, WizardView};

// ---------------------------------------------------------------------------
// Company offboarding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompanyOffboardingStep {
    Instructions,
    CompanySettings,
    Company,
    Completed,
}

impl WizardStep for CompanyOffboardingStep {
    const ORDER: &'static [Self] = &[
        Self::Instructions,
        Self::CompanySettings,
        Self::Company,
        Self::Completed,
    ];

    fn slug(self) -> &'static str {
        match self {
            Self::Instructions => "instructions",
            Self::CompanySettings => "companySettings",
            Self::Company => "company",
            Self::Completed => "completed",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Instructions => "Instructions",
            Self::CompanySettings => "Delete Company Settings",
            Self::Company => "Delete Company",
            Self::Completed => "Completed",
        }
    }

    fn route(self) -> &'static str {
        match self {
            Self::Instructions => routes::OFFBOARDING_INSTRUCTIONS,
            Self::CompanySettings => routes::OFFBOARDING_COMPANY_SETTINGS,
            Self::Company => routes::OFFBOARDING_COMPANY,
            Self::Completed => routes::FLOWS,
        }
    }
}

/// Derive the company-offboarding step.
///
/// A deleted company means the whole flow is done, even if settings were
/// never observed as deleted.
pub fn derive_company_offboarding_step(
    existence: &TenantExistence,
    session: &WorkflowSession,
) -> StepResolution<CompanyOffboardingStep> {
    match existence.company {
        ExistenceFlag::Unknown => return StepResolution::Loading,
        ExistenceFlag::Absent => return StepResolution::Step(CompanyOffboardingStep::Completed),
        ExistenceFlag::Present => {}
    }

    if !session.instructions_acknowledged {
        return StepResolution::Step(CompanyOffboardingStep::Instructions);
    }

    match existence.company_settings {
        ExistenceFlag::Unknown => StepResolution::Loading,
        ExistenceFlag::Present => StepResolution::Step(CompanyOffboardingStep::CompanySettings),
        ExistenceFlag::Absent => StepResolution::Step(CompanyOffboardingStep::Company),
    }
}

pub fn resolve_company_offboarding(
    existence: &TenantExistence,
    session: &WorkflowSession,
    current_route: Option<&str>,
) -> WizardView<CompanyOffboardingStep> {
    let resolution = derive_company_offboarding_step(existence, session);
    WizardView::build(resolution, current_route, |step| step)
}

// ---------------------------------------------------------------------------
// Employee offboarding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmployeeOffboardingStep {
    Profile,
    Completed,
}

impl WizardStep for EmployeeOffboardingStep {
    const ORDER: &'static [Self] = &[Self::Profile, Self::Completed];

    fn slug(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Completed => "completed",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Profile => "Delete Profile",
            Self::Completed => "Completed",
        }
    }

    fn route(self) -> &'static str {
        match self {
            Self::Profile => routes::OFFBOARDING_EMPLOYEE,
            Self::Completed => routes::FLOWS,
        }
    }
}

pub fn derive_employee_offboarding_step(
    existence: &TenantExistence,
) -> StepResolution<EmployeeOffboardingStep> {
    match existence.employee_profile {
        ExistenceFlag::Unknown => StepResolution::Loading,
        ExistenceFlag::Present => StepResolution::Step(EmployeeOffboardingStep::Profile),
        ExistenceFlag::Absent => StepResolution::Step(EmployeeOffboardingStep::Completed),
    }
}

pub fn resolve_employee_offboarding(
    existence: &TenantExistence,
    current_route: Option<&str>,
) -> WizardView<EmployeeOffboardingStep> {
    WizardView::build(derive_employee_offboarding_step(existence), current_route, |step| step)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::session::WorkflowKind;
    use crate::workflow::ExistenceFlag::{Absent, Present, Unknown};

    fn company_state(company: ExistenceFlag, settings: ExistenceFlag) -> TenantExistence {
        TenantExistence {
            company,
            company_settings: settings,
            ..TenantExistence::default()
        }
    }

    fn acknowledged() -> WorkflowSession {
        let mut session = WorkflowSession::new(WorkflowKind::CompanyOffboarding);
        session.acknowledge_instructions();
        session
    }

    #[test]
    fn instructions_come_first() {
        let session = WorkflowSession::new(WorkflowKind::CompanyOffboarding);
        assert_eq!(
            derive_company_offboarding_step(&company_state(Present, Present), &session),
            StepResolution::Step(CompanyOffboardingStep::Instructions)
        );
    }

    #[test]
    fn settings_deleted_before_company() {
        assert_eq!(
            derive_company_offboarding_step(&company_state(Present, Present), &acknowledged()),
            StepResolution::Step(CompanyOffboardingStep::CompanySettings)
        );
        assert_eq!(
            derive_company_offboarding_step(&company_state(Present, Absent), &acknowledged()),
            StepResolution::Step(CompanyOffboardingStep::Company)
        );
    }

    #[test]
    fn deleted_company_completes_regardless_of_settings() {
        for settings in [Unknown, Absent, Present] {
            let view = resolve_company_offboarding(
                &company_state(Absent, settings),
                &WorkflowSession::new(WorkflowKind::CompanyOffboarding),
                Some(routes::OFFBOARDING_COMPANY),
            );
            assert_eq!(view.step, Some(CompanyOffboardingStep::Completed));
            assert_eq!(view.navigation.unwrap().path, routes::FLOWS);
        }
    }

    #[test]
    fn unknown_checks_stall() {
        assert_eq!(
            derive_company_offboarding_step(&company_state(Unknown, Present), &acknowledged()),
            StepResolution::Loading
        );
        assert_eq!(
            derive_company_offboarding_step(&company_state(Present, Unknown), &acknowledged()),
            StepResolution::Loading
        );
    }

    #[test]
    fn employee_offboarding_single_step() {
        let mut state = TenantExistence::default();
        assert_eq!(derive_employee_offboarding_step(&state), StepResolution::Loading);

        state.employee_profile = Present;
        let view = resolve_employee_offboarding(&state, Some(routes::FLOWS));
        assert_eq!(view.step, Some(EmployeeOffboardingStep::Profile));
        assert_eq!(view.navigation.unwrap().path, routes::OFFBOARDING_EMPLOYEE);

        state.employee_profile = Absent;
        let view = resolve_employee_offboarding(&state, Some(routes::FLOWS));
        assert_eq!(view.step, Some(EmployeeOffboardingStep::Completed));
        assert!(view.navigation.is_none());
    }
}
