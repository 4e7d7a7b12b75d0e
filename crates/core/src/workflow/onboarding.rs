//! Onboarding wizard: company -> company license (skippable) -> branch.

use serde::{Deserialize, Serialize};

use super::session::WorkflowSession;
use super::{routes, ExistenceFlag, StepResolution, TenantExistence, WizardStep, WizardView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnboardingStep {
    Company,
    CompanyLicense,
    Branch,
    Completed,
}

impl WizardStep for OnboardingStep {
    const ORDER: &'static [Self] = &[
        Self::Company,
        Self::CompanyLicense,
        Self::Branch,
        Self::Completed,
    ];

    fn slug(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::CompanyLicense => "companyLicense",
            Self::Branch => "branch",
            Self::Completed => "completed",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Company => "Create Company",
            Self::CompanyLicense => "Upload License",
            Self::Branch => "Create Branch",
            Self::Completed => "Completed",
        }
    }

    fn route(self) -> &'static str {
        match self {
            Self::Company => routes::ONBOARDING_COMPANY,
            Self::CompanyLicense => routes::ONBOARDING_COMPANY_LICENSE,
            Self::Branch => routes::ONBOARDING_BRANCH,
            Self::Completed => routes::FLOWS,
        }
    }

    fn is_skippable(self) -> bool {
        self == Self::CompanyLicense
    }
}

/// Derive the onboarding step from existence state and the session.
///
/// An existing branch implies every earlier step is done, whatever the
/// license state or skip flag say.
pub fn derive_onboarding_step(
    existence: &TenantExistence,
    session: &WorkflowSession,
) -> StepResolution<OnboardingStep> {
    if existence.company == ExistenceFlag::Unknown {
        return StepResolution::Loading;
    }
    if existence.branch.is_present() {
        return StepResolution::Step(OnboardingStep::Completed);
    }
    if existence.company.is_absent() {
        return StepResolution::Step(OnboardingStep::Company);
    }

    let license_skipped = session.is_skipped(OnboardingStep::CompanyLicense);
    if !existence.company_license.is_present() && !license_skipped {
        return match existence.company_license {
            ExistenceFlag::Absent => StepResolution::Step(OnboardingStep::CompanyLicense),
            _ => StepResolution::Loading,
        };
    }

    match existence.branch {
        ExistenceFlag::Absent => StepResolution::Step(OnboardingStep::Branch),
        ExistenceFlag::Unknown => StepResolution::Loading,
        ExistenceFlag::Present => StepResolution::Step(OnboardingStep::Completed),
    }
}

/// Clear the license skip once the license is confirmed to exist.
///
/// Returns true if the flag was cleared. Run this before
/// [`derive_onboarding_step`] so a license uploaded out of band after a
/// skip advances straight past the license step.
pub fn reconcile_onboarding(session: &mut WorkflowSession, existence: &TenantExistence) -> bool {
    if existence.company_license.is_present() {
        return session.clear_skip(OnboardingStep::CompanyLicense);
    }
    false
}

/// The step the stepper highlights for a literal step.
///
/// A skipped license step snaps forward to the branch step.
pub fn effective_step(literal: OnboardingStep, session: &WorkflowSession) -> OnboardingStep {
    if literal == OnboardingStep::CompanyLicense && session.is_skipped(literal) {
        OnboardingStep::Branch
    } else {
        literal
    }
}

/// Index of the highlighted stepper entry for a literal step.
pub fn active_step_index(literal: OnboardingStep, session: &WorkflowSession) -> usize {
    effective_step(literal, session).index()
}

/// Reconcile the session, derive the step, and build the view model.
pub fn resolve_onboarding(
    existence: &TenantExistence,
    session: &mut WorkflowSession,
    current_route: Option<&str>,
) -> WizardView<OnboardingStep> {
    reconcile_onboarding(session, existence);
    let session: &WorkflowSession = session;
    let resolution = derive_onboarding_step(existence, session);
    WizardView::build(resolution, current_route, |step| effective_step(step, session))
}
