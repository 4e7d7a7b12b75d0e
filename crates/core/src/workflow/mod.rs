//! Onboarding / offboarding step engine.
//!
//! Given the existence state of the tenant's entities (company, license,
//! settings, branch, employee profile) and the caller's [`WorkflowSession`],
//! the engine derives which wizard step the caller is on, which route that
//! step lives at, and whether the UI must perform a replace-navigation.
//!
//! - [`onboarding`] -- company -> license (skippable) -> branch -> completed.
//! - [`offboarding`] -- company offboarding and employee offboarding.
//! - [`session`] -- skip flags, page visits, acknowledgements.
//! - [`routes`] -- the fixed step -> route table.

pub mod offboarding;
pub mod onboarding;
pub mod routes;
pub mod session;

use serde::{Deserialize, Serialize};

pub use session::{WorkflowKind, WorkflowSession};

// ---------------------------------------------------------------------------
// Existence flags
// ---------------------------------------------------------------------------

/// Three-valued existence state of a tenant-scoped entity.
///
/// `Unknown` means "not checked yet" (or the check failed with something
/// other than a 404) and must never be treated as `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExistenceFlag {
    #[default]
    Unknown,
    Absent,
    Present,
}

impl ExistenceFlag {
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }

    pub fn is_present(self) -> bool {
        self == Self::Present
    }

    pub fn is_absent(self) -> bool {
        self == Self::Absent
    }
}

/// Existence state of every entity the step engines look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantExistence {
    pub company: ExistenceFlag,
    pub company_license: ExistenceFlag,
    pub company_settings: ExistenceFlag,
    pub branch: ExistenceFlag,
    pub employee_profile: ExistenceFlag,
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// A step of one of the wizards.
pub trait WizardStep: Copy + Eq + std::fmt::Debug + Serialize + 'static {
    /// All steps in wizard order; the last one is the terminal step.
    const ORDER: &'static [Self];

    /// Stable identifier used in URLs and session skip sets.
    fn slug(self) -> &'static str;

    /// Human-readable label for the stepper.
    fn label(self) -> &'static str;

    /// Route the UI shows for this step.
    fn route(self) -> &'static str;

    /// Whether the user may bypass this step without completing it.
    fn is_skippable(self) -> bool {
        false
    }

    /// Position of this step in [`WizardStep::ORDER`].
    fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|s| *s == self)
            .unwrap_or(Self::ORDER.len())
    }

    /// Parse a slug back into a step.
    fn from_slug(slug: &str) -> Option<Self> {
        Self::ORDER.iter().copied().find(|s| s.slug() == slug)
    }
}

/// Outcome of step derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResolution<S> {
    /// Some required existence check has not resolved; stay put.
    Loading,
    /// The caller is on this step.
    Step(S),
}

impl<S: Copy> StepResolution<S> {
    pub fn step(&self) -> Option<S> {
        match self {
            Self::Loading => None,
            Self::Step(s) => Some(*s),
        }
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// A navigation instruction for the UI.
///
/// `replace` is always true for wizard redirects so that back-navigation
/// cannot re-enter a step that is no longer valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub path: &'static str,
    pub replace: bool,
}

/// The replace-navigation needed to reach `target`, or `None` if the UI is
/// already there.
pub fn navigation_for(target: &'static str, current_route: Option<&str>) -> Option<Navigation> {
    let normalize = |p: &str| -> String {
        let trimmed = p.trim();
        let stripped = trimmed.trim_end_matches('/');
        if stripped.is_empty() {
            "/".to_string()
        } else {
            stripped.to_ascii_lowercase()
        }
    };

    match current_route {
        Some(current) if normalize(current) == normalize(target) => None,
        _ => Some(Navigation {
            path: target,
            replace: true,
        }),
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// Stepper entry shown by the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub route: &'static str,
    pub skippable: bool,
}

/// Everything the UI needs to render a wizard page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView<S: WizardStep> {
    /// True while existence checks are unresolved; no navigation is issued.
    pub loading: bool,
    /// The literal derived step.
    pub step: Option<S>,
    /// The step the stepper highlights (skips snap forward).
    pub effective_step: Option<S>,
    pub active_index: Option<usize>,
    pub route: Option<&'static str>,
    pub navigation: Option<Navigation>,
    pub steps: Vec<StepDescriptor>,
}

impl<S: WizardStep> WizardView<S> {
    /// Assemble the view for a resolution.
    ///
    /// `effective` maps the literal step to the step the stepper shows.
    pub fn build(
        resolution: StepResolution<S>,
        current_route: Option<&str>,
        effective: impl Fn(S) -> S,
    ) -> Self {
        let steps = S::ORDER
            .iter()
            .map(|s| StepDescriptor {
                id: s.slug(),
                label: s.label(),
                route: s.route(),
                skippable: s.is_skippable(),
            })
            .collect();

        match resolution {
            StepResolution::Loading => Self {
                loading: true,
                step: None,
                effective_step: None,
                active_index: None,
                route: None,
                navigation: None,
                steps,
            },
            StepResolution::Step(step) => {
                let effective_step = effective(step);
                let route = step.route();
                Self {
                    loading: false,
                    step: Some(step),
                    effective_step: Some(effective_step),
                    active_index: Some(effective_step.index()),
                    route: Some(route),
                    navigation: navigation_for(route, current_route),
                    steps,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
