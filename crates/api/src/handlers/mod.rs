pub mod employees;
pub mod offboarding;
pub mod onboarding;
pub mod org_chart;

use serde::Serialize;

use orgdesk_core::workflow::{TenantExistence, WizardStep, WizardView};

/// Payload of every `.../step` endpoint: the wizard view plus the existence
/// state it was derived from.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResponse<S: WizardStep> {
    #[serde(flatten)]
    pub view: WizardView<S>,
    pub existence: TenantExistence,
}
