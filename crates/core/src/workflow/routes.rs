//! Step -> route table shared with the UI router.

/// Neutral landing page every finished wizard redirects to.
pub const FLOWS: &str = "/flows";

pub const ONBOARDING_COMPANY: &str = "/onboarding/company";
pub const ONBOARDING_COMPANY_LICENSE: &str = "/onboarding/company-license";
pub const ONBOARDING_BRANCH: &str = "/onboarding/branch";

pub const OFFBOARDING_INSTRUCTIONS: &str = "/offboarding/instructions";
pub const OFFBOARDING_COMPANY_SETTINGS: &str = "/offboarding/company-settings";
pub const OFFBOARDING_COMPANY: &str = "/offboarding/company";

pub const OFFBOARDING_EMPLOYEE: &str = "/offboarding/employee";
