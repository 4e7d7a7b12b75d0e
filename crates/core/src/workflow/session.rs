//! Per-caller wizard session state.
//!
//! A [`WorkflowSession`] is created when the caller enters a wizard route
//! group and dropped when they leave it. It holds the only state the step
//! engine cannot re-derive from the backend: which steps were explicitly
//! skipped, which step page is currently open, and whether the offboarding
//! instructions were acknowledged.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::WizardStep;
use crate::error::CoreError;
use crate::types::Timestamp;

/// Which wizard a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    Onboarding,
    CompanyOffboarding,
}

impl WorkflowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Onboarding => "onboarding",
            Self::CompanyOffboarding => "company_offboarding",
        }
    }
}

/// The step page currently open in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepVisit {
    pub step: String,
    /// Set when Skip was clicked during this visit.
    pub skipped_during_visit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSession {
    pub kind: WorkflowKind,
    /// Slugs of steps the caller bypassed.
    pub skipped: BTreeSet<String>,
    pub visit: Option<StepVisit>,
    pub instructions_acknowledged: bool,
    pub started_at: Timestamp,
}

impl WorkflowSession {
    pub fn new(kind: WorkflowKind) -> Self {
        Self {
            kind,
            skipped: BTreeSet::new(),
            visit: None,
            instructions_acknowledged: false,
            started_at: Utc::now(),
        }
    }

    pub fn is_skipped<S: WizardStep>(&self, step: S) -> bool {
        self.skipped.contains(step.slug())
    }

    /// Record that the caller opened the page for `step`.
    pub fn visit_step<S: WizardStep>(&mut self, step: S) {
        self.visit = Some(StepVisit {
            step: step.slug().to_string(),
            skipped_during_visit: false,
        });
    }

    /// Bypass `step`. Only skippable steps accept this.
    pub fn skip_step<S: WizardStep>(&mut self, step: S) -> Result<(), CoreError> {
        if !step.is_skippable() {
            return Err(CoreError::Validation(format!(
                "Step '{}' cannot be skipped",
                step.slug()
            )));
        }

        self.skipped.insert(step.slug().to_string());
        match self.visit.as_mut() {
            Some(visit) if visit.step == step.slug() => visit.skipped_during_visit = true,
            _ => {
                self.visit = Some(StepVisit {
                    step: step.slug().to_string(),
                    skipped_during_visit: true,
                });
            }
        }
        Ok(())
    }

    /// The caller left the page for `step`.
    ///
    /// A skip survives only if Skip was clicked during the visit being
    /// closed; otherwise the flag is cleared.
    pub fn leave_step<S: WizardStep>(&mut self, step: S) {
        let skipped_now = matches!(
            &self.visit,
            Some(visit) if visit.step == step.slug() && visit.skipped_during_visit
        );
        if !skipped_now {
            self.skipped.remove(step.slug());
        }
        if self
            .visit
            .as_ref()
            .is_some_and(|visit| visit.step == step.slug())
        {
            self.visit = None;
        }
    }

    /// Drop the skip flag for `step`. Returns whether it was set.
    pub fn clear_skip<S: WizardStep>(&mut self, step: S) -> bool {
        self.skipped.remove(step.slug())
    }

    pub fn acknowledge_instructions(&mut self) {
        self.instructions_acknowledged = true;
    }
}
