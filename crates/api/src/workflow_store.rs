//! In-memory store of wizard sessions, keyed by tenant, caller and wizard
//! kind.

use std::collections::HashMap;

use orgdesk_core::workflow::{WorkflowKind, WorkflowSession};
use tokio::sync::RwLock;

/// The caller a session belongs to, within one tenant.
///
/// The same subject acting for two companies gets two independent sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionOwner {
    pub tenant: String,
    pub subject: String,
}

impl SessionOwner {
    pub fn new(tenant: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            subject: subject.into(),
        }
    }
}

type SessionKey = (SessionOwner, WorkflowKind);

#[derive(Default)]
pub struct WorkflowStore {
    sessions: RwLock<HashMap<SessionKey, WorkflowSession>>,
}

impl WorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a wizard. An existing session is kept, so reloading a wizard
    /// page does not lose skip flags.
    pub async fn enter(&self, owner: &SessionOwner, kind: WorkflowKind) -> WorkflowSession {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry((owner.clone(), kind))
            .or_insert_with(|| {
                tracing::info!(
                    tenant = %owner.tenant,
                    subject = %owner.subject,
                    kind = kind.as_str(),
                    "Workflow session started"
                );
                WorkflowSession::new(kind)
            })
            .clone()
    }

    /// Leave a wizard, dropping its session. Returns whether one existed.
    pub async fn exit(&self, owner: &SessionOwner, kind: WorkflowKind) -> bool {
        let removed = self
            .sessions
            .write()
            .await
            .remove(&(owner.clone(), kind))
            .is_some();
        if removed {
            tracing::info!(
                tenant = %owner.tenant,
                subject = %owner.subject,
                kind = kind.as_str(),
                "Workflow session ended"
            );
        }
        removed
    }

    pub async fn get(&self, owner: &SessionOwner, kind: WorkflowKind) -> Option<WorkflowSession> {
        self.sessions
            .read()
            .await
            .get(&(owner.clone(), kind))
            .cloned()
    }

    /// Run `f` against the caller's session, creating it if needed.
    pub async fn with_session<T>(
        &self,
        owner: &SessionOwner,
        kind: WorkflowKind,
        f: impl FnOnce(&mut WorkflowSession) -> T,
    ) -> T {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry((owner.clone(), kind))
            .or_insert_with(|| WorkflowSession::new(kind));
        f(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgdesk_core::workflow::onboarding::OnboardingStep;

    fn owner(tenant: &str, subject: &str) -> SessionOwner {
        SessionOwner::new(tenant, subject)
    }

    #[tokio::test]
    async fn enter_keeps_existing_session() {
        let store = WorkflowStore::new();
        let u1 = owner("acme", "u1");
        store.enter(&u1, WorkflowKind::Onboarding).await;
        store
            .with_session(&u1, WorkflowKind::Onboarding, |s| {
                s.skip_step(OnboardingStep::CompanyLicense)
            })
            .await
            .unwrap();

        let session = store.enter(&u1, WorkflowKind::Onboarding).await;
        assert!(session.is_skipped(OnboardingStep::CompanyLicense));
    }

    #[tokio::test]
    async fn exit_drops_session() {
        let store = WorkflowStore::new();
        let u1 = owner("acme", "u1");
        store.enter(&u1, WorkflowKind::Onboarding).await;
        assert!(store.exit(&u1, WorkflowKind::Onboarding).await);
        assert!(!store.exit(&u1, WorkflowKind::Onboarding).await);
        assert!(store.get(&u1, WorkflowKind::Onboarding).await.is_none());
    }

    #[tokio::test]
    async fn sessions_are_per_subject_and_kind() {
        let store = WorkflowStore::new();
        let u1 = owner("acme", "u1");
        store
            .with_session(&u1, WorkflowKind::CompanyOffboarding, |s| {
                s.acknowledge_instructions()
            })
            .await;

        assert!(store
            .get(&owner("acme", "u2"), WorkflowKind::CompanyOffboarding)
            .await
            .is_none());
        assert!(store.get(&u1, WorkflowKind::Onboarding).await.is_none());
        assert!(
            store
                .get(&u1, WorkflowKind::CompanyOffboarding)
                .await
                .unwrap()
                .instructions_acknowledged
        );
    }

    #[tokio::test]
    async fn same_subject_in_another_tenant_starts_fresh() {
        let store = WorkflowStore::new();
        store
            .with_session(&owner("acme", "admin"), WorkflowKind::Onboarding, |s| {
                s.skip_step(OnboardingStep::CompanyLicense)
            })
            .await
            .unwrap();

        let other = store
            .enter(&owner("globex", "admin"), WorkflowKind::Onboarding)
            .await;
        assert!(!other.is_skipped(OnboardingStep::CompanyLicense));

        store
            .exit(&owner("globex", "admin"), WorkflowKind::Onboarding)
            .await;
        let acme = store
            .get(&owner("acme", "admin"), WorkflowKind::Onboarding)
            .await
            .unwrap();
        assert!(acme.is_skipped(OnboardingStep::CompanyLicense));
    }
}
