use serde_json::Value;

use crate::domain::{
    AdminApi, AdminKey, ApiError, ConsoleError, CredentialStore, CredentialStoreError,
    DEFAULT_MODULES, DemoAccount, GrantDemoRequest, SessionPhase,
};

// Admin session with injected dependencies: holds the credential, issues the
// three admin calls and normalizes their failures.
pub struct AdminSession<A, S> {
    api: A,
    store: S,
    key: Option<AdminKey>,
    phase: SessionPhase,
}

impl<A, S> AdminSession<A, S>
where
    A: AdminApi,
    S: CredentialStore,
{
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            key: None,
            phase: SessionPhase::Unauthenticated,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }

    // Picks up a previously persisted key. The key is trusted as-is.
    pub fn restore(&mut self) -> SessionPhase {
        match self.store.load() {
            Ok(Some(key)) if !key.is_blank() => {
                tracing::debug!("restored persisted admin key.");
                self.key = Some(key);
                self.phase = SessionPhase::Authenticated;
            }
            Ok(_) => {
                self.key = None;
                self.phase = SessionPhase::Unauthenticated;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to read persisted admin key.");
                self.key = None;
                self.phase = SessionPhase::Unauthenticated;
            }
        }
        self.phase
    }

    // Validates the key with a list call and persists it on any success status.
    #[tracing::instrument(name = "authenticate", skip_all)]
    pub async fn authenticate(&mut self, key: AdminKey) -> Result<Vec<DemoAccount>, ConsoleError> {
        if key.is_blank() {
            return Err(ConsoleError::InvalidCredential);
        }

        self.phase = SessionPhase::Authenticating;
        let accounts = match self.api.list_accounts(&key).await {
            Ok(accounts) => accounts,
            // The server accepted the key; only its body was unreadable.
            Err(ApiError::Decode(err)) => {
                tracing::warn!(error = %err, "admin key accepted, account list unreadable.");
                Vec::new()
            }
            Err(err) => {
                // The cause never reaches the administrator.
                tracing::debug!(error = %err, "admin key rejected.");
                self.phase = SessionPhase::Unauthenticated;
                return Err(ConsoleError::InvalidCredential);
            }
        };

        if let Err(err) = self.store.save(&key) {
            tracing::warn!(error = %err, "failed to persist admin key.");
        }
        self.key = Some(key);
        self.phase = SessionPhase::Authenticated;
        tracing::info!(accounts = accounts.len(), "admin signed in.");

        Ok(accounts)
    }

    // The session stays signed in when the persisted entry cannot be removed,
    // otherwise the next start-up would silently restore it.
    pub fn sign_out(&mut self) -> Result<(), CredentialStoreError> {
        if let Err(err) = self.store.clear() {
            tracing::warn!(error = %err, "failed to clear persisted admin key.");
            return Err(err);
        }
        self.key = None;
        self.phase = SessionPhase::Unauthenticated;
        tracing::info!("admin signed out.");
        Ok(())
    }

    #[tracing::instrument(name = "grant_demo", skip(self))]
    pub async fn grant_demo(&self, email: &str, days: u32) -> Result<Value, ConsoleError> {
        let key = self.active_key()?;
        let req = GrantDemoRequest {
            email: email.to_string(),
            days,
            modules: DEFAULT_MODULES.iter().map(|module| module.to_string()).collect(),
        };

        let body = self.api.grant_demo(key, req).await?;
        tracing::info!("demo granted.");
        Ok(body)
    }

    pub async fn list_accounts(&self) -> Result<Vec<DemoAccount>, ConsoleError> {
        let key = self.active_key()?;
        Ok(self.api.list_accounts(key).await?)
    }

    #[tracing::instrument(name = "revoke_demo", skip(self))]
    pub async fn revoke_demo(&self, email: &str) -> Result<Value, ConsoleError> {
        let key = self.active_key()?;
        let body = self.api.revoke_demo(key, email).await?;
        tracing::info!("demo revoked.");
        Ok(body)
    }

    fn active_key(&self) -> Result<&AdminKey, ConsoleError> {
        self.key.as_ref().ok_or(ConsoleError::InvalidCredential)
    }
}
