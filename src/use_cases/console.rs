use crate::domain::{
    AccountSummary, AdminApi, AdminKey, CredentialStore, DemoAccount, SessionPhase,
};
use crate::use_cases::session::AdminSession;

// Outcome of the last grant or revoke, shown under the account table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

// Everything the presentation layer needs to draw the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleView {
    pub phase: SessionPhase,
    pub email_input: String,
    pub days_input: u32,
    pub accounts: Vec<DemoAccount>,
    pub loading: bool,
    pub granting: bool,
    // Email whose revoke is outstanding.
    pub revoking: Option<String>,
    pub notice: Option<Notice>,
    pub auth_error: Option<String>,
}

impl ConsoleView {
    fn initial(default_days: u32) -> Self {
        Self {
            phase: SessionPhase::Unauthenticated,
            email_input: String::new(),
            days_input: default_days,
            accounts: Vec::new(),
            loading: false,
            granting: false,
            revoking: None,
            notice: None,
            auth_error: None,
        }
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary::of(&self.accounts)
    }
}

// Console workflow: drives the view through sign-in, grant, revoke and refresh.
pub struct Console<A, S> {
    session: AdminSession<A, S>,
    view: ConsoleView,
    default_days: u32,
}

impl<A, S> Console<A, S>
where
    A: AdminApi,
    S: CredentialStore,
{
    pub fn new(session: AdminSession<A, S>, default_days: u32) -> Self {
        Self {
            session,
            view: ConsoleView::initial(default_days),
            default_days,
        }
    }

    pub fn view(&self) -> &ConsoleView {
        &self.view
    }

    // Restores a persisted key and loads the list when one was found.
    pub async fn start(&mut self) {
        self.view.phase = self.session.restore();
        if self.session.is_authenticated() {
            self.refresh().await;
        }
    }

    pub async fn sign_in(&mut self, key: AdminKey) {
        self.view.auth_error = None;
        self.view.phase = SessionPhase::Authenticating;

        match self.session.authenticate(key).await {
            Ok(accounts) => {
                self.view.accounts = accounts;
            }
            Err(err) => {
                self.view.auth_error = Some(err.to_string());
            }
        }
        self.view.phase = self.session.phase();
    }

    pub fn sign_out(&mut self) {
        match self.session.sign_out() {
            Ok(()) => self.view = ConsoleView::initial(self.default_days),
            Err(err) => {
                self.view.notice =
                    Some(Notice::Failure(format!("Failed to sign out: {err}")));
            }
        }
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.view.email_input = email.into();
    }

    pub fn set_days(&mut self, days: u32) {
        self.view.days_input = days;
    }

    // Grants a demo to the pending email; an empty email issues nothing.
    pub async fn submit_grant(&mut self) {
        let email = self.view.email_input.trim().to_string();
        if email.is_empty() {
            return;
        }
        let days = self.view.days_input;

        self.view.granting = true;
        self.view.notice = None;
        let result = self.session.grant_demo(&email, days).await;
        self.view.granting = false;

        match result {
            Ok(_) => {
                self.view.email_input.clear();
                self.view.notice = Some(Notice::Success(format!(
                    "Granted a {days}-day demo to {email}"
                )));
                self.refresh().await;
            }
            Err(err) => {
                self.view.notice = Some(Notice::Failure(format!(
                    "Failed to grant demo to {email}: {err}"
                )));
            }
        }
    }

    pub async fn revoke(&mut self, email: &str) {
        self.view.revoking = Some(email.to_string());
        self.view.notice = None;
        let result = self.session.revoke_demo(email).await;
        self.view.revoking = None;

        match result {
            Ok(_) => {
                self.view.notice = Some(Notice::Success(format!(
                    "Revoked demo access for {email}"
                )));
                self.refresh().await;
            }
            Err(err) => {
                self.view.notice = Some(Notice::Failure(format!(
                    "Failed to revoke {email}: {err}"
                )));
            }
        }
    }

    // Re-fetches the whole list. Failures leave an empty list and are only logged.
    pub async fn refresh(&mut self) {
        self.view.loading = true;
        match self.session.list_accounts().await {
            Ok(accounts) => {
                self.view.accounts = accounts;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load demo accounts.");
                self.view.accounts.clear();
            }
        }
        self.view.loading = false;
    }
}
