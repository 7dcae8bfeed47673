use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use crate::domain::{
    AdminApi, AdminKey, ApiError, CredentialStore, CredentialStoreError, DemoAccount,
    GrantDemoRequest, ModuleGrant,
};

pub(crate) const VALID_KEY: &str = "valid-key";

// Minimal account fixture; trial window is fixed so rendering stays deterministic.
pub(crate) fn sample_account(email: &str, expired: bool) -> DemoAccount {
    DemoAccount {
        email: email.to_string(),
        account_id: format!("acct-{email}"),
        modules: vec![ModuleGrant {
            module: "blog".to_string(),
            status: "active".to_string(),
            expired,
        }],
        granted_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        trial_ends_at: Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
        expired,
    }
}

// Every call the fake API received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ApiCall {
    Grant(GrantDemoRequest),
    List,
    Revoke(String),
}

#[derive(Clone, Default)]
pub(crate) struct ApiFailures {
    pub grant: Option<ApiError>,
    pub list: Option<ApiError>,
    pub revoke: Option<ApiError>,
}

// In-memory admin API that behaves like the backend and records calls.
#[derive(Clone)]
pub(crate) struct RecordingApi {
    accounts: Arc<Mutex<Vec<DemoAccount>>>,
    calls: Arc<Mutex<Vec<ApiCall>>>,
    failures: Arc<Mutex<ApiFailures>>,
}

impl RecordingApi {
    pub(crate) fn new() -> Self {
        Self {
            accounts: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(ApiFailures::default())),
        }
    }

    pub(crate) fn with_accounts(self, accounts: Vec<DemoAccount>) -> Self {
        *self.accounts.lock().expect("accounts mutex poisoned") = accounts;
        self
    }

    pub(crate) fn set_failures(&self, failures: ApiFailures) {
        *self.failures.lock().expect("failures mutex poisoned") = failures;
    }

    pub(crate) fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, ApiCall::List))
            .count()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }

    fn check_key(key: &AdminKey) -> Result<(), ApiError> {
        if key.as_str() == VALID_KEY {
            Ok(())
        } else {
            Err(ApiError::Rejected {
                status: 401,
                detail: "Invalid admin key".to_string(),
            })
        }
    }
}

#[async_trait]
impl AdminApi for RecordingApi {
    async fn grant_demo(&self, key: &AdminKey, req: GrantDemoRequest) -> Result<Value, ApiError> {
        self.record(ApiCall::Grant(req.clone()));
        Self::check_key(key)?;
        if let Some(err) = self.failures.lock().expect("failures mutex poisoned").grant.clone() {
            return Err(err);
        }

        let mut accounts = self.accounts.lock().expect("accounts mutex poisoned");
        accounts.retain(|account| account.email != req.email);
        accounts.push(sample_account(&req.email, false));
        Ok(json!({ "email": req.email, "days": req.days }))
    }

    async fn list_accounts(&self, key: &AdminKey) -> Result<Vec<DemoAccount>, ApiError> {
        self.record(ApiCall::List);
        Self::check_key(key)?;
        if let Some(err) = self.failures.lock().expect("failures mutex poisoned").list.clone() {
            return Err(err);
        }

        Ok(self.accounts.lock().expect("accounts mutex poisoned").clone())
    }

    async fn revoke_demo(&self, key: &AdminKey, email: &str) -> Result<Value, ApiError> {
        self.record(ApiCall::Revoke(email.to_string()));
        Self::check_key(key)?;
        if let Some(err) = self.failures.lock().expect("failures mutex poisoned").revoke.clone() {
            return Err(err);
        }

        let mut accounts = self.accounts.lock().expect("accounts mutex poisoned");
        let before = accounts.len();
        accounts.retain(|account| account.email != email);
        if accounts.len() == before {
            return Err(ApiError::Rejected {
                status: 404,
                detail: "Demo account not found".to_string(),
            });
        }
        Ok(json!({ "revoked": email }))
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct StoreFailures {
    pub load: bool,
    pub save: bool,
    pub clear: bool,
}

// Shared slot standing in for the durable admin key entry.
#[derive(Clone)]
pub(crate) struct MemoryStore {
    entry: Arc<Mutex<Option<AdminKey>>>,
    failures: StoreFailures,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self {
            entry: Arc::new(Mutex::new(None)),
            failures: StoreFailures::default(),
        }
    }

    pub(crate) fn holding(key: &str) -> Self {
        let store = Self::new();
        *store.entry.lock().expect("entry mutex poisoned") = Some(AdminKey::new(key));
        store
    }

    pub(crate) fn with_failures(mut self, failures: StoreFailures) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn stored(&self) -> Option<AdminKey> {
        self.entry.lock().expect("entry mutex poisoned").clone()
    }
}

fn simulated_io_error(op: &str) -> CredentialStoreError {
    CredentialStoreError::Io(std::io::Error::other(format!("{op} failed")))
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<AdminKey>, CredentialStoreError> {
        if self.failures.load {
            return Err(simulated_io_error("load"));
        }
        Ok(self.stored())
    }

    fn save(&self, key: &AdminKey) -> Result<(), CredentialStoreError> {
        if self.failures.save {
            return Err(simulated_io_error("save"));
        }
        *self.entry.lock().expect("entry mutex poisoned") = Some(key.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        if self.failures.clear {
            return Err(simulated_io_error("clear"));
        }
        *self.entry.lock().expect("entry mutex poisoned") = None;
        Ok(())
    }
}
