use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::domain::accounts::DemoAccount;
use crate::domain::credential::AdminKey;
use crate::domain::errors::{ApiError, CredentialStoreError};

// Payload sent to the admin API when granting a demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantDemoRequest {
    pub email: String,
    pub days: u32,
    pub modules: Vec<String>,
}

// The session depends on this trait, not the concrete HTTP client.
// Dependencies point inwards to the domain layer.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn grant_demo(&self, key: &AdminKey, req: GrantDemoRequest) -> Result<Value, ApiError>;
    async fn list_accounts(&self, key: &AdminKey) -> Result<Vec<DemoAccount>, ApiError>;
    async fn revoke_demo(&self, key: &AdminKey, email: &str) -> Result<Value, ApiError>;
}

// Port for the single durable admin key entry.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<AdminKey>, CredentialStoreError>;
    fn save(&self, key: &AdminKey) -> Result<(), CredentialStoreError>;
    // Succeeds when the entry is already absent.
    fn clear(&self) -> Result<(), CredentialStoreError>;
}
