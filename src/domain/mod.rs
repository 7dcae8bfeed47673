// Domain layer: demo access records, the admin credential, error kinds and ports.

mod accounts;
mod credential;
mod errors;
mod ports;

// Re-export the domain boundary types and ports.
pub use accounts::{AccountSummary, DEFAULT_MODULES, DemoAccount, ModuleGrant};
pub use credential::{AdminKey, SessionPhase};
pub use errors::{ApiError, ConsoleError, CredentialStoreError, INVALID_ADMIN_KEY};
pub use ports::{AdminApi, CredentialStore, GrantDemoRequest};
