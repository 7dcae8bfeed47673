use thiserror::Error;

// Message shown for any failed sign-in, whatever the underlying cause.
pub const INVALID_ADMIN_KEY: &str = "Invalid admin key";

// The two error kinds the console surfaces to the administrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("Invalid admin key")]
    InvalidCredential,
    #[error("{0}")]
    RequestFailed(String),
}

impl From<ApiError> for ConsoleError {
    fn from(err: ApiError) -> Self {
        ConsoleError::RequestFailed(err.to_string())
    }
}

// Failures reported by the admin API port. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    // Non-success status without a usable `detail` field.
    #[error("Error {0}")]
    Status(u16),
    // Non-success status with a server-provided `detail` message.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
    #[error("{0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status(status) | ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Transport(_) | ApiError::Decode(_) => None,
        }
    }
}

// Failures reading or writing the persisted admin key entry.
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("admin key entry I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
