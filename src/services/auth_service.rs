//! Domain service for the single-password unlock gate.

use thiserror::Error;

/// Errors specific to unlocking.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid password")]
    InvalidCredentials,

    #[error("Password authentication is not configured")]
    NotConfigured,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Checks `password` against the configured hash.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidCredentials`] on mismatch or a malformed hash
    /// - [`AuthError::NotConfigured`] when no hash is set
    async fn unlock(&self, password: &str) -> Result<(), AuthError>;
}
