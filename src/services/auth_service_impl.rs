//! Argon2 implementation of the `AuthService` trait.

use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use tokio::task;
use tracing::warn;

use crate::config::SecurityConfig;
use crate::services::auth_service::{AuthError, AuthService};

pub struct PasswordAuthService {
    password_hash: Option<String>,
}

impl PasswordAuthService {
    #[must_use]
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            password_hash: config.password_hash.clone(),
        }
    }
}

#[async_trait]
impl AuthService for PasswordAuthService {
    async fn unlock(&self, password: &str) -> Result<(), AuthError> {
        let Some(hash) = self.password_hash.clone() else {
            return Err(AuthError::NotConfigured);
        };

        if verify_password(password, &hash).await? {
            metrics::counter!("unlock_attempts_total", "outcome" => "success").increment(1);
            Ok(())
        } else {
            metrics::counter!("unlock_attempts_total", "outcome" => "failure").increment(1);
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Verifies `password` against a PHC string. A hash that does not parse never
/// verifies.
///
/// Runs on the blocking pool; Argon2 is CPU-bound.
pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let password = password.to_string();
    let password_hash = password_hash.to_string();

    task::spawn_blocking(move || {
        let Ok(parsed_hash) = PasswordHash::new(&password_hash) else {
            warn!("Configured password hash is not a valid PHC string");
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    })
    .await
    .context("Password verification task panicked")
}

/// Produces a fresh salted Argon2id hash using the configured cost.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
