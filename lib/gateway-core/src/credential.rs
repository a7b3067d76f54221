//! Registration credential and the source it is rotated from

use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("credential store unavailable: {0}")]
    Unavailable(String),

    #[error("credential key not found: {0}")]
    Missing(String),
}

/// Supplies the current shared registration secret.
///
/// Implementations never retry; the caller decides what a failure means.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn fetch_secret(&self) -> std::result::Result<String, CredentialError>;
}

/// Fixed secret, for local hosts and tests
#[derive(Clone, Debug)]
pub struct StaticCredentialSource {
    secret: String,
}

impl StaticCredentialSource {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }
}

#[async_trait]
impl CredentialSource for StaticCredentialSource {
    async fn fetch_secret(&self) -> std::result::Result<String, CredentialError> {
        Ok(self.secret.clone())
    }
}

/// Current registration secret.
///
/// Single writer: only the registration path calls [`Credential::replace`].
/// The lock keeps additional refresh sites sound.
#[derive(Debug, Default)]
pub struct Credential {
    secret: RwLock<String>,
}

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: RwLock::new(secret.into()),
        }
    }

    pub fn get(&self) -> String {
        self.secret
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace(&self, secret: impl Into<String>) {
        *self.secret.write().unwrap_or_else(PoisonError::into_inner) = secret.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_replace() {
        let credential = Credential::new("old");
        credential.replace("new");
        assert_eq!(credential.get(), "new");
    }

    #[test]
    fn test_credential_default_empty() {
        let credential = Credential::default();
        assert_eq!(credential.get(), "");
        credential.replace("x");
        assert_eq!(credential.get(), "x");
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticCredentialSource::new("s3cret");
        assert_eq!(source.fetch_secret().await.unwrap(), "s3cret");
    }
}
