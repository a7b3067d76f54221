//! Redis-backed registration credential source

use async_trait::async_trait;
use gateway_core::{CredentialError, CredentialSource};
use tracing::debug;

/// Key the gateway publishes its registration password under
pub const DEFAULT_CREDENTIAL_KEY: &str = "gateway:register:password";

/// Reads the registration secret from a Redis key on every fetch
pub struct RedisCredentialSource {
    /// Redis client; connections are opened per fetch
    client: redis::Client,

    /// Key holding the secret
    key: String,
}

impl RedisCredentialSource {
    /// Create a source for `url` (e.g., "redis://:password@10.0.0.5:6379/0")
    pub fn new(url: &str) -> Result<Self, CredentialError> {
        let client = redis::Client::open(url).map_err(|e| {
            CredentialError::Unavailable(format!("Failed to create Redis client: {}", e))
        })?;

        Ok(Self {
            client,
            key: DEFAULT_CREDENTIAL_KEY.to_string(),
        })
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl CredentialSource for RedisCredentialSource {
    async fn fetch_secret(&self) -> Result<String, CredentialError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                CredentialError::Unavailable(format!("Failed to connect to Redis: {}", e))
            })?;

        let value: Option<String> = redis::cmd("GET")
            .arg(&self.key)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                CredentialError::Unavailable(format!("Failed to read {}: {}", self.key, e))
            })?;

        debug!("Fetched registration credential from {}", self.key);
        value.ok_or_else(|| CredentialError::Missing(self.key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_key() {
        let source = RedisCredentialSource::new("redis://127.0.0.1:6379/0").unwrap();
        assert_eq!(source.key(), "gateway:register:password");
        assert_eq!(source.with_key("custom").key(), "custom");
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            RedisCredentialSource::new("not a url"),
            Err(CredentialError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_store() {
        let source = RedisCredentialSource::new("redis://127.0.0.1:1/").unwrap();
        assert!(matches!(
            source.fetch_secret().await,
            Err(CredentialError::Unavailable(_))
        ));
    }
}
