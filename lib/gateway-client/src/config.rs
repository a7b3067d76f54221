//! Agent configuration loaded from YAML

use crate::credential::{RedisCredentialSource, DEFAULT_CREDENTIAL_KEY};
use crate::error::ConfigError;
use gateway_api::Protocol;
use gateway_core::{CredentialSource, HealthConfig, ServiceIdentity, StaticCredentialSource};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Configuration of one registration agent
#[derive(Clone, Debug, Deserialize)]
pub struct AgentConfig {
    /// Service name registered with the gateway
    pub service_name: String,

    /// Advertised address (host:port)
    pub address: String,

    /// Protocol the service speaks
    #[serde(default)]
    pub protocol: Protocol,

    /// Gateway base URL (e.g., "http://gateway:8000")
    pub gateway_url: String,

    /// Seconds between heartbeats
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,

    /// Per-request timeout for gateway calls (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Consecutive heartbeat failures before the service is reported unhealthy
    #[serde(default = "default_unhealthy_threshold")]
    pub unhealthy_threshold: u32,

    /// Where the registration secret comes from
    #[serde(default)]
    pub credential: CredentialConfig,
}

/// Credential source settings
#[derive(Clone, Debug, Deserialize)]
pub struct CredentialConfig {
    /// Redis URL holding the rotating secret
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Key of the secret in Redis
    #[serde(default = "default_credential_key")]
    pub key: String,

    /// Fixed secret; takes precedence over Redis
    #[serde(default)]
    pub secret: Option<String>,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            key: default_credential_key(),
            secret: None,
        }
    }
}

impl CredentialConfig {
    pub fn build_source(&self) -> Result<Arc<dyn CredentialSource>, ConfigError> {
        if let Some(secret) = &self.secret {
            return Ok(Arc::new(StaticCredentialSource::new(secret.clone())));
        }

        match &self.redis_url {
            Some(url) => {
                let source = RedisCredentialSource::new(url)
                    .map_err(|e| ConfigError::Invalid(e.to_string()))?
                    .with_key(self.key.clone());
                Ok(Arc::new(source))
            }
            None => Err(ConfigError::Invalid(
                "credential needs either `secret` or `redis_url`".to_string(),
            )),
        }
    }
}

impl AgentConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: AgentConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gateway_url.starts_with("http://") || self.gateway_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "gateway_url must be an http(s) URL: {}",
                self.gateway_url
            )));
        }
        if self.heartbeat_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "heartbeat_interval_secs must be positive".to_string(),
            ));
        }
        self.identity()?;
        Ok(())
    }

    pub fn identity(&self) -> Result<ServiceIdentity, ConfigError> {
        Ok(ServiceIdentity::new(
            self.service_name.clone(),
            self.address.clone(),
            self.protocol,
        )?)
    }

    pub fn health_config(&self) -> HealthConfig {
        HealthConfig {
            heartbeat_interval: Duration::from_secs(self.heartbeat_interval_secs),
            unhealthy_threshold: self.unhealthy_threshold,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_heartbeat_interval_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_unhealthy_threshold() -> u32 {
    3
}

fn default_credential_key() -> String {
    DEFAULT_CREDENTIAL_KEY.to_string()
}
