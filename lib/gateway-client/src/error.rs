use gateway_api::ErrorCode;
use gateway_core::CoreError;
use thiserror::Error;

/// Failure of a single exchange with the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gateway returned {status} (err_code {code}): {message}")]
    Protocol {
        status: u16,
        code: ErrorCode,
        message: String,
    },

    #[error("Heartbeat failed: {0}")]
    Heartbeat(String),

    #[error("Registration credential is stale")]
    CredentialStale,

    #[error("Invalid target address: {0:?}")]
    InvalidTarget(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure of the discover-and-publish phase
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Route discovery failed: {0}")]
    Discovery(#[from] CoreError),

    #[error("Failed to publish {method} {path}: {source}")]
    Publication {
        method: String,
        path: String,
        #[source]
        source: GatewayError,
    },
}

/// Failure to load or apply agent configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
