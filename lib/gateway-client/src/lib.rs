//! Gateway registration agent
//!
//! Registers a service with the gateway, keeps the registration alive with
//! heartbeats, tracks perceived health and publishes the host's route table.
pub mod agent;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod heartbeat;
pub mod metrics;

pub use agent::{Attachment, PublishSummary, RegistrationAgent};
pub use client::{GatewayClient, GatewayTransport, PublishOutcome};
pub use config::{AgentConfig, CredentialConfig};
pub use credential::RedisCredentialSource;
pub use error::{AgentError, ConfigError, GatewayError};
pub use heartbeat::HeartbeatHandle;
pub use metrics::AgentMetrics;
