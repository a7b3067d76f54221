use crate::{ErrorCode, Protocol};
use serde::{Deserialize, Serialize};

/// Body of a service registration (`POST /gateway/service`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterServiceRequest {
    /// Service name
    pub name: String,

    /// Route prefix the gateway mounts the service under ("/" + name)
    pub prefix: String,

    /// Protocol the service speaks
    pub protocol: Protocol,

    /// Advertised network address (host:port)
    pub address: String,

    /// Shared registration secret
    pub password: String,
}

/// Body of a heartbeat (`POST /gateway/service/beat`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatRequest {
    pub service_name: String,
    pub address: String,
}

/// Response envelope shared by all control endpoints
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GatewayEnvelope<T> {
    #[serde(default)]
    pub err_code: ErrorCode,

    #[serde(default)]
    pub message: String,

    pub data: Option<T>,
}

/// Payload of a target-resolution response
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TargetData {
    #[serde(default)]
    pub target: String,
}
