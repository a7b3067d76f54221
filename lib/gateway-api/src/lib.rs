//! Wire types for the gateway control plane
//!
//! This library defines the request and response bodies exchanged with the
//! gateway's control endpoints:
//! - Service registration and heartbeat bodies
//! - Route publication bodies (HTTP and RPC flavors)
//! - The common response envelope and its structured error code
//! - Advertised protocol tags and target-address scheme handling

pub mod error_code;
pub mod protocol;
pub mod route;
pub mod service;

pub use error_code::ErrorCode;
pub use protocol::{strip_target_scheme, Protocol, ProtocolParseError};
pub use route::RouteRequest;
pub use service::{GatewayEnvelope, HeartbeatRequest, RegisterServiceRequest, TargetData};

/// Resolves a service name to its advertised target
pub const TARGET_PATH: &str = "/gateway/service/health";
/// Registers a service address
pub const REGISTER_PATH: &str = "/gateway/service";
/// Keeps a registration alive
pub const HEARTBEAT_PATH: &str = "/gateway/service/beat";
/// Publishes one route into the routing directory
pub const ROUTE_PATH: &str = "/gateway/api";
/// Diagnostic echo
pub const PING_PATH: &str = "/gateway/ping";
