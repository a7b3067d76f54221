//! Core state and route-table functionality for the gateway agent
//!
//! This library provides:
//! - Service identity and the rotating registration credential
//! - Heartbeat health tracking with one log line per state transition
//! - Host route tables (HTTP router, RPC service registry) and route discovery
//! - RPC method name mangling

pub mod credential;
pub mod discovery;
pub mod error;
pub mod health;
pub mod identity;
pub mod naming;
pub mod registry;
pub mod routes;

pub use credential::{Credential, CredentialError, CredentialSource, StaticCredentialSource};
pub use discovery::{discover_http_routes, discover_rpc_routes};
pub use error::{CoreError, Result};
pub use health::{HealthConfig, HealthSnapshot, HealthTracker, HealthTransition};
pub use identity::ServiceIdentity;
pub use naming::{rpc_method_to_http_path, rpc_method_to_snake};
pub use registry::{RpcServiceInfo, RpcServiceRegistry};
pub use routes::{
    HttpRoute, HttpRouteTable, HttpRouter, RouteDescriptor, RpcOrigin, RpcServiceTable,
};
