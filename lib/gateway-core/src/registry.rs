//! Registry of the RPC services a host process exposes

use crate::routes::RpcServiceTable;
use crate::{CoreError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// RpcServiceRegistry maintains the RPC services a host serves and their methods
pub struct RpcServiceRegistry {
    // Fully-qualified service name to method names, sorted for stable publication order
    services: Arc<RwLock<BTreeMap<String, Vec<String>>>>,
}

/// Information about one exposed RPC service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcServiceInfo {
    pub name: String,
    pub methods: Vec<String>,
}

impl RpcServiceRegistry {
    pub fn new() -> Self {
        Self {
            services: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Register or replace a service and its methods
    pub async fn register_service(&self, name: &str, methods: &[&str]) -> Result<()> {
        if name.is_empty() {
            return Err(CoreError::InvalidConfiguration("RPC service name is empty".to_string()));
        }
        if let Some(bad) = methods.iter().find(|m| m.is_empty() || m.contains('/')) {
            return Err(CoreError::InvalidConfiguration(format!(
                "invalid method name {:?} on {}",
                bad, name
            )));
        }

        let mut services = self.services.write().await;
        services.insert(name.to_string(), methods.iter().map(|m| m.to_string()).collect());

        debug!("Registered RPC service: {} ({} methods)", name, methods.len());
        Ok(())
    }

    /// List all services
    pub async fn list_services(&self) -> Vec<RpcServiceInfo> {
        let services = self.services.read().await;
        services
            .iter()
            .map(|(name, methods)| RpcServiceInfo {
                name: name.clone(),
                methods: methods.clone(),
            })
            .collect()
    }
}

impl Default for RpcServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RpcServiceTable for RpcServiceRegistry {
    async fn rpc_services(&self) -> Result<Vec<RpcServiceInfo>> {
        Ok(self.list_services().await)
    }
}
