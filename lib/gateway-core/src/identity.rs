//! Service identity presented to the gateway
use crate::{CoreError, Result};
use gateway_api::{Protocol, RegisterServiceRequest};
use serde::{Deserialize, Serialize};

/// Name, advertised address and protocol of this process.
///
/// Fixed for the lifetime of an agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceIdentity {
    pub name: String,
    pub address: String,
    pub protocol: Protocol,
}

impl ServiceIdentity {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        protocol: Protocol,
    ) -> Result<Self> {
        let name = name.into();
        let address = address.into();

        if name.trim().is_empty() {
            return Err(CoreError::InvalidConfiguration("service name is empty".to_string()));
        }
        if name.contains('/') {
            return Err(CoreError::InvalidConfiguration(format!(
                "service name must not contain '/': {}",
                name
            )));
        }
        if address.trim().is_empty() {
            return Err(CoreError::InvalidConfiguration(format!(
                "advertised address for {} is empty",
                name
            )));
        }

        Ok(Self { name, address, protocol })
    }

    /// Route prefix the gateway mounts this service under
    pub fn prefix(&self) -> String {
        format!("/{}", self.name)
    }

    /// Registration body for this identity, signed with `password`
    pub fn register_request(&self, password: &str) -> RegisterServiceRequest {
        RegisterServiceRequest {
            name: self.name.clone(),
            prefix: self.prefix(),
            protocol: self.protocol,
            address: self.address.clone(),
            password: password.to_string(),
        }
    }
}
