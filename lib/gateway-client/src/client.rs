//! HTTP+JSON transport for the gateway's control endpoints

use crate::error::GatewayError;
use async_trait::async_trait;
use gateway_api::{
    strip_target_scheme, ErrorCode, GatewayEnvelope, HeartbeatRequest, TargetData,
    HEARTBEAT_PATH, PING_PATH, REGISTER_PATH, ROUTE_PATH, TARGET_PATH,
};
use gateway_core::{RouteDescriptor, ServiceIdentity};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Result of publishing one route
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    /// The gateway already knew the route; treated as success
    AlreadyExists,
}

/// Request/response operations against the gateway.
///
/// Every call is a single exchange; none of them retry.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// Register the service address with the current credential
    async fn register_address(
        &self,
        identity: &ServiceIdentity,
        credential: &str,
    ) -> Result<(), GatewayError>;

    /// Liveness ping for a registered address
    async fn send_heartbeat(&self, service_name: &str, address: &str) -> Result<(), GatewayError>;

    /// Publish one route description
    async fn publish_route(&self, route: &RouteDescriptor) -> Result<PublishOutcome, GatewayError>;

    /// Diagnostic echo; failures are described, never raised
    async fn ping(&self) -> String;
}

/// reqwest-backed gateway client
#[derive(Clone, Debug)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a client for the gateway at `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Resolve the address a service is reachable at, with its scheme stripped
    pub async fn resolve_target(&self, service_name: &str) -> Result<String, GatewayError> {
        let resp = self
            .client
            .get(self.url(TARGET_PATH))
            .query(&[("service_name", service_name)])
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            let err = Self::protocol_error(resp).await;
            warn!("Failed to resolve target for {}: {}", service_name, err);
            return Err(err);
        }

        let envelope: GatewayEnvelope<TargetData> = serde_json::from_slice(&resp.bytes().await?)?;
        let target = envelope.data.unwrap_or_default().target;

        match strip_target_scheme(&target) {
            Some(address) => {
                debug!("Resolved {} to {}", service_name, address);
                Ok(address.to_string())
            }
            None => {
                warn!("Target address for {} is invalid: {:?}", service_name, target);
                Err(GatewayError::InvalidTarget(target))
            }
        }
    }

    /// Build a protocol error from a non-200 response, decoding `err_code` if present
    async fn protocol_error(resp: Response) -> GatewayError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();

        match serde_json::from_str::<GatewayEnvelope<serde_json::Value>>(&body) {
            Ok(envelope) => GatewayError::Protocol {
                status,
                code: envelope.err_code,
                message: envelope.message,
            },
            Err(_) => GatewayError::Protocol {
                status,
                code: ErrorCode::Ok,
                message: body.chars().take(256).collect(),
            },
        }
    }
}

#[async_trait]
impl GatewayTransport for GatewayClient {
    async fn register_address(
        &self,
        identity: &ServiceIdentity,
        credential: &str,
    ) -> Result<(), GatewayError> {
        let body = identity.register_request(credential);
        let resp = self.client.post(self.url(REGISTER_PATH)).json(&body).send().await?;

        if resp.status() == StatusCode::OK {
            return Ok(());
        }

        match Self::protocol_error(resp).await {
            GatewayError::Protocol {
                code: ErrorCode::CredentialStale,
                ..
            } => Err(GatewayError::CredentialStale),
            err => Err(err),
        }
    }

    async fn send_heartbeat(&self, service_name: &str, address: &str) -> Result<(), GatewayError> {
        let body = HeartbeatRequest {
            service_name: service_name.to_string(),
            address: address.to_string(),
        };
        let resp = self
            .client
            .post(self.url(HEARTBEAT_PATH))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Heartbeat(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            let reason = match serde_json::from_str::<GatewayEnvelope<serde_json::Value>>(&body) {
                Ok(envelope) if !envelope.message.is_empty() => envelope.message,
                _ => body.chars().take(256).collect(),
            };
            return Err(GatewayError::Heartbeat(format!("status {}: {}", status.as_u16(), reason)));
        }
        Ok(())
    }

    async fn publish_route(&self, route: &RouteDescriptor) -> Result<PublishOutcome, GatewayError> {
        let resp = self
            .client
            .post(self.url(ROUTE_PATH))
            .json(&route.to_request())
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        let envelope = serde_json::from_slice::<GatewayEnvelope<serde_json::Value>>(&body).ok();

        // The exists code wins over the status: the gateway reports it on non-200 responses too
        if let Some(GatewayEnvelope {
            err_code: ErrorCode::RouteExists,
            ..
        }) = envelope
        {
            return Ok(PublishOutcome::AlreadyExists);
        }

        if status != StatusCode::OK {
            let (code, message) = match envelope {
                Some(envelope) => (envelope.err_code, envelope.message),
                None => (ErrorCode::Ok, String::from_utf8_lossy(&body).chars().take(256).collect()),
            };
            return Err(GatewayError::Protocol {
                status: status.as_u16(),
                code,
                message,
            });
        }

        Ok(PublishOutcome::Created)
    }

    async fn ping(&self) -> String {
        let resp = match self.client.get(self.url(PING_PATH)).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Ping error: {}", e);
                return format!("Ping failed: {}", e);
            }
        };

        if resp.status() != StatusCode::OK {
            warn!("Ping failed with status: {}", resp.status());
            return format!("Ping failed with status: {}", resp.status());
        }

        match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Ping failed to read body: {}", e);
                "Ping failed to read body".to_string()
            }
        }
    }
}
