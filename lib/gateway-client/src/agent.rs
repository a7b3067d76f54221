//! Registration agent: the unit a host process embeds

use crate::client::{GatewayTransport, PublishOutcome};
use crate::error::{AgentError, GatewayError};
use crate::heartbeat::HeartbeatHandle;
use crate::metrics::AgentMetrics;
use gateway_core::{
    discover_http_routes, discover_rpc_routes, Credential, CredentialSource, HealthConfig,
    HttpRouteTable, RouteDescriptor, RpcServiceTable, ServiceIdentity,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Counts from one publication pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub created: usize,
    pub already_present: usize,
}

impl PublishSummary {
    pub fn total(&self) -> usize {
        self.created + self.already_present
    }
}

/// Outcome of attaching the agent to a host.
///
/// Registration and publication failures are reported here for the host to
/// log; neither stops the heartbeat loop.
pub struct Attachment {
    pub registration: Result<(), GatewayError>,
    pub heartbeat: HeartbeatHandle,
    pub publication: Result<PublishSummary, AgentError>,
}

/// Registers a service with the gateway, keeps it alive and publishes its routes
pub struct RegistrationAgent {
    identity: ServiceIdentity,
    transport: Arc<dyn GatewayTransport>,
    credentials: Arc<dyn CredentialSource>,
    credential: Credential,
    health_config: HealthConfig,
    metrics: AgentMetrics,
}

impl RegistrationAgent {
    /// Create an agent, fetching the initial credential.
    ///
    /// A credential fetch failure is logged and the agent starts with an empty
    /// secret; the first stale-credential response triggers another fetch.
    pub async fn new(
        identity: ServiceIdentity,
        transport: Arc<dyn GatewayTransport>,
        credentials: Arc<dyn CredentialSource>,
        health_config: HealthConfig,
    ) -> Self {
        let credential = match credentials.fetch_secret().await {
            Ok(secret) => Credential::new(secret),
            Err(e) => {
                error!(
                    "Failed to fetch registration credential, check the credential store: {}",
                    e
                );
                Credential::default()
            }
        };

        info!(
            "Gateway agent initialized: {} {} {}",
            identity.name, identity.address, identity.protocol
        );

        Self {
            identity,
            transport,
            credentials,
            credential,
            health_config,
            metrics: AgentMetrics::default(),
        }
    }

    /// Use a caller-owned metrics collector (e.g., one exported by the host)
    pub fn with_metrics(mut self, metrics: AgentMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    pub fn metrics(&self) -> &AgentMetrics {
        &self.metrics
    }

    /// Current registration secret
    pub fn credential(&self) -> String {
        self.credential.get()
    }

    /// Single registration attempt.
    ///
    /// On a stale-credential response the credential is refreshed before
    /// returning, so the next attempt uses the new secret.
    pub async fn register(&self) -> Result<(), GatewayError> {
        let result = self
            .transport
            .register_address(&self.identity, &self.credential.get())
            .await;

        match &result {
            Ok(()) => {
                info!(
                    "Registered {} at {} with gateway",
                    self.identity.name, self.identity.address
                );
                self.metrics.registrations_total.with_label_values(&["success"]).inc();
            }
            Err(GatewayError::CredentialStale) => {
                warn!(
                    "Gateway rejected credential for {} as stale, refreshing",
                    self.identity.name
                );
                self.metrics.registrations_total.with_label_values(&["stale"]).inc();
                self.refresh_credential().await;
            }
            Err(e) => {
                warn!("Failed to register {} with gateway: {}", self.identity.name, e);
                self.metrics.registrations_total.with_label_values(&["failure"]).inc();
            }
        }

        result
    }

    /// Register, retrying exactly once on failure
    pub async fn register_with_retry(&self) -> Result<(), GatewayError> {
        if self.register().await.is_ok() {
            return Ok(());
        }

        let result = self.register().await;
        if let Err(e) = &result {
            error!(
                "Registration of {} failed after retry, continuing without it: {}",
                self.identity.name, e
            );
        }
        result
    }

    /// Replace the stored credential from the source; keeps the old one on failure
    async fn refresh_credential(&self) {
        match self.credentials.fetch_secret().await {
            Ok(secret) => {
                self.credential.replace(secret);
                self.metrics.credential_refreshes_total.with_label_values(&["success"]).inc();
                info!("Registration credential refreshed for {}", self.identity.name);
            }
            Err(e) => {
                self.metrics.credential_refreshes_total.with_label_values(&["failure"]).inc();
                error!("Credential refresh failed, reusing stale credential: {}", e);
            }
        }
    }

    /// Start the background heartbeat loop
    pub fn start_heartbeat(&self) -> HeartbeatHandle {
        HeartbeatHandle::spawn(
            self.transport.clone(),
            self.identity.name.clone(),
            self.identity.address.clone(),
            &self.health_config,
            self.metrics.clone(),
        )
    }

    /// Discover and publish the host's HTTP routes
    pub async fn publish_http_routes(
        &self,
        table: &dyn HttpRouteTable,
    ) -> Result<PublishSummary, AgentError> {
        let routes = discover_http_routes(&self.identity.name, table).await?;
        self.publish_routes(&routes).await
    }

    /// Discover and publish the host's RPC methods as `POST` routes
    pub async fn publish_rpc_routes(
        &self,
        table: &dyn RpcServiceTable,
    ) -> Result<PublishSummary, AgentError> {
        let routes = discover_rpc_routes(&self.identity.name, table).await?;
        self.publish_routes(&routes).await
    }

    /// Publish in order; the first failure other than "already exists" aborts the rest
    async fn publish_routes(
        &self,
        routes: &[RouteDescriptor],
    ) -> Result<PublishSummary, AgentError> {
        let mut summary = PublishSummary::default();

        for route in routes {
            match self.transport.publish_route(route).await {
                Ok(PublishOutcome::Created) => {
                    debug!("Published {} route {} {}", route.kind(), route.method, route.path);
                    self.metrics.record_publication(route, "created");
                    summary.created += 1;
                }
                Ok(PublishOutcome::AlreadyExists) => {
                    debug!(
                        "{} route {} {} already exists, skipping",
                        route.kind(),
                        route.method,
                        route.path
                    );
                    self.metrics.record_publication(route, "exists");
                    summary.already_present += 1;
                }
                Err(source) => {
                    self.metrics.record_publication(route, "failed");
                    return Err(AgentError::Publication {
                        method: route.method.clone(),
                        path: route.path.clone(),
                        source,
                    });
                }
            }
        }

        info!(
            "Published {} routes for {} ({} new, {} existing)",
            summary.total(),
            self.identity.name,
            summary.created,
            summary.already_present
        );
        Ok(summary)
    }

    /// Attach to an HTTP host: register, start heartbeats, publish HTTP routes
    pub async fn attach_http(&self, table: &dyn HttpRouteTable) -> Attachment {
        let registration = self.register_with_retry().await;
        let heartbeat = self.start_heartbeat();
        let publication = self.publish_http_routes(table).await;
        self.report_publication(&publication);

        Attachment {
            registration,
            heartbeat,
            publication,
        }
    }

    /// Attach to an RPC host: register, start heartbeats, publish RPC routes
    pub async fn attach_rpc(&self, table: &dyn RpcServiceTable) -> Attachment {
        let registration = self.register_with_retry().await;
        let heartbeat = self.start_heartbeat();
        let publication = self.publish_rpc_routes(table).await;
        self.report_publication(&publication);

        Attachment {
            registration,
            heartbeat,
            publication,
        }
    }

    fn report_publication(&self, publication: &Result<PublishSummary, AgentError>) {
        if let Err(e) = publication {
            warn!("Gateway route registration alert for {}: {}", self.identity.name, e);
        }
    }

    /// Diagnostic echo from the gateway
    pub async fn ping(&self) -> String {
        self.transport.ping().await
    }
}
