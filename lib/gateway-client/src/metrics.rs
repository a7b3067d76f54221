//! Prometheus metrics for the registration agent

use anyhow::Result;
use gateway_core::{rpc_method_to_snake, HealthTransition, RouteDescriptor};
use prometheus::{CounterVec, Encoder, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Prometheus metrics collector for gateway registration activity
#[derive(Clone)]
pub struct AgentMetrics {
    /// Heartbeats sent, by outcome
    pub heartbeats_total: CounterVec,
    /// Health state transitions, by direction
    pub health_transitions_total: CounterVec,
    /// Registration attempts, by outcome
    pub registrations_total: CounterVec,
    /// Credential refreshes, by outcome
    pub credential_refreshes_total: CounterVec,
    /// Route publications, by route kind and outcome
    pub routes_published_total: CounterVec,
    /// RPC methods published, by snake-case method name
    pub rpc_methods_published_total: CounterVec,
    /// Current heartbeat failure streak
    pub heartbeat_consecutive_failures: IntGauge,
    /// Prometheus registry for metrics
    pub registry: Arc<Registry>,
}

impl AgentMetrics {
    /// Create a new metrics collector with its own registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());

        let heartbeats_total = CounterVec::new(
            Opts::new("gateway_heartbeats_total", "Heartbeats sent to the gateway"),
            &["outcome"],
        )?;

        let health_transitions_total = CounterVec::new(
            Opts::new("gateway_health_transitions_total", "Service health state transitions"),
            &["transition"],
        )?;

        let registrations_total = CounterVec::new(
            Opts::new("gateway_registrations_total", "Service registration attempts"),
            &["outcome"],
        )?;

        let credential_refreshes_total = CounterVec::new(
            Opts::new(
                "gateway_credential_refreshes_total",
                "Registration credential refreshes",
            ),
            &["outcome"],
        )?;

        let routes_published_total = CounterVec::new(
            Opts::new("gateway_routes_published_total", "Route publications"),
            &["kind", "outcome"],
        )?;

        let rpc_methods_published_total = CounterVec::new(
            Opts::new("gateway_rpc_methods_published_total", "RPC methods published"),
            &["method"],
        )?;

        let heartbeat_consecutive_failures = IntGauge::new(
            "gateway_heartbeat_consecutive_failures",
            "Current streak of failed heartbeats",
        )?;

        // Register metrics
        registry.register(Box::new(heartbeats_total.clone()))?;
        registry.register(Box::new(health_transitions_total.clone()))?;
        registry.register(Box::new(registrations_total.clone()))?;
        registry.register(Box::new(credential_refreshes_total.clone()))?;
        registry.register(Box::new(routes_published_total.clone()))?;
        registry.register(Box::new(rpc_methods_published_total.clone()))?;
        registry.register(Box::new(heartbeat_consecutive_failures.clone()))?;

        Ok(Self {
            heartbeats_total,
            health_transitions_total,
            registrations_total,
            credential_refreshes_total,
            routes_published_total,
            rpc_methods_published_total,
            heartbeat_consecutive_failures,
            registry,
        })
    }

    pub fn record_transition(&self, transition: HealthTransition) {
        self.health_transitions_total
            .with_label_values(&[transition.as_str()])
            .inc();
    }

    /// Count of recorded transitions in one direction
    pub fn transitions(&self, transition: HealthTransition) -> u64 {
        self.health_transitions_total
            .with_label_values(&[transition.as_str()])
            .get() as u64
    }

    pub fn record_publication(&self, route: &RouteDescriptor, outcome: &str) {
        self.routes_published_total
            .with_label_values(&[route.kind(), outcome])
            .inc();

        if let (Some(rpc), "created") = (&route.rpc, outcome) {
            self.rpc_methods_published_total
                .with_label_values(&[&rpc_method_to_snake(&rpc.method)])
                .inc();
        }
    }

    /// Gather all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = vec![];
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl Default for AgentMetrics {
    fn default() -> Self {
        Self::new().expect("Failed to create default AgentMetrics")
    }
}
