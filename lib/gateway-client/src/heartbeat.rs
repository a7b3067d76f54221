//! Background heartbeat loop

use crate::client::GatewayTransport;
use crate::metrics::AgentMetrics;
use gateway_core::{HealthConfig, HealthSnapshot, HealthTracker};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

/// Handle to a running heartbeat loop.
///
/// The loop owns its [`HealthTracker`]; the handle only sees snapshots.
/// Dropping the handle detaches the loop, which then runs until the runtime
/// shuts down. Call [`HeartbeatHandle::stop`] or [`HeartbeatHandle::shutdown`]
/// to end it.
pub struct HeartbeatHandle {
    shutdown: watch::Sender<bool>,
    health: watch::Receiver<HealthSnapshot>,
    task: JoinHandle<()>,
}

impl HeartbeatHandle {
    pub(crate) fn spawn(
        transport: Arc<dyn GatewayTransport>,
        service_name: String,
        address: String,
        config: &HealthConfig,
        metrics: AgentMetrics,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (health_tx, health_rx) = watch::channel(HealthSnapshot::default());

        let heartbeat = Heartbeat {
            tracker: HealthTracker::new(service_name.clone(), config),
            transport,
            service_name,
            address,
            interval: config.heartbeat_interval,
            metrics,
            health: health_tx,
        };
        let task = tokio::spawn(heartbeat.run(shutdown_rx));

        Self {
            shutdown: shutdown_tx,
            health: health_rx,
            task,
        }
    }

    /// Receiver notified after every heartbeat
    pub fn subscribe(&self) -> watch::Receiver<HealthSnapshot> {
        self.health.clone()
    }

    /// Signal the loop to stop after the current heartbeat
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the loop and wait for it to exit
    pub async fn shutdown(self) {
        self.stop();
        if let Err(e) = self.task.await {
            warn!("Heartbeat task ended abnormally: {}", e);
        }
    }
}

struct Heartbeat {
    tracker: HealthTracker,
    transport: Arc<dyn GatewayTransport>,
    service_name: String,
    address: String,
    interval: Duration,
    metrics: AgentMetrics,
    health: watch::Sender<HealthSnapshot>,
}

impl Heartbeat {
    async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Heartbeat started for {} at {} every {:?}",
            self.service_name, self.address, self.interval
        );
        let mut shutdown_open = true;

        loop {
            self.beat().await;

            let deadline = Instant::now() + self.interval;
            if shutdown_open {
                tokio::select! {
                    _ = time::sleep_until(deadline) => {}
                    changed = shutdown.changed() => match changed {
                        Ok(()) if *shutdown.borrow() => break,
                        Ok(()) => time::sleep_until(deadline).await,
                        Err(_) => {
                            // Handle dropped: keep beating for the life of the process
                            shutdown_open = false;
                            time::sleep_until(deadline).await;
                        }
                    },
                }
            } else {
                time::sleep_until(deadline).await;
            }
        }

        info!("Heartbeat stopped for {}", self.service_name);
    }

    async fn beat(&mut self) {
        let transition = match self
            .transport
            .send_heartbeat(&self.service_name, &self.address)
            .await
        {
            Ok(()) => {
                debug!("Heartbeat accepted for {}", self.service_name);
                self.metrics.heartbeats_total.with_label_values(&["success"]).inc();
                self.tracker.record_success()
            }
            Err(e) => {
                self.metrics.heartbeats_total.with_label_values(&["failure"]).inc();
                self.tracker.record_failure(&e.to_string())
            }
        };

        if let Some(transition) = transition {
            self.metrics.record_transition(transition);
        }
        self.metrics
            .heartbeat_consecutive_failures
            .set(i64::from(self.tracker.consecutive_failures()));

        self.health.send_replace(self.tracker.snapshot());
    }
}
