//! Heartbeat-driven health tracking
//!
//! The tracker is fed one outcome per heartbeat. It is purely observational:
//! it logs each Healthy/Unhealthy transition exactly once and never affects
//! control flow elsewhere.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Heartbeat and health tracking configuration
#[derive(Clone, Debug)]
pub struct HealthConfig {
    /// Interval between heartbeats
    pub heartbeat_interval: Duration,
    /// Number of consecutive failures before marking unhealthy
    pub unhealthy_threshold: u32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(10),
            unhealthy_threshold: 3,
        }
    }
}

/// A change of health state caused by a heartbeat outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthTransition {
    BecameUnhealthy,
    Recovered,
}

impl HealthTransition {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthTransition::BecameUnhealthy => "unhealthy",
            HealthTransition::Recovered => "recovered",
        }
    }
}

/// Read-only view of the tracker state
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HealthSnapshot {
    pub consecutive_failures: u32,
    pub is_healthy: bool,
    pub total_successes: u64,
    pub total_failures: u64,
    pub unhealthy_transitions: u64,
    pub recoveries: u64,
    pub last_error: Option<String>,
    pub last_success_at: Option<DateTime<Utc>>,
}

impl Default for HealthSnapshot {
    fn default() -> Self {
        Self {
            consecutive_failures: 0,
            is_healthy: true,
            total_successes: 0,
            total_failures: 0,
            unhealthy_transitions: 0,
            recoveries: 0,
            last_error: None,
            last_success_at: None,
        }
    }
}

/// Two-state health machine, initially healthy
pub struct HealthTracker {
    service_name: String,
    unhealthy_threshold: u32,
    state: HealthSnapshot,
}

impl HealthTracker {
    pub fn new(service_name: impl Into<String>, config: &HealthConfig) -> Self {
        Self {
            service_name: service_name.into(),
            unhealthy_threshold: config.unhealthy_threshold.max(1),
            state: HealthSnapshot::default(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.state.is_healthy
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.state.consecutive_failures
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        self.state.clone()
    }

    /// Record a failed heartbeat
    pub fn record_failure(&mut self, reason: &str) -> Option<HealthTransition> {
        self.state.consecutive_failures = self.state.consecutive_failures.saturating_add(1);
        self.state.total_failures += 1;
        self.state.last_error = Some(reason.to_string());

        debug!(
            "Heartbeat failed for {} ({} consecutive): {}",
            self.service_name, self.state.consecutive_failures, reason
        );

        if self.state.is_healthy && self.state.consecutive_failures >= self.unhealthy_threshold {
            self.state.is_healthy = false;
            self.state.unhealthy_transitions += 1;
            warn!(
                service = %self.service_name,
                consecutive_failures = self.state.consecutive_failures,
                last_error = %reason,
                "Service unhealthy: {} consecutive heartbeat failures, service keeps running",
                self.state.consecutive_failures
            );
            return Some(HealthTransition::BecameUnhealthy);
        }

        None
    }

    /// Record a successful heartbeat
    pub fn record_success(&mut self) -> Option<HealthTransition> {
        let transition = if self.state.is_healthy {
            None
        } else {
            self.state.recoveries += 1;
            info!(service = %self.service_name, "Service recovered: heartbeat accepted");
            Some(HealthTransition::Recovered)
        };

        self.state.consecutive_failures = 0;
        self.state.is_healthy = true;
        self.state.total_successes += 1;
        self.state.last_error = None;
        self.state.last_success_at = Some(Utc::now());

        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> HealthTracker {
        HealthTracker::new("forum", &HealthConfig::default())
    }

    #[test]
    fn test_default_config() {
        let config = HealthConfig::default();
        assert_eq!(config.heartbeat_interval, Duration::from_secs(10));
        assert_eq!(config.unhealthy_threshold, 3);
    }

    #[test]
    fn test_initially_healthy() {
        let tracker = tracker();
        assert!(tracker.is_healthy());
        assert_eq!(tracker.consecutive_failures(), 0);
    }

    #[test]
    fn test_unhealthy_after_three_failures() {
        let mut tracker = tracker();
        assert_eq!(tracker.record_failure("timeout"), None);
        assert_eq!(tracker.record_failure("timeout"), None);
        assert!(tracker.is_healthy());
        assert_eq!(tracker.record_failure("timeout"), Some(HealthTransition::BecameUnhealthy));
        assert!(!tracker.is_healthy());
        assert_eq!(tracker.consecutive_failures(), 3);
    }

    #[test]
    fn test_transition_fires_once_per_streak() {
        let mut tracker = tracker();
        let transitions: Vec<_> = (0..10)
            .filter_map(|_| tracker.record_failure("connection refused"))
            .collect();
        assert_eq!(transitions, vec![HealthTransition::BecameUnhealthy]);
        assert_eq!(tracker.snapshot().unhealthy_transitions, 1);
        assert_eq!(tracker.consecutive_failures(), 10);
    }

    #[test]
    fn test_recovery_fires_once() {
        let mut tracker = tracker();
        for _ in 0..4 {
            tracker.record_failure("503");
        }
        assert_eq!(tracker.record_success(), Some(HealthTransition::Recovered));
        assert_eq!(tracker.record_success(), None);
        assert!(tracker.is_healthy());
        assert_eq!(tracker.consecutive_failures(), 0);
        assert_eq!(tracker.snapshot().recoveries, 1);
    }

    #[test]
    fn test_short_streak_does_not_recover() {
        let mut tracker = tracker();
        tracker.record_failure("503");
        tracker.record_failure("503");
        assert_eq!(tracker.record_success(), None);
        assert_eq!(tracker.consecutive_failures(), 0);
        // A fresh streak must reach the threshold again
        tracker.record_failure("503");
        tracker.record_failure("503");
        assert!(tracker.is_healthy());
    }

    #[test]
    fn test_healthy_iff_streak_below_threshold() {
        // true = success, false = failure
        let outcomes = [
            false, true, false, false, false, false, true, true, false, false, true, false,
            false, false, true, false,
        ];
        let mut tracker = tracker();
        let mut streak = 0u32;
        for ok in outcomes {
            if ok {
                tracker.record_success();
                streak = 0;
            } else {
                tracker.record_failure("err");
                streak += 1;
            }
            assert_eq!(tracker.is_healthy(), streak < 3, "streak {}", streak);
            assert_eq!(tracker.consecutive_failures(), streak);
        }
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.unhealthy_transitions, 2);
        assert_eq!(snapshot.recoveries, 2);
        assert_eq!(
            snapshot.total_successes + snapshot.total_failures,
            outcomes.len() as u64
        );
    }

    #[test]
    fn test_zero_threshold_clamped() {
        let config = HealthConfig {
            unhealthy_threshold: 0,
            ..Default::default()
        };
        let mut tracker = HealthTracker::new("forum", &config);
        assert!(tracker.is_healthy());
        assert_eq!(tracker.record_failure("err"), Some(HealthTransition::BecameUnhealthy));
    }
}
